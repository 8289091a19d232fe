//! Upload name checks.
//!
//! Trust is extension-only: file contents are never sniffed, so a file named
//! `x.wav` holding MP3 data passes validation and fails later in ffmpeg.

use once_cell::sync::Lazy;
use regex_lite::Regex;

use crate::converter::AudioFormat;

/// Extensions accepted for upload.
pub const ALLOWED_EXTENSIONS: [&str; 2] = ["wav", "mp3"];

static UNSAFE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.-]").unwrap());
static DOT_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.{2,}").unwrap());

/// Returns true iff `filename` has a `.` and its lowercased suffix is allowed.
pub fn is_allowed(filename: &str) -> bool {
    extension(filename)
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Lowercased text after the last `.`, or `None` when there is no `.`.
pub fn extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

/// Audio format named by the file's extension.
pub fn audio_format(filename: &str) -> Option<AudioFormat> {
    extension(filename).and_then(|ext| AudioFormat::from_extension(&ext))
}

/// Text before the last `.`, or the whole name when there is none.
pub fn stem(filename: &str) -> &str {
    filename
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(filename)
}

/// Reduces a client-supplied name to a safe flat filename.
///
/// Path separators become word breaks, whitespace runs become `_`, anything
/// outside `[A-Za-z0-9_.-]` is dropped, dot runs collapse to a single dot, and
/// leading/trailing `.` and `_` are trimmed. The result never contains a path
/// separator or `..`, and may be empty.
pub fn sanitize_filename(filename: &str) -> String {
    let flattened = filename.replace(['/', '\\'], " ");
    let joined = flattened.split_whitespace().collect::<Vec<_>>().join("_");
    let stripped = UNSAFE_CHARS.replace_all(&joined, "");
    let collapsed = DOT_RUNS.replace_all(&stripped, ".");
    collapsed.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// True when `name` can be joined onto a storage directory without escaping it.
pub fn is_flat_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains(['/', '\\', '\0'])
        && !name.contains("..")
        && name != "."
}
