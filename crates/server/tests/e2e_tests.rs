//! End-to-end tests with a mocked conversion engine.
//!
//! These tests run the full server stack in-process: routing, multipart
//! parsing, the conversion service and the filesystem storage areas.

mod common;

use std::time::{Duration, SystemTime};

use axum::http::{header, StatusCode};
use wavswap_core::ConverterError;

use common::{fixtures, Part, TestConfig, TestFixture};

// =============================================================================
// Basic API Tests
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/health").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_index_serves_page() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/").await;

    assert_status!(response, StatusCode::OK);
    let html = String::from_utf8(response.bytes).unwrap();
    assert!(html.contains("conversion-type-toggle"));
    assert!(html.contains("/static/script.js"));
}

#[tokio::test]
async fn test_static_assets_built_in() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/static/script.js").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/javascript"));
    assert_eq!(response.bytes, include_bytes!("../static/script.js"));

    let response = fixture.get("/static/style.css").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.bytes, include_bytes!("../static/style.css"));

    let response = fixture.get("/static/missing.js").await;
    assert_status!(response, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "Not found");
}

#[tokio::test]
async fn test_static_dir_override() {
    let ui = tempfile::TempDir::new().unwrap();
    std::fs::write(ui.path().join("script.js"), "// custom build").unwrap();
    let fixture =
        TestFixture::with_config(TestConfig::with_static_dir(ui.path().to_path_buf())).await;

    let response = fixture.get("/static/script.js").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.bytes, b"// custom build");
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/nope").await;
    assert_status!(response, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "Not found");
}

#[tokio::test]
async fn test_ffmpeg_status_reflects_engine() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/ffmpeg-status").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["ffmpeg_available"], true);

    fixture.converter.set_available(false).await;
    let response = fixture.get("/ffmpeg-status").await;
    assert_eq!(response.body["ffmpeg_available"], false);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let fixture = TestFixture::new().await;
    fixture.get("/health").await;

    let response = fixture.get("/metrics").await;
    assert_eq!(response.status, StatusCode::OK);
    let text = String::from_utf8(response.bytes).unwrap();
    assert!(text.contains("wavswap_http_requests_total"));
    assert!(text.contains("wavswap_stored_files"));
}

// =============================================================================
// Conversion Tests
// =============================================================================

#[tokio::test]
async fn test_convert_and_download() {
    let fixture = TestFixture::new().await;
    let wav = fixtures::wav_bytes(800);

    let response = fixture
        .post_upload("My Song.wav", &wav, Some("wav2mp3"))
        .await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["message"], "Conversion successful!");
    assert_eq!(response.body["converted_filename"], "My_Song.mp3");

    let download_url = response.body["download_url"].as_str().unwrap().to_string();
    assert!(download_url.starts_with("/download/"));
    assert!(download_url.ends_with("_My_Song.mp3"));

    let download = fixture.get(&download_url).await;
    assert_eq!(download.status, StatusCode::OK);
    let disposition = download.headers[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains("_My_Song.mp3"));

    let mut expected = b"converted:".to_vec();
    expected.extend_from_slice(&wav);
    assert_eq!(download.bytes, expected);

    assert_eq!(fixture.uploaded_files().len(), 1);
    assert_eq!(fixture.converted_files().len(), 1);
}

#[tokio::test]
async fn test_mp3_to_wav() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .post_upload("track.mp3", b"ID3\x03fake", Some("mp32wav"))
        .await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["converted_filename"], "track.wav");
}

#[tokio::test]
async fn test_conversion_type_defaults_to_wav2mp3() {
    let fixture = TestFixture::new().await;

    let response = fixture.post_upload("a.wav", b"RIFF", None).await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["converted_filename"], "a.mp3");
}

#[tokio::test]
async fn test_direction_mismatch_rolls_back() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .post_upload("song.mp3", b"ID3", Some("wav2mp3"))
        .await;

    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body["error"],
        "File type (mp3) doesn't match conversion type (wav2mp3)"
    );
    assert!(fixture.uploaded_files().is_empty());
    assert!(fixture.converted_files().is_empty());
}

#[tokio::test]
async fn test_invalid_conversion_type() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .post_upload("song.wav", b"RIFF", Some("wav2ogg"))
        .await;

    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Invalid conversion type: wav2ogg");
}

#[tokio::test]
async fn test_disallowed_file_type() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .post_upload("readme.txt", b"hello", Some("wav2mp3"))
        .await;

    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body["error"],
        "File type not allowed. Please upload a WAV or MP3 file."
    );
    assert!(fixture.uploaded_files().is_empty());
}

#[tokio::test]
async fn test_missing_file_part() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .post_multipart(
            "/convert",
            &[Part::Text {
                name: "conversion_type",
                value: "wav2mp3",
            }],
        )
        .await;

    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "No file part");
}

#[tokio::test]
async fn test_file_field_without_filename_is_missing_file() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .post_multipart(
            "/convert",
            &[
                Part::Text {
                    name: "file",
                    value: "RIFF-not-a-file",
                },
                Part::Text {
                    name: "conversion_type",
                    value: "wav2mp3",
                },
            ],
        )
        .await;

    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "No file part");
    assert!(fixture.uploaded_files().is_empty());
}

#[tokio::test]
async fn test_empty_filename() {
    let fixture = TestFixture::new().await;

    let response = fixture.post_upload("", b"", Some("wav2mp3")).await;

    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "No file selected");
}

#[tokio::test]
async fn test_not_multipart() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .post_with_content_type("/convert", "{}", "application/json")
        .await;

    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "No file part");
}

#[tokio::test]
async fn test_engine_unavailable_is_503() {
    let fixture = TestFixture::new().await;
    fixture.converter.set_available(false).await;

    let response = fixture
        .post_upload("song.wav", b"RIFF", Some("wav2mp3"))
        .await;

    assert_status!(response, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        response.body["error"],
        "FFmpeg is not installed or not in PATH. Please contact the administrator."
    );
    assert!(fixture.uploaded_files().is_empty());
}

#[tokio::test]
async fn test_engine_unavailable_wins_over_oversized_body() {
    let fixture = TestFixture::with_config(TestConfig::with_upload_limit(1024 * 1024)).await;
    fixture.converter.set_available(false).await;

    let response = fixture
        .post_upload("big.wav", &vec![0u8; 2 * 1024 * 1024], Some("wav2mp3"))
        .await;

    assert_status!(response, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        response.body["error"],
        "FFmpeg is not installed or not in PATH. Please contact the administrator."
    );
    assert!(fixture.uploaded_files().is_empty());
}

#[tokio::test]
async fn test_engine_failure_is_500() {
    let fixture = TestFixture::new().await;
    fixture.converter.set_partial_output_on_error(true).await;
    fixture
        .converter
        .set_next_error(ConverterError::conversion_failed(
            "FFmpeg exited with code 1: Invalid data found when processing input",
            None,
        ))
        .await;

    let response = fixture
        .post_upload("broken.wav", b"not audio", Some("wav2mp3"))
        .await;

    assert_status!(response, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.body["error"]
        .as_str()
        .unwrap()
        .contains("Invalid data found"));
    assert!(fixture.uploaded_files().is_empty());
    assert!(fixture.converted_files().is_empty());
}

#[tokio::test]
async fn test_oversized_upload_is_413() {
    let fixture = TestFixture::with_config(TestConfig::with_upload_limit(1024 * 1024)).await;

    let response = fixture
        .post_upload("big.wav", &vec![0u8; 2 * 1024 * 1024], Some("wav2mp3"))
        .await;

    assert_status!(response, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(response.body["error"], "File too large. Maximum size is 1MB");
    assert!(fixture.uploaded_files().is_empty());
}

#[tokio::test]
async fn test_traversal_upload_name_stays_in_upload_dir() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .post_upload("../../outside.wav", b"RIFF", Some("wav2mp3"))
        .await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["converted_filename"], "outside.mp3");
    assert!(!fixture.temp_dir.path().parent().unwrap().join("outside.wav").exists());
    assert_eq!(fixture.uploaded_files().len(), 1);
}

// =============================================================================
// Download Tests
// =============================================================================

#[tokio::test]
async fn test_download_unknown_file() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/download/unknown-token_x.mp3").await;

    assert_status!(response, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "File not found");
}

#[tokio::test]
async fn test_download_rejects_traversal() {
    let fixture = TestFixture::new().await;
    std::fs::write(fixture.temp_dir.path().join("secret.txt"), b"secret").unwrap();

    let response = fixture.get("/download/..%2Fsecret.txt").await;

    assert_status!(response, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "File not found");
}

#[tokio::test]
async fn test_download_ignores_upload_area() {
    let fixture = TestFixture::new().await;
    std::fs::write(fixture.upload_dir.join("tok_song.wav"), b"RIFF").unwrap();

    let response = fixture.get("/download/tok_song.wav").await;

    assert_status!(response, StatusCode::NOT_FOUND);
}

// =============================================================================
// Retention Tests
// =============================================================================

fn backdate(path: &std::path::Path, age: Duration) {
    let file = std::fs::File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() - age).unwrap();
}

#[tokio::test]
async fn test_page_view_sweeps_expired_files() {
    let fixture = TestFixture::new().await;

    let old = fixture.upload_dir.join("old_song.wav");
    let fresh = fixture.download_dir.join("fresh_song.mp3");
    std::fs::write(&old, b"RIFF").unwrap();
    std::fs::write(&fresh, b"ID3").unwrap();
    backdate(&old, Duration::from_secs(61 * 60));
    backdate(&fresh, Duration::from_secs(30 * 60));

    let response = fixture.get("/").await;
    assert_eq!(response.status, StatusCode::OK);

    assert!(!old.exists());
    assert!(fresh.exists());
}

#[tokio::test]
async fn test_page_view_sweep_can_be_disabled() {
    let fixture = TestFixture::with_config(TestConfig {
        sweep_on_page_view: false,
        ..TestConfig::default()
    })
    .await;

    let old = fixture.upload_dir.join("old_song.wav");
    std::fs::write(&old, b"RIFF").unwrap();
    backdate(&old, Duration::from_secs(2 * 60 * 60));

    fixture.get("/").await;
    assert!(old.exists());

    // The janitor still reclaims it on its own schedule
    let report = fixture.janitor.sweep().await;
    assert_eq!(report.removed_count(), 1);
    assert!(!old.exists());
}
