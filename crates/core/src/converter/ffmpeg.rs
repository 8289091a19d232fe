//! FFmpeg-based converter implementation.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::config::ConverterConfig;
use super::error::ConverterError;
use super::traits::AudioConverter;
use super::types::{ConversionJob, ConversionOutput};

/// Maximum number of stderr lines kept in error messages.
const STDERR_TAIL_LINES: usize = 5;

/// FFmpeg-based converter implementation.
pub struct FfmpegConverter {
    config: ConverterConfig,
}

impl FfmpegConverter {
    /// Creates a new FFmpeg converter with the given configuration.
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Creates a converter with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ConverterConfig::default())
    }

    /// Builds ffmpeg arguments for a conversion job.
    fn build_args(&self, job: &ConversionJob) -> Vec<String> {
        let target = job.direction.target_format();

        let mut args = vec![
            "-y".to_string(), // Overwrite output
            "-nostdin".to_string(),
            "-hide_banner".to_string(),
            "-i".to_string(),
            job.input_path.to_string_lossy().to_string(),
            // Drop embedded cover art and other non-audio streams
            "-vn".to_string(),
            "-c:a".to_string(),
            target.ffmpeg_codec().to_string(),
        ];

        if !target.is_lossless() {
            args.extend([
                "-b:a".to_string(),
                format!("{}k", self.config.mp3_bitrate_kbps),
            ]);
        }

        args.extend([
            "-loglevel".to_string(),
            self.config.ffmpeg_log_level.clone(),
            "-f".to_string(),
            target.ffmpeg_muxer().to_string(),
        ]);

        args.push(job.output_path.to_string_lossy().to_string());

        args
    }

    /// Keeps the last few non-empty stderr lines, which carry ffmpeg's actual complaint.
    fn summarize_stderr(stderr: &str) -> String {
        let lines: Vec<&str> = stderr
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
        lines[start..].join("; ")
    }

    async fn run_conversion(&self, job: &ConversionJob) -> Result<ConversionOutput, ConverterError> {
        let start = Instant::now();

        if !tokio::fs::try_exists(&job.input_path).await.unwrap_or(false) {
            return Err(ConverterError::InputNotFound {
                path: job.input_path.clone(),
            });
        }

        job.ensure_direction_matches()?;

        // Ensure output directory exists
        if let Some(parent) = job.output_path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|_| {
                ConverterError::OutputDirectoryFailed {
                    path: parent.to_path_buf(),
                }
            })?;
        }

        let args = self.build_args(job);
        debug!(job_id = %job.job_id, ?args, "Running ffmpeg");

        // kill_on_drop makes the timeout below also terminate the process
        let child = Command::new(&self.config.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ConverterError::FfmpegNotFound {
                        path: self.config.ffmpeg_path.clone(),
                    }
                } else {
                    ConverterError::Io(e)
                }
            })?;

        let output = match timeout(self.config.timeout(), child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    job_id = %job.job_id,
                    timeout_secs = self.config.timeout_secs,
                    "ffmpeg timed out, process killed"
                );
                return Err(ConverterError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            let summary = Self::summarize_stderr(&stderr);
            let reason = match output.status.code() {
                Some(code) if summary.is_empty() => format!("FFmpeg exited with code {}", code),
                Some(code) => format!("FFmpeg exited with code {}: {}", code, summary),
                None => format!("FFmpeg terminated by signal: {}", summary),
            };
            return Err(ConverterError::conversion_failed(
                reason,
                if stderr.is_empty() { None } else { Some(stderr) },
            ));
        }

        // Verify output exists and get size
        let output_meta = tokio::fs::metadata(&job.output_path)
            .await
            .map_err(|_| ConverterError::conversion_failed("Output file not created", None))?;

        Ok(ConversionOutput {
            job_id: job.job_id.clone(),
            output_path: job.output_path.clone(),
            output_size_bytes: output_meta.len(),
            duration_ms: start.elapsed().as_millis() as u64,
            output_format: job.direction.target_format(),
        })
    }

    /// Path of the ffmpeg binary this converter runs.
    pub fn ffmpeg_path(&self) -> &Path {
        &self.config.ffmpeg_path
    }
}

#[async_trait]
impl AudioConverter for FfmpegConverter {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn is_available(&self) -> bool {
        let probe = Command::new(&self.config.ffmpeg_path)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status();

        match timeout(self.config.probe_timeout(), probe).await {
            Ok(Ok(status)) => status.success(),
            Ok(Err(e)) => {
                debug!(path = ?self.config.ffmpeg_path, error = %e, "ffmpeg probe failed");
                false
            }
            Err(_) => {
                debug!(path = ?self.config.ffmpeg_path, "ffmpeg probe timed out");
                false
            }
        }
    }

    async fn convert(&self, job: ConversionJob) -> Result<ConversionOutput, ConverterError> {
        self.run_conversion(&job).await
    }
}
