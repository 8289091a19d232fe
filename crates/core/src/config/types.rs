use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::converter::ConverterConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub converter: ConverterConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Verbose logging when no RUST_LOG filter is set.
    #[serde(default)]
    pub debug: bool,
    /// Directory served at `/static` instead of the assets built into the
    /// binary. Relative paths resolve against the working directory.
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            debug: false,
            static_dir: None,
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    5000
}

/// Storage areas and retention policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Incoming area: uploaded originals.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
    /// Outgoing area: converted results.
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,
    /// Maximum request body size in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Age after which a stored asset is eligible for deletion.
    #[serde(default = "default_retention_secs")]
    pub retention_secs: u64,
    /// Interval of the background janitor task.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
    /// Also sweep whenever the UI page is rendered.
    #[serde(default = "default_sweep_on_page_view")]
    pub sweep_on_page_view: bool,
}

impl StorageConfig {
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Human readable upload limit, e.g. "50MB".
    pub fn max_upload_label(&self) -> String {
        format!("{}MB", self.max_upload_bytes / (1024 * 1024))
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            download_dir: default_download_dir(),
            max_upload_bytes: default_max_upload_bytes(),
            retention_secs: default_retention_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            sweep_on_page_view: default_sweep_on_page_view(),
        }
    }
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("static/uploads")
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("static/downloads")
}

fn default_max_upload_bytes() -> usize {
    50 * 1024 * 1024
}

fn default_retention_secs() -> u64 {
    3600 // 1 hour
}

fn default_sweep_interval_secs() -> u64 {
    300
}

fn default_sweep_on_page_view() -> bool {
    true
}
