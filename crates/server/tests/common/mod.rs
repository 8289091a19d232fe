//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with a mock conversion engine and temporary storage areas, so the HTTP
//! surface can be exercised without ffmpeg.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use wavswap_core::testing::MockConverter;
use wavswap_core::{
    AssetStore, AudioConverter, Config, ConversionService, FfmpegConverter, FsAssetStore, Janitor,
    ServerConfig, StorageConfig,
};
use wavswap_server::{create_router, AppState};

/// Re-export fixtures for test convenience
pub use wavswap_core::testing::fixtures;

const BOUNDARY: &str = "wavswap-test-boundary";

/// Test fixture for E2E testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_conversion() {
///     let fixture = TestFixture::new().await;
///
///     let response = fixture
///         .post_upload("song.wav", b"RIFF", Some("wav2mp3"))
///         .await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock converter - control availability and failures
    pub converter: Arc<MockConverter>,
    /// Storage behind the router
    pub store: Arc<FsAssetStore>,
    /// Janitor behind the router
    pub janitor: Arc<Janitor>,
    /// Temporary directory holding both storage areas
    pub temp_dir: TempDir,
    pub upload_dir: PathBuf,
    pub download_dir: PathBuf,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub bytes: Vec<u8>,
    /// Parsed JSON body, `Null` when the body is not JSON.
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let upload_dir = temp_dir.path().join("uploads");
        let download_dir = temp_dir.path().join("downloads");

        let config = Config {
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 5000, // Not used for in-process testing
                debug: false,
                static_dir: test_config.static_dir.clone(),
            },
            storage: StorageConfig {
                upload_dir: upload_dir.clone(),
                download_dir: download_dir.clone(),
                max_upload_bytes: test_config.max_upload_bytes,
                sweep_on_page_view: test_config.sweep_on_page_view,
                ..StorageConfig::default()
            },
            converter: Default::default(),
        };

        let store = Arc::new(FsAssetStore::new(&config.storage));
        store.init().await.expect("Failed to create storage dirs");

        let converter = Arc::new(MockConverter::new());
        let engine: Arc<dyn AudioConverter> = if test_config.use_ffmpeg {
            Arc::new(FfmpegConverter::new(config.converter.clone()))
        } else {
            Arc::clone(&converter) as Arc<dyn AudioConverter>
        };

        let service = Arc::new(ConversionService::new(
            engine,
            Arc::clone(&store) as Arc<dyn AssetStore>,
        ));
        let janitor = Arc::new(Janitor::from_config(
            Arc::clone(&store) as Arc<dyn AssetStore>,
            &config.storage,
        ));

        let state = Arc::new(AppState::new(config, service, Arc::clone(&janitor)));
        let router = create_router(state);

        Self {
            router,
            converter,
            store,
            janitor,
            temp_dir,
            upload_dir,
            download_dir,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Upload a file to `/convert`. `conversion_type` is omitted when `None`.
    pub async fn post_upload(
        &self,
        filename: &str,
        bytes: &[u8],
        conversion_type: Option<&str>,
    ) -> TestResponse {
        let mut parts = vec![Part::File {
            name: "file",
            filename,
            bytes,
        }];
        if let Some(value) = conversion_type {
            parts.push(Part::Text {
                name: "conversion_type",
                value,
            });
        }
        self.post_multipart("/convert", &parts).await
    }

    /// Send a multipart form built from `parts`.
    pub async fn post_multipart(&self, path: &str, parts: &[Part<'_>]) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap();
        self.send(request).await
    }

    /// Send a POST request with raw body and custom content type.
    pub async fn post_with_content_type(
        &self,
        path: &str,
        body: &str,
        content_type: &str,
    ) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", content_type)
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Names currently present in the upload directory.
    pub fn uploaded_files(&self) -> Vec<String> {
        list_dir(&self.upload_dir)
    }

    /// Names currently present in the download directory.
    pub fn converted_files(&self) -> Vec<String> {
        list_dir(&self.download_dir)
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        let body: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            bytes,
            body,
        }
    }
}

/// One part of a multipart form.
pub enum Part<'a> {
    File {
        name: &'a str,
        filename: &'a str,
        bytes: &'a [u8],
    },
    Text {
        name: &'a str,
        value: &'a str,
    },
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::File {
                name,
                filename,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        name, filename
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
                body.extend_from_slice(bytes);
            }
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn list_dir(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

/// Whether an `ffmpeg` binary can be run on this machine.
pub async fn ffmpeg_installed() -> bool {
    FfmpegConverter::with_defaults().is_available().await
}

/// Configuration for test fixture.
#[derive(Debug, Clone)]
pub struct TestConfig {
    pub max_upload_bytes: usize,
    pub sweep_on_page_view: bool,
    /// Use the real ffmpeg engine instead of the mock
    pub use_ffmpeg: bool,
    /// Serve `/static` from this directory instead of the built-in assets
    pub static_dir: Option<PathBuf>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: StorageConfig::default().max_upload_bytes,
            sweep_on_page_view: true,
            use_ffmpeg: false,
            static_dir: None,
        }
    }
}

impl TestConfig {
    /// Create config with a small upload limit.
    pub fn with_upload_limit(max_upload_bytes: usize) -> Self {
        Self {
            max_upload_bytes,
            ..Self::default()
        }
    }

    /// Create config serving `/static` from a directory.
    pub fn with_static_dir(dir: PathBuf) -> Self {
        Self {
            static_dir: Some(dir),
            ..Self::default()
        }
    }

    /// Create config backed by the real ffmpeg engine.
    pub fn with_ffmpeg() -> Self {
        Self {
            use_ffmpeg: true,
            ..Self::default()
        }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
