pub mod config;
pub mod converter;
pub mod janitor;
pub mod metrics;
pub mod orchestrator;
pub mod storage;
pub mod testing;
pub mod validator;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, ServerConfig,
    StorageConfig,
};
pub use converter::{
    AudioConverter, AudioFormat, ConversionDirection, ConversionJob, ConversionOutput,
    ConverterConfig, ConverterError, FfmpegConverter,
};
pub use janitor::{Janitor, SweepReport};
pub use orchestrator::{
    ConversionOutcome, ConversionService, ConversionServiceError, UploadRequest, UploadedFile,
    FFMPEG_UNAVAILABLE_MESSAGE,
};
pub use storage::{AssetEntry, AssetStore, FsAssetStore, StorageArea, StorageError, StoredAsset};
