//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, BlobStoreConfig, Environment, LogFormat, LoggingConfig, PackageSettings,
    ServerConfig,
};
