use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub package: PackageSettings,
    #[serde(default)]
    pub blob_store: BlobStoreConfig,
    #[serde(default)]
    pub environment: Environment,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Where templates come from and where packages go
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PackageSettings {
    pub template_dir: PathBuf,
    pub scratch_dir: PathBuf,
    pub product_prefix: String,
    /// Prepended to self-hosted download links; empty yields relative links
    pub public_base_url: String,
    pub generation_timeout_secs: u64,
    pub keep_local_after_upload: bool,
}

/// Durable storage backend selection
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BlobStoreConfig {
    /// `none` or `http`
    pub backend: String,
    pub base_url: String,
    pub bucket: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

/// Deployment environment; controls error detail exposure
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for PackageSettings {
    fn default() -> Self {
        Self {
            template_dir: PathBuf::from("package-template"),
            scratch_dir: std::env::temp_dir().join("rl-maze-packages"),
            product_prefix: "RLMazeTrainer".to_string(),
            public_base_url: String::new(),
            generation_timeout_secs: 60,
            keep_local_after_upload: true,
        }
    }
}

impl Default for BlobStoreConfig {
    fn default() -> Self {
        Self {
            backend: "none".to_string(),
            base_url: String::new(),
            bucket: "packages".to_string(),
            api_key: String::new(),
            timeout_secs: 60,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.package.template_dir, PathBuf::from("package-template"));
        assert_eq!(config.package.product_prefix, "RLMazeTrainer");
        assert!(config.package.scratch_dir.starts_with(std::env::temp_dir()));
        assert_eq!(config.blob_store.backend, "none");
        assert_eq!(config.blob_store.bucket, "packages");
        assert_eq!(config.environment, Environment::Production);
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                environment = "development"

                [package]
                template_dir = "/srv/template"
                generation_timeout_secs = 5

                [blob_store]
                backend = "http"
                base_url = "https://example.supabase.co"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert!(config.environment.is_development());
        assert_eq!(config.package.template_dir, PathBuf::from("/srv/template"));
        assert_eq!(config.package.generation_timeout_secs, 5);
        assert_eq!(config.package.product_prefix, "RLMazeTrainer");
        assert!(config.package.keep_local_after_upload);
        assert_eq!(config.blob_store.backend, "http");
        assert_eq!(config.blob_store.bucket, "packages");
        assert_eq!(config.logging.level, "info");
    }
}
