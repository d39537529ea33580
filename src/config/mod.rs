//! Configuration module for the bucket gateway

use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};
use std::path::{Path, PathBuf};

/// Default listen port when neither a config file nor `PORT` sets one
pub const DEFAULT_PORT: u16 = 4000;

/// Region used when neither a config file nor `AWS_REGION` sets one
pub const DEFAULT_REGION: &str = "us-east-1";

/// Default upload size limit (25 MiB)
pub const DEFAULT_MAX_FILE_SIZE: usize = 25 * 1024 * 1024;

/// Main application settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub upload: UploadSettings,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// S3 bucket configuration
#[derive(Clone, Deserialize)]
pub struct StorageSettings {
    pub region: String,
    pub bucket_name: String,
    /// Static credentials; when either is empty the AWS default provider chain is used
    #[serde(default)]
    pub access_key_id: String,
    #[serde(default)]
    pub secret_access_key: String,
    /// Custom endpoint for S3-compatible services (MinIO, R2, ...)
    pub endpoint_url: Option<String>,
    /// Overrides the virtual-hosted AWS URL used to build public links
    pub public_url_base: Option<String>,
    /// Upper bound on listing pages fetched per request
    pub max_list_pages: u32,
}

/// Upload limits
#[derive(Debug, Clone, Deserialize)]
pub struct UploadSettings {
    pub max_file_size: usize,
}

impl std::fmt::Debug for StorageSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageSettings")
            .field("region", &self.region)
            .field("bucket_name", &self.bucket_name)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("endpoint_url", &self.endpoint_url)
            .field("public_url_base", &self.public_url_base)
            .field("max_list_pages", &self.max_list_pages)
            .finish()
    }
}

impl StorageSettings {
    pub fn has_static_credentials(&self) -> bool {
        !self.access_key_id.is_empty() && !self.secret_access_key.is_empty()
    }

    /// Base URL that object keys are appended to, always ending in `/`
    pub fn public_base_url(&self) -> String {
        match self.public_url_base.as_deref() {
            Some(base) if !base.is_empty() => {
                if base.ends_with('/') {
                    base.to_string()
                } else {
                    format!("{}/", base)
                }
            }
            _ => format!(
                "https://{}.s3.{}.amazonaws.com/",
                self.bucket_name, self.region
            ),
        }
    }
}

impl Settings {
    /// Load configuration from files and environment variables
    ///
    /// Configuration priority (highest to lowest):
    /// 1. Plain variables (AWS_REGION, BUCKET_NAME, AWS_ACCESS_KEY_ID,
    ///    AWS_SECRET_ACCESS_KEY, PORT, AWS_ENDPOINT_URL, PUBLIC_URL_BASE)
    /// 2. Environment variables prefixed with GATEWAY_
    /// 3. config/local.toml (gitignored)
    /// 4. config/default.toml
    /// 5. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config_dir = std::env::var("CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config"));

        Self::load_from(&config_dir)
    }

    /// Same as [`Settings::load`] with an explicit config directory
    pub fn load_from(config_dir: &Path) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("storage.region", DEFAULT_REGION)?
            .set_default("storage.max_list_pages", 1_i64)?
            .set_default("upload.max_file_size", DEFAULT_MAX_FILE_SIZE as i64)?
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join("local.toml")).required(false))
            // GATEWAY_STORAGE__BUCKET_NAME, GATEWAY_SERVER__PORT, etc.
            .add_source(
                Environment::with_prefix("GATEWAY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
            )
            .set_override_option("storage.region", env_var("AWS_REGION"))?
            .set_override_option("storage.bucket_name", env_var("BUCKET_NAME"))?
            .set_override_option("storage.access_key_id", env_var("AWS_ACCESS_KEY_ID"))?
            .set_override_option("storage.secret_access_key", env_var("AWS_SECRET_ACCESS_KEY"))?
            .set_override_option("storage.endpoint_url", env_var("AWS_ENDPOINT_URL"))?
            .set_override_option("storage.public_url_base", env_var("PUBLIC_URL_BASE"))?
            .set_override_option("server.port", env_var("PORT"))?;

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings that cannot produce a working bucket client
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.region.trim().is_empty() {
            return Err(ConfigError::Message("storage.region must not be empty".into()));
        }
        if self.storage.bucket_name.trim().is_empty() {
            return Err(ConfigError::Message("storage.bucket_name must not be empty".into()));
        }
        if self.storage.max_list_pages == 0 {
            return Err(ConfigError::Message("storage.max_list_pages must be at least 1".into()));
        }
        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port: DEFAULT_PORT,
                workers: None,
            },
            storage: StorageSettings {
                region: DEFAULT_REGION.to_string(),
                bucket_name: String::new(),
                access_key_id: String::new(),
                secret_access_key: String::new(),
                endpoint_url: None,
                public_url_base: None,
                max_list_pages: 1,
            },
            upload: UploadSettings {
                max_file_size: DEFAULT_MAX_FILE_SIZE,
            },
        }
    }
}
