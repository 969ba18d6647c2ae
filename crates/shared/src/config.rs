//! Storage backend configuration management.

use serde::{Deserialize, Serialize};

/// Connection parameters for an S3-compatible object store.
///
/// Created once when a storage backend is configured, read on every
/// operation, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Endpoint host of the store.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Endpoint port of the store.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Whether to connect over TLS.
    #[serde(default)]
    pub use_tls: bool,
    /// Access key used for request signing.
    pub access_key: String,
    /// Secret key used for request signing.
    pub secret_key: String,
    /// Region of the bucket, if the deployment has one.
    #[serde(default)]
    pub region: Option<String>,
}

fn default_endpoint() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    9000
}

impl ConnectionConfig {
    /// Create a connection config for the default local endpoint.
    #[must_use]
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            endpoint: default_endpoint(),
            port: default_port(),
            use_tls: false,
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            region: None,
        }
    }

    /// Set the endpoint host.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the endpoint port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Enable or disable TLS.
    #[must_use]
    pub fn with_tls(mut self, use_tls: bool) -> Self {
        self.use_tls = use_tls;
        self
    }

    /// Set the bucket region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Full endpoint URL derived from host, port and TLS flag.
    #[must_use]
    pub fn endpoint_url(&self) -> String {
        let scheme = if self.use_tls { "https" } else { "http" };
        format!("{scheme}://{}:{}", self.endpoint, self.port)
    }
}

/// Per-storage options: target bucket, key prefix and URL expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageOptions {
    /// Bucket objects are written to.
    pub bucket_name: String,
    /// Prefix prepended to every object key, if configured.
    #[serde(default)]
    pub path_prefix: Option<String>,
    /// Lifetime of issued read URLs in seconds.
    #[serde(default = "default_expiry")]
    pub expiry_secs: u64,
    /// Maximum accepted upload size in bytes, if a rule is configured.
    #[serde(default)]
    pub max_file_size: Option<u64>,
}

fn default_expiry() -> u64 {
    StorageOptions::DEFAULT_EXPIRY_SECS
}

impl StorageOptions {
    /// Default read URL lifetime: 1 hour.
    pub const DEFAULT_EXPIRY_SECS: u64 = 3600;

    /// Create options for a bucket with default settings.
    #[must_use]
    pub fn new(bucket_name: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            path_prefix: None,
            expiry_secs: Self::DEFAULT_EXPIRY_SECS,
            max_file_size: None,
        }
    }

    /// Set the object key prefix.
    #[must_use]
    pub fn with_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.path_prefix = Some(prefix.into());
        self
    }

    /// Set the read URL lifetime in seconds.
    #[must_use]
    pub fn with_expiry(mut self, secs: u64) -> Self {
        self.expiry_secs = secs;
        self
    }

    /// Set the maximum accepted upload size in bytes.
    #[must_use]
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = Some(bytes);
        self
    }
}

/// Complete storage backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Object store connection parameters.
    pub connection: ConnectionConfig,
    /// Per-storage options.
    pub options: StorageOptions,
}

impl StorageSettings {
    /// Loads settings from config files and environment.
    ///
    /// Layers `config/default`, `config/{RUN_MODE}` and `ARCA`-prefixed
    /// environment variables (`__` separator), later sources winning.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("ARCA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
