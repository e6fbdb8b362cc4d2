//! Server configuration management

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server name
    pub name: String,
    /// Server version
    pub version: String,
    /// Server description
    pub description: Option<String>,
    /// Bind address (`JIVE_HOST`)
    pub bind_address: String,
    /// Bind port (`JIVE_PORT`)
    pub port: u16,
    /// Enable TLS
    pub enable_tls: bool,
    /// TLS configuration
    pub tls: Option<TlsConfig>,
    /// Timeout configuration
    pub timeouts: TimeoutConfig,
    /// HTTP backpressure configuration
    pub concurrency: ConcurrencyConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Directory the store's Lance tables and the embedder's cache (if any) live under
    /// (`JIVE_STORAGE_PATH`).
    pub data_dir: PathBuf,
    /// Name of the `Embedder` implementation to construct (`JIVE_EMBED_MODEL`).
    pub embed_model: String,
    /// Embedding vector dimension (`JIVE_EMBED_DIM`).
    pub embed_dim: usize,
    /// Namespace used when a request supplies none of the four resolution sources
    /// (`JIVE_DEFAULT_NAMESPACE`).
    pub default_namespace: String,
    /// Comma-separated CORS origin allowlist, `*` for permissive (`JIVE_CORS_ORIGINS`).
    pub cors_origins: String,
    /// Upgrade type-order violations in the hierarchy validator from warnings to errors
    /// (`JIVE_STRICT_TYPE_ORDER`).
    pub strict_type_order: bool,
    /// Additional configuration
    pub additional: HashMap<String, serde_json::Value>,
}

/// TLS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TlsConfig {
    /// Certificate file path
    pub cert_file: PathBuf,
    /// Private key file path
    pub key_file: PathBuf,
}

/// Timeout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Request timeout
    pub request_timeout: Duration,
    /// Connection timeout
    pub connection_timeout: Duration,
    /// Keep-alive timeout
    pub keep_alive_timeout: Duration,
}

/// HTTP backpressure configuration (`JIVE_MAX_CONCURRENT_REQUESTS`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcurrencyConfig {
    /// Maximum number of in-flight HTTP requests before `503` is returned
    pub max_concurrent_requests: usize,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self { max_concurrent_requests: 100 }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Enable structured logging
    pub structured: bool,
    /// Log file path
    pub file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: crate::SERVER_NAME.to_string(),
            version: crate::SERVER_VERSION.to_string(),
            description: Some("Next generation MCP server".to_string()),
            bind_address: "127.0.0.1".to_string(),
            port: 8765,
            enable_tls: false,
            tls: None,
            timeouts: TimeoutConfig::default(),
            concurrency: ConcurrencyConfig::default(),
            logging: LoggingConfig::default(),
            data_dir: PathBuf::from("./data/lancedb_jive/"),
            embed_model: "hash-mock".to_string(),
            embed_dim: 384,
            default_namespace: "default".to_string(),
            cors_origins: "*".to_string(),
            strict_type_order: false,
            additional: HashMap::new(),
        }
    }
}

impl ServerConfig {
    /// Build a configuration starting from [`ServerConfig::default`] and overriding each field
    /// whose `JIVE_*` environment variable (see `spec.md` §6.6) is set and parses.
    ///
    /// Unset or unparsable variables fall back to the default silently, matching the teacher's
    /// config-merge pattern of "environment overrides defaults, never errors at startup".
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("JIVE_STORAGE_PATH") {
            config.data_dir = PathBuf::from(path);
        }
        if let Ok(model) = std::env::var("JIVE_EMBED_MODEL") {
            config.embed_model = model;
        }
        if let Some(dim) = std::env::var("JIVE_EMBED_DIM").ok().and_then(|v| v.parse().ok()) {
            config.embed_dim = dim;
        }
        if let Ok(namespace) = std::env::var("JIVE_DEFAULT_NAMESPACE") {
            config.default_namespace = namespace;
        }
        if let Ok(host) = std::env::var("JIVE_HOST") {
            config.bind_address = host;
        }
        if let Some(port) = std::env::var("JIVE_PORT").ok().and_then(|v| v.parse().ok()) {
            config.port = port;
        }
        if let Some(timeout_ms) = std::env::var("JIVE_REQUEST_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.timeouts.request_timeout = Duration::from_millis(timeout_ms);
        }
        if let Some(cap) = std::env::var("JIVE_MAX_CONCURRENT_REQUESTS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.concurrency.max_concurrent_requests = cap;
        }
        if let Ok(origins) = std::env::var("JIVE_CORS_ORIGINS") {
            config.cors_origins = origins;
        }
        if let Ok(level) = std::env::var("JIVE_LOG") {
            config.logging.level = level;
        }
        if let Some(strict) = std::env::var("JIVE_STRICT_TYPE_ORDER").ok().and_then(|v| v.parse().ok()) {
            config.strict_type_order = strict;
        }

        config
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connection_timeout: Duration::from_secs(10),
            keep_alive_timeout: Duration::from_secs(60),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            structured: true,
            file: None,
        }
    }
}

/// Configuration builder
#[derive(Debug)]
pub struct ConfigurationBuilder {
    /// Configuration being built
    config: ServerConfig,
}

impl ConfigurationBuilder {
    /// Create a new configuration builder
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
        }
    }

    /// Set server name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Set server version
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.config.version = version.into();
        self
    }

    /// Set server description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.config.description = Some(description.into());
        self
    }

    /// Set bind address
    pub fn bind_address(mut self, address: impl Into<String>) -> Self {
        self.config.bind_address = address.into();
        self
    }

    /// Set port
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Enable TLS with configuration
    #[must_use]
    pub fn tls(mut self, cert_file: PathBuf, key_file: PathBuf) -> Self {
        self.config.enable_tls = true;
        self.config.tls = Some(TlsConfig {
            cert_file,
            key_file,
        });
        self
    }

    /// Set request timeout
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeouts.request_timeout = timeout;
        self
    }

    /// Set the HTTP concurrent-request cap (`JIVE_MAX_CONCURRENT_REQUESTS`).
    #[must_use]
    pub const fn max_concurrent_requests(mut self, cap: usize) -> Self {
        self.config.concurrency.max_concurrent_requests = cap;
        self
    }

    /// Set log level
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    /// Set the data directory the store and embedder persist under.
    pub fn data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.config.data_dir = data_dir.into();
        self
    }

    /// Set the namespace used when a request supplies none of the resolution sources.
    pub fn default_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.config.default_namespace = namespace.into();
        self
    }

    /// Set the CORS origin allowlist (`JIVE_CORS_ORIGINS`).
    pub fn cors_origins(mut self, origins: impl Into<String>) -> Self {
        self.config.cors_origins = origins.into();
        self
    }

    /// Build the configuration
    #[must_use]
    pub fn build(self) -> ServerConfig {
        self.config
    }
}

impl Default for ConfigurationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration alias for convenience
pub type Configuration = ServerConfig;
