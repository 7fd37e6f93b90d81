use persistence::db::DatabaseConfig;
use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub jobs: JobsConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Bearer key required on mutating routes. Empty disables auth,
    /// which is only sensible for local development.
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Remote booking collaborator. When no usable key is configured the
/// service runs standalone: local store only, outbox never drained.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    #[serde(default)]
    pub base_url: String,

    #[serde(default)]
    pub anon_key: String,

    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    #[serde(default = "default_mutate_timeout")]
    pub mutate_timeout_secs: u64,
}

impl RemoteConfig {
    /// A key shorter than 10 characters is treated as absent, the same
    /// heuristic the booking panel always used for placeholder keys.
    pub fn is_enabled(&self) -> bool {
        !self.base_url.is_empty() && self.anon_key.len() >= 10
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            anon_key: String::new(),
            fetch_timeout_secs: default_fetch_timeout(),
            mutate_timeout_secs: default_mutate_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobsConfig {
    #[serde(default = "default_reminder_scan")]
    pub reminder_scan_secs: u64,

    #[serde(default = "default_outbox_drain")]
    pub outbox_drain_secs: u64,

    #[serde(default = "default_remote_poll")]
    pub remote_poll_secs: u64,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            reminder_scan_secs: default_reminder_scan(),
            outbox_drain_secs: default_outbox_drain(),
            remote_poll_secs: default_remote_poll(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Notification log size; the oldest entries beyond this are evicted.
    #[serde(default = "default_notification_cap")]
    pub notification_cap: u32,

    #[serde(default = "default_outbox_batch")]
    pub outbox_batch_size: u32,

    #[serde(default = "default_outbox_retention")]
    pub outbox_retention_days: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            notification_cap: default_notification_cap(),
            outbox_batch_size: default_outbox_batch(),
            outbox_retention_days: default_outbox_retention(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_fetch_timeout() -> u64 {
    8
}
fn default_mutate_timeout() -> u64 {
    5
}
fn default_reminder_scan() -> u64 {
    60
}
fn default_outbox_drain() -> u64 {
    30
}
fn default_remote_poll() -> u64 {
    30
}
fn default_notification_cap() -> u32 {
    50
}
fn default_outbox_batch() -> u32 {
    20
}
fn default_outbox_retention() -> u32 {
    7
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with SALON__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("SALON").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides, without
    /// touching config files or the environment.
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "127.0.0.1"
            port = 8080
            request_timeout_secs = 30
            api_key = ""

            [database]
            url = "sqlite::memory:"
            max_connections = 1
            connect_timeout_secs = 5

            [logging]
            level = "info"
            format = "pretty"

            [remote]
            base_url = ""
            anon_key = ""
            fetch_timeout_secs = 8
            mutate_timeout_secs = 5

            [jobs]
            reminder_scan_secs = 60
            outbox_drain_secs = 30
            remote_poll_secs = 30

            [limits]
            notification_cap = 50
            outbox_batch_size = 20
            outbox_retention_days = 7
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.database.url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "SALON__DATABASE__URL must be set".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.limits.notification_cap == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "notification_cap must be at least 1".to_string(),
            ));
        }

        if !self.remote.base_url.is_empty() && !self.remote.base_url.starts_with("http") {
            return Err(ConfigValidationError::InvalidValue(
                "remote.base_url must be an http(s) URL".to_string(),
            ));
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigValidationError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|_| {
                ConfigValidationError::InvalidValue(format!(
                    "Invalid listen address {}:{}",
                    self.server.host, self.server.port
                ))
            })
    }
}
