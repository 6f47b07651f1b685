use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Backend host, e.g. `http://localhost:8080`
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Directory holding the persisted account and token stores
    #[serde(default = "default_store_dir")]
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Machines shown as their own donut segment
    #[serde(default = "default_donut_top_n")]
    pub donut_top_n: usize,

    /// Shortest task drawn as a Gantt bar, in seconds
    #[serde(default = "default_min_bar_secs")]
    pub min_bar_secs: u64,
}

impl DashboardConfig {
    pub fn min_bar_ms(&self) -> i64 {
        i64::try_from(self.min_bar_secs.saturating_mul(1000)).unwrap_or(i64::MAX)
    }
}

// Default value functions
fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("mfg-dash/{}", env!("CARGO_PKG_VERSION"))
}

fn default_store_dir() -> PathBuf {
    PathBuf::from(".mfg-dash")
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_donut_top_n() -> usize {
    4
}

fn default_min_bar_secs() -> u64 {
    60
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Embedded defaults, also the base layer of [`Config::load_for_test`].
const DEFAULTS: &str = r#"
    [api]
    base_url = "http://localhost:8080"
    timeout_secs = 30

    [store]
    dir = ".mfg-dash"

    [logging]
    level = "warn"
    format = "pretty"

    [dashboard]
    donut_top_n = 4
    min_bar_secs = 60
"#;

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. built-in defaults
    /// 2. config/default.toml (optional)
    /// 3. config/local.toml (optional, not in git)
    /// 4. Environment variables with MFG__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(DEFAULTS, config::FileFormat::Toml))
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("MFG").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;

        Ok(cfg)
    }

    /// Load configuration from the embedded defaults plus `overrides`,
    /// without touching config files or the environment.
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULTS, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "MFG__API__BASE_URL must be set".to_string(),
            ));
        }

        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            return Err(ConfigValidationError::InvalidValue(format!(
                "api.base_url must start with http:// or https:// (got {})",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "api.timeout_secs cannot be 0".to_string(),
            ));
        }

        if self.dashboard.donut_top_n == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "dashboard.donut_top_n cannot be 0".to_string(),
            ));
        }

        Ok(())
    }
}
