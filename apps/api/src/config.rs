//! API configuration module.
//!
//! Configuration is layered with the `config` crate:
//!
//! ```text
//! built-in defaults  →  ./stockroom.toml (optional)  →  STOCKROOM_* env vars
//!   (lowest)                                               (highest)
//! ```
//!
//! | Key | Env var | Default |
//! |---|---|---|
//! | `bind_addr` | `STOCKROOM_BIND_ADDR` | `0.0.0.0:8080` |
//! | `database_path` | `STOCKROOM_DATABASE_PATH` | `./stockroom.db` |
//! | `jwt_secret` | `STOCKROOM_JWT_SECRET` | development secret, `:memory:` databases only |
//! | `token_lifetime_secs` | `STOCKROOM_TOKEN_LIFETIME_SECS` | `28800` (8 hours) |
//! | `log_filter` | `STOCKROOM_LOG_FILTER` | `info,stockroom_api=debug,stockroom_db=debug` |
//! | `bootstrap_owner_email` | `STOCKROOM_BOOTSTRAP_OWNER_EMAIL` | unset |
//! | `bootstrap_owner_password` | `STOCKROOM_BOOTSTRAP_OWNER_PASSWORD` | unset |
//! | `bootstrap_owner_name` | `STOCKROOM_BOOTSTRAP_OWNER_NAME` | `Store Owner` |

use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;
use std::net::SocketAddr;

/// Signing secret used when none is configured. It is public, so it is
/// only accepted together with a throwaway `:memory:` database.
pub const DEV_JWT_SECRET: &str = "stockroom-dev-secret-change-in-production";

/// `database_path` value for a throwaway in-memory database.
const MEMORY_DATABASE: &str = ":memory:";

/// Shortest accepted JWT secret, in bytes.
const MIN_SECRET_LEN: usize = 16;

/// API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Socket address the HTTP server binds to
    pub bind_addr: String,

    /// SQLite database file (`:memory:` for a throwaway database)
    pub database_path: String,

    /// HMAC secret for signing session tokens
    pub jwt_secret: String,

    /// Session token lifetime in seconds
    pub token_lifetime_secs: i64,

    /// tracing-subscriber EnvFilter directive, overridden by RUST_LOG
    pub log_filter: String,

    /// Email of the OWNER account created at startup when missing
    pub bootstrap_owner_email: Option<String>,

    /// Password for the bootstrap OWNER account
    pub bootstrap_owner_password: Option<String>,

    /// Display name for the bootstrap OWNER account
    pub bootstrap_owner_name: String,
}

/// The bootstrap owner, when both halves are configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapOwner {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl AppConfig {
    /// Load configuration from defaults, `stockroom.toml` and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Self::defaults()?
            .add_source(File::with_name("stockroom").required(false))
            .add_source(Environment::with_prefix("STOCKROOM"));

        Self::from_builder(builder)
    }

    /// Builder pre-filled with the built-in defaults.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("bind_addr", "0.0.0.0:8080")?
            .set_default("database_path", "./stockroom.db")?
            .set_default("jwt_secret", DEV_JWT_SECRET)?
            .set_default("token_lifetime_secs", 28_800)?
            .set_default("log_filter", "info,stockroom_api=debug,stockroom_db=debug")?
            .set_default("bootstrap_owner_name", "Store Owner")?)
    }

    /// Builds and validates a configuration from any set of sources.
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidValue("bind_addr".to_string()))?;

        if self.uses_dev_secret() && self.database_path != MEMORY_DATABASE {
            return Err(ConfigError::MissingRequired(
                "jwt_secret (set STOCKROOM_JWT_SECRET; the built-in secret only works with a :memory: database)"
                    .to_string(),
            ));
        }

        if self.jwt_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::InvalidValue(format!(
                "jwt_secret must be at least {} bytes",
                MIN_SECRET_LEN
            )));
        }

        if self.token_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue(
                "token_lifetime_secs must be positive".to_string(),
            ));
        }

        match (&self.bootstrap_owner_email, &self.bootstrap_owner_password) {
            (Some(_), None) => Err(ConfigError::MissingRequired(
                "bootstrap_owner_password".to_string(),
            )),
            (None, Some(_)) => Err(ConfigError::MissingRequired(
                "bootstrap_owner_email".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// The bootstrap owner, if configured.
    pub fn bootstrap_owner(&self) -> Option<BootstrapOwner> {
        match (&self.bootstrap_owner_email, &self.bootstrap_owner_password) {
            (Some(email), Some(password)) => Some(BootstrapOwner {
                name: self.bootstrap_owner_name.clone(),
                email: email.clone(),
                password: password.clone(),
            }),
            _ => None,
        }
    }

    /// Whether the signing secret is still the built-in development one.
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
