//! Process settings loaded via OrthoConfig and frozen into [`AppConfig`].
//!
//! Every value may come from the command line, an `EVENTS_*` environment
//! variable or a configuration file. [`AppConfig::try_from`] checks the
//! required values once at start-up; nothing reads the environment after
//! that.

use std::net::{IpAddr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::domain::rules::{RatingRange, RatingRangeError, ValidationRules};
use crate::outbound::persistence::PoolConfig;

const DEFAULT_BIND_HOST: &str = "0.0.0.0";
const DEFAULT_DB_HOST: &str = "localhost";

/// Raw configuration as supplied by the operator.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "EVENTS")]
pub struct Settings {
    /// TCP port the HTTP server listens on.
    #[ortho_config(default = 3000)]
    pub port: u16,
    /// Interface to bind; defaults to all interfaces.
    pub bind_host: Option<String>,
    /// Minimum password length in characters.
    #[ortho_config(default = 8)]
    pub password_min_length: usize,
    /// Lowest accepted assistance rating.
    #[ortho_config(default = 0.0)]
    pub event_min_rating: f64,
    /// Highest accepted assistance rating.
    #[ortho_config(default = 10.0)]
    pub event_max_rating: f64,
    /// Key material for bearer tokens.
    pub token_secret: Option<String>,
    pub db_host: Option<String>,
    #[ortho_config(default = 5432)]
    pub db_port: u16,
    pub db_user: Option<String>,
    pub db_password: Option<String>,
    pub db_name: Option<String>,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
}

impl Settings {
    /// Return the configured bind host, falling back to all interfaces.
    pub fn bind_host(&self) -> &str {
        self.bind_host.as_deref().unwrap_or(DEFAULT_BIND_HOST)
    }

    /// Return the configured database host, falling back to localhost.
    pub fn db_host(&self) -> &str {
        self.db_host.as_deref().unwrap_or(DEFAULT_DB_HOST)
    }
}

/// Failures turning [`Settings`] into an [`AppConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value with no default was not supplied.
    #[error("missing required setting {0}")]
    Missing(&'static str),
    /// A required string was supplied but empty.
    #[error("setting {0} must not be empty")]
    Empty(&'static str),
    /// The bind host is not an IP address.
    #[error("invalid bind host {host}: {source}")]
    BindHost {
        host: String,
        #[source]
        source: std::net::AddrParseError,
    },
    /// The minimum password length must be at least one.
    #[error("password minimum length must be positive")]
    PasswordLength,
    /// The rating bounds are inverted or not finite.
    #[error(transparent)]
    Rating(#[from] RatingRangeError),
}

/// Validated, immutable application configuration.
#[derive(Clone)]
pub struct AppConfig {
    bind_addr: SocketAddr,
    rules: ValidationRules,
    token_secret: Zeroizing<String>,
    pool: PoolConfig,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("rules", &self.rules)
            .field("token_secret", &"<redacted>")
            .field("pool", &self.pool)
            .finish()
    }
}

impl AppConfig {
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    pub fn rules(&self) -> ValidationRules {
        self.rules
    }

    /// Secret used to sign and verify bearer tokens.
    pub fn token_secret(&self) -> &str {
        self.token_secret.as_str()
    }

    pub fn pool(&self) -> &PoolConfig {
        &self.pool
    }
}

fn required(value: Option<String>, name: &'static str) -> Result<String, ConfigError> {
    let value = value.ok_or(ConfigError::Missing(name))?;
    if value.trim().is_empty() {
        return Err(ConfigError::Empty(name));
    }
    Ok(value)
}

impl TryFrom<Settings> for AppConfig {
    type Error = ConfigError;

    fn try_from(settings: Settings) -> Result<Self, Self::Error> {
        let host = settings.bind_host();
        let ip: IpAddr = host.parse().map_err(|source| ConfigError::BindHost {
            host: host.to_owned(),
            source,
        })?;
        if settings.password_min_length == 0 {
            return Err(ConfigError::PasswordLength);
        }
        let rating = RatingRange::new(settings.event_min_rating, settings.event_max_rating)?;
        let db_host = settings.db_host().to_owned();

        let token_secret = Zeroizing::new(required(settings.token_secret, "EVENTS_TOKEN_SECRET")?);
        let db_user = required(settings.db_user, "EVENTS_DB_USER")?;
        let db_password = Zeroizing::new(required(settings.db_password, "EVENTS_DB_PASSWORD")?);
        let db_name = required(settings.db_name, "EVENTS_DB_NAME")?;
        let database_url = format!(
            "postgres://{db_user}:{}@{db_host}:{}/{db_name}",
            db_password.as_str(),
            settings.db_port
        );

        Ok(Self {
            bind_addr: SocketAddr::new(ip, settings.port),
            rules: ValidationRules::new(settings.password_min_length, rating),
            token_secret,
            pool: PoolConfig::new(database_url).with_max_size(settings.db_max_connections),
        })
    }
}
