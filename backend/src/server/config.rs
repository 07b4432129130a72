//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use social_events::domain::ValidationRules;
use social_events::outbound::persistence::DbPool;
use social_events::settings::AppConfig;
use zeroize::Zeroizing;

/// Everything the server needs to build its handlers.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) rules: ValidationRules,
    pub(crate) token_secret: Zeroizing<String>,
}

impl ServerConfig {
    /// Combine the validated application configuration with a ready pool.
    #[must_use]
    pub fn new(config: &AppConfig, db_pool: DbPool) -> Self {
        Self {
            bind_addr: config.bind_addr(),
            db_pool,
            rules: config.rules(),
            token_secret: Zeroizing::new(config.token_secret().to_owned()),
        }
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
