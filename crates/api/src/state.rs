//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ApiConfig;
use crate::services::TokenService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
    tokens: TokenService,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ApiConfig, pool: PgPool) -> Self {
        let tokens = TokenService::new(&config.token_secret);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                tokens,
            }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the credential issuer/verifier.
    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    #[tokio::test]
    async fn test_state_exposes_the_config_it_was_built_with() {
        let config = ApiConfig {
            database_url: SecretString::from("postgres://localhost/sungrove".to_string()),
            host: "127.0.0.1".parse().unwrap(),
            port: 4100,
            token_secret: SecretString::from("kR9mP2xQ7wN4vB8jL5tY1hG6fD3sZ0cA-Ue".to_string()),
            sentry_dsn: None,
            sentry_environment: None,
        };
        let pool = PgPool::connect_lazy("postgres://localhost/sungrove").unwrap();

        let state = AppState::new(config, pool);
        assert_eq!(state.config().socket_addr().port(), 4100);
    }
}
