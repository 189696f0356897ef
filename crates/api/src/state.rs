//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ApiConfig;
use crate::services::auth::TokenCodec;
use crate::services::upload::MediaStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to shared
/// resources: the connection pool, the per-role token codecs and the media
/// store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
    user_tokens: TokenCodec,
    admin_tokens: TokenCodec,
    media: MediaStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The two token codecs are built here from the configured secrets and
    /// lifetimes - one per signing domain, never interchangeable.
    #[must_use]
    pub fn new(config: ApiConfig, pool: PgPool) -> Self {
        let user_tokens = TokenCodec::new(&config.user_token_secret, config.user_token_ttl);
        let admin_tokens = TokenCodec::new(&config.admin_token_secret, config.admin_token_ttl);
        let media = MediaStore::new(config.media_dir.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                user_tokens,
                admin_tokens,
                media,
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

    /// Get the token codec for the user signing domain.
    #[must_use]
    pub fn user_tokens(&self) -> &TokenCodec {
        &self.inner.user_tokens
    }

    /// Get the token codec for the admin signing domain.
    #[must_use]
    pub fn admin_tokens(&self) -> &TokenCodec {
        &self.inner.admin_tokens
    }

    /// Get the media store for image uploads.
    #[must_use]
    pub fn media(&self) -> &MediaStore {
        &self.inner.media
    }
}
