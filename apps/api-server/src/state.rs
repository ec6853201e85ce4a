//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::domain::Role;
use blog_core::ports::{ImageStore, PostRepository, TokenService, UserRepository};
use blog_core::services::{AccountService, PostService};
use blog_infra::{
    Argon2PasswordService, InMemoryPostRepository, InMemoryUserRepository, JwtTokenService,
    LocalImageStore,
};

#[cfg(feature = "postgres")]
use blog_infra::DatabaseConnections;
#[cfg(feature = "postgres")]
use blog_infra::database::{PostgresPostRepository, PostgresUserRepository};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub posts: PostService,
    pub tokens: Arc<dyn TokenService>,
    pub registration_role: Role,
    pub max_upload_bytes: usize,
    /// Put the detail of internal errors into 500 bodies (development only).
    pub expose_internal_errors: bool,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state, using PostgreSQL when it is configured
    /// and reachable and in-memory repositories otherwise.
    pub async fn new(config: &AppConfig) -> Self {
        if let Some(state) = Self::with_database(config).await {
            tracing::info!("Application state initialized (postgres)");
            return state;
        }

        tracing::warn!("Running without database (in-memory mode). Data is lost on restart.");
        Self::in_memory(config)
    }

    /// State backed by in-memory repositories.
    pub fn in_memory(config: &AppConfig) -> Self {
        Self::assemble(
            config,
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryPostRepository::new()),
        )
    }

    fn assemble(
        config: &AppConfig,
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
    ) -> Self {
        let images: Arc<dyn ImageStore> = Arc::new(LocalImageStore::new(config.uploads.clone()));

        Self {
            accounts: AccountService::new(users.clone(), Arc::new(Argon2PasswordService::new())),
            posts: PostService::new(posts, users, images),
            tokens: Arc::new(JwtTokenService::new(config.jwt.clone())),
            registration_role: config.registration_role,
            max_upload_bytes: config.uploads.max_bytes,
            expose_internal_errors: !config.environment.is_production(),
            #[cfg(feature = "postgres")]
            db: None,
        }
    }

    #[cfg(feature = "postgres")]
    async fn with_database(config: &AppConfig) -> Option<Self> {
        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set.");
            return None;
        };

        let db = match DatabaseConnections::init(db_config).await {
            Ok(connections) => connections,
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                return None;
            }
        };

        let mut state = Self::assemble(
            config,
            Arc::new(PostgresUserRepository::new(db.main.clone())),
            Arc::new(PostgresPostRepository::new(db.main.clone())),
        );
        state.db = Some(Arc::new(db));
        Some(state)
    }

    #[cfg(not(feature = "postgres"))]
    async fn with_database(_config: &AppConfig) -> Option<Self> {
        tracing::info!("Running without postgres feature - using in-memory repositories");
        None
    }
}
