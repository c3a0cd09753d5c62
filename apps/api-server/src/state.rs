//! Application state - shared across all handlers.

use std::sync::Arc;

use anyhow::Context;

use inkwell_core::audit::AuditLogger;
use inkwell_core::ports::{
    LogRepository, PasswordService, PostRepository, TokenService, UserRepository,
};
use inkwell_core::services::{PostService, UserService};
use inkwell_infra::database::DatabaseConfig;
use inkwell_infra::{
    Argon2PasswordService, ConsoleSink, FileSink, InMemoryLogRepository, InMemoryPostRepository,
    InMemoryUserRepository, JwtTokenService, StoreSink,
};

#[cfg(feature = "postgres")]
use inkwell_infra::DatabaseConnections;
#[cfg(feature = "postgres")]
use inkwell_infra::database::{
    PostgresLogRepository, PostgresPostRepository, PostgresUserRepository,
};

use crate::config::AppConfig;

/// The three stores the application runs on.
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub logs: Arc<dyn LogRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            posts: Arc::new(InMemoryPostRepository::new()),
            logs: Arc::new(InMemoryLogRepository::new()),
        }
    }

    #[cfg(feature = "postgres")]
    async fn postgres(config: &DatabaseConfig) -> anyhow::Result<Self> {
        let connections = DatabaseConnections::init(config).await?;
        connections.ensure_schema().await?;

        let db = connections.main;
        Ok(Self {
            users: Arc::new(PostgresUserRepository::new(db.clone())),
            posts: Arc::new(PostgresPostRepository::new(db.clone())),
            logs: Arc::new(PostgresLogRepository::new(db)),
        })
    }

    /// Postgres when a database is configured and reachable, in-memory otherwise.
    pub async fn connect(db_config: Option<&DatabaseConfig>) -> Self {
        #[cfg(feature = "postgres")]
        {
            if let Some(config) = db_config {
                match Self::postgres(config).await {
                    Ok(repos) => return repos,
                    Err(e) => tracing::error!(
                        "Failed to prepare database: {}. Using in-memory fallback.",
                        e
                    ),
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            }
        }

        #[cfg(not(feature = "postgres"))]
        {
            let _ = db_config;
            tracing::info!("Running without postgres feature - using in-memory repositories");
        }

        Self::in_memory()
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub posts: PostService,
    pub logs: Arc<dyn LogRepository>,
    pub audit: AuditLogger,
    pub tokens: Arc<dyn TokenService>,
}

impl AppState {
    /// Build the application state from configuration.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let repos = Repositories::connect(config.database.as_ref()).await;

        let file_sink = FileSink::open(&config.audit.file)
            .await
            .with_context(|| format!("failed to open audit log file {}", config.audit.file))?;

        let audit = AuditLogger::new(config.audit.file.clone(), config.audit.level)
            .with_sink(Arc::new(file_sink))
            .with_sink(Arc::new(ConsoleSink))
            .with_sink(Arc::new(StoreSink::new(repos.logs.clone())));

        let state = Self::from_parts(
            repos,
            audit,
            Arc::new(JwtTokenService::new(config.jwt.clone())),
            Arc::new(Argon2PasswordService::new()),
        );

        tracing::info!("Application state initialized");
        Ok(state)
    }

    pub fn from_parts(
        repos: Repositories,
        audit: AuditLogger,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        Self {
            users: UserService::new(repos.users, repos.posts.clone(), passwords),
            posts: PostService::new(repos.posts),
            logs: repos.logs,
            audit,
            tokens,
        }
    }
}
