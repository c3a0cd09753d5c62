use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{LogQuery, LogRecord, Post, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite every column of an existing entity in one write.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Every post, oldest first.
    async fn find_all(&self) -> Result<Vec<Post>, RepoError>;

    /// Delete every post written by `author`, returning how many were removed.
    async fn delete_by_author(&self, author: Uuid) -> Result<u64, RepoError>;
}

/// Append-only store of audit records.
#[async_trait]
pub trait LogRepository: Send + Sync {
    async fn create(&self, record: LogRecord) -> Result<LogRecord, RepoError>;

    /// Records whose message contains `query.search` (ignoring case), ordered as requested.
    async fn query(&self, query: &LogQuery) -> Result<Vec<LogRecord>, RepoError>;
}
