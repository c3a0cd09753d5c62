//! In-memory repositories - used when no database is configured, and in tests.
//!
//! Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use inkwell_core::domain::{LogQuery, LogRecord, Post, User};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{BaseRepository, LogRepository, PostRepository, UserRepository};

/// In-memory user repository. Emails are unique, as in the database schema.
#[derive(Default)]
pub struct InMemoryUserRepository {
    store: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut store = self.store.write().await;
        if store.contains_key(&user.id) || store.values().any(|u| u.email == user.email) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        store.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut store = self.store.write().await;
        let slot = store.get_mut(&user.id).ok_or(RepoError::NotFound)?;
        *slot = user.clone();
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.store
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .store
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }
}

/// In-memory post repository.
#[derive(Default)]
pub struct InMemoryPostRepository {
    store: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn oldest_first(mut posts: Vec<Post>) -> Vec<Post> {
        posts.sort_by_key(|p| p.created_at);
        posts
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        if store.contains_key(&post.id) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        store.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        let slot = store.get_mut(&post.id).ok_or(RepoError::NotFound)?;
        *slot = post.clone();
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.store
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        let posts = self.store.read().await.values().cloned().collect();
        Ok(Self::oldest_first(posts))
    }

    async fn delete_by_author(&self, author: Uuid) -> Result<u64, RepoError> {
        let mut store = self.store.write().await;
        let before = store.len();
        store.retain(|_, p| p.author != author);
        Ok((before - store.len()) as u64)
    }
}

/// In-memory audit log store.
#[derive(Default)]
pub struct InMemoryLogRepository {
    records: RwLock<Vec<LogRecord>>,
}

impl InMemoryLogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LogRepository for InMemoryLogRepository {
    async fn create(&self, record: LogRecord) -> Result<LogRecord, RepoError> {
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn query(&self, query: &LogQuery) -> Result<Vec<LogRecord>, RepoError> {
        let mut records: Vec<LogRecord> = self
            .records
            .read()
            .await
            .iter()
            .filter(|r| query.matches(r))
            .cloned()
            .collect();
        query.sort(&mut records);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use inkwell_core::domain::{InfoType, PostDraft, SortOrder};

    use super::*;

    fn user(email: &str) -> User {
        User::new(email.to_string(), None, None, "hash".to_string())
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.insert(user("a@x.com")).await.unwrap();

        let result = repo.insert(user("a@x.com")).await;

        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_delete_by_author_leaves_other_posts() {
        let repo = InMemoryPostRepository::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        repo.insert(Post::new(alice, PostDraft::new("a1", "x"))).await.unwrap();
        repo.insert(Post::new(alice, PostDraft::new("a2", "x"))).await.unwrap();
        repo.insert(Post::new(bob, PostDraft::new("b1", "x"))).await.unwrap();

        assert_eq!(repo.delete_by_author(alice).await.unwrap(), 2);
        let left = repo.find_all().await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].author, bob);
    }

    #[tokio::test]
    async fn test_update_missing_post() {
        let repo = InMemoryPostRepository::new();
        let post = Post::new(Uuid::new_v4(), PostDraft::new("t", "x"));

        assert!(matches!(repo.update(post).await, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_log_query_search_and_order() {
        let repo = InMemoryLogRepository::new();
        let now = Utc::now();
        repo.create(LogRecord::new("app.log", InfoType::Info, "first POST", now))
            .await
            .unwrap();
        repo.create(LogRecord::new(
            "app.log",
            InfoType::Error,
            "second post",
            now + chrono::TimeDelta::seconds(1),
        ))
        .await
        .unwrap();
        repo.create(LogRecord::new("app.log", InfoType::Info, "unrelated", now))
            .await
            .unwrap();

        let newest_first = repo
            .query(&LogQuery {
                search: "post".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(newest_first.len(), 2);
        assert_eq!(newest_first[0].message, "second post");

        let oldest_first = repo
            .query(&LogQuery {
                search: "post".to_string(),
                order: SortOrder::Asc,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(oldest_first[0].message, "first POST");
    }
}
