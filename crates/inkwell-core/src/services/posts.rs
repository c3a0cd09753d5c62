use std::sync::Arc;

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::{FieldChange, Post, PostChanges, PostDraft, User};
use crate::error::{DomainError, RepoError};
use crate::ports::PostRepository;

/// Post operations guarded by ownership.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    /// Validate `fields` and store a new post written by `author`.
    pub async fn create(
        &self,
        fields: &Map<String, Value>,
        author: &User,
    ) -> Result<Post, DomainError> {
        let draft = PostDraft::from_fields(fields)?;
        Ok(self.posts.insert(Post::new(author.id, draft)).await?)
    }

    /// Look a post up by its textual id. Ids that do not parse are simply not found.
    pub async fn get_by_id(&self, id: &str) -> Result<Post, DomainError> {
        let not_found = || DomainError::not_found("Post", id);

        let uuid = Uuid::parse_str(id).map_err(|_| not_found())?;
        self.posts.find_by_id(uuid).await?.ok_or_else(not_found)
    }

    pub async fn list(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.find_all().await?)
    }

    /// Apply `fields` to `post` on behalf of `actor`.
    ///
    /// Field names are validated before ownership is checked. Nothing is written
    /// unless every field is valid, and all changes land in a single update.
    /// Returns the stored post and the fields whose value changed.
    pub async fn update(
        &self,
        post: &Post,
        actor: &User,
        fields: &Map<String, Value>,
    ) -> Result<(Post, Vec<FieldChange>), DomainError> {
        let changes = PostChanges::from_fields(fields)?;
        post.verify_access(actor)?;

        let (updated, diff) = changes.apply(post);
        if diff.is_empty() {
            return Ok((updated, diff));
        }

        let stored = self
            .posts
            .update(updated)
            .await
            .map_err(|e| missing_post(e, post.id))?;
        Ok((stored, diff))
    }

    pub async fn delete(&self, post: &Post, actor: &User) -> Result<(), DomainError> {
        post.verify_access(actor)?;
        self.posts
            .delete(post.id)
            .await
            .map_err(|e| missing_post(e, post.id))
    }
}

fn missing_post(err: RepoError, id: Uuid) -> DomainError {
    match err {
        RepoError::NotFound => DomainError::not_found("Post", id.to_string()),
        other => other.into(),
    }
}
