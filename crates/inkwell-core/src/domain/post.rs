use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::User;
use crate::error::DomainError;

const TITLE_MAX_CHARS: usize = 64;
const TEXT_MAX_CHARS: usize = 512;

/// Post entity - a text post owned by its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author: Uuid,
    pub title: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Name of the collection posts are stored in, as it appears in audit messages.
    pub const TABLE_NAME: &'static str = "posts";

    /// Every field a client may name in a request body, in declaration order.
    pub const DECLARED_FIELDS: [&'static str; 4] = ["id", "title", "text", "author"];

    /// Create a new post written by `author`.
    pub fn new(author: Uuid, draft: PostDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author,
            title: draft.title,
            text: draft.text,
            created_at: now,
            updated_at: now,
        }
    }

    /// Fails with `AccessDenied` unless `actor` wrote this post.
    pub fn verify_access(&self, actor: &User) -> Result<(), DomainError> {
        if self.author != actor.id {
            return Err(DomainError::AccessDenied {
                actor: actor.id,
                record: self.id,
            });
        }
        Ok(())
    }
}

/// Validated field set for a new post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub text: String,
}

impl PostDraft {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }

    /// Validate a raw request body. Unknown keys are rejected before any field is read.
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self, DomainError> {
        check_writable(fields)?;

        let title = required(fields, "title")?;
        let text = required(fields, "text")?;

        Ok(Self {
            title: validate_title(title)?,
            text: validate_text(text)?,
        })
    }
}

/// Validated partial update. Built only when every field in the body is valid,
/// so applying it can never leave a post half-updated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostChanges {
    pub title: Option<String>,
    pub text: Option<String>,
}

/// One field whose value differs between the stored and the updated post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: &'static str,
    pub old: String,
    pub new: String,
}

impl PostChanges {
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self, DomainError> {
        check_writable(fields)?;

        let title = match fields.get("title") {
            Some(_) => Some(validate_title(string_value(fields, "title")?)?),
            None => None,
        };
        let text = match fields.get("text") {
            Some(_) => Some(validate_text(string_value(fields, "text")?)?),
            None => None,
        };

        Ok(Self { title, text })
    }

    /// Apply to a copy of `post`, returning the updated post and the fields that
    /// actually changed, in declaration order.
    pub fn apply(&self, post: &Post) -> (Post, Vec<FieldChange>) {
        let mut updated = post.clone();
        let mut changes = Vec::new();

        if let Some(title) = &self.title {
            if *title != post.title {
                changes.push(FieldChange {
                    field: "title",
                    old: post.title.clone(),
                    new: title.clone(),
                });
                updated.title = title.clone();
            }
        }
        if let Some(text) = &self.text {
            if *text != post.text {
                changes.push(FieldChange {
                    field: "text",
                    old: post.text.clone(),
                    new: text.clone(),
                });
                updated.text = text.clone();
            }
        }

        if !changes.is_empty() {
            updated.updated_at = Utc::now();
        }

        (updated, changes)
    }
}

fn check_writable(fields: &Map<String, Value>) -> Result<(), DomainError> {
    if let Some(key) = fields
        .keys()
        .find(|key| !Post::DECLARED_FIELDS.contains(&key.as_str()))
    {
        return Err(DomainError::validation(
            key.clone(),
            format!("'{key}' is not a valid field"),
        ));
    }

    // id and author are declared but owned by the server
    for key in ["id", "author"] {
        if fields.contains_key(key) {
            return Err(DomainError::validation(
                key,
                format!("'{key}' cannot be changed"),
            ));
        }
    }

    Ok(())
}

fn required<'a>(fields: &'a Map<String, Value>, key: &str) -> Result<&'a str, DomainError> {
    match fields.get(key) {
        None | Some(Value::Null) => Err(DomainError::validation(
            key,
            format!("Field is required: '{key}'"),
        )),
        Some(_) => string_value(fields, key),
    }
}

fn string_value<'a>(fields: &'a Map<String, Value>, key: &str) -> Result<&'a str, DomainError> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| DomainError::validation(key, format!("'{key}' must be a string")))
}

fn validate_title(value: &str) -> Result<String, DomainError> {
    validate_length("title", value, TITLE_MAX_CHARS)
}

fn validate_text(value: &str) -> Result<String, DomainError> {
    validate_length("text", value, TEXT_MAX_CHARS)
}

fn validate_length(field: &str, value: &str, max: usize) -> Result<String, DomainError> {
    let len = value.chars().count();
    if len == 0 || len > max {
        return Err(DomainError::validation(
            field,
            format!("'{field}' must be between 1 and {max} characters"),
        ));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    fn author() -> User {
        User::new("a@x.com".to_string(), None, None, "hash".to_string())
    }

    #[test]
    fn test_draft_accepts_declared_fields() {
        let draft = PostDraft::from_fields(&fields(json!({"title": "T", "text": "hi"}))).unwrap();
        assert_eq!(draft, PostDraft::new("T", "hi"));
    }

    #[test]
    fn test_draft_rejects_unknown_field() {
        let err = PostDraft::from_fields(&fields(json!({"title": "T", "text": "hi", "mood": "x"})))
            .unwrap_err();
        assert_eq!(err.to_string(), "'mood' is not a valid field");
    }

    #[test]
    fn test_draft_requires_text() {
        let err = PostDraft::from_fields(&fields(json!({"title": "T"}))).unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "text"));
        assert_eq!(err.to_string(), "Field is required: 'text'");
    }

    #[test]
    fn test_draft_rejects_author_override() {
        let err = PostDraft::from_fields(&fields(
            json!({"title": "T", "text": "hi", "author": "someone"}),
        ))
        .unwrap_err();
        assert_eq!(err.to_string(), "'author' cannot be changed");
    }

    #[test]
    fn test_length_limits_count_characters() {
        let ok = "é".repeat(64);
        assert!(PostDraft::from_fields(&fields(json!({"title": ok, "text": "x"}))).is_ok());

        let long = "a".repeat(65);
        let err = PostDraft::from_fields(&fields(json!({"title": long, "text": "x"}))).unwrap_err();
        assert_eq!(err.to_string(), "'title' must be between 1 and 64 characters");

        let err = PostDraft::from_fields(&fields(json!({"title": "T", "text": ""}))).unwrap_err();
        assert_eq!(err.to_string(), "'text' must be between 1 and 512 characters");
    }

    #[test]
    fn test_non_string_value_rejected() {
        let err = PostChanges::from_fields(&fields(json!({"title": 42}))).unwrap_err();
        assert_eq!(err.to_string(), "'title' must be a string");
    }

    #[test]
    fn test_changes_with_unknown_field_build_nothing() {
        let result = PostChanges::from_fields(&fields(
            json!({"title": "New", "text": "New text", "unreal_field": "text"}),
        ));
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_reports_only_differing_fields() {
        let post = Post::new(author().id, PostDraft::new("Old", "Same"));
        let changes = PostChanges {
            title: Some("New".to_string()),
            text: Some("Same".to_string()),
        };

        let (updated, diff) = changes.apply(&post);

        assert_eq!(updated.title, "New");
        assert_eq!(updated.text, "Same");
        assert_eq!(updated.author, post.author);
        assert_eq!(
            diff,
            vec![FieldChange {
                field: "title",
                old: "Old".to_string(),
                new: "New".to_string(),
            }]
        );
    }

    #[test]
    fn test_verify_access() {
        let owner = author();
        let stranger = author();
        let post = Post::new(owner.id, PostDraft::new("T", "hi"));

        assert!(post.verify_access(&owner).is_ok());
        assert!(matches!(
            post.verify_access(&stranger),
            Err(DomainError::AccessDenied { actor, record }) if actor == stranger.id && record == post.id
        ));
    }
}
