//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A field failed validation. `message` is the full human-readable reason.
    #[error("{message}")]
    Validation { field: String, message: String },

    #[error("You have no access to do this action!")]
    AccessDenied { actor: Uuid, record: Uuid },

    #[error("{entity} with id {id} does not exist!")]
    NotFound { entity: &'static str, id: String },

    #[error("wrong credentials!")]
    InvalidCredentials,

    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_wire_text() {
        let err = DomainError::validation("unreal_field", "'unreal_field' is not a valid field");
        assert_eq!(err.to_string(), "'unreal_field' is not a valid field");

        let err = DomainError::not_found("Post", "668a700a1a4e4bcaa7490904");
        assert_eq!(
            err.to_string(),
            "Post with id 668a700a1a4e4bcaa7490904 does not exist!"
        );

        let err = DomainError::AccessDenied {
            actor: Uuid::new_v4(),
            record: Uuid::new_v4(),
        };
        assert_eq!(err.to_string(), "You have no access to do this action!");
    }
}
