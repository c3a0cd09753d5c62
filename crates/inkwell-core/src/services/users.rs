use std::sync::Arc;

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::User;
use crate::error::{DomainError, RepoError};
use crate::ports::{PasswordService, PostRepository, UserRepository};

const CREDENTIALS_REQUIRED: &str = "Email and Password fields are required!";
const EMAIL_TAKEN: &str = "Email is already taken!";
const NAME_MAX_CHARS: usize = 50;

/// Registration payload as received; presence is checked by [`UserService::register`].
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
}

impl Registration {
    /// Read a raw request body. Absent or null keys stay `None`, other keys are ignored.
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self, DomainError> {
        Ok(Self {
            email: optional_string(fields, "email")?,
            first_name: optional_string(fields, "first_name")?,
            last_name: optional_string(fields, "last_name")?,
            password: optional_string(fields, "password")?,
        })
    }
}

fn optional_string(fields: &Map<String, Value>, key: &str) -> Result<Option<String>, DomainError> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(DomainError::validation(
            key,
            format!("'{key}' must be a string"),
        )),
    }
}

/// Empty names count as absent.
fn checked_name(field: &str, name: Option<String>) -> Result<Option<String>, DomainError> {
    match name {
        Some(name) if name.is_empty() => Ok(None),
        Some(name) if name.chars().count() > NAME_MAX_CHARS => Err(DomainError::validation(
            field,
            format!("'{field}' must be between 1 and {NAME_MAX_CHARS} characters"),
        )),
        name => Ok(name),
    }
}

/// Registration, login and account removal.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        Self {
            users,
            posts,
            passwords,
        }
    }

    /// Create an account. Email uniqueness is checked before anything is written.
    pub async fn register(&self, registration: Registration) -> Result<User, DomainError> {
        let (email, password) = match (registration.email, registration.password) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                (email, password)
            }
            (email, _) => {
                let field = if email.is_none_or(|e| e.is_empty()) {
                    "email"
                } else {
                    "password"
                };
                return Err(DomainError::validation(field, CREDENTIALS_REQUIRED));
            }
        };

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::validation("email", EMAIL_TAKEN));
        }

        let first_name = checked_name("first_name", registration.first_name)?;
        let last_name = checked_name("last_name", registration.last_name)?;

        let password_hash = self
            .passwords
            .hash(&password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let user = User::new(email, first_name, last_name, password_hash);

        // Lost a race with a concurrent registration of the same address.
        self.users.insert(user).await.map_err(|e| match e {
            RepoError::Constraint(_) => DomainError::validation("email", EMAIL_TAKEN),
            other => other.into(),
        })
    }

    /// Check an email/password pair.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        let valid = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if !valid {
            return Err(DomainError::InvalidCredentials);
        }

        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.users.find_by_id(id).await?)
    }

    /// Delete a user together with every post they wrote.
    /// Returns the number of posts removed.
    pub async fn delete_user(&self, id: Uuid) -> Result<u64, DomainError> {
        if self.users.find_by_id(id).await?.is_none() {
            return Err(DomainError::not_found("User", id.to_string()));
        }

        let removed = self.posts.delete_by_author(id).await?;
        self.users.delete(id).await?;

        tracing::debug!(user_id = %id, posts_removed = removed, "User deleted");
        Ok(removed)
    }
}
