//! Message template catalog.
//!
//! Every audit message the system writes is produced here, from structured event data.
//! Rendering is pure: the same event always yields the same string.

use std::fmt::{self, Write};

use uuid::Uuid;

use crate::domain::{FieldChange, InfoType, User};

/// Path and method of the HTTP request an event happened in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub path: String,
    pub method: String,
}

impl RequestContext {
    pub fn new(path: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: method.into(),
        }
    }
}

/// A structured audit event. `Display` renders its canonical message.
#[derive(Debug, Clone, Copy)]
pub enum AuditEvent<'a> {
    UserCreated {
        user: &'a User,
    },
    UserLoggedIn {
        user: &'a User,
    },
    Error {
        error: &'a str,
        request: &'a RequestContext,
    },
    AuthenticatedError {
        user: &'a User,
        error: &'a str,
        request: &'a RequestContext,
    },
    EndpointEntered {
        user: &'a User,
        request: &'a RequestContext,
    },
    RecordCreated {
        user: &'a User,
        table: &'a str,
        record_id: Uuid,
        request: &'a RequestContext,
    },
    RecordChanged {
        user: &'a User,
        table: &'a str,
        changes: &'a [FieldChange],
        request: &'a RequestContext,
    },
    RecordDeleted {
        user: &'a User,
        table: &'a str,
        record_id: Uuid,
        request: &'a RequestContext,
    },
    EndpointCalled {
        request: &'a RequestContext,
    },
}

impl AuditEvent<'_> {
    /// Level the event is recorded at.
    pub fn level(&self) -> InfoType {
        match self {
            AuditEvent::Error { .. } | AuditEvent::AuthenticatedError { .. } => InfoType::Error,
            _ => InfoType::Info,
        }
    }
}

/// `"{email}, {first_name} {last_name} "`, the prefix every user-bound message shares.
struct Credentials<'a>(&'a User);

impl fmt::Display for Credentials<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {} {} ",
            self.0.email,
            self.0.first_name.as_deref().unwrap_or_default(),
            self.0.last_name.as_deref().unwrap_or_default()
        )
    }
}

impl fmt::Display for AuditEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            AuditEvent::UserCreated { user } => {
                write!(f, "User {}was created successfully", Credentials(user))
            }
            AuditEvent::UserLoggedIn { user } => {
                write!(f, "User {}has logged in", Credentials(user))
            }
            AuditEvent::Error { error, request } => write!(
                f,
                "Error \"{}\" occurred in {} with method: {}",
                error, request.path, request.method
            ),
            AuditEvent::AuthenticatedError {
                user,
                error,
                request,
            } => write!(
                f,
                "{}got an error \"{}\" in {} with method: {}",
                Credentials(user),
                error,
                request.path,
                request.method
            ),
            AuditEvent::EndpointEntered { user, request } => write!(
                f,
                "{}entered the {} with method: {}",
                Credentials(user),
                request.path,
                request.method
            ),
            AuditEvent::RecordCreated {
                user,
                table,
                record_id,
                request,
            } => write!(
                f,
                "{}created a new record at {} table with id {} in {}",
                Credentials(user),
                table,
                record_id,
                request.path
            ),
            AuditEvent::RecordChanged {
                user,
                table,
                changes,
                request,
            } => {
                write!(f, "{}changed ", Credentials(user))?;
                write_field_names(f, changes)?;
                f.write_str(" from ")?;
                write_values(f, changes, |c| &c.old)?;
                f.write_str(" to ")?;
                write_values(f, changes, |c| &c.new)?;
                write!(f, " at {} in {}", table, request.path)
            }
            AuditEvent::RecordDeleted {
                user,
                table,
                record_id,
                request,
            } => write!(
                f,
                "{}deleted record at {} table with id {} in {}",
                Credentials(user),
                table,
                record_id,
                request.path
            ),
            AuditEvent::EndpointCalled { request } => write!(
                f,
                "{} was called with method {}",
                request.path, request.method
            ),
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    f.write_char('\'')?;
    for c in value.chars() {
        match c {
            '\'' => f.write_str("\\'")?,
            '\\' => f.write_str("\\\\")?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('\'')
}

/// `['title', 'text']`
fn write_field_names(f: &mut fmt::Formatter<'_>, changes: &[FieldChange]) -> fmt::Result {
    f.write_char('[')?;
    for (i, change) in changes.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_quoted(f, change.field)?;
    }
    f.write_char(']')
}

/// `{'title': 'Old', 'text': 'Older'}`
fn write_values(
    f: &mut fmt::Formatter<'_>,
    changes: &[FieldChange],
    value: impl Fn(&FieldChange) -> &String,
) -> fmt::Result {
    f.write_char('{')?;
    for (i, change) in changes.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_quoted(f, change.field)?;
        f.write_str(": ")?;
        write_quoted(f, value(change))?;
    }
    f.write_char('}')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new(
            "test@example.com".to_string(),
            Some("Test".to_string()),
            Some("User".to_string()),
            "hash".to_string(),
        )
    }

    #[test]
    fn test_user_templates() {
        let user = user();
        assert_eq!(
            AuditEvent::UserCreated { user: &user }.to_string(),
            "User test@example.com, Test User was created successfully"
        );
        assert_eq!(
            AuditEvent::UserLoggedIn { user: &user }.to_string(),
            "User test@example.com, Test User has logged in"
        );
    }

    #[test]
    fn test_missing_names_render_empty() {
        let user = User::new("a@x.com".to_string(), None, None, "hash".to_string());
        assert_eq!(
            AuditEvent::UserLoggedIn { user: &user }.to_string(),
            "User a@x.com,   has logged in"
        );
    }

    #[test]
    fn test_error_templates() {
        let user = user();
        let request = RequestContext::new("/register", "POST");
        let event = AuditEvent::Error {
            error: "Email is already taken!",
            request: &request,
        };
        assert_eq!(event.level(), InfoType::Error);
        assert_eq!(
            event.to_string(),
            "Error \"Email is already taken!\" occurred in /register with method: POST"
        );

        let request = RequestContext::new("/posts/42", "PATCH");
        assert_eq!(
            AuditEvent::AuthenticatedError {
                user: &user,
                error: "'unreal_field' is not a valid field",
                request: &request,
            }
            .to_string(),
            "test@example.com, Test User got an error \"'unreal_field' is not a valid field\" \
             in /posts/42 with method: PATCH"
        );
    }

    #[test]
    fn test_record_templates() {
        let user = user();
        let id = Uuid::new_v4();
        let request = RequestContext::new(format!("/posts/{id}"), "DELETE");

        assert_eq!(
            AuditEvent::RecordCreated {
                user: &user,
                table: "posts",
                record_id: id,
                request: &RequestContext::new("/posts", "POST"),
            }
            .to_string(),
            format!("test@example.com, Test User created a new record at posts table with id {id} in /posts")
        );
        assert_eq!(
            AuditEvent::RecordDeleted {
                user: &user,
                table: "posts",
                record_id: id,
                request: &request,
            }
            .to_string(),
            format!("test@example.com, Test User deleted record at posts table with id {id} in /posts/{id}")
        );
    }

    #[test]
    fn test_changed_template_lists_before_and_after() {
        let user = user();
        let request = RequestContext::new("/posts/7", "PATCH");
        let changes = vec![
            FieldChange {
                field: "title",
                old: "Test Post".to_string(),
                new: "Updated Test Post".to_string(),
            },
            FieldChange {
                field: "text",
                old: "It's old".to_string(),
                new: "new".to_string(),
            },
        ];

        let message = AuditEvent::RecordChanged {
            user: &user,
            table: "posts",
            changes: &changes,
            request: &request,
        }
        .to_string();

        assert_eq!(
            message,
            "test@example.com, Test User changed ['title', 'text'] from \
             {'title': 'Test Post', 'text': 'It\\'s old'} to \
             {'title': 'Updated Test Post', 'text': 'new'} at posts in /posts/7"
        );
    }

    #[test]
    fn test_endpoint_templates() {
        let user = user();
        let request = RequestContext::new("/posts", "GET");
        assert_eq!(
            AuditEvent::EndpointCalled { request: &request }.to_string(),
            "/posts was called with method GET"
        );
        assert_eq!(
            AuditEvent::EndpointEntered {
                user: &user,
                request: &RequestContext::new("/me", "GET"),
            }
            .to_string(),
            "test@example.com, Test User entered the /me with method: GET"
        );
    }
}
