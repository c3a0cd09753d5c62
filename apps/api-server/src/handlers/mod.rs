//! HTTP handlers and route configuration.

mod auth;
mod health;
mod logs;
mod posts;


use actix_web::{HttpRequest, web};
use serde_json::{Map, Value};

use inkwell_core::DomainError;
use inkwell_core::audit::{AuditEvent, AuditLogger, RequestContext};
use inkwell_core::domain::User;

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Public routes
        .route("/", web::get().to(logs::log_page))
        .route("/logs", web::get().to(logs::list_logs))
        .route("/health", web::get().to(health::health_check))
        // Account routes
        .route("/register", web::post().to(auth::register))
        .route("/login", web::get().to(auth::login))
        .route("/me", web::get().to(auth::me))
        // Posts
        .service(
            web::resource("/posts")
                .route(web::get().to(posts::list_posts))
                .route(web::post().to(posts::create_post)),
        )
        .service(
            web::resource("/posts/{id}")
                .route(web::get().to(posts::get_post))
                .route(web::patch().to(posts::update_post))
                .route(web::delete().to(posts::delete_post)),
        );
}

/// Request bodies are taken as any JSON value so that shape errors are
/// domain validation failures and reach the audit log.
fn json_object(body: Value) -> Result<Map<String, Value>, DomainError> {
    match body {
        Value::Object(fields) => Ok(fields),
        _ => Err(DomainError::validation(
            "body",
            "Request body must be a JSON object",
        )),
    }
}

fn request_context(req: &HttpRequest) -> RequestContext {
    RequestContext::new(req.path(), req.method().as_str())
}

/// Turn a failed domain call into the response error, recording client-facing
/// failures in the audit log first.
async fn reject(
    audit: &AuditLogger,
    user: Option<&User>,
    request: &RequestContext,
    err: DomainError,
) -> AppError {
    let client_facing = matches!(
        err,
        DomainError::Validation { .. }
            | DomainError::AccessDenied { .. }
            | DomainError::NotFound { .. }
    );
    if !client_facing {
        return err.into();
    }

    let message = err.to_string();
    let event = match user {
        Some(user) => AuditEvent::AuthenticatedError {
            user,
            error: &message,
            request,
        },
        None => AuditEvent::Error {
            error: &message,
            request,
        },
    };

    match audit.record(event).await {
        Ok(()) => err.into(),
        Err(audit_err) => audit_err.into(),
    }
}
