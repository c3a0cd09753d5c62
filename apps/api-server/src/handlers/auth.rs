//! Registration, login and profile handlers.

use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::Value;

use inkwell_core::DomainError;
use inkwell_core::audit::AuditEvent;
use inkwell_core::domain::User;
use inkwell_core::services::Registration;
use inkwell_shared::ApiResponse;
use inkwell_shared::dto::{AuthResponse, LoginRequest, UserResponse};

use super::{json_object, reject, request_context};
use crate::middleware::auth::CurrentUser;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id.to_string(),
        email: user.email.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        created_at: user.created_at.to_rfc3339(),
    }
}

/// POST /register
pub async fn register(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<Value>,
) -> AppResult<HttpResponse> {
    let request = request_context(&req);

    let user = match register_user(&state, body.into_inner()).await {
        Ok(user) => user,
        Err(err) => return Err(reject(&state.audit, None, &request, err).await),
    };

    state.audit.record(AuditEvent::UserCreated { user: &user }).await?;

    let body = ApiResponse::ok(user_response(&user))
        .with_message("User has been registered successfully");
    Ok(HttpResponse::Created().json(body))
}

async fn register_user(state: &AppState, body: Value) -> Result<User, DomainError> {
    let registration = Registration::from_fields(&json_object(body)?)?;
    state.users.register(registration).await
}

/// GET /login
pub async fn login(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let request = request_context(&req);
    let body = body.into_inner();

    let user = match state.users.authenticate(&body.email, &body.password).await {
        Ok(user) => user,
        Err(err) => return Err(reject(&state.audit, None, &request, err).await),
    };

    let token = state
        .tokens
        .generate_token(user.id)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    state.audit.record(AuditEvent::UserLoggedIn { user: &user }).await?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration_seconds().max(0) as u64,
    }))
}

/// GET /me - Protected route
pub async fn me(
    state: web::Data<AppState>,
    req: HttpRequest,
    CurrentUser(user): CurrentUser,
) -> AppResult<HttpResponse> {
    let request = request_context(&req);

    state
        .audit
        .record(AuditEvent::EndpointEntered {
            user: &user,
            request: &request,
        })
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(user_response(&user))))
}
