//! Bearer token authentication extractor.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures::future::LocalBoxFuture;

use inkwell_core::domain::User;
use inkwell_core::ports::AuthError;

use super::error::AppError;
use crate::state::AppState;

const AUTHORIZATION_REQUIRED: &str = "Authorization required";

/// The user the request's bearer token belongs to, freshly loaded from storage.
///
/// ```ignore
/// async fn protected_route(CurrentUser(user): CurrentUser) -> impl Responder {
///     format!("Hello, {}!", user.email)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

fn bearer_token(req: &HttpRequest) -> Result<String, AuthError> {
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?;

    let value = header
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .map(str::to_string)
        .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()))
}

fn rejected(reason: AuthError) -> AppError {
    tracing::debug!(reason = %reason, "Request rejected by authentication");
    AppError::Unauthorized(AUTHORIZATION_REQUIRED.to_string())
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = bearer_token(req);

        Box::pin(async move {
            let Some(state) = state else {
                tracing::error!("AppState not found in app data");
                return Err(AppError::Internal("Server configuration error".to_string()));
            };

            let claims = token
                .and_then(|t| state.tokens.validate_token(&t))
                .map_err(rejected)?;

            match state.users.find_by_id(claims.user_id).await? {
                Some(user) => Ok(CurrentUser(user)),
                None => Err(rejected(AuthError::InvalidToken(
                    "User no longer exists".to_string(),
                ))),
            }
        })
    }
}
