//! Post handlers. Bodies are taken as raw JSON so unknown and malformed
//! fields reach domain validation instead of being dropped.

use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::Value;

use inkwell_core::DomainError;
use inkwell_core::audit::AuditEvent;
use inkwell_core::domain::{FieldChange, Post, User};
use inkwell_shared::ApiResponse;
use inkwell_shared::dto::PostResponse;

use super::{json_object, reject, request_context};
use crate::middleware::auth::CurrentUser;
use crate::middleware::error::AppResult;
use crate::state::AppState;

type Body = web::Json<Value>;

fn post_response(post: &Post) -> PostResponse {
    PostResponse {
        id: post.id.to_string(),
        title: post.title.clone(),
        text: post.text.clone(),
        author: post.author.to_string(),
    }
}

/// GET /posts
pub async fn list_posts(state: web::Data<AppState>, req: HttpRequest) -> AppResult<HttpResponse> {
    let request = request_context(&req);

    let posts = state.posts.list().await?;
    state
        .audit
        .record(AuditEvent::EndpointCalled { request: &request })
        .await?;

    let body: Vec<PostResponse> = posts.iter().map(post_response).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(body)))
}

/// POST /posts
pub async fn create_post(
    state: web::Data<AppState>,
    req: HttpRequest,
    CurrentUser(user): CurrentUser,
    body: Body,
) -> AppResult<HttpResponse> {
    let request = request_context(&req);

    let result = match json_object(body.into_inner()) {
        Ok(fields) => state.posts.create(&fields, &user).await,
        Err(err) => Err(err),
    };
    let post = match result {
        Ok(post) => post,
        Err(err) => return Err(reject(&state.audit, Some(&user), &request, err).await),
    };

    state
        .audit
        .record(AuditEvent::RecordCreated {
            user: &user,
            table: Post::TABLE_NAME,
            record_id: post.id,
            request: &request,
        })
        .await?;

    let body = ApiResponse::ok(post_response(&post)).with_message("Post was successfuly created!");
    Ok(HttpResponse::Ok().json(body))
}

/// GET /posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let request = request_context(&req);

    let post = match state.posts.get_by_id(&path).await {
        Ok(post) => post,
        Err(err) => return Err(reject(&state.audit, None, &request, err).await),
    };

    state
        .audit
        .record(AuditEvent::EndpointCalled { request: &request })
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post_response(&post))))
}

/// The post is looked up before the body is examined.
async fn update(
    state: &AppState,
    user: &User,
    id: &str,
    body: Value,
) -> Result<(Post, Vec<FieldChange>), DomainError> {
    let post = state.posts.get_by_id(id).await?;
    let fields = json_object(body)?;
    state.posts.update(&post, user, &fields).await
}

async fn delete(state: &AppState, user: &User, id: &str) -> Result<Post, DomainError> {
    let post = state.posts.get_by_id(id).await?;
    state.posts.delete(&post, user).await?;
    Ok(post)
}

/// PATCH /posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    req: HttpRequest,
    CurrentUser(user): CurrentUser,
    path: web::Path<String>,
    body: Body,
) -> AppResult<HttpResponse> {
    let request = request_context(&req);

    let (post, changes) = match update(&state, &user, &path, body.into_inner()).await {
        Ok(updated) => updated,
        Err(err) => return Err(reject(&state.audit, Some(&user), &request, err).await),
    };

    state
        .audit
        .record(AuditEvent::RecordChanged {
            user: &user,
            table: Post::TABLE_NAME,
            changes: &changes,
            request: &request,
        })
        .await?;

    let body = ApiResponse::ok(post_response(&post)).with_message("Post was successfuly updated!");
    Ok(HttpResponse::Ok().json(body))
}

/// DELETE /posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    req: HttpRequest,
    CurrentUser(user): CurrentUser,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let request = request_context(&req);

    let post = match delete(&state, &user, &path).await {
        Ok(post) => post,
        Err(err) => return Err(reject(&state.audit, Some(&user), &request, err).await),
    };

    state
        .audit
        .record(AuditEvent::RecordDeleted {
            user: &user,
            table: Post::TABLE_NAME,
            record_id: post.id,
            request: &request,
        })
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Post was successfuly deleted!")))
}
