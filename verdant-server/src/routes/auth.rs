//! Account routes: register, login, profile

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use verdant_core::{PublicUser, UserPatch};

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/profile", get(profile).put(update_profile))
}

/// Both fields optional so the missing-field errors come from the
/// service, not from deserialization.
#[derive(Debug, Default, Deserialize)]
struct Credentials {
    email: Option<String>,
    password: Option<String>,
}

async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Credentials>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .core
        .accounts
        .register(
            body.email.as_deref().unwrap_or(""),
            body.password.as_deref().unwrap_or(""),
        )
        .await?;
    let token = state.auth.issue(user.id)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully",
            "token": token,
            "userId": user.id,
        })),
    ))
}

async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Credentials>,
) -> ApiResult<Json<serde_json::Value>> {
    let user = state
        .core
        .accounts
        .login(
            body.email.as_deref().unwrap_or(""),
            body.password.as_deref().unwrap_or(""),
        )
        .await?;
    let token = state.auth.issue(user.id)?;
    Ok(Json(json!({
        "token": token,
        "user": { "_id": user.id, "email": user.email },
    })))
}

async fn profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<PublicUser>> {
    let user = state.core.accounts.profile(user).await?;
    Ok(Json(user.public()))
}

async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(patch): ApiJson<UserPatch>,
) -> ApiResult<Json<PublicUser>> {
    let user = state.core.accounts.update_profile(user, patch).await?;
    Ok(Json(user.public()))
}
