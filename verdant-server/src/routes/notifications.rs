//! Notification routes: token registration, test sends, history

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use verdant_core::Error;

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/save-token", post(save_token))
        .route("/send-test", post(send_test))
        .route("/history", get(history))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveToken {
    fcm_token: Option<String>,
}

async fn save_token(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(body): ApiJson<SaveToken>,
) -> ApiResult<Json<serde_json::Value>> {
    state
        .core
        .notifications
        .save_token(user, body.fcm_token.as_deref().unwrap_or(""))
        .await?;
    Ok(Json(json!({ "message": "FCM token saved successfully." })))
}

async fn send_test(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<serde_json::Value>> {
    state
        .core
        .notifications
        .send_test(user)
        .await
        .map_err(|e| match e {
            Error::Dispatch(detail) => {
                error!(error = %detail, "test notification failed");
                ApiError::server_error("Failed to send notification", detail)
            }
            other => ApiError::from(other),
        })?;
    Ok(Json(json!({ "message": "Notification sent successfully" })))
}

async fn history(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<serde_json::Value>> {
    let notifications = state.core.notifications.history(user).await?;
    Ok(Json(json!({ "notifications": notifications })))
}
