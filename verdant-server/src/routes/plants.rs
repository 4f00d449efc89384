//! Plant routes: collection CRUD, journals, lookups, and the PDF export

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use verdant_core::services::IdentificationResult;
use verdant_core::{CareTips, JournalEntryPatch, Plant, PlantDraft, PlantPatch, Toxicity};

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/export", get(export))
        .route("/identify", post(identify))
        .route("/care-tips/:species", get(care_tips))
        .route("/:id", get(get_one).put(update).delete(delete_one))
        .route("/:id/toxicity", get(toxicity))
        .route("/:id/journal", post(add_entry))
        .route(
            "/:id/journal/:entry_id",
            put(update_entry).delete(delete_entry),
        )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdentifyRequest {
    image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewJournalEntry {
    notes: Option<String>,
    photo_url: Option<String>,
}

async fn list(
    State(state): State<AppState>,
    CurrentUser(owner): CurrentUser,
) -> ApiResult<Json<Vec<Plant>>> {
    Ok(Json(state.core.plants.list(owner).await?))
}

async fn create(
    State(state): State<AppState>,
    CurrentUser(owner): CurrentUser,
    ApiJson(draft): ApiJson<PlantDraft>,
) -> ApiResult<impl IntoResponse> {
    let plant = state.core.plants.create(owner, draft).await?;
    Ok((StatusCode::CREATED, Json(plant)))
}

async fn get_one(
    State(state): State<AppState>,
    CurrentUser(owner): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Plant>> {
    Ok(Json(state.core.plants.get(owner, id).await?))
}

async fn update(
    State(state): State<AppState>,
    CurrentUser(owner): CurrentUser,
    Path(id): Path<Uuid>,
    ApiJson(patch): ApiJson<PlantPatch>,
) -> ApiResult<Json<Plant>> {
    Ok(Json(state.core.plants.update(owner, id, patch).await?))
}

async fn delete_one(
    State(state): State<AppState>,
    CurrentUser(owner): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    state.core.plants.delete(owner, id).await?;
    Ok(Json(json!({
        "message": "Plant deleted successfully",
        "plantId": id,
    })))
}

async fn export(
    State(state): State<AppState>,
    CurrentUser(owner): CurrentUser,
) -> ApiResult<impl IntoResponse> {
    let bytes = state.core.export.journal_pdf(owner).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment;filename=garden_journal.pdf",
            ),
        ],
        bytes,
    ))
}

async fn identify(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    ApiJson(body): ApiJson<IdentifyRequest>,
) -> ApiResult<Json<IdentificationResult>> {
    let result = state
        .core
        .plants
        .identify(body.image_url.as_deref().unwrap_or(""))?;
    Ok(Json(result))
}

async fn care_tips(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Path(species): Path<String>,
) -> ApiResult<Json<CareTips>> {
    Ok(Json(state.core.plants.care_tips_for_species(&species)))
}

async fn toxicity(
    State(state): State<AppState>,
    CurrentUser(owner): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Toxicity>> {
    Ok(Json(state.core.plants.toxicity_info(owner, id).await?))
}

async fn add_entry(
    State(state): State<AppState>,
    CurrentUser(owner): CurrentUser,
    Path(id): Path<Uuid>,
    ApiJson(body): ApiJson<NewJournalEntry>,
) -> ApiResult<impl IntoResponse> {
    let plant = state
        .core
        .plants
        .add_journal_entry(
            owner,
            id,
            body.notes.as_deref().unwrap_or(""),
            body.photo_url,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(plant)))
}

async fn update_entry(
    State(state): State<AppState>,
    CurrentUser(owner): CurrentUser,
    Path((id, entry_id)): Path<(Uuid, String)>,
    ApiJson(patch): ApiJson<JournalEntryPatch>,
) -> ApiResult<Json<Plant>> {
    Ok(Json(
        state
            .core
            .plants
            .update_journal_entry(owner, id, &entry_id, patch)
            .await?,
    ))
}

async fn delete_entry(
    State(state): State<AppState>,
    CurrentUser(owner): CurrentUser,
    Path((id, entry_id)): Path<(Uuid, String)>,
) -> ApiResult<Json<Plant>> {
    Ok(Json(
        state
            .core
            .plants
            .delete_journal_entry(owner, id, &entry_id)
            .await?,
    ))
}
