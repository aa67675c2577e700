//! `/api/content` resource: one record per site section.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use weave_content_core::content::validate::{validate_content_id, validate_patch};
use weave_content_core::content::{ContentPatch, ContentSection, CreateContent, PatchAction, Section};
use weave_content_core::events::{ContentChange, ContentEvent};
use weave_content_core::store::Upserted;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/content", get(list_content).post(create_content))
        .route("/api/content/{id}", get(get_content).patch(patch_content))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    section: Option<String>,
}

/// All sections, or the zero-or-one record for `?section=`.
async fn list_content(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<ContentSection>>> {
    let records = match query.section {
        Some(name) => {
            let section: Section = name.parse()?;
            state
                .repository()
                .find_by_section(section)
                .await?
                .into_iter()
                .collect()
        }
        None => state.repository().list().await?,
    };
    Ok(Json(records))
}

async fn get_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ContentSection>> {
    validate_content_id(&id)?;
    let record = state
        .repository()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| not_found(&id))?;
    Ok(Json(record))
}

/// Create the section's record, or update its draft if one already exists.
async fn create_content(
    State(state): State<AppState>,
    Json(body): Json<CreateContent>,
) -> ApiResult<(StatusCode, Json<ContentSection>)> {
    let (record, outcome) = state
        .repository()
        .upsert_draft(body.section, body.data)
        .await?;

    let change = ContentChange::of(&record);
    let status = match outcome {
        Upserted::Created => {
            tracing::info!(section = %record.section, content_id = %change.content_id, "content created");
            state.event_bus().publish(ContentEvent::Created(change));
            StatusCode::CREATED
        }
        Upserted::Updated => {
            tracing::info!(section = %record.section, content_id = %change.content_id, "existing section draft updated");
            state.event_bus().publish(ContentEvent::DraftSaved(change));
            StatusCode::OK
        }
    };
    Ok((status, Json(record)))
}

async fn patch_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ContentPatch>,
) -> ApiResult<Json<ContentSection>> {
    validate_content_id(&id)?;
    validate_patch(&patch)?;

    let repository = state.repository();
    let (record, event): (_, fn(ContentChange) -> ContentEvent) = match patch.action {
        None => {
            let data = patch.draft_data.unwrap_or_default();
            (repository.save_draft(&id, data).await?, ContentEvent::DraftSaved)
        }
        Some(PatchAction::Publish) => (
            repository.publish(&id, patch.draft_data).await?,
            ContentEvent::Published,
        ),
        Some(PatchAction::Revert) => (repository.revert(&id).await?, ContentEvent::Reverted),
    };
    let record = record.ok_or_else(|| not_found(&id))?;

    let event = event(ContentChange::of(&record));
    tracing::info!(
        section = %record.section,
        content_id = %id,
        kind = event.kind(),
        status = %record.effective_status(),
        "content updated"
    );
    state.event_bus().publish(event);
    Ok(Json(record))
}

fn not_found(id: &str) -> ApiError {
    ApiError::NotFound(format!("content {id} does not exist"))
}
