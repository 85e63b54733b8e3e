//! Workshop search and CRUD handlers.
//!
//! Reads and writes go through the cached repository in `AppState`; the
//! handlers never touch the cache directly.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use workshops_core::search::{Attendance, SearchFilter, SearchQuery};
use workshops_core::storage::RepositoryError;
use workshops_core::workshop::{
    CreateWorkshopRequest, UpdateWorkshopRequest, Workshop, WorkshopCommand, WriteResult,
};

use super::authz::{require, Policy};
use crate::{context::RequestScope, handlers::AppError, state::AppState};

/// Error response with message (for malformed request bodies).
fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let msg = message.into();
    tracing::warn!(status = %status, message = %msg, "API error");
    (status, msg).into_response()
}

/// Query parameters for searching workshops.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Free-text term (empty matches everything)
    pub q: Option<String>,
    /// Workshops starting at or after this instant
    pub from: Option<DateTime<Utc>>,
    /// Workshops starting strictly before this instant
    pub to: Option<DateTime<Utc>>,
    /// `online` or `in-person`
    pub mode: Option<String>,
    /// Location substring
    pub location: Option<String>,
}

impl SearchParams {
    /// Builds the search query. An unknown mode is an invalid query.
    pub fn into_query(self) -> Result<SearchQuery, RepositoryError> {
        let mut query = SearchQuery::new(self.q.unwrap_or_default());

        if let Some(from) = self.from {
            query = query.with_filter(SearchFilter::StartsFrom(from));
        }
        if let Some(to) = self.to {
            query = query.with_filter(SearchFilter::StartsBefore(to));
        }
        if let Some(mode) = self.mode.filter(|m| !m.trim().is_empty()) {
            query = query.with_filter(SearchFilter::Mode(mode.parse::<Attendance>()?));
        }
        if let Some(location) = self.location {
            query = query.with_filter(SearchFilter::Location(location));
        }

        Ok(query)
    }
}

// ============================================================================
// Reads
// ============================================================================

/// Search workshops (GET /api/workshops).
pub async fn search_workshops(
    RequestScope(ctx): RequestScope,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Workshop>>, AppError> {
    let query = params.into_query()?;
    let workshops = state.workshops.search_workshops(&ctx, &query).await?;

    tracing::debug!(
        request_id = %ctx.request_id,
        term = %query.term,
        count = workshops.len(),
        "Workshop search"
    );

    Ok(Json(workshops))
}

/// Get a single workshop (GET /api/workshops/{id}).
pub async fn get_workshop(
    RequestScope(ctx): RequestScope,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Workshop>, AppError> {
    let workshop = state
        .workshops
        .get_workshop(&ctx, id)
        .await?
        .ok_or_else(|| RepositoryError::NotFound {
            entity_type: "Workshop",
            id: id.to_string(),
        })?;

    Ok(Json(workshop))
}

// ============================================================================
// Writes
// ============================================================================

/// Create a workshop (POST /api/workshops).
pub async fn create_workshop(
    RequestScope(ctx): RequestScope,
    State(state): State<AppState>,
    payload: Result<Json<CreateWorkshopRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Workshop>), Response> {
    require(&ctx, Policy::CanWriteWorkshops).map_err(IntoResponse::into_response)?;

    let Json(payload) = payload.map_err(|e| {
        error_response(StatusCode::BAD_REQUEST, format!("Invalid workshop: {e}"))
    })?;

    let workshop = payload.into_workshop(ctx.now);
    state
        .workshops
        .write_workshop(&ctx, &WorkshopCommand::Create(workshop.clone()))
        .await
        .map_err(|e| AppError::from(e).into_response())?;

    tracing::info!(request_id = %ctx.request_id, workshop_id = %workshop.id, "Workshop created");

    Ok((StatusCode::CREATED, Json(workshop)))
}

/// Replace a workshop (PUT /api/workshops/{id}).
pub async fn update_workshop(
    RequestScope(ctx): RequestScope,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateWorkshopRequest>, JsonRejection>,
) -> Result<Json<WriteResult>, Response> {
    require(&ctx, Policy::CanWriteWorkshops).map_err(IntoResponse::into_response)?;

    let Json(payload) = payload.map_err(|e| {
        error_response(StatusCode::BAD_REQUEST, format!("Invalid workshop: {e}"))
    })?;

    let result = state
        .workshops
        .write_workshop(&ctx, &payload.into_command(id, ctx.now))
        .await
        .map_err(|e| AppError::from(e).into_response())?;

    tracing::info!(request_id = %ctx.request_id, workshop_id = %id, "Workshop updated");

    Ok(Json(result))
}

/// Delete a workshop (DELETE /api/workshops/{id}).
pub async fn delete_workshop(
    RequestScope(ctx): RequestScope,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, Response> {
    require(&ctx, Policy::CanDeleteWorkshops).map_err(IntoResponse::into_response)?;

    state
        .workshops
        .write_workshop(&ctx, &WorkshopCommand::Delete { id })
        .await
        .map_err(|e| AppError::from(e).into_response())?;

    tracing::info!(request_id = %ctx.request_id, workshop_id = %id, "Workshop deleted");

    Ok(StatusCode::NO_CONTENT)
}
