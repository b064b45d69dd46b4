use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use aisle_core::export;
use aisle_core::sort::{GuestColumn, SortDirection, sort_guests};
use aisle_core::stats::{self, GuestStats};
use aisle_types::models::{Guest, WeddingPartyPatch};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::query;

#[derive(Debug, Default, Deserialize)]
pub struct GuestTableQuery {
    #[serde(default)]
    pub sort: GuestColumn,
    #[serde(default)]
    pub direction: SortDirection,
}

async fn all_guests(state: &AppState) -> Result<Vec<Guest>, ApiError> {
    let rows = query::read(state, |db| db.list_all_guests()).await?;
    Ok(rows.into_iter().map(|r| r.into_guest()).collect())
}

fn csv_download(filename: &str, body: String) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
}

/// GET /admin/guests?sort=fullName&direction=desc
pub async fn list_guests(
    State(state): State<AppState>,
    Query(q): Query<GuestTableQuery>,
) -> Result<Json<Vec<Guest>>, ApiError> {
    let mut guests = all_guests(&state).await?;
    sort_guests(&mut guests, q.sort, q.direction);
    Ok(Json(guests))
}

/// GET /admin/stats
pub async fn guest_stats(State(state): State<AppState>) -> Result<Json<GuestStats>, ApiError> {
    let guests = all_guests(&state).await?;
    Ok(Json(stats::compute(&guests, Utc::now())))
}

/// GET /admin/export/guests.csv
pub async fn export_raw(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let guests = all_guests(&state).await?;
    info!("Exporting {} guests (raw)", guests.len());
    Ok(csv_download("guests.csv", export::raw_csv(&guests)))
}

/// GET /admin/export/import.csv
pub async fn export_import(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let guests = all_guests(&state).await?;
    info!("Exporting {} guests (import format)", guests.len());
    Ok(csv_download("guest-import.csv", export::import_csv(&guests)))
}

/// PATCH /admin/guests/{id}: wedding-party fields only.
pub async fn update_guest(
    State(state): State<AppState>,
    Path(guest_id): Path<Uuid>,
    Json(patch): Json<WeddingPartyPatch>,
) -> Result<Json<Guest>, ApiError> {
    let id = guest_id.to_string();
    let updated = query::write(&state, move |db| {
        if !db.update_wedding_party(&id, &patch)? {
            return Ok(None);
        }
        db.get_guest(&id)
    })
    .await?
    .ok_or(ApiError::NotFound)?;

    Ok(Json(updated.into_guest()))
}

/// DELETE /admin/guests/{id}. Other members of the party are untouched.
pub async fn delete_guest(
    State(state): State<AppState>,
    Path(guest_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let id = guest_id.to_string();
    if query::write(&state, move |db| db.delete_guest(&id)).await? {
        info!("Deleted guest {}", guest_id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}
