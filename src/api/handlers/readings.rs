use axum::{
    extract::{Path, State},
    Json,
};

use crate::api::dto::ReadingDto;
use crate::api::errors::ApiError;
use crate::api::AppState;
use crate::db::repos::{DeviceRepo, ReadingRepo};

const MAX_LAST_N: i64 = 1000;

/// Reading history for one device, newest first.
#[utoipa::path(
    get,
    path = "/api/lecturas/dispositivo/{dispositivo_id}",
    params(("dispositivo_id" = i64, Path, description = "Device ID")),
    responses(
        (status = 200, description = "Reading history", body = Vec<ReadingDto>),
        (status = 404, description = "Device not found"),
    ),
    tag = "lecturas"
)]
pub async fn device_history(
    State(state): State<AppState>,
    Path(device_id): Path<i64>,
) -> Result<Json<Vec<ReadingDto>>, ApiError> {
    ensure_device_exists(&state, device_id).await?;
    let readings = ReadingRepo::history(&state.pool, device_id).await?;
    Ok(Json(readings.into_iter().map(Into::into).collect()))
}

/// The N most recent readings for one device.
#[utoipa::path(
    get,
    path = "/api/lecturas/dispositivo/{dispositivo_id}/ultimas/{n}",
    params(
        ("dispositivo_id" = i64, Path, description = "Device ID"),
        ("n" = i64, Path, description = "Number of readings, 1..=1000"),
    ),
    responses(
        (status = 200, description = "Most recent readings", body = Vec<ReadingDto>),
        (status = 400, description = "Invalid count"),
        (status = 404, description = "Device not found"),
    ),
    tag = "lecturas"
)]
pub async fn device_last_n(
    State(state): State<AppState>,
    Path((device_id, n)): Path<(i64, i64)>,
) -> Result<Json<Vec<ReadingDto>>, ApiError> {
    if !(1..=MAX_LAST_N).contains(&n) {
        return Err(ApiError::Validation(format!(
            "count must be between 1 and {MAX_LAST_N}, got {n}"
        )));
    }
    ensure_device_exists(&state, device_id).await?;
    let readings = ReadingRepo::last_n(&state.pool, device_id, n).await?;
    Ok(Json(readings.into_iter().map(Into::into).collect()))
}

/// Latest reading per device, straight from the in-memory cache.
#[utoipa::path(
    get,
    path = "/api/lecturas/actuales",
    responses(
        (status = 200, description = "Latest reading per device", body = Vec<ReadingDto>),
    ),
    tag = "lecturas"
)]
pub async fn latest_readings(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReadingDto>>, ApiError> {
    let readings = state.cache.all().await;
    Ok(Json(readings.into_iter().map(Into::into).collect()))
}

async fn ensure_device_exists(state: &AppState, device_id: i64) -> Result<(), ApiError> {
    DeviceRepo::find_by_id(&state.pool, device_id)
        .await?
        .ok_or(ApiError::NotFound("device"))?;
    Ok(())
}
