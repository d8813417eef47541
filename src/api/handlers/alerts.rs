use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::api::dto::{AlertDto, CreateThresholdRequest, ThresholdDto};
use crate::api::errors::ApiError;
use crate::api::AppState;
use crate::db::repos::{AlertRepo, DeviceRepo, ThresholdRepo};

use super::thresholds;

/// Alias kept from the original surface: configure a threshold through the
/// alerts resource.
#[utoipa::path(
    post,
    path = "/api/alertas/umbrales",
    request_body = CreateThresholdRequest,
    responses(
        (status = 201, description = "Threshold created", body = ThresholdDto),
        (status = 400, description = "valorMin exceeds valorMax"),
        (status = 404, description = "Device not found"),
    ),
    tag = "alertas"
)]
pub async fn configure_threshold(
    State(state): State<AppState>,
    Json(req): Json<CreateThresholdRequest>,
) -> Result<(StatusCode, Json<ThresholdDto>), ApiError> {
    let dto = thresholds::create_for_request(&state, req).await?;
    Ok((StatusCode::CREATED, Json(dto)))
}

#[utoipa::path(
    get,
    path = "/api/alertas/dispositivo/{dispositivo_id}/umbrales",
    params(("dispositivo_id" = i64, Path, description = "Device ID")),
    responses(
        (status = 200, description = "Thresholds for the device", body = Vec<ThresholdDto>),
    ),
    tag = "alertas"
)]
pub async fn thresholds_for_device(
    State(state): State<AppState>,
    Path(device_id): Path<i64>,
) -> Result<Json<Vec<ThresholdDto>>, ApiError> {
    let thresholds = ThresholdRepo::for_device(&state.pool, device_id).await?;
    Ok(Json(thresholds.into_iter().map(Into::into).collect()))
}

/// Every active alert in the system, newest first.
#[utoipa::path(
    get,
    path = "/api/alertas",
    responses(
        (status = 200, description = "Active alerts", body = Vec<AlertDto>),
    ),
    tag = "alertas"
)]
pub async fn list_active_alerts(
    State(state): State<AppState>,
) -> Result<Json<Vec<AlertDto>>, ApiError> {
    let alerts = AlertRepo::list_active(&state.pool).await?;
    Ok(Json(alerts.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/alertas/dispositivo/{dispositivo_id}",
    params(("dispositivo_id" = i64, Path, description = "Device ID")),
    responses(
        (status = 200, description = "Alerts for the device", body = Vec<AlertDto>),
        (status = 404, description = "Device not found"),
    ),
    tag = "alertas"
)]
pub async fn alerts_for_device(
    State(state): State<AppState>,
    Path(device_id): Path<i64>,
) -> Result<Json<Vec<AlertDto>>, ApiError> {
    DeviceRepo::find_by_id(&state.pool, device_id)
        .await?
        .ok_or(ApiError::NotFound("device"))?;
    let alerts = AlertRepo::for_device(&state.pool, device_id).await?;
    Ok(Json(alerts.into_iter().map(Into::into).collect()))
}
