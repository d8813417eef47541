use axum::{extract::State, Json};
use chrono::Utc;

use crate::api::dto::{CycleReportDto, DeviceDto, SystemStatusDto};
use crate::api::errors::ApiError;
use crate::api::AppState;
use crate::db::repos::DeviceRepo;

/// Device and cache counts for quick inspection.
#[utoipa::path(
    get,
    path = "/api/debug/estado",
    responses(
        (status = 200, description = "System status", body = SystemStatusDto),
    ),
    tag = "debug"
)]
pub async fn system_status(
    State(state): State<AppState>,
) -> Result<Json<SystemStatusDto>, ApiError> {
    let devices = DeviceRepo::list_all(&state.pool).await?;
    let sensors = devices.iter().filter(|d| d.kind.is_sensor()).count();
    let actuators = devices.len() - sensors;

    Ok(Json(SystemStatusDto {
        total_devices: devices.len() as i64,
        sensors,
        actuators,
        cached_readings: state.cache.len().await,
        now: Utc::now(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/debug/sensores",
    responses(
        (status = 200, description = "All sensor devices", body = Vec<DeviceDto>),
    ),
    tag = "debug"
)]
pub async fn list_sensors(
    State(state): State<AppState>,
) -> Result<Json<Vec<DeviceDto>>, ApiError> {
    let devices = DeviceRepo::list_all(&state.pool).await?;
    Ok(Json(
        devices
            .into_iter()
            .filter(|d| d.kind.is_sensor())
            .map(Into::into)
            .collect(),
    ))
}

/// Run one simulation cycle inline instead of waiting for the next tick.
#[utoipa::path(
    post,
    path = "/api/debug/forzar-lecturas",
    responses(
        (status = 200, description = "Cycle report", body = CycleReportDto),
        (status = 500, description = "Cycle failed"),
    ),
    tag = "debug"
)]
pub async fn force_readings(
    State(state): State<AppState>,
) -> Result<Json<CycleReportDto>, ApiError> {
    let report = state
        .simulator
        .run_cycle()
        .await
        .map_err(ApiError::Internal)?;
    Ok(Json(report.into()))
}

/// Dump the recent simulation log lines as plain text.
#[utoipa::path(
    get,
    path = "/api/debug/logs-sensores",
    responses(
        (status = 200, description = "Recent simulation log", body = String),
    ),
    tag = "debug"
)]
pub async fn sensor_logs(State(state): State<AppState>) -> String {
    state.simulator.log_dump()
}
