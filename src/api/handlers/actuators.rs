use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::json;

use crate::api::dto::{DeviceDto, SetModeRequest};
use crate::api::errors::ApiError;
use crate::api::AppState;
use crate::db::models::{Device, DeviceKind};
use crate::db::repos::DeviceRepo;
use crate::events::EVENT_ACTUATOR_CHANGED;

#[utoipa::path(
    get,
    path = "/api/actuadores",
    responses(
        (status = 200, description = "All actuators", body = Vec<DeviceDto>),
    ),
    tag = "actuadores"
)]
pub async fn list_actuators(
    State(state): State<AppState>,
) -> Result<Json<Vec<DeviceDto>>, ApiError> {
    let actuators = DeviceRepo::list_by_kind(&state.pool, DeviceKind::Actuator).await?;
    Ok(Json(actuators.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/actuadores/{id}",
    params(("id" = i64, Path, description = "Actuator device ID")),
    responses(
        (status = 200, description = "Actuator", body = DeviceDto),
        (status = 404, description = "Actuator not found"),
    ),
    tag = "actuadores"
)]
pub async fn get_actuator(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeviceDto>, ApiError> {
    let device = find_actuator(&state, id).await?;
    Ok(Json(device.into()))
}

/// Switch the actuator on.
#[utoipa::path(
    post,
    path = "/api/actuadores/{id}/activar",
    params(("id" = i64, Path, description = "Actuator device ID")),
    responses(
        (status = 200, description = "Actuator switched on", body = DeviceDto),
        (status = 404, description = "Actuator not found"),
    ),
    tag = "actuadores"
)]
pub async fn activate_actuator(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeviceDto>, ApiError> {
    set_actuator_state(&state, id, true).await
}

/// Switch the actuator off.
#[utoipa::path(
    post,
    path = "/api/actuadores/{id}/desactivar",
    params(("id" = i64, Path, description = "Actuator device ID")),
    responses(
        (status = 200, description = "Actuator switched off", body = DeviceDto),
        (status = 404, description = "Actuator not found"),
    ),
    tag = "actuadores"
)]
pub async fn deactivate_actuator(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeviceDto>, ApiError> {
    set_actuator_state(&state, id, false).await
}

#[utoipa::path(
    put,
    path = "/api/actuadores/{id}/modo",
    params(("id" = i64, Path, description = "Actuator device ID")),
    request_body = SetModeRequest,
    responses(
        (status = 200, description = "Operation mode changed", body = DeviceDto),
        (status = 404, description = "Actuator not found"),
    ),
    tag = "actuadores"
)]
pub async fn set_operation_mode(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<SetModeRequest>,
) -> Result<Json<DeviceDto>, ApiError> {
    let mut device = find_actuator(&state, id).await?;
    device.op_mode = Some(req.mode);
    let updated = DeviceRepo::update(&state.pool, &device).await?;

    state
        .events
        .notify(
            EVENT_ACTUATOR_CHANGED,
            json!({
                "dispositivoId": updated.id,
                "modoOperacion": updated.op_mode,
                "estado": updated.actuator_on,
            }),
        )
        .await;

    Ok(Json(updated.into()))
}

async fn set_actuator_state(
    state: &AppState,
    id: i64,
    on: bool,
) -> Result<Json<DeviceDto>, ApiError> {
    let mut device = find_actuator(state, id).await?;
    device.actuator_on = Some(on);
    let updated = DeviceRepo::update(&state.pool, &device).await?;

    state
        .events
        .notify(
            EVENT_ACTUATOR_CHANGED,
            json!({
                "dispositivoId": updated.id,
                "modoOperacion": updated.op_mode,
                "estado": updated.actuator_on,
            }),
        )
        .await;

    Ok(Json(updated.into()))
}

/// A device that exists but is not an actuator is reported as not found on
/// this surface, not as a validation error.
async fn find_actuator(state: &AppState, id: i64) -> Result<Device, ApiError> {
    let device = DeviceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(ApiError::NotFound("actuator"))?;
    if device.kind != DeviceKind::Actuator {
        return Err(ApiError::NotFound("actuator"));
    }
    Ok(device)
}
