use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::api::dto::{CreateDeviceRequest, DeviceDto, UpdateDeviceRequest};
use crate::api::errors::ApiError;
use crate::api::AppState;
use crate::db::models::{DeviceKind, OperationMode};
use crate::db::repos::{DeviceRepo, NewDevice};

/// List every registered device.
#[utoipa::path(
    get,
    path = "/api/dispositivos",
    responses(
        (status = 200, description = "All registered devices", body = Vec<DeviceDto>),
    ),
    tag = "dispositivos"
)]
pub async fn list_devices(
    State(state): State<AppState>,
) -> Result<Json<Vec<DeviceDto>>, ApiError> {
    let devices = DeviceRepo::list_all(&state.pool).await?;
    Ok(Json(devices.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/dispositivos/{id}",
    params(("id" = i64, Path, description = "Device ID")),
    responses(
        (status = 200, description = "Device", body = DeviceDto),
        (status = 404, description = "Device not found"),
    ),
    tag = "dispositivos"
)]
pub async fn get_device(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeviceDto>, ApiError> {
    let device = DeviceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(ApiError::NotFound("device"))?;
    Ok(Json(device.into()))
}

/// Register a new device. Sensors without an explicit unit get the
/// kind-specific default; actuators start switched off in automatic mode.
#[utoipa::path(
    post,
    path = "/api/dispositivos",
    request_body = CreateDeviceRequest,
    responses(
        (status = 201, description = "Device created", body = DeviceDto),
        (status = 400, description = "Validation failure"),
    ),
    tag = "dispositivos"
)]
pub async fn create_device(
    State(state): State<AppState>,
    Json(req): Json<CreateDeviceRequest>,
) -> Result<(StatusCode, Json<DeviceDto>), ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::Validation("nombre must not be empty".into()));
    }
    if req.zone.trim().is_empty() {
        return Err(ApiError::Validation("ubicacion must not be empty".into()));
    }
    if let (Some(min), Some(max)) = (req.range_min, req.range_max) {
        if min > max {
            return Err(ApiError::Validation(
                "rangoMin must not exceed rangoMax".into(),
            ));
        }
    }

    let is_actuator = req.kind == DeviceKind::Actuator;
    let input = NewDevice {
        kind: req.kind,
        name: req.name,
        description: req.description,
        zone: req.zone,
        active: req.active.unwrap_or(true),
        unit: if is_actuator {
            None
        } else {
            req.unit
                .or_else(|| Some(req.kind.default_unit().to_owned()))
        },
        range_min: req.range_min,
        range_max: req.range_max,
        actuator_on: is_actuator.then_some(false),
        op_mode: if is_actuator {
            Some(req.operation_mode.unwrap_or(OperationMode::Automatic))
        } else {
            None
        },
    };

    let device = DeviceRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(device.into())))
}

/// Partial update: only the provided fields change.
#[utoipa::path(
    put,
    path = "/api/dispositivos/{id}",
    params(("id" = i64, Path, description = "Device ID")),
    request_body = UpdateDeviceRequest,
    responses(
        (status = 200, description = "Updated device", body = DeviceDto),
        (status = 400, description = "Validation failure"),
        (status = 404, description = "Device not found"),
    ),
    tag = "dispositivos"
)]
pub async fn update_device(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateDeviceRequest>,
) -> Result<Json<DeviceDto>, ApiError> {
    let mut device = DeviceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(ApiError::NotFound("device"))?;

    if let Some(name) = req.name {
        if name.trim().is_empty() {
            return Err(ApiError::Validation("nombre must not be empty".into()));
        }
        device.name = name;
    }
    if let Some(description) = req.description {
        device.description = Some(description);
    }
    if let Some(zone) = req.zone {
        if zone.trim().is_empty() {
            return Err(ApiError::Validation("ubicacion must not be empty".into()));
        }
        device.zone = zone;
    }
    if let Some(active) = req.active {
        device.active = active;
    }
    if let Some(unit) = req.unit {
        device.unit = Some(unit);
    }
    if let Some(min) = req.range_min {
        device.range_min = Some(min);
    }
    if let Some(max) = req.range_max {
        device.range_max = Some(max);
    }
    if let (Some(min), Some(max)) = (device.range_min, device.range_max) {
        if min > max {
            return Err(ApiError::Validation(
                "rangoMin must not exceed rangoMax".into(),
            ));
        }
    }

    let updated = DeviceRepo::update(&state.pool, &device).await?;
    Ok(Json(updated.into()))
}

#[utoipa::path(
    delete,
    path = "/api/dispositivos/{id}",
    params(("id" = i64, Path, description = "Device ID")),
    responses(
        (status = 204, description = "Device deleted"),
        (status = 404, description = "Device not found"),
    ),
    tag = "dispositivos"
)]
pub async fn delete_device(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if DeviceRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("device"))
    }
}
