use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::api::dto::{CreateThresholdRequest, ThresholdDto, UpdateThresholdRequest};
use crate::api::errors::ApiError;
use crate::api::AppState;
use crate::db::repos::{DeviceRepo, ThresholdRepo};

/// Shared by `POST /api/umbrales` and its `POST /api/alertas/umbrales`
/// alias.
pub async fn create_for_request(
    state: &AppState,
    req: CreateThresholdRequest,
) -> Result<ThresholdDto, ApiError> {
    if req.min_value > req.max_value {
        return Err(ApiError::Validation(
            "valorMin must not exceed valorMax".into(),
        ));
    }
    DeviceRepo::find_by_id(&state.pool, req.device_id)
        .await?
        .ok_or(ApiError::NotFound("device"))?;

    let threshold = ThresholdRepo::create(
        &state.pool,
        req.device_id,
        req.min_value,
        req.max_value,
        &req.alert_category,
        req.active.unwrap_or(true),
    )
    .await?;
    Ok(threshold.into())
}

#[utoipa::path(
    post,
    path = "/api/umbrales",
    request_body = CreateThresholdRequest,
    responses(
        (status = 201, description = "Threshold created", body = ThresholdDto),
        (status = 400, description = "valorMin exceeds valorMax"),
        (status = 404, description = "Device not found"),
    ),
    tag = "umbrales"
)]
pub async fn create_threshold(
    State(state): State<AppState>,
    Json(req): Json<CreateThresholdRequest>,
) -> Result<(StatusCode, Json<ThresholdDto>), ApiError> {
    let dto = create_for_request(&state, req).await?;
    Ok((StatusCode::CREATED, Json(dto)))
}

#[utoipa::path(
    get,
    path = "/api/umbrales/{id}",
    params(("id" = i64, Path, description = "Threshold ID")),
    responses(
        (status = 200, description = "Threshold", body = ThresholdDto),
        (status = 404, description = "Threshold not found"),
    ),
    tag = "umbrales"
)]
pub async fn get_threshold(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ThresholdDto>, ApiError> {
    let threshold = ThresholdRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(ApiError::NotFound("threshold"))?;
    Ok(Json(threshold.into()))
}

#[utoipa::path(
    get,
    path = "/api/umbrales/dispositivo/{dispositivo_id}",
    params(("dispositivo_id" = i64, Path, description = "Device ID")),
    responses(
        (status = 200, description = "Thresholds for the device", body = Vec<ThresholdDto>),
    ),
    tag = "umbrales"
)]
pub async fn thresholds_for_device(
    State(state): State<AppState>,
    Path(device_id): Path<i64>,
) -> Result<Json<Vec<ThresholdDto>>, ApiError> {
    let thresholds = ThresholdRepo::for_device(&state.pool, device_id).await?;
    Ok(Json(thresholds.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    put,
    path = "/api/umbrales/{id}",
    params(("id" = i64, Path, description = "Threshold ID")),
    request_body = UpdateThresholdRequest,
    responses(
        (status = 200, description = "Updated threshold", body = ThresholdDto),
        (status = 400, description = "valorMin exceeds valorMax"),
        (status = 404, description = "Threshold not found"),
    ),
    tag = "umbrales"
)]
pub async fn update_threshold(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateThresholdRequest>,
) -> Result<Json<ThresholdDto>, ApiError> {
    let current = ThresholdRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(ApiError::NotFound("threshold"))?;

    let min_value = req.min_value.unwrap_or(current.min_value);
    let max_value = req.max_value.unwrap_or(current.max_value);
    if min_value > max_value {
        return Err(ApiError::Validation(
            "valorMin must not exceed valorMax".into(),
        ));
    }
    let alert_category = req.alert_category.unwrap_or(current.alert_category);
    let active = req.active.unwrap_or(current.active);

    let updated = ThresholdRepo::update(&state.pool, id, min_value, max_value, &alert_category, active)
        .await?
        .ok_or(ApiError::NotFound("threshold"))?;
    Ok(Json(updated.into()))
}

/// Deactivate, never delete. Repeating the call on an already-inactive
/// threshold succeeds unchanged.
#[utoipa::path(
    delete,
    path = "/api/umbrales/{id}",
    params(("id" = i64, Path, description = "Threshold ID")),
    responses(
        (status = 200, description = "Threshold deactivated", body = ThresholdDto),
        (status = 404, description = "Threshold not found"),
    ),
    tag = "umbrales"
)]
pub async fn deactivate_threshold(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ThresholdDto>, ApiError> {
    let threshold = ThresholdRepo::deactivate(&state.pool, id)
        .await?
        .ok_or(ApiError::NotFound("threshold"))?;
    Ok(Json(threshold.into()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum_test::TestServer;
    use serde_json::Value;
    use sqlx::PgPool;

    use crate::api::{router, AppState};
    use crate::config::Config;
    use crate::db::models::DeviceKind;
    use crate::db::repos::{DeviceRepo, NewDevice, ThresholdRepo};
    use crate::events::EventsClient;
    use crate::reading_cache::ReadingCache;
    use crate::sim::Simulator;

    fn test_server(pool: PgPool) -> TestServer {
        let events = EventsClient::new(&Config {
            database_url: String::new(),
            server_host: "127.0.0.1".to_owned(),
            server_port: 0,
            poll_interval_secs: 10,
            analytics_url: "http://127.0.0.1:1".to_owned(),
            seed_demo_devices: false,
        });
        let cache = ReadingCache::new();
        let simulator = Arc::new(Simulator::new(pool.clone(), cache.clone(), events.clone()));
        TestServer::new(router(AppState {
            pool,
            cache,
            events,
            simulator,
        }))
        .unwrap()
    }

    async fn insert_sensor(pool: &PgPool) -> i64 {
        DeviceRepo::create(
            pool,
            &NewDevice {
                kind: DeviceKind::TemperatureSensor,
                name: "Temperatura Zona A".to_owned(),
                description: None,
                zone: "Zona A".to_owned(),
                active: true,
                unit: Some("°C".to_owned()),
                range_min: None,
                range_max: None,
                actuator_on: None,
                op_mode: None,
            },
        )
        .await
        .unwrap()
        .id
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn deactivate_twice_leaves_state_unchanged(pool: PgPool) {
        let device_id = insert_sensor(&pool).await;
        let threshold =
            ThresholdRepo::create(&pool, device_id, 18.0, 28.0, "TEMPERATURA_FUERA_RANGO", true)
                .await
                .unwrap();

        let server = test_server(pool.clone());

        let resp = server.delete(&format!("/api/umbrales/{}", threshold.id)).await;
        resp.assert_status_ok();
        let body: Value = resp.json();
        assert_eq!(body["activo"], false);

        // Repeating the call on the now-inactive threshold succeeds and
        // reports the same state.
        let resp = server.delete(&format!("/api/umbrales/{}", threshold.id)).await;
        resp.assert_status_ok();
        let body: Value = resp.json();
        assert_eq!(body["activo"], false);
        assert_eq!(body["valorMin"], 18.0);
        assert_eq!(body["valorMax"], 28.0);

        let stored = ThresholdRepo::find_by_id(&pool, threshold.id)
            .await
            .unwrap()
            .unwrap();
        assert!(!stored.active);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn deactivate_missing_threshold_is_not_found(pool: PgPool) {
        let server = test_server(pool);
        let resp = server.delete("/api/umbrales/9999").await;
        resp.assert_status_not_found();
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn inverted_range_is_rejected_and_not_stored(pool: PgPool) {
        let device_id = insert_sensor(&pool).await;
        let server = test_server(pool.clone());

        let resp = server
            .post("/api/umbrales")
            .json(&serde_json::json!({
                "dispositivoId": device_id,
                "valorMin": 30.0,
                "valorMax": 20.0,
                "tipoAlerta": "TEMPERATURA_FUERA_RANGO",
            }))
            .await;
        resp.assert_status_bad_request();

        assert!(ThresholdRepo::for_device(&pool, device_id)
            .await
            .unwrap()
            .is_empty());
    }
}
