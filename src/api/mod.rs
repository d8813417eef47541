pub mod dto;
pub mod errors;
pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

use crate::{events::EventsClient, reading_cache::ReadingCache, sim::Simulator};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub cache: ReadingCache,
    pub events: EventsClient,
    pub simulator: Arc<Simulator>,
}

pub fn router(state: AppState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .route(
            "/api/dispositivos",
            get(handlers::devices::list_devices).post(handlers::devices::create_device),
        )
        .route(
            "/api/dispositivos/{id}",
            get(handlers::devices::get_device)
                .put(handlers::devices::update_device)
                .delete(handlers::devices::delete_device),
        )
        .route("/api/actuadores", get(handlers::actuators::list_actuators))
        .route("/api/actuadores/{id}", get(handlers::actuators::get_actuator))
        .route(
            "/api/actuadores/{id}/activar",
            post(handlers::actuators::activate_actuator),
        )
        .route(
            "/api/actuadores/{id}/desactivar",
            post(handlers::actuators::deactivate_actuator),
        )
        .route(
            "/api/actuadores/{id}/modo",
            put(handlers::actuators::set_operation_mode),
        )
        .route("/api/lecturas/actuales", get(handlers::readings::latest_readings))
        .route(
            "/api/lecturas/dispositivo/{dispositivo_id}",
            get(handlers::readings::device_history),
        )
        .route(
            "/api/lecturas/dispositivo/{dispositivo_id}/ultimas/{n}",
            get(handlers::readings::device_last_n),
        )
        .route("/api/umbrales", post(handlers::thresholds::create_threshold))
        .route(
            "/api/umbrales/{id}",
            get(handlers::thresholds::get_threshold)
                .put(handlers::thresholds::update_threshold)
                .delete(handlers::thresholds::deactivate_threshold),
        )
        .route(
            "/api/umbrales/dispositivo/{dispositivo_id}",
            get(handlers::thresholds::thresholds_for_device),
        )
        .route("/api/alertas", get(handlers::alerts::list_active_alerts))
        .route(
            "/api/alertas/umbrales",
            post(handlers::alerts::configure_threshold),
        )
        .route(
            "/api/alertas/dispositivo/{dispositivo_id}",
            get(handlers::alerts::alerts_for_device),
        )
        .route(
            "/api/alertas/dispositivo/{dispositivo_id}/umbrales",
            get(handlers::alerts::thresholds_for_device),
        )
        .route("/api/debug/estado", get(handlers::debug::system_status))
        .route("/api/debug/sensores", get(handlers::debug::list_sensors))
        .route(
            "/api/debug/forzar-lecturas",
            post(handlers::debug::force_readings),
        )
        .route(
            "/api/debug/logs-sensores",
            get(handlers::debug::sensor_logs),
        )
        .with_state(state)
        .split_for_parts();

    router.route(
        "/api-docs/openapi.json",
        get(move || async move { axum::Json(api) }),
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::devices::list_devices,
        handlers::devices::get_device,
        handlers::devices::create_device,
        handlers::devices::update_device,
        handlers::devices::delete_device,
        handlers::actuators::list_actuators,
        handlers::actuators::get_actuator,
        handlers::actuators::activate_actuator,
        handlers::actuators::deactivate_actuator,
        handlers::actuators::set_operation_mode,
        handlers::readings::latest_readings,
        handlers::readings::device_history,
        handlers::readings::device_last_n,
        handlers::thresholds::create_threshold,
        handlers::thresholds::get_threshold,
        handlers::thresholds::thresholds_for_device,
        handlers::thresholds::update_threshold,
        handlers::thresholds::deactivate_threshold,
        handlers::alerts::configure_threshold,
        handlers::alerts::thresholds_for_device,
        handlers::alerts::list_active_alerts,
        handlers::alerts::alerts_for_device,
        handlers::debug::system_status,
        handlers::debug::list_sensors,
        handlers::debug::force_readings,
        handlers::debug::sensor_logs,
    ),
    components(schemas(
        dto::DeviceDto,
        dto::CreateDeviceRequest,
        dto::UpdateDeviceRequest,
        dto::ReadingDto,
        dto::ThresholdDto,
        dto::CreateThresholdRequest,
        dto::UpdateThresholdRequest,
        dto::AlertDto,
        dto::SetModeRequest,
        dto::SystemStatusDto,
        dto::CycleReportDto,
        crate::db::models::DeviceKind,
        crate::db::models::OperationMode,
    )),
    tags(
        (name = "dispositivos", description = "Device registry"),
        (name = "actuadores", description = "Actuator control"),
        (name = "lecturas", description = "Sensor reading history"),
        (name = "umbrales", description = "Threshold configuration"),
        (name = "alertas", description = "Alerts and threshold aliases"),
        (name = "debug", description = "Inspection and manual triggers"),
    ),
    info(
        title = "Greenhouse Backend API",
        version = "0.1.0",
        description = "REST API for greenhouse device management, simulated readings and alerts"
    )
)]
pub struct ApiDoc;
