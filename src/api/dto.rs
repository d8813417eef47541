//! Wire DTOs. JSON field names keep the Spanish contract the gateway and
//! frontend already speak; Rust identifiers stay English.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::models::{Alert, Device, DeviceKind, OperationMode, Reading, Threshold};
use crate::sim::CycleReport;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeviceDto {
    pub id: i64,
    #[serde(rename = "tipo")]
    pub kind: DeviceKind,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
    #[serde(rename = "ubicacion")]
    pub zone: String,
    #[serde(rename = "activo")]
    pub active: bool,
    #[serde(rename = "unidadMedida")]
    pub unit: Option<String>,
    #[serde(rename = "rangoMin")]
    pub range_min: Option<f64>,
    #[serde(rename = "rangoMax")]
    pub range_max: Option<f64>,
    #[serde(rename = "estado")]
    pub actuator_on: Option<bool>,
    #[serde(rename = "modoOperacion")]
    pub operation_mode: Option<OperationMode>,
    #[serde(rename = "fechaCreacion")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "fechaActualizacion")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Device> for DeviceDto {
    fn from(d: Device) -> Self {
        Self {
            id: d.id,
            kind: d.kind,
            name: d.name,
            description: d.description,
            zone: d.zone,
            active: d.active,
            unit: d.unit,
            range_min: d.range_min,
            range_max: d.range_max,
            actuator_on: d.actuator_on,
            operation_mode: d.op_mode,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDeviceRequest {
    #[serde(rename = "tipo")]
    pub kind: DeviceKind,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
    #[serde(rename = "ubicacion")]
    pub zone: String,
    #[serde(rename = "activo")]
    pub active: Option<bool>,
    #[serde(rename = "unidadMedida")]
    pub unit: Option<String>,
    #[serde(rename = "rangoMin")]
    pub range_min: Option<f64>,
    #[serde(rename = "rangoMax")]
    pub range_max: Option<f64>,
    #[serde(rename = "modoOperacion")]
    pub operation_mode: Option<OperationMode>,
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateDeviceRequest {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
    #[serde(rename = "ubicacion")]
    pub zone: Option<String>,
    #[serde(rename = "activo")]
    pub active: Option<bool>,
    #[serde(rename = "unidadMedida")]
    pub unit: Option<String>,
    #[serde(rename = "rangoMin")]
    pub range_min: Option<f64>,
    #[serde(rename = "rangoMax")]
    pub range_max: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadingDto {
    pub id: i64,
    #[serde(rename = "dispositivoId")]
    pub device_id: i64,
    #[serde(rename = "valor")]
    pub value: f64,
    #[serde(rename = "unidad")]
    pub unit: String,
    #[serde(rename = "fechaHora")]
    pub recorded_at: DateTime<Utc>,
}

impl From<Reading> for ReadingDto {
    fn from(r: Reading) -> Self {
        Self {
            id: r.id,
            device_id: r.device_id,
            value: r.value,
            unit: r.unit,
            recorded_at: r.recorded_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ThresholdDto {
    pub id: i64,
    #[serde(rename = "dispositivoId")]
    pub device_id: i64,
    #[serde(rename = "valorMin")]
    pub min_value: f64,
    #[serde(rename = "valorMax")]
    pub max_value: f64,
    #[serde(rename = "tipoAlerta")]
    pub alert_category: String,
    #[serde(rename = "activo")]
    pub active: bool,
    #[serde(rename = "fechaCreacion")]
    pub created_at: DateTime<Utc>,
}

impl From<Threshold> for ThresholdDto {
    fn from(t: Threshold) -> Self {
        Self {
            id: t.id,
            device_id: t.device_id,
            min_value: t.min_value,
            max_value: t.max_value,
            alert_category: t.alert_category,
            active: t.active,
            created_at: t.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateThresholdRequest {
    #[serde(rename = "dispositivoId")]
    pub device_id: i64,
    #[serde(rename = "valorMin")]
    pub min_value: f64,
    #[serde(rename = "valorMax")]
    pub max_value: f64,
    #[serde(rename = "tipoAlerta")]
    pub alert_category: String,
    #[serde(rename = "activo")]
    pub active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateThresholdRequest {
    #[serde(rename = "valorMin")]
    pub min_value: Option<f64>,
    #[serde(rename = "valorMax")]
    pub max_value: Option<f64>,
    #[serde(rename = "tipoAlerta")]
    pub alert_category: Option<String>,
    #[serde(rename = "activo")]
    pub active: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AlertDto {
    pub id: i64,
    #[serde(rename = "dispositivoId")]
    pub device_id: i64,
    #[serde(rename = "umbralId")]
    pub threshold_id: i64,
    #[serde(rename = "valorActual")]
    pub value: f64,
    #[serde(rename = "mensaje")]
    pub message: String,
    #[serde(rename = "activa")]
    pub active: bool,
    #[serde(rename = "fechaCreacion")]
    pub created_at: DateTime<Utc>,
}

impl From<Alert> for AlertDto {
    fn from(a: Alert) -> Self {
        Self {
            id: a.id,
            device_id: a.device_id,
            threshold_id: a.threshold_id,
            value: a.value,
            message: a.message,
            active: a.active,
            created_at: a.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetModeRequest {
    #[serde(rename = "modoOperacion")]
    pub mode: OperationMode,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SystemStatusDto {
    #[serde(rename = "totalDispositivos")]
    pub total_devices: i64,
    #[serde(rename = "sensores")]
    pub sensors: usize,
    #[serde(rename = "actuadores")]
    pub actuators: usize,
    #[serde(rename = "lecturasEnCache")]
    pub cached_readings: usize,
    #[serde(rename = "hora")]
    pub now: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CycleReportDto {
    #[serde(rename = "lecturasGeneradas")]
    pub readings: usize,
    #[serde(rename = "alertasGeneradas")]
    pub alerts: usize,
    #[serde(rename = "fallos")]
    pub failures: usize,
}

impl From<CycleReport> for CycleReportDto {
    fn from(r: CycleReport) -> Self {
        Self {
            readings: r.readings,
            alerts: r.alerts,
            failures: r.failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn device_dto_uses_spanish_field_names() {
        let dto = DeviceDto {
            id: 1,
            kind: DeviceKind::TemperatureSensor,
            name: "Temperatura Zona A".into(),
            description: None,
            zone: "Zona A".into(),
            active: true,
            unit: Some("°C".into()),
            range_min: Some(-10.0),
            range_max: Some(50.0),
            actuator_on: None,
            operation_mode: None,
            created_at: Utc::now(),
            updated_at: None,
        };
        let v = serde_json::to_value(&dto).unwrap();
        assert_eq!(v["tipo"], "SENSOR_TEMPERATURA");
        assert_eq!(v["nombre"], "Temperatura Zona A");
        assert_eq!(v["ubicacion"], "Zona A");
        assert_eq!(v["activo"], true);
        assert_eq!(v["unidadMedida"], "°C");
        assert!(v.get("name").is_none());
    }

    #[test]
    fn create_threshold_request_parses_gateway_payload() {
        let req: CreateThresholdRequest = serde_json::from_str(
            r#"{"dispositivoId": 4, "valorMin": 18.0, "valorMax": 28.0,
                "tipoAlerta": "TEMPERATURA_FUERA_RANGO"}"#,
        )
        .unwrap();
        assert_eq!(req.device_id, 4);
        assert_eq!(req.min_value, 18.0);
        assert_eq!(req.max_value, 28.0);
        assert!(req.active.is_none());
    }

    #[test]
    fn reading_dto_round_trips() {
        let dto = ReadingDto {
            id: 9,
            device_id: 4,
            value: 22.5,
            unit: "°C".into(),
            recorded_at: Utc::now(),
        };
        let v = serde_json::to_value(&dto).unwrap();
        assert_eq!(v["dispositivoId"], 4);
        assert_eq!(v["valor"], 22.5);
        assert_eq!(v["unidad"], "°C");
        assert!(v["fechaHora"].is_string());
    }

    #[test]
    fn set_mode_request_parses() {
        let req: SetModeRequest =
            serde_json::from_str(r#"{"modoOperacion": "MANUAL"}"#).unwrap();
        assert_eq!(req.mode, OperationMode::Manual);
    }
}
