use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Mirrors the `device_kind` Postgres enum.
///
/// The wire (JSON) names keep the discriminator values of the original
/// gateway contract, so existing clients keep deserializing devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "device_kind", rename_all = "snake_case")]
pub enum DeviceKind {
    #[serde(rename = "SENSOR_TEMPERATURA")]
    TemperatureSensor,
    #[serde(rename = "SENSOR_HUMEDAD")]
    HumiditySensor,
    #[serde(rename = "SENSOR_LUZ")]
    LightSensor,
    #[serde(rename = "ACTUADOR")]
    Actuator,
}

impl DeviceKind {
    /// Explicit kind check — replaces class-name substring matching in the
    /// system this service supersedes.
    pub fn is_sensor(self) -> bool {
        !matches!(self, DeviceKind::Actuator)
    }

    /// Measurement unit used when a sensor row carries no explicit unit.
    pub fn default_unit(self) -> &'static str {
        match self {
            DeviceKind::TemperatureSensor => "°C",
            DeviceKind::HumiditySensor => "%",
            DeviceKind::LightSensor => "lux",
            DeviceKind::Actuator => "unidad",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeviceKind::TemperatureSensor => "temperature_sensor",
            DeviceKind::HumiditySensor => "humidity_sensor",
            DeviceKind::LightSensor => "light_sensor",
            DeviceKind::Actuator => "actuator",
        };
        f.write_str(s)
    }
}

/// Mirrors the `operation_mode` Postgres enum (actuators only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "operation_mode", rename_all = "snake_case")]
pub enum OperationMode {
    #[serde(rename = "AUTOMATICO")]
    Automatic,
    #[serde(rename = "MANUAL")]
    Manual,
}

/// A registered greenhouse device. Sensor and actuator payloads live in
/// nullable columns selected by `kind` (tagged union over one table).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Device {
    pub id: i64,
    pub kind: DeviceKind,
    pub name: String,
    pub description: Option<String>,
    pub zone: String,
    pub active: bool,
    pub unit: Option<String>,
    /// Operating range of the physical sensor (temperature sensors).
    pub range_min: Option<f64>,
    pub range_max: Option<f64>,
    pub actuator_on: Option<bool>,
    pub op_mode: Option<OperationMode>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Append-only sensor observation.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Reading {
    pub id: i64,
    pub device_id: i64,
    pub value: f64,
    pub unit: String,
    pub recorded_at: DateTime<Utc>,
}

/// Configured acceptable value range for a device. `min_value <= max_value`
/// holds for every stored row (rejected at write time, backed by a CHECK).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Threshold {
    pub id: i64,
    pub device_id: i64,
    pub min_value: f64,
    pub max_value: f64,
    pub alert_category: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Record of a threshold violation. Created active; there is no resolution
/// workflow.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Alert {
    pub id: i64,
    pub device_id: i64,
    pub threshold_id: i64,
    pub value: f64,
    pub message: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensor_kinds_are_sensors() {
        assert!(DeviceKind::TemperatureSensor.is_sensor());
        assert!(DeviceKind::HumiditySensor.is_sensor());
        assert!(DeviceKind::LightSensor.is_sensor());
        assert!(!DeviceKind::Actuator.is_sensor());
    }

    #[test]
    fn kind_wire_names_match_gateway_contract() {
        let json = serde_json::to_string(&DeviceKind::TemperatureSensor).unwrap();
        assert_eq!(json, "\"SENSOR_TEMPERATURA\"");
        let kind: DeviceKind = serde_json::from_str("\"ACTUADOR\"").unwrap();
        assert_eq!(kind, DeviceKind::Actuator);
    }

    #[test]
    fn operation_mode_wire_names() {
        let json = serde_json::to_string(&OperationMode::Automatic).unwrap();
        assert_eq!(json, "\"AUTOMATICO\"");
        let mode: OperationMode = serde_json::from_str("\"MANUAL\"").unwrap();
        assert_eq!(mode, OperationMode::Manual);
    }
}
