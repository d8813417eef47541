//! Startup seeding: demo devices per greenhouse zone and default thresholds
//! for sensors that have none.

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

use crate::db::models::{DeviceKind, OperationMode};
use crate::db::repos::{DeviceRepo, NewDevice, ThresholdRepo};
use crate::sim::thresholds;

const ZONES: [&str; 3] = ["A", "B", "C"];

/// Populate the registry with one sensor of each kind and the three standard
/// actuators per zone. Skipped when any device already exists.
pub async fn seed_demo_devices(pool: &PgPool) -> Result<()> {
    if DeviceRepo::count(pool).await? > 0 {
        info!("Device registry not empty; skipping demo seed");
        return Ok(());
    }

    for zone in ZONES {
        DeviceRepo::create(pool, &sensor(DeviceKind::TemperatureSensor, "Temperatura", zone))
            .await?;
        DeviceRepo::create(pool, &sensor(DeviceKind::HumiditySensor, "Humedad", zone)).await?;
        DeviceRepo::create(pool, &sensor(DeviceKind::LightSensor, "Luz", zone)).await?;

        DeviceRepo::create(pool, &actuator("Riego", zone)).await?;
        DeviceRepo::create(pool, &actuator("Ventilacion", zone)).await?;
        DeviceRepo::create(pool, &actuator("Iluminacion", zone)).await?;
    }

    let total = DeviceRepo::count(pool).await?;
    info!(devices = total, "Demo devices seeded");
    Ok(())
}

/// Install the kind-specific default threshold for every active sensor that
/// has no threshold yet. Safe to run on every startup.
pub async fn ensure_default_thresholds(pool: &PgPool) -> Result<()> {
    for device in DeviceRepo::find_active_sensors(pool).await? {
        if ThresholdRepo::for_device(pool, device.id).await?.is_empty() {
            let preset = thresholds::default_preset(device.kind);
            ThresholdRepo::create(
                pool,
                device.id,
                preset.min_value,
                preset.max_value,
                preset.alert_category,
                true,
            )
            .await?;
            info!(
                device_id = device.id,
                kind = %device.kind,
                min = preset.min_value,
                max = preset.max_value,
                "Default threshold created"
            );
        }
    }
    Ok(())
}

fn sensor(kind: DeviceKind, label: &str, zone: &str) -> NewDevice {
    NewDevice {
        kind,
        name: format!("{label} Zona {zone}"),
        description: Some(format!("Sensor de {} para zona {zone}", label.to_lowercase())),
        zone: format!("Zona {zone}"),
        active: true,
        unit: Some(kind.default_unit().to_owned()),
        // Physical operating range only applies to temperature sensors.
        range_min: (kind == DeviceKind::TemperatureSensor).then_some(-10.0),
        range_max: (kind == DeviceKind::TemperatureSensor).then_some(50.0),
        actuator_on: None,
        op_mode: None,
    }
}

fn actuator(label: &str, zone: &str) -> NewDevice {
    NewDevice {
        kind: DeviceKind::Actuator,
        name: format!("{label} Zona {zone}"),
        description: Some(format!("Actuador de {} para zona {zone}", label.to_lowercase())),
        zone: format!("Zona {zone}"),
        active: true,
        unit: None,
        range_min: None,
        range_max: None,
        actuator_on: Some(false),
        op_mode: Some(OperationMode::Automatic),
    }
}
