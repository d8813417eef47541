//! Runtime-checked sqlx repositories for the greenhouse tables.

use sqlx::PgPool;

use super::models::{Alert, Device, DeviceKind, OperationMode, Reading, Threshold};

/// Column list for devices queries.
const DEVICE_COLUMNS: &str = "id, kind, name, description, zone, active, unit, \
    range_min, range_max, actuator_on, op_mode, created_at, updated_at";

/// Column list for readings queries.
const READING_COLUMNS: &str = "id, device_id, value, unit, recorded_at";

/// Column list for thresholds queries.
const THRESHOLD_COLUMNS: &str =
    "id, device_id, min_value, max_value, alert_category, active, created_at";

/// Column list for alerts queries.
const ALERT_COLUMNS: &str = "id, device_id, threshold_id, value, message, active, created_at";

/// Insert payload for a new device.
#[derive(Debug, Clone)]
pub struct NewDevice {
    pub kind: DeviceKind,
    pub name: String,
    pub description: Option<String>,
    pub zone: String,
    pub active: bool,
    pub unit: Option<String>,
    pub range_min: Option<f64>,
    pub range_max: Option<f64>,
    pub actuator_on: Option<bool>,
    pub op_mode: Option<OperationMode>,
}

/// Provides CRUD operations for devices.
pub struct DeviceRepo;

impl DeviceRepo {
    pub async fn create(pool: &PgPool, input: &NewDevice) -> Result<Device, sqlx::Error> {
        let query = format!(
            "INSERT INTO devices
                (kind, name, description, zone, active, unit,
                 range_min, range_max, actuator_on, op_mode)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {DEVICE_COLUMNS}"
        );
        sqlx::query_as::<_, Device>(&query)
            .bind(input.kind)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.zone)
            .bind(input.active)
            .bind(&input.unit)
            .bind(input.range_min)
            .bind(input.range_max)
            .bind(input.actuator_on)
            .bind(input.op_mode)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Device>, sqlx::Error> {
        let query = format!("SELECT {DEVICE_COLUMNS} FROM devices WHERE id = $1");
        sqlx::query_as::<_, Device>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_all(pool: &PgPool) -> Result<Vec<Device>, sqlx::Error> {
        let query = format!("SELECT {DEVICE_COLUMNS} FROM devices ORDER BY id ASC");
        sqlx::query_as::<_, Device>(&query).fetch_all(pool).await
    }

    pub async fn list_by_kind(
        pool: &PgPool,
        kind: DeviceKind,
    ) -> Result<Vec<Device>, sqlx::Error> {
        let query = format!("SELECT {DEVICE_COLUMNS} FROM devices WHERE kind = $1 ORDER BY id ASC");
        sqlx::query_as::<_, Device>(&query)
            .bind(kind)
            .fetch_all(pool)
            .await
    }

    /// Devices the polling loop samples: every active non-actuator.
    pub async fn find_active_sensors(pool: &PgPool) -> Result<Vec<Device>, sqlx::Error> {
        let query = format!(
            "SELECT {DEVICE_COLUMNS} FROM devices
             WHERE active AND kind <> 'actuator'
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Device>(&query).fetch_all(pool).await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM devices")
            .fetch_one(pool)
            .await
    }

    /// Write back every mutable column of `device` and stamp `updated_at`.
    /// Callers merge partial updates into a fetched row first.
    pub async fn update(pool: &PgPool, device: &Device) -> Result<Device, sqlx::Error> {
        let query = format!(
            "UPDATE devices SET
                name = $2, description = $3, zone = $4, active = $5, unit = $6,
                range_min = $7, range_max = $8, actuator_on = $9, op_mode = $10,
                updated_at = now()
             WHERE id = $1
             RETURNING {DEVICE_COLUMNS}"
        );
        sqlx::query_as::<_, Device>(&query)
            .bind(device.id)
            .bind(&device.name)
            .bind(&device.description)
            .bind(&device.zone)
            .bind(device.active)
            .bind(&device.unit)
            .bind(device.range_min)
            .bind(device.range_max)
            .bind(device.actuator_on)
            .bind(device.op_mode)
            .fetch_one(pool)
            .await
    }

    /// Returns `true` if a row was deleted. Readings, thresholds and alerts
    /// cascade.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM devices WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Provides insert and history queries for readings.
pub struct ReadingRepo;

impl ReadingRepo {
    pub async fn insert(
        pool: &PgPool,
        device_id: i64,
        value: f64,
        unit: &str,
    ) -> Result<Reading, sqlx::Error> {
        let query = format!(
            "INSERT INTO readings (device_id, value, unit)
             VALUES ($1, $2, $3)
             RETURNING {READING_COLUMNS}"
        );
        sqlx::query_as::<_, Reading>(&query)
            .bind(device_id)
            .bind(value)
            .bind(unit)
            .fetch_one(pool)
            .await
    }

    /// Full history for a device, newest first, capped to keep responses
    /// bounded.
    pub async fn history(pool: &PgPool, device_id: i64) -> Result<Vec<Reading>, sqlx::Error> {
        let query = format!(
            "SELECT {READING_COLUMNS} FROM readings
             WHERE device_id = $1
             ORDER BY recorded_at DESC
             LIMIT 500"
        );
        sqlx::query_as::<_, Reading>(&query)
            .bind(device_id)
            .fetch_all(pool)
            .await
    }

    pub async fn last_n(
        pool: &PgPool,
        device_id: i64,
        n: i64,
    ) -> Result<Vec<Reading>, sqlx::Error> {
        let query = format!(
            "SELECT {READING_COLUMNS} FROM readings
             WHERE device_id = $1
             ORDER BY recorded_at DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, Reading>(&query)
            .bind(device_id)
            .bind(n)
            .fetch_all(pool)
            .await
    }
}

/// Provides CRUD operations for thresholds.
pub struct ThresholdRepo;

impl ThresholdRepo {
    pub async fn create(
        pool: &PgPool,
        device_id: i64,
        min_value: f64,
        max_value: f64,
        alert_category: &str,
        active: bool,
    ) -> Result<Threshold, sqlx::Error> {
        let query = format!(
            "INSERT INTO thresholds (device_id, min_value, max_value, alert_category, active)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {THRESHOLD_COLUMNS}"
        );
        sqlx::query_as::<_, Threshold>(&query)
            .bind(device_id)
            .bind(min_value)
            .bind(max_value)
            .bind(alert_category)
            .bind(active)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Threshold>, sqlx::Error> {
        let query = format!("SELECT {THRESHOLD_COLUMNS} FROM thresholds WHERE id = $1");
        sqlx::query_as::<_, Threshold>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn for_device(
        pool: &PgPool,
        device_id: i64,
    ) -> Result<Vec<Threshold>, sqlx::Error> {
        let query = format!(
            "SELECT {THRESHOLD_COLUMNS} FROM thresholds
             WHERE device_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Threshold>(&query)
            .bind(device_id)
            .fetch_all(pool)
            .await
    }

    pub async fn active_for_device(
        pool: &PgPool,
        device_id: i64,
    ) -> Result<Vec<Threshold>, sqlx::Error> {
        let query = format!(
            "SELECT {THRESHOLD_COLUMNS} FROM thresholds
             WHERE device_id = $1 AND active
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Threshold>(&query)
            .bind(device_id)
            .fetch_all(pool)
            .await
    }

    /// The threshold the reading generator samples from: most recently
    /// created active one (explicit precedence, at most one winner).
    pub async fn latest_active(
        pool: &PgPool,
        device_id: i64,
    ) -> Result<Option<Threshold>, sqlx::Error> {
        let query = format!(
            "SELECT {THRESHOLD_COLUMNS} FROM thresholds
             WHERE device_id = $1 AND active
             ORDER BY created_at DESC, id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, Threshold>(&query)
            .bind(device_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: i64,
        min_value: f64,
        max_value: f64,
        alert_category: &str,
        active: bool,
    ) -> Result<Option<Threshold>, sqlx::Error> {
        let query = format!(
            "UPDATE thresholds
             SET min_value = $2, max_value = $3, alert_category = $4, active = $5
             WHERE id = $1
             RETURNING {THRESHOLD_COLUMNS}"
        );
        sqlx::query_as::<_, Threshold>(&query)
            .bind(id)
            .bind(min_value)
            .bind(max_value)
            .bind(alert_category)
            .bind(active)
            .fetch_optional(pool)
            .await
    }

    /// Idempotent: deactivating an already-inactive threshold rewrites the
    /// same state and succeeds.
    pub async fn deactivate(pool: &PgPool, id: i64) -> Result<Option<Threshold>, sqlx::Error> {
        let query = format!(
            "UPDATE thresholds SET active = FALSE WHERE id = $1 RETURNING {THRESHOLD_COLUMNS}"
        );
        sqlx::query_as::<_, Threshold>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}

/// Provides insert and list queries for alerts.
pub struct AlertRepo;

impl AlertRepo {
    pub async fn create(
        pool: &PgPool,
        device_id: i64,
        threshold_id: i64,
        value: f64,
        message: &str,
    ) -> Result<Alert, sqlx::Error> {
        let query = format!(
            "INSERT INTO alerts (device_id, threshold_id, value, message)
             VALUES ($1, $2, $3, $4)
             RETURNING {ALERT_COLUMNS}"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(device_id)
            .bind(threshold_id)
            .bind(value)
            .bind(message)
            .fetch_one(pool)
            .await
    }

    pub async fn list_active(pool: &PgPool) -> Result<Vec<Alert>, sqlx::Error> {
        let query = format!(
            "SELECT {ALERT_COLUMNS} FROM alerts WHERE active ORDER BY created_at DESC LIMIT 500"
        );
        sqlx::query_as::<_, Alert>(&query).fetch_all(pool).await
    }

    pub async fn for_device(pool: &PgPool, device_id: i64) -> Result<Vec<Alert>, sqlx::Error> {
        let query = format!(
            "SELECT {ALERT_COLUMNS} FROM alerts
             WHERE device_id = $1
             ORDER BY created_at DESC
             LIMIT 500"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(device_id)
            .fetch_all(pool)
            .await
    }
}
