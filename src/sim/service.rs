//! The reading simulation loop: generate, persist, check thresholds, alert.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use serde_json::json;
use sqlx::PgPool;
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::db::models::Device;
use crate::db::repos::{AlertRepo, DeviceRepo, ReadingRepo, ThresholdRepo};
use crate::events::{EventsClient, EVENT_ALERT_TRIGGERED};
use crate::reading_cache::ReadingCache;

use super::{generator, thresholds};

/// Lines kept in the in-memory cycle log served by the debug endpoint.
const CYCLE_LOG_CAPACITY: usize = 200;

/// Outcome of one simulation cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub readings: usize,
    pub alerts: usize,
    pub failures: usize,
}

/// Bounded ring of recent simulation log lines, dumped by
/// `GET /api/debug/logs-sensores`.
#[derive(Default)]
struct CycleLog {
    lines: Mutex<VecDeque<String>>,
}

impl CycleLog {
    // The log is purely diagnostic: recover from a poisoned lock rather
    // than taking the simulation task down with it.
    fn push(&self, line: String) {
        let mut lines = self
            .lines
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if lines.len() == CYCLE_LOG_CAPACITY {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    fn dump(&self) -> String {
        let lines = self
            .lines
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        lines.iter().cloned().collect::<Vec<_>>().join("\n")
    }
}

pub struct Simulator {
    pool: PgPool,
    cache: ReadingCache,
    events: EventsClient,
    log: CycleLog,
}

impl Simulator {
    pub fn new(pool: PgPool, cache: ReadingCache, events: EventsClient) -> Self {
        Self {
            pool,
            cache,
            events,
            log: CycleLog::default(),
        }
    }

    /// Runs the simulation loop indefinitely. Spawn this via `tokio::spawn`.
    ///
    /// A slow cycle delays the next tick instead of bursting to catch up
    /// (`MissedTickBehavior::Delay`), so cycles never overlap.
    pub async fn run(self: Arc<Self>, interval: Duration) {
        info!(interval_secs = interval.as_secs(), "Reading simulation loop started");
        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match self.run_cycle().await {
                Ok(report) => info!(
                    readings = report.readings,
                    alerts = report.alerts,
                    failures = report.failures,
                    "Simulation cycle complete"
                ),
                Err(e) => error!(error = %e, "Simulation cycle failed"),
            }
        }
    }

    /// One pass over every active sensor. Each device is handled in
    /// isolation: a failure is logged and counted, and the remaining
    /// devices still get their reading.
    pub async fn run_cycle(&self) -> Result<CycleReport> {
        let sensors = DeviceRepo::find_active_sensors(&self.pool).await?;
        let mut report = CycleReport::default();

        for device in &sensors {
            match self.record_reading(device).await {
                Ok(alerts) => {
                    report.readings += 1;
                    report.alerts += alerts;
                }
                Err(e) => {
                    report.failures += 1;
                    error!(device_id = device.id, error = %e, "Failed to record reading");
                    self.log
                        .push(format!("ERROR {} (device {}): {e}", device.name, device.id));
                }
            }
        }

        self.log.push(format!(
            "cycle: {} readings, {} alerts, {} failures over {} active sensors",
            report.readings,
            report.alerts,
            report.failures,
            sensors.len()
        ));
        Ok(report)
    }

    /// Generate and persist one reading for `device`, then evaluate its
    /// active thresholds. Returns the number of alerts emitted.
    async fn record_reading(&self, device: &Device) -> Result<usize> {
        let effective = ThresholdRepo::latest_active(&self.pool, device.id).await?;
        let value = {
            // Local rng, dropped before the next await point.
            let mut rng = rand::thread_rng();
            generator::sample_value(
                effective.as_ref().map(|t| (t.min_value, t.max_value)),
                device.kind,
                &mut rng,
            )
        };

        let unit = device
            .unit
            .clone()
            .unwrap_or_else(|| device.kind.default_unit().to_owned());
        let reading = ReadingRepo::insert(&self.pool, device.id, value, &unit).await?;
        self.log.push(format!(
            "{}: {:.2} {} (device {})",
            device.name, value, unit, device.id
        ));
        self.cache.update(reading).await;

        let active = ThresholdRepo::active_for_device(&self.pool, device.id).await?;
        let mut alerts = 0;
        for threshold in thresholds::violated(value, &active) {
            let message = format!(
                "{} value {:.2} outside range [{} - {}]",
                device.name, value, threshold.min_value, threshold.max_value
            );
            let alert = AlertRepo::create(&self.pool, device.id, threshold.id, value, &message)
                .await?;
            warn!(
                device_id = device.id,
                threshold_id = threshold.id,
                value,
                category = %threshold.alert_category,
                "Threshold violated"
            );
            self.log.push(format!("ALERT {message}"));

            self.events
                .notify(
                    EVENT_ALERT_TRIGGERED,
                    json!({
                        "alertaId": alert.id,
                        "dispositivoId": device.id,
                        "umbralId": threshold.id,
                        "valor": value,
                        "tipoAlerta": threshold.alert_category,
                        "mensaje": message,
                    }),
                )
                .await;
            alerts += 1;
        }

        Ok(alerts)
    }

    /// Recent simulation log lines, oldest first.
    pub fn log_dump(&self) -> String {
        self.log.dump()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::Config;
    use crate::db::models::DeviceKind;
    use crate::db::repos::NewDevice;

    fn test_events() -> EventsClient {
        // Unroutable analytics endpoint: deliveries fail fast and are
        // swallowed, which is exactly the production contract.
        EventsClient::new(&Config {
            database_url: String::new(),
            server_host: "127.0.0.1".to_owned(),
            server_port: 0,
            poll_interval_secs: 10,
            analytics_url: "http://127.0.0.1:1".to_owned(),
            seed_demo_devices: false,
        })
    }

    fn simulator(pool: PgPool) -> Simulator {
        Simulator::new(pool, ReadingCache::new(), test_events())
    }

    async fn insert_device(
        pool: &PgPool,
        name: &str,
        kind: DeviceKind,
        active: bool,
    ) -> Device {
        DeviceRepo::create(
            pool,
            &NewDevice {
                kind,
                name: name.to_owned(),
                description: None,
                zone: "Zona A".to_owned(),
                active,
                unit: kind.is_sensor().then(|| kind.default_unit().to_owned()),
                range_min: None,
                range_max: None,
                actuator_on: (!kind.is_sensor()).then_some(false),
                op_mode: None,
            },
        )
        .await
        .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn cycle_persists_one_reading_per_active_sensor(pool: PgPool) {
        insert_device(&pool, "Temperatura Zona A", DeviceKind::TemperatureSensor, true).await;
        insert_device(&pool, "Humedad Zona A", DeviceKind::HumiditySensor, true).await;
        insert_device(&pool, "Luz Zona A", DeviceKind::LightSensor, true).await;
        // Neither the inactive sensor nor the active actuator gets a reading.
        insert_device(&pool, "Temperatura Zona B", DeviceKind::TemperatureSensor, false).await;
        insert_device(&pool, "Riego Zona A", DeviceKind::Actuator, true).await;

        let sim = simulator(pool.clone());
        let report = sim.run_cycle().await.unwrap();

        assert_eq!(report.readings, 3);
        assert_eq!(report.alerts, 0);
        assert_eq!(report.failures, 0);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM readings")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 3);
        assert_eq!(sim.cache.len().await, 3);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn cycle_samples_inside_the_configured_threshold(pool: PgPool) {
        let device =
            insert_device(&pool, "Temperatura Zona A", DeviceKind::TemperatureSensor, true).await;
        ThresholdRepo::create(&pool, device.id, 18.0, 28.0, "TEMPERATURA_FUERA_RANGO", true)
            .await
            .unwrap();

        let sim = simulator(pool.clone());
        let report = sim.run_cycle().await.unwrap();
        assert_eq!(report.readings, 1);
        assert_eq!(report.alerts, 0);

        let reading = ReadingRepo::last_n(&pool, device.id, 1)
            .await
            .unwrap()
            .pop()
            .unwrap();
        assert!(
            (18.0..=28.0).contains(&reading.value),
            "generated value outside threshold: {}",
            reading.value
        );
        assert_eq!(reading.unit, "°C");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn out_of_range_value_persists_one_alert_per_violated_threshold(pool: PgPool) {
        let device =
            insert_device(&pool, "Temperatura Zona A", DeviceKind::TemperatureSensor, true).await;
        let older =
            ThresholdRepo::create(&pool, device.id, 0.0, 50.0, "TEMPERATURA_FUERA_RANGO", true)
                .await
                .unwrap();
        // Created last, so the generator samples from it: a fixed point
        // above the older threshold's range.
        ThresholdRepo::create(&pool, device.id, 100.0, 100.0, "TEMPERATURA_FUERA_RANGO", true)
            .await
            .unwrap();

        let report = simulator(pool.clone()).run_cycle().await.unwrap();
        assert_eq!(report.readings, 1);
        assert_eq!(report.alerts, 1);

        let alerts = AlertRepo::for_device(&pool, device.id).await.unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].threshold_id, older.id);
        assert_eq!(alerts[0].value, 100.0);
        assert!(alerts[0].active);
    }

    #[test]
    fn cycle_log_caps_at_capacity() {
        let log = CycleLog::default();
        for i in 0..CYCLE_LOG_CAPACITY + 25 {
            log.push(format!("line {i}"));
        }
        let dump = log.dump();
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), CYCLE_LOG_CAPACITY);
        // Oldest lines were evicted.
        assert_eq!(lines[0], "line 25");
        assert_eq!(*lines.last().unwrap(), format!("line {}", CYCLE_LOG_CAPACITY + 24));
    }

    #[test]
    fn empty_log_dumps_empty_string() {
        let log = CycleLog::default();
        assert_eq!(log.dump(), "");
    }
}
