//! Best-effort event notifications to the external analytics service.
//!
//! Delivery failures are logged and swallowed — notifying must never
//! interrupt the polling loop or a request handler.

use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::Config;

/// Event type sent when a reading violates a threshold.
pub const EVENT_ALERT_TRIGGERED: &str = "ALERTA_GENERADA";
/// Event type sent when an actuator changes state or mode.
pub const EVENT_ACTUATOR_CHANGED: &str = "CAMBIO_ACTUADOR";

/// Wire envelope consumed by the analytics service at `/api/v1/eventos`.
#[derive(Debug, Serialize)]
struct EventEnvelope<'a> {
    id: String,
    tipo: &'a str,
    datos: serde_json::Value,
}

#[derive(Clone)]
pub struct EventsClient {
    http: Client,
    base_url: String,
}

impl EventsClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: Client::new(),
            base_url: config.analytics_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Post one event envelope. Never returns an error; failed deliveries
    /// are only logged.
    pub async fn notify(&self, event_type: &str, payload: serde_json::Value) {
        let url = format!("{}/api/v1/eventos", self.base_url);
        let envelope = EventEnvelope {
            id: Uuid::new_v4().to_string(),
            tipo: event_type,
            datos: payload,
        };

        match self.http.post(&url).json(&envelope).send().await {
            Ok(resp) if resp.status().is_success() => {
                debug!(event_type = %event_type, "Event delivered to analytics service");
            }
            Ok(resp) => {
                warn!(
                    event_type = %event_type,
                    status = %resp.status(),
                    "Analytics service rejected event"
                );
            }
            Err(e) => {
                warn!(event_type = %event_type, error = %e, "Failed to deliver event");
            }
        }
    }
}
