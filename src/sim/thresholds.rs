//! Threshold evaluation and the per-kind default presets.

use crate::db::models::{DeviceKind, Threshold};

pub const TEMPERATURE_OUT_OF_RANGE: &str = "TEMPERATURA_FUERA_RANGO";
pub const HUMIDITY_OUT_OF_RANGE: &str = "HUMEDAD_FUERA_RANGO";
pub const LIGHT_OUT_OF_RANGE: &str = "LUZ_FUERA_RANGO";
pub const VALUE_OUT_OF_RANGE: &str = "VALOR_FUERA_RANGO";

/// Every active threshold violated by `value`. One alert is emitted per
/// returned threshold; an in-range value returns an empty slice.
pub fn violated(value: f64, thresholds: &[Threshold]) -> Vec<&Threshold> {
    thresholds
        .iter()
        .filter(|t| value < t.min_value || value > t.max_value)
        .collect()
}

/// Default threshold installed at seeding time for sensors without one.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdPreset {
    pub min_value: f64,
    pub max_value: f64,
    pub alert_category: &'static str,
}

pub fn default_preset(kind: DeviceKind) -> ThresholdPreset {
    match kind {
        DeviceKind::TemperatureSensor => ThresholdPreset {
            min_value: 18.0,
            max_value: 28.0,
            alert_category: TEMPERATURE_OUT_OF_RANGE,
        },
        DeviceKind::HumiditySensor => ThresholdPreset {
            min_value: 40.0,
            max_value: 70.0,
            alert_category: HUMIDITY_OUT_OF_RANGE,
        },
        DeviceKind::LightSensor => ThresholdPreset {
            min_value: 200.0,
            max_value: 800.0,
            alert_category: LIGHT_OUT_OF_RANGE,
        },
        DeviceKind::Actuator => ThresholdPreset {
            min_value: 0.0,
            max_value: 100.0,
            alert_category: VALUE_OUT_OF_RANGE,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn threshold(id: i64, min: f64, max: f64) -> Threshold {
        Threshold {
            id,
            device_id: 1,
            min_value: min,
            max_value: max,
            alert_category: TEMPERATURE_OUT_OF_RANGE.to_owned(),
            active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn value_above_max_violates() {
        let ts = vec![threshold(1, 18.0, 28.0)];
        let hits = violated(35.0, &ts);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);
    }

    #[test]
    fn value_below_min_violates() {
        let ts = vec![threshold(1, 18.0, 28.0)];
        assert_eq!(violated(10.0, &ts).len(), 1);
    }

    #[test]
    fn in_range_value_yields_no_violations() {
        let ts = vec![threshold(1, 18.0, 28.0)];
        assert!(violated(22.0, &ts).is_empty());
        // Boundary values are in range.
        assert!(violated(18.0, &ts).is_empty());
        assert!(violated(28.0, &ts).is_empty());
    }

    #[test]
    fn each_violated_threshold_is_reported_once() {
        let ts = vec![threshold(1, 18.0, 28.0), threshold(2, 20.0, 25.0), threshold(3, 0.0, 100.0)];
        let hits = violated(35.0, &ts);
        let ids: Vec<i64> = hits.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn presets_match_greenhouse_defaults() {
        let p = default_preset(DeviceKind::TemperatureSensor);
        assert_eq!((p.min_value, p.max_value), (18.0, 28.0));
        assert_eq!(p.alert_category, TEMPERATURE_OUT_OF_RANGE);

        let p = default_preset(DeviceKind::HumiditySensor);
        assert_eq!((p.min_value, p.max_value), (40.0, 70.0));

        let p = default_preset(DeviceKind::LightSensor);
        assert_eq!((p.min_value, p.max_value), (200.0, 800.0));
        assert_eq!(default_preset(DeviceKind::Actuator).alert_category, VALUE_OUT_OF_RANGE);
    }
}
