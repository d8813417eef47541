//! Simulated sensor value generation.
//!
//! A device with a configured threshold yields values inside that range;
//! without one, a kind-specific fallback range applies. Generation never
//! fails — missing configuration degrades to the fallback, not to an error.

use rand::Rng;

use crate::db::models::DeviceKind;

/// Uniformly sample a plausible value for a device.
///
/// `range` is the `[min, max]` of the effective threshold, if any. A range
/// with `min > max` cannot be stored, but a defensively passed one falls
/// through to the fallback rather than panicking in `gen_range`.
pub fn sample_value(range: Option<(f64, f64)>, kind: DeviceKind, rng: &mut impl Rng) -> f64 {
    match range {
        Some((min, max)) if min <= max => rng.gen_range(min..=max),
        _ => fallback_value(kind, rng),
    }
}

/// Kind-specific default range used when no threshold is configured.
pub fn fallback_value(kind: DeviceKind, rng: &mut impl Rng) -> f64 {
    match kind {
        DeviceKind::TemperatureSensor => rng.gen_range(15.0..35.0),
        DeviceKind::HumiditySensor => rng.gen_range(30.0..80.0),
        DeviceKind::LightSensor => rng.gen_range(0.0..1000.0),
        DeviceKind::Actuator => rng.gen_range(0.0..100.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn values_stay_inside_configured_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let v = sample_value(Some((18.0, 28.0)), DeviceKind::TemperatureSensor, &mut rng);
            assert!((18.0..=28.0).contains(&v), "out of range: {v}");
        }
    }

    #[test]
    fn degenerate_range_is_a_fixed_point() {
        let mut rng = StdRng::seed_from_u64(7);
        let v = sample_value(Some((21.5, 21.5)), DeviceKind::TemperatureSensor, &mut rng);
        assert_eq!(v, 21.5);
    }

    #[test]
    fn inverted_range_falls_back_to_kind_default() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            let v = sample_value(Some((50.0, 10.0)), DeviceKind::HumiditySensor, &mut rng);
            assert!((30.0..80.0).contains(&v), "out of fallback range: {v}");
        }
    }

    #[test]
    fn fallback_ranges_per_kind() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..200 {
            let t = sample_value(None, DeviceKind::TemperatureSensor, &mut rng);
            assert!((15.0..35.0).contains(&t));
            let h = sample_value(None, DeviceKind::HumiditySensor, &mut rng);
            assert!((30.0..80.0).contains(&h));
            let l = sample_value(None, DeviceKind::LightSensor, &mut rng);
            assert!((0.0..1000.0).contains(&l));
            let g = sample_value(None, DeviceKind::Actuator, &mut rng);
            assert!((0.0..100.0).contains(&g));
        }
    }
}
