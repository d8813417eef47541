use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;

use crate::db::models::Reading;

/// In-memory store of the most recent `Reading` per device.
///
/// Wrapped in `Arc` so it can be cheaply cloned and shared between the
/// polling loop and HTTP handlers. Uses a `tokio::sync::RwLock` so many
/// readers never block each other.
#[derive(Clone, Default)]
pub struct ReadingCache {
    inner: Arc<RwLock<HashMap<i64, Reading>>>,
}

impl ReadingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the cached reading for `reading.device_id`.
    pub async fn update(&self, reading: Reading) {
        self.inner.write().await.insert(reading.device_id, reading);
    }

    /// Return a snapshot of all latest readings, one per device.
    pub async fn all(&self) -> Vec<Reading> {
        let mut readings: Vec<Reading> = self.inner.read().await.values().cloned().collect();
        readings.sort_by_key(|r| r.device_id);
        readings
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Return the latest reading for a specific device, if present.
    #[allow(dead_code)]
    pub async fn get(&self, device_id: i64) -> Option<Reading> {
        self.inner.read().await.get(&device_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn reading(device_id: i64, value: f64) -> Reading {
        Reading {
            id: 0,
            device_id,
            value,
            unit: "°C".to_owned(),
            recorded_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn update_keeps_one_reading_per_device() {
        let cache = ReadingCache::new();
        cache.update(reading(1, 20.0)).await;
        cache.update(reading(1, 21.5)).await;
        cache.update(reading(2, 55.0)).await;

        assert_eq!(cache.len().await, 2);
        assert_eq!(cache.get(1).await.unwrap().value, 21.5);
        assert_eq!(cache.get(2).await.unwrap().value, 55.0);
    }

    #[tokio::test]
    async fn all_returns_snapshot_sorted_by_device() {
        let cache = ReadingCache::new();
        cache.update(reading(3, 1.0)).await;
        cache.update(reading(1, 2.0)).await;

        let all = cache.all().await;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].device_id, 1);
        assert_eq!(all[1].device_id, 3);
        assert!(cache.get(9).await.is_none());
    }
}
