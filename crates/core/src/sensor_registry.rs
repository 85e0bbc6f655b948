//! Shared sensor registry

use log::warn;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use fleet_sens_types::{SensorRegistration, SensorStatus};

use crate::registry::{KeyRegistry, RegistryError};

/// Thread-safe registry of known sensors
///
/// Wraps a [`KeyRegistry`] in a single lock. Reads hand out clones so no
/// lock is held by callers.
#[derive(Default)]
pub struct SensorRegistry {
    inner: RwLock<KeyRegistry<SensorRegistration>>,
}

impl SensorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sensor; rejected if the id is already registered
    pub fn register(&self, registration: SensorRegistration) -> Result<(), RegistryError> {
        self.write().register(registration)
    }

    pub fn get(&self, id: &str) -> Option<SensorRegistration> {
        self.read().get(id).cloned()
    }

    /// All registrations, sorted by id
    pub fn list(&self) -> Vec<SensorRegistration> {
        let mut entries: Vec<SensorRegistration> =
            self.read().list().into_iter().cloned().collect();
        entries.sort_by(|a, b| a.id.cmp(&b.id));
        entries
    }

    pub fn update_status(&self, id: &str, status: SensorStatus) -> Result<(), RegistryError> {
        self.write().update_status(id, status)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Whether readings from this sensor should be ingested
    ///
    /// Unregistered sensors are accepted; registered ones only while active.
    pub fn is_accepting(&self, sensor_id: &str) -> bool {
        self.read()
            .get(sensor_id)
            .map_or(true, |registration| registration.status == SensorStatus::Active)
    }

    fn read(&self) -> RwLockReadGuard<'_, KeyRegistry<SensorRegistration>> {
        self.inner.read().unwrap_or_else(|poisoned| {
            warn!("Sensor registry lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, KeyRegistry<SensorRegistration>> {
        self.inner.write().unwrap_or_else(|poisoned| {
            warn!("Sensor registry lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_sens_types::SensorType;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_is_accepting() {
        let registry = SensorRegistry::new();
        registry
            .register(SensorRegistration::new("T1", "Engine Temp", SensorType::Temperature))
            .unwrap();
        registry
            .register(
                SensorRegistration::new("P1", "Hull Pressure", SensorType::Pressure)
                    .with_status(SensorStatus::Maintenance),
            )
            .unwrap();

        assert!(registry.is_accepting("T1"));
        assert!(!registry.is_accepting("P1"));
        assert!(registry.is_accepting("unregistered"));

        registry.update_status("T1", SensorStatus::Inactive).unwrap();
        assert!(!registry.is_accepting("T1"));
    }

    #[test]
    fn test_list_is_sorted() {
        let registry = SensorRegistry::new();
        for id in ["c", "a", "b"] {
            registry
                .register(SensorRegistration::new(id, id, SensorType::Motion))
                .unwrap();
        }
        let ids: Vec<_> = registry.list().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_concurrent_duplicate_registration_admits_one() {
        let registry = Arc::new(SensorRegistry::new());
        let attempts: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    registry
                        .register(SensorRegistration::new("dup", format!("n{}", i), SensorType::Climate))
                        .is_ok()
                })
            })
            .collect();

        let accepted = attempts
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(accepted, 1);
        assert_eq!(registry.len(), 1);
    }
}
