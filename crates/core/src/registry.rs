//! Registry of identifiers with static metadata and a mutable status

use log::{info, warn};
use std::collections::HashMap;
use thiserror::Error;

use fleet_sens_types::{SensorRegistration, SensorStatus};

/// Errors reported by registry operations
///
/// These are ordinary outcomes that callers branch on, not failures of the
/// registry itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// An entry with this id already exists; registration is not an upsert
    #[error("already registered: {0}")]
    AlreadyRegistered(String),
    /// No entry with this id
    #[error("not registered: {0}")]
    NotFound(String),
}

/// An entry that can be stored in a [`KeyRegistry`]
pub trait RegistryEntry {
    /// Type of the mutable status field
    type Status;

    /// Unique key of this entry
    fn id(&self) -> &str;

    /// Overwrite the status field
    fn set_status(&mut self, status: Self::Status);
}

impl RegistryEntry for SensorRegistration {
    type Status = SensorStatus;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_status(&mut self, status: SensorStatus) {
        self.status = status;
    }
}

/// Map from id to entry
///
/// Entries are added once and never removed. Only their status can change.
#[derive(Debug, Clone)]
pub struct KeyRegistry<E> {
    entries: HashMap<String, E>,
}

impl<E: RegistryEntry> KeyRegistry<E> {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Add `entry` under its id
    ///
    /// Fails with [`RegistryError::AlreadyRegistered`] if the id is taken,
    /// leaving the existing entry as it was.
    pub fn register(&mut self, entry: E) -> Result<(), RegistryError> {
        let id = entry.id().to_string();
        if self.entries.contains_key(&id) {
            warn!("Rejected duplicate registration for {}", id);
            return Err(RegistryError::AlreadyRegistered(id));
        }
        info!("Registered {}", id);
        self.entries.insert(id, entry);
        Ok(())
    }

    /// Get an entry by id
    pub fn get(&self, id: &str) -> Option<&E> {
        self.entries.get(id)
    }

    /// All entries, in no particular order
    pub fn list(&self) -> Vec<&E> {
        self.entries.values().collect()
    }

    /// Overwrite the status of a registered entry
    pub fn update_status(&mut self, id: &str, status: E::Status) -> Result<(), RegistryError> {
        match self.entries.get_mut(id) {
            Some(entry) => {
                entry.set_status(status);
                Ok(())
            }
            None => {
                warn!("Status update for unregistered id {}", id);
                Err(RegistryError::NotFound(id.to_string()))
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E: RegistryEntry> Default for KeyRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}
