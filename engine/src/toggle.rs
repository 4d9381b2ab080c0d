//! Durable solver on/off flag.

use tracing::{info, warn};

use crate::storage::KeyValueStore;

const ENABLED: &str = "true";
const DISABLED: &str = "false";

/// Boolean flag reconciled from storage once at construction and written
/// through on every toggle.
///
/// Storage failures never reach the caller. A failed read starts the flag as
/// `false`; a failed write keeps the in-memory value and marks the toggle
/// degraded for the rest of the session.
pub struct PersistentToggle {
    value: bool,
    key: String,
    store: Box<dyn KeyValueStore>,
    degraded: bool,
}

impl std::fmt::Debug for PersistentToggle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentToggle")
            .field("value", &self.value)
            .field("key", &self.key)
            .field("degraded", &self.degraded)
            .finish_non_exhaustive()
    }
}

impl PersistentToggle {
    pub fn load(store: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let (value, degraded) = match store.get(&key) {
            Ok(saved) => (saved.as_deref() == Some(ENABLED), false),
            Err(err) => {
                warn!(key = %key, "Toggle state unreadable, starting disabled: {err}");
                (false, true)
            }
        };
        info!(key = %key, enabled = value, "Solver toggle reconciled from storage");
        Self {
            value,
            key,
            store,
            degraded,
        }
    }

    #[must_use]
    pub fn get(&self) -> bool {
        self.value
    }

    /// Whether storage has failed at least once this session.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Flip the flag and persist it. Returns the new value.
    pub fn toggle(&mut self) -> bool {
        self.value = !self.value;
        let raw = if self.value { ENABLED } else { DISABLED };
        if let Err(err) = self.store.set(&self.key, raw) {
            if !self.degraded {
                warn!(key = %self.key, "Toggle state not persisted, keeping it in memory: {err}");
            }
            self.degraded = true;
        }
        self.value
    }
}
