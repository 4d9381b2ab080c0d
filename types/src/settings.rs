//! Resolved configuration types shared across crates.
//!
//! These types represent fully-resolved settings. Raw TOML deserialization
//! structs (with `Option` fields) stay in `tessera-config`, which resolves them
//! into these types at the parse boundary. Defaults mirror the timings of the
//! injected page controller: 3s status, 5s modal, 1s/500ms title flash, 900ms
//! button pulse.

use std::time::Duration;

use crate::DismissKey;

/// Storage key of the solver toggle.
pub const DEFAULT_TOGGLE_KEY: &str = "captchaSolverEnabled";
pub const DEFAULT_TITLE_SUFFIX: &str = " - Alert";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationSettings {
    /// Auto-dismiss delay after presentation.
    pub timeout: Duration,
    pub flash_interval: Duration,
    /// How long the decorated title stays before reverting.
    pub flash_duration: Duration,
    pub title_suffix: String,
    pub dismiss_keys: Vec<DismissKey>,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(5000),
            flash_interval: Duration::from_millis(1000),
            flash_duration: Duration::from_millis(500),
            title_suffix: DEFAULT_TITLE_SUFFIX.to_string(),
            dismiss_keys: DismissKey::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverSettings {
    /// Upper bound on one oracle call. Expiry counts as an oracle failure.
    pub oracle_timeout: Duration,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            oracle_timeout: Duration::from_secs(30),
        }
    }
}

/// Behavior of the stand-in oracle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockOracleSettings {
    pub delay: Duration,
    pub success: bool,
    pub selections: Vec<i64>,
}

impl Default for MockOracleSettings {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(1000),
            success: true,
            selections: vec![0, 2, 5],
        }
    }
}

/// Terminal host rendering options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiOptions {
    pub ascii_only: bool,
    pub high_contrast: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub status_ttl: Duration,
    pub toggle_pulse: Duration,
    pub toggle_key: String,
    pub notifications: NotificationSettings,
    pub solver: SolverSettings,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            status_ttl: Duration::from_millis(3000),
            toggle_pulse: Duration::from_millis(900),
            toggle_key: DEFAULT_TOGGLE_KEY.to_string(),
            notifications: NotificationSettings::default(),
            solver: SolverSettings::default(),
        }
    }
}
