//! Configuration loading for Tessera.
//!
//! The config file lives at `~/.tessera/config.toml`. Every section and field is
//! optional; missing values fall back to the defaults in
//! [`tessera_types::settings`]. Raw structs here mirror the TOML layout and are
//! resolved into the shared settings types at the parse boundary.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use tessera_types::DismissKey;
use tessera_types::settings::{
    EngineSettings, MockOracleSettings, NotificationSettings, SolverSettings, UiOptions,
};

const CONFIG_DIR: &str = ".tessera";
const CONFIG_FILE: &str = "config.toml";
const STATE_FILE: &str = "state.toml";

#[derive(Debug, Default, Deserialize)]
pub struct TesseraConfig {
    pub timing: Option<TimingConfig>,
    pub solver: Option<SolverConfig>,
    /// Stand-in oracle behavior.
    pub oracle: Option<OracleConfig>,
    pub storage: Option<StorageConfig>,
    pub notifications: Option<NotificationsConfig>,
    /// Layout of the terminal host's simulated grid.
    pub grid: Option<GridConfig>,
    pub ui: Option<UiConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TimingConfig {
    /// How long a status line stays before it is blanked. Default: 3000.
    pub status_ttl_ms: Option<u64>,
    /// Auto-dismiss delay of the notification modal. Default: 5000.
    pub modal_timeout_ms: Option<u64>,
    /// Period of the title flash while a modal is open. Default: 1000.
    pub title_flash_interval_ms: Option<u64>,
    /// How long the decorated title is shown per flash. Default: 500.
    pub title_flash_duration_ms: Option<u64>,
    /// Length of the toggle button's click pulse. Default: 900.
    pub toggle_pulse_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SolverConfig {
    /// Upper bound on one oracle call. Default: 30000.
    pub oracle_timeout_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OracleConfig {
    /// Simulated response latency. Default: 1000.
    pub delay_ms: Option<u64>,
    /// Whether the oracle reports success. Default: true.
    pub success: Option<bool>,
    /// Indices the oracle selects. Default: [0, 2, 5].
    pub selections: Option<Vec<i64>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StorageConfig {
    /// Toggle state file. Default: `~/.tessera/state.toml`.
    pub path: Option<PathBuf>,
    /// Key the toggle is stored under. Default: `captchaSolverEnabled`.
    pub key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NotificationsConfig {
    /// Key codes that dismiss the modal. Default: ["Enter", "Escape", "Space"].
    pub dismiss_keys: Option<Vec<String>>,
    /// Appended to the title while flashing. Default: " - Alert".
    pub title_suffix: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GridConfig {
    pub columns: Option<u16>,
    pub rows: Option<u16>,
    /// Item indices rendered with `display: none`, for exercising the filter.
    #[serde(default)]
    pub hidden: Vec<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UiConfig {
    pub ascii_only: Option<bool>,
    pub high_contrast: Option<bool>,
}

/// Resolved grid layout for the terminal host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSettings {
    pub columns: u16,
    pub rows: u16,
    pub hidden: Vec<usize>,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            columns: 3,
            rows: 3,
            hidden: Vec::new(),
        }
    }
}

fn millis(value: Option<u64>, fallback: Duration) -> Duration {
    value.map_or(fallback, Duration::from_millis)
}

fn parse_dismiss_keys(raw: &[String]) -> Vec<DismissKey> {
    let mut keys = Vec::with_capacity(raw.len());
    for code in raw {
        match code.parse::<DismissKey>() {
            Ok(key) if !keys.contains(&key) => keys.push(key),
            Ok(_) => {}
            Err(err) => tracing::warn!("Ignoring dismiss key in config: {err}"),
        }
    }
    keys
}

impl TesseraConfig {
    /// Load the config file from its default location.
    ///
    /// Returns `Ok(None)` when no home directory is known or the file is absent.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match Self::parse(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    #[must_use]
    pub fn engine_settings(&self) -> EngineSettings {
        let defaults = EngineSettings::default();
        let timing = self.timing.as_ref();
        let notify_defaults = NotificationSettings::default();
        let notifications = self.notifications.as_ref();

        let dismiss_keys = notifications
            .and_then(|n| n.dismiss_keys.as_deref())
            .map_or(notify_defaults.dismiss_keys, parse_dismiss_keys);

        // A zero flash period would spin the flash timer; clamp to 1ms.
        let flash_interval = millis(
            timing.and_then(|t| t.title_flash_interval_ms),
            notify_defaults.flash_interval,
        )
        .max(Duration::from_millis(1));

        EngineSettings {
            status_ttl: millis(timing.and_then(|t| t.status_ttl_ms), defaults.status_ttl),
            toggle_pulse: millis(timing.and_then(|t| t.toggle_pulse_ms), defaults.toggle_pulse),
            toggle_key: self
                .storage
                .as_ref()
                .and_then(|s| s.key.clone())
                .filter(|key| !key.trim().is_empty())
                .unwrap_or(defaults.toggle_key),
            notifications: NotificationSettings {
                timeout: millis(
                    timing.and_then(|t| t.modal_timeout_ms),
                    notify_defaults.timeout,
                ),
                flash_interval,
                flash_duration: millis(
                    timing.and_then(|t| t.title_flash_duration_ms),
                    notify_defaults.flash_duration,
                ),
                title_suffix: notifications
                    .and_then(|n| n.title_suffix.clone())
                    .unwrap_or(notify_defaults.title_suffix),
                dismiss_keys,
            },
            solver: SolverSettings {
                oracle_timeout: millis(
                    self.solver.as_ref().and_then(|s| s.oracle_timeout_ms),
                    defaults.solver.oracle_timeout,
                ),
            },
        }
    }

    #[must_use]
    pub fn oracle_settings(&self) -> MockOracleSettings {
        let defaults = MockOracleSettings::default();
        let Some(oracle) = self.oracle.as_ref() else {
            return defaults;
        };
        MockOracleSettings {
            delay: millis(oracle.delay_ms, defaults.delay),
            success: oracle.success.unwrap_or(defaults.success),
            selections: oracle.selections.clone().unwrap_or(defaults.selections),
        }
    }

    /// Toggle state file: configured path, else `~/.tessera/state.toml`.
    #[must_use]
    pub fn storage_path(&self) -> Option<PathBuf> {
        self.storage
            .as_ref()
            .and_then(|s| s.path.clone())
            .or_else(default_state_path)
    }

    #[must_use]
    pub fn grid_settings(&self) -> GridSettings {
        let defaults = GridSettings::default();
        let Some(grid) = self.grid.as_ref() else {
            return defaults;
        };
        GridSettings {
            columns: grid.columns.unwrap_or(defaults.columns).max(1),
            rows: grid.rows.unwrap_or(defaults.rows).max(1),
            hidden: grid.hidden.clone(),
        }
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        let ui = self.ui.as_ref();
        UiOptions {
            ascii_only: ui.and_then(|u| u.ascii_only).unwrap_or(false),
            high_contrast: ui.and_then(|u| u.high_contrast).unwrap_or(false),
        }
    }
}

#[must_use]
pub fn tessera_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR))
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    tessera_dir().map(|dir| dir.join(CONFIG_FILE))
}

#[must_use]
pub fn default_state_path() -> Option<PathBuf> {
    tessera_dir().map(|dir| dir.join(STATE_FILE))
}
