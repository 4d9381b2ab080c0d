//! Toggle persistence and configuration loading against real files.

use std::fs;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tempfile::tempdir;

use tessera_config::TesseraConfig;
use tessera_engine::{Controller, FileStore, KeyValueStore, MockOracle};

use crate::common::RecordingPage;

const KEY: &str = "captchaSolverEnabled";

fn controller_on(store: FileStore) -> Controller<RecordingPage> {
    Controller::new(
        RecordingPage::default(),
        Box::new(store),
        Arc::new(MockOracle::default()),
        tessera_engine::EngineSettings::default(),
    )
}

#[test]
fn toggle_survives_restart_through_state_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state").join("state.toml");

    let mut first = controller_on(FileStore::new(&path));
    assert!(!first.solving_enabled());
    assert!(!first.page().indicator);
    first.click_toggle(Instant::now());
    assert!(first.solving_enabled());
    assert_eq!(
        FileStore::new(&path).get(KEY).unwrap().as_deref(),
        Some("true")
    );
    drop(first);

    let second = controller_on(FileStore::new(&path));
    assert!(second.solving_enabled());
    assert!(second.page().indicator);
    assert!(!second.toggle().is_degraded());
}

#[test]
fn state_file_keeps_unrelated_keys_and_comments() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.toml");
    fs::write(&path, "# host state\ntheme = \"dark\"\n").unwrap();

    let mut controller = controller_on(FileStore::new(&path));
    controller.click_toggle(Instant::now());
    controller.click_toggle(Instant::now());

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("# host state"));
    assert!(content.contains("theme = \"dark\""));
    assert!(content.contains("captchaSolverEnabled = \"false\""));
}

#[test]
fn unparseable_state_file_reads_disabled_then_recovers() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.toml");
    fs::write(&path, "captchaSolverEnabled = \"true\"\n[[[not toml").unwrap();

    let mut controller = controller_on(FileStore::new(&path));
    assert!(!controller.solving_enabled());
    assert!(controller.toggle().is_degraded());

    assert!(controller.click_toggle(Instant::now()));
    assert!(controller.solving_enabled());
    assert!(controller.page().indicator);
    drop(controller);

    // The write replaced the bad file, so the next session reads it back.
    let restarted = controller_on(FileStore::new(&path));
    assert!(restarted.solving_enabled());
    assert!(!restarted.toggle().is_degraded());
}

#[test]
fn config_file_drives_engine_settings() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[timing]
modal_timeout_ms = 1200

[storage]
key = "solver"

[notifications]
dismiss_keys = ["Escape"]
"#,
    )
    .unwrap();

    let config = TesseraConfig::load_from(&path).unwrap().unwrap();
    let settings = config.engine_settings();
    assert_eq!(settings.notifications.timeout, Duration::from_millis(1200));
    assert_eq!(settings.toggle_key, "solver");

    let state = dir.path().join("state.toml");
    let mut controller = Controller::new(
        RecordingPage::default(),
        Box::new(FileStore::new(&state)),
        Arc::new(MockOracle::default()),
        settings,
    );
    controller.click_toggle(Instant::now());
    assert_eq!(
        FileStore::new(&state).get("solver").unwrap().as_deref(),
        Some("true")
    );

    let t0 = Instant::now();
    controller.alert("A", t0);
    assert_eq!(
        controller.key_up("Enter", t0),
        tessera_engine::Routed::Swallowed
    );
    controller.tick(t0 + Duration::from_millis(1200));
    assert!(!controller.notifications().is_active());
}
