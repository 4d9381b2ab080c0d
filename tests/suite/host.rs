//! Terminal host page driven end to end through the controller.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use tessera_engine::{
    Controller, EngineSettings, MemoryStore, MockOracle, MockOracleSettings, STATUS_SOLVED,
    SolveOutcome,
};
use tessera_tui::{DEMO_ALERT, HostPage, handle_key};

use crate::common::settle;

fn instant_oracle() -> Arc<MockOracle> {
    Arc::new(MockOracle::new(MockOracleSettings {
        delay: Duration::ZERO,
        ..MockOracleSettings::default()
    }))
}

fn host(hidden: &[usize]) -> Controller<HostPage> {
    let mut controller = Controller::new(
        HostPage::new(3, 3, hidden),
        Box::new(MemoryStore::new()),
        instant_oracle(),
        EngineSettings::default(),
    );
    let alerts = controller.alert_sender();
    controller.page_mut().attach_alerts(alerts);
    controller.content_loaded();
    controller
}

fn press(controller: &mut Controller<HostPage>, code: KeyCode, now: Instant) -> bool {
    handle_key(controller, KeyEvent::new(code, KeyModifiers::NONE), now)
}

fn selected_labels(page: &HostPage) -> Vec<String> {
    page.tiles()
        .iter()
        .filter(|tile| tile.selected)
        .map(|tile| tile.label().to_string())
        .collect()
}

#[tokio::test]
async fn toggle_key_solves_the_grid() {
    let mut controller = host(&[]);
    let now = Instant::now();

    assert!(!press(&mut controller, KeyCode::Char('t'), now));
    assert!(controller.page().indicator());
    assert!(controller.page().pulse());

    let outcome = settle(&mut controller, now).await;
    assert!(matches!(outcome, SolveOutcome::Solved { .. }));
    assert_eq!(selected_labels(controller.page()), ["1", "3", "6"]);
    assert_eq!(controller.page().status(), STATUS_SOLVED);
    assert!(controller.page().actions_enabled());

    controller.tick(now + Duration::from_secs(3));
    assert_eq!(controller.page().status(), "");
    assert!(!controller.page().pulse());
}

#[tokio::test]
async fn hidden_tiles_keep_their_place_in_the_order() {
    let mut controller = host(&[1]);
    let now = Instant::now();
    controller.click_toggle(now);
    settle(&mut controller, now).await;
    assert_eq!(selected_labels(controller.page()), ["1", "3", "6"]);
}

#[test]
fn manual_selection_submits_and_reports_back() {
    let mut controller = host(&[]);
    let now = Instant::now();

    press(&mut controller, KeyCode::Enter, now);
    press(&mut controller, KeyCode::Right, now);
    press(&mut controller, KeyCode::Right, now);
    press(&mut controller, KeyCode::Enter, now);
    assert_eq!(selected_labels(controller.page()), ["1", "3"]);

    press(&mut controller, KeyCode::Char('s'), now);
    assert_eq!(controller.page().submitted(), ["1,3"]);
    assert!(selected_labels(controller.page()).is_empty());
    assert!(!controller.page().actions_enabled());

    controller.tick(now);
    assert_eq!(controller.page().modal(), Some("Submitted selection: 1,3"));
}

#[test]
fn modal_captures_keys_until_dismissed() {
    let mut controller = host(&[]);
    let now = Instant::now();

    press(&mut controller, KeyCode::Char('a'), now);
    controller.tick(now);
    assert_eq!(controller.page().modal(), Some(DEMO_ALERT));

    // Host bindings are inert while the alert owns the keyboard.
    assert!(!press(&mut controller, KeyCode::Char('q'), now));
    press(&mut controller, KeyCode::Char('t'), now);
    assert!(!controller.solving_enabled());
    press(&mut controller, KeyCode::Tab, now);
    assert_eq!(controller.page().modal(), Some(DEMO_ALERT));

    press(&mut controller, KeyCode::Backspace, now);
    assert_eq!(controller.page().modal(), None);
    assert!(press(&mut controller, KeyCode::Char('q'), now));
}

#[test]
fn ctrl_c_quits_under_a_modal() {
    let mut controller = host(&[]);
    let now = Instant::now();
    controller.alert("blocking?", now);
    assert!(handle_key(
        &mut controller,
        KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        now
    ));
}
