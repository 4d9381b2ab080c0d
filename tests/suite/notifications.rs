//! Alert queue behavior through the controller.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tessera_engine::{
    DismissCause, DismissKey, HandlerId, HandlerSlots, MemoryStore, MockOracle, PointerTarget,
    Routed,
};

use crate::common::{RecordingPage, build_controller};

fn quiet_controller() -> tessera_engine::Controller<RecordingPage> {
    build_controller(
        RecordingPage::grid(3),
        MemoryStore::new(),
        Arc::new(MockOracle::default()),
    )
}

#[test]
fn escape_then_timeout_scenario() {
    let mut controller = quiet_controller();
    let t0 = Instant::now();

    controller.alert("A", t0);
    controller.alert("B", t0);
    assert_eq!(controller.page().modal.as_deref(), Some("A"));

    let t1 = t0 + Duration::from_millis(300);
    assert_eq!(
        controller.key_up("Escape", t1),
        Routed::Dismissed(DismissCause::Key(DismissKey::Escape))
    );
    assert_eq!(controller.page().modal.as_deref(), Some("B"));

    controller.tick(t1 + Duration::from_secs(5));
    assert_eq!(controller.page().modal, None);
    assert!(!controller.notifications().is_active());
    assert_eq!(controller.notifications().pending_len(), 0);
}

#[test]
fn burst_of_alerts_is_shown_one_at_a_time_in_order() {
    let mut controller = quiet_controller();
    let sender = controller.alert_sender();
    let t0 = Instant::now();
    let burst: Vec<String> = (1..=10).map(|n| format!("alert {n}")).collect();

    // Half straight in, half through the sender from "elsewhere".
    for (n, message) in burst.iter().enumerate() {
        if n % 2 == 0 {
            controller.alert(message.clone(), t0);
        } else {
            sender.alert(message.clone());
        }
    }
    controller.tick(t0);

    let mut now = t0;
    for n in 0..burst.len() {
        now += Duration::from_secs(1);
        if n % 2 == 0 {
            controller.key_up("Space", now);
        } else {
            controller.pointer(PointerTarget::Backdrop, now);
        }
    }

    let page = controller.page();
    assert_eq!(page.max_visible, 1);
    assert_eq!(page.visible, 0);
    assert_eq!(controller.notifications().presented(), 10);
    // Direct calls and sender messages interleave by arrival at the queue.
    let mut expected: Vec<String> = burst.iter().step_by(2).cloned().collect();
    expected.extend(burst.iter().skip(1).step_by(2).cloned());
    assert_eq!(page.shown, expected);
}

#[test]
fn modal_restores_host_handlers_after_each_presentation() {
    let mut controller = quiet_controller();
    let host = HandlerSlots {
        click: Some(HandlerId::Host(1)),
        key_up: Some(HandlerId::Host(2)),
    };
    controller.notifications_mut().set_click_handler(host.click);
    controller.notifications_mut().set_key_up_handler(host.key_up);
    let t0 = Instant::now();

    controller.alert("first", t0);
    controller.alert("second", t0);
    assert_ne!(controller.notifications().slots(), host);

    controller.tick(t0 + Duration::from_secs(5));
    assert_eq!(controller.page().modal.as_deref(), Some("second"));
    assert_ne!(controller.notifications().slots(), host);

    controller.key_up("Enter", t0 + Duration::from_secs(6));
    assert_eq!(controller.notifications().slots(), host);
    assert_eq!(
        controller.key_up("Enter", t0 + Duration::from_secs(7)),
        Routed::Host(Some(HandlerId::Host(2)))
    );
}

#[test]
fn no_handler_is_restored_as_no_handler() {
    let mut controller = quiet_controller();
    let t0 = Instant::now();
    controller.alert("only", t0);
    controller.pointer(PointerTarget::Backdrop, t0);
    assert_eq!(controller.notifications().slots(), HandlerSlots::default());
}

#[test]
fn title_flash_never_outlives_the_modal() {
    let mut controller = quiet_controller();
    let t0 = Instant::now();
    controller.alert("look here", t0);

    let mut decorated = 0;
    let mut now = t0;
    while now < t0 + Duration::from_millis(4900) {
        now += Duration::from_millis(100);
        controller.tick(now);
        if controller.page().title == "Challenge - Alert" {
            decorated += 1;
        }
    }
    assert!(decorated > 0);

    controller.tick(t0 + Duration::from_secs(5));
    assert_eq!(controller.page().title, "Challenge");
    assert!(!controller.notifications().is_active());
}
