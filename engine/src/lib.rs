//! Core engine for Tessera - interaction state machines and orchestration.
//!
//! This crate owns every piece of controller state without any rendering
//! dependency. Hosts implement [`Page`] and [`ModalSurface`], feed discrete
//! events into [`Controller`], and call [`Controller::tick`] on a fixed
//! cadence to fire timers and collect oracle results.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, info};

pub use tessera_types::settings::{EngineSettings, MockOracleSettings, NotificationSettings, SolverSettings};
pub use tessera_types::{
    CandidateItem, ComputedStyle, DismissCause, DismissKey, Display, ItemId, ModalId, OracleVerdict,
    PointerTarget, Rect, SelectionSet, SolveRequest, Visibility,
};

mod button;
mod notifications;
mod oracle;
mod page;
mod selector;
mod solver;
mod status;
mod storage;
mod toggle;

pub use button::ToggleButton;
pub use notifications::{AlertSender, HandlerId, HandlerSlots, NotificationQueue, Routed};
pub use oracle::{MockOracle, Oracle, OracleError, OracleFut};
pub use page::{ModalSurface, Page};
pub use selector::{ImageSelector, SubmitOutcome};
pub use solver::{
    STATUS_ANALYZING, STATUS_ERROR, STATUS_NO_CANDIDATES, STATUS_SOLVED, STATUS_UNSOLVED,
    SolveOrchestrator, SolveOutcome, StartOutcome,
};
pub use status::{StatusSlot, StatusToken};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use toggle::PersistentToggle;

#[cfg(test)]
mod test_support;

/// Event-loop owner: every component plus the page it drives.
///
/// All methods run on the host's single event thread. Timing is passed in as
/// `now` so hosts and tests control the clock.
pub struct Controller<P> {
    page: P,
    toggle: PersistentToggle,
    button: ToggleButton,
    solver: SolveOrchestrator,
    selector: ImageSelector,
    status: StatusSlot,
    notifications: NotificationQueue,
    alerts: AlertSender,
    alert_rx: mpsc::UnboundedReceiver<String>,
}

impl<P: std::fmt::Debug> std::fmt::Debug for Controller<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("page", &self.page)
            .field("toggle", &self.toggle)
            .field("solver", &self.solver)
            .field("selector", &self.selector)
            .field("status", &self.status)
            .field("notifications", &self.notifications)
            .finish_non_exhaustive()
    }
}

impl<P: Page + ModalSurface> Controller<P> {
    /// Build the controller. The toggle is reconciled from `store` here, once,
    /// and the toggle control is painted from the reconciled value.
    pub fn new(
        mut page: P,
        store: Box<dyn KeyValueStore>,
        oracle: Arc<dyn Oracle>,
        settings: EngineSettings,
    ) -> Self {
        let toggle = PersistentToggle::load(store, settings.toggle_key.clone());
        let button = ToggleButton::new(settings.toggle_pulse);
        button.sync(&toggle, &mut page);
        let (alerts, alert_rx) = AlertSender::channel();
        Self {
            page,
            toggle,
            button,
            solver: SolveOrchestrator::new(oracle, settings.solver),
            selector: ImageSelector::default(),
            status: StatusSlot::new(settings.status_ttl),
            notifications: NotificationQueue::new(settings.notifications),
            alerts,
            alert_rx,
        }
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn toggle(&self) -> &PersistentToggle {
        &self.toggle
    }

    #[must_use]
    pub fn solving_enabled(&self) -> bool {
        self.toggle.get()
    }

    pub fn solver(&self) -> &SolveOrchestrator {
        &self.solver
    }

    pub fn selector(&self) -> &ImageSelector {
        &self.selector
    }

    pub fn status(&self) -> &StatusSlot {
        &self.status
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    /// For hosts that install their own page-wide click/key handlers.
    pub fn notifications_mut(&mut self) -> &mut NotificationQueue {
        &mut self.notifications
    }

    pub fn button(&self) -> &ToggleButton {
        &self.button
    }

    /// Handle for code that would have called the blocking alert primitive.
    pub fn alert_sender(&self) -> AlertSender {
        self.alerts.clone()
    }

    /// Document content is ready: install the selection handler.
    pub fn content_loaded(&mut self) {
        self.selector.install(&self.page);
    }

    /// Full page load: start solving if the toggle is on.
    pub fn page_loaded(&mut self, now: Instant) -> StartOutcome {
        self.start_solve(now)
    }

    /// Activation of the solver toggle control. Returns the new toggle state.
    pub fn click_toggle(&mut self, now: Instant) -> bool {
        let enabled = self.button.activate(&mut self.toggle, now, &mut self.page);
        if enabled {
            self.start_solve(now);
        }
        enabled
    }

    pub fn click_item(&mut self, id: &ItemId) -> Option<bool> {
        self.selector.click(id, &mut self.page)
    }

    pub fn click_undo(&mut self) {
        self.selector.undo(&mut self.page);
    }

    pub fn click_submit(&mut self) -> SubmitOutcome {
        self.selector.submit(&mut self.page)
    }

    pub fn pointer(&mut self, target: PointerTarget, now: Instant) -> Routed {
        self.notifications.pointer(target, now, &mut self.page)
    }

    /// Key-up by `KeyboardEvent.code` (`"Escape"`, `"Enter"`, `"Space"`, ...).
    pub fn key_up(&mut self, code: &str, now: Instant) -> Routed {
        self.notifications.key_up(code, now, &mut self.page)
    }

    pub fn alert(&mut self, message: impl Into<String>, now: Instant) {
        self.notifications.enqueue(message, now, &mut self.page);
    }

    /// One controller turn: queued alerts, oracle completion, then timers.
    ///
    /// Returns the outcome of a solve that finished during this turn.
    pub fn tick(&mut self, now: Instant) -> Option<SolveOutcome> {
        while let Ok(message) = self.alert_rx.try_recv() {
            self.notifications.enqueue(message, now, &mut self.page);
        }

        let outcome = self.solver.poll(now);
        if let Some(outcome) = &outcome {
            if let SolveOutcome::Solved { targets } = outcome {
                self.apply_targets(targets);
            }
            self.status.publish(outcome.status_text(), now, &mut self.page);
        }

        self.status.tick(now, &mut self.page);
        self.notifications.tick(now, &mut self.page);
        self.button.tick(now, &mut self.page);
        outcome
    }

    fn start_solve(&mut self, now: Instant) -> StartOutcome {
        self.solver
            .start(self.toggle.get(), now, &mut self.page, &mut self.status)
    }

    /// Activate oracle picks through the same path as a user click.
    fn apply_targets(&mut self, targets: &[ItemId]) {
        for id in targets {
            if self.selector.click(id, &mut self.page).is_none() {
                debug!(id = %id, "Oracle pick had no click listener");
            }
        }
        info!(picks = targets.len(), "Oracle picks applied");
    }
}
