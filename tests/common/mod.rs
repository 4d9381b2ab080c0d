//! Shared test utilities and fixtures
//!
//! A recording page, scriptable oracles, and controller builders used by the
//! integration suite.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use tokio::sync::Notify;

use tessera_engine::{
    CandidateItem, ComputedStyle, Controller, EngineSettings, ItemId, KeyValueStore, ModalSurface,
    Oracle, OracleError, OracleFut, OracleVerdict, Page, Rect, SolveOutcome, SolveRequest,
};

pub fn id(raw: &str) -> ItemId {
    ItemId::new(raw).expect("non-empty id")
}

pub fn tile(raw: &str, x: f64, y: f64) -> CandidateItem {
    CandidateItem::new(
        Some(id(raw)),
        Rect::new(x, y, 100.0, 100.0),
        ComputedStyle {
            background: format!("url(\"{raw}.png\")"),
            ..ComputedStyle::default()
        },
    )
}

/// Page that records every mutation the controller makes.
#[derive(Debug, Default)]
pub struct RecordingPage {
    pub items: Vec<CandidateItem>,
    pub missing_hooks: bool,
    pub selected: Vec<ItemId>,
    pub actions_enabled: bool,
    pub submitted: Vec<String>,
    pub status: String,
    pub indicator: bool,
    pub pulse: bool,
    pub title: String,
    pub modal: Option<String>,
    pub shown: Vec<String>,
    /// Modals concurrently visible; the queue must keep this at most one.
    pub visible: usize,
    pub max_visible: usize,
}

impl RecordingPage {
    /// `n` visible tiles with ids `"1"..="n"`, three per row.
    pub fn grid(n: usize) -> Self {
        let items = (0..n)
            .map(|i| {
                tile(
                    &(i + 1).to_string(),
                    (i % 3) as f64 * 100.0,
                    (i / 3) as f64 * 100.0,
                )
            })
            .collect();
        Self {
            items,
            title: "Challenge".to_string(),
            ..Self::default()
        }
    }
}

impl Page for RecordingPage {
    fn candidates(&self) -> Vec<CandidateItem> {
        self.items.clone()
    }

    fn has_selection_hooks(&self) -> bool {
        !self.missing_hooks
    }

    fn mark_selected(&mut self, id: &ItemId, selected: bool) {
        self.selected.retain(|existing| existing != id);
        if selected {
            self.selected.push(id.clone());
        }
    }

    fn set_actions_enabled(&mut self, enabled: bool) {
        self.actions_enabled = enabled;
    }

    fn submit_form(&mut self, value: &str) {
        self.submitted.push(value.to_string());
    }

    fn set_status_text(&mut self, text: &str) {
        self.status = text.to_string();
    }

    fn set_toggle_indicator(&mut self, enabled: bool) {
        self.indicator = enabled;
    }

    fn set_toggle_pulse(&mut self, active: bool) {
        self.pulse = active;
    }
}

impl ModalSurface for RecordingPage {
    fn show_modal(&mut self, message: &str) {
        self.modal = Some(message.to_string());
        self.shown.push(message.to_string());
        self.visible += 1;
        self.max_visible = self.max_visible.max(self.visible);
    }

    fn hide_modal(&mut self) {
        self.modal = None;
        self.visible = self.visible.saturating_sub(1);
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }
}

/// Oracle that holds its answer until the test opens the gate.
#[derive(Debug)]
pub struct GatedOracle {
    verdict: OracleVerdict,
    gate: Arc<Notify>,
    calls: AtomicUsize,
    last_visible: AtomicUsize,
}

impl GatedOracle {
    pub fn new(verdict: OracleVerdict) -> Arc<Self> {
        Arc::new(Self {
            verdict,
            gate: Arc::new(Notify::new()),
            calls: AtomicUsize::new(0),
            last_visible: AtomicUsize::new(0),
        })
    }

    pub fn open(&self) {
        self.gate.notify_one();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Visible candidate count of the most recent request.
    pub fn last_visible(&self) -> usize {
        self.last_visible.load(Ordering::SeqCst)
    }
}

impl Oracle for GatedOracle {
    fn name(&self) -> &'static str {
        "gated"
    }

    fn solve(&self, request: SolveRequest) -> OracleFut {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_visible.store(request.len(), Ordering::SeqCst);
        let gate = self.gate.clone();
        let verdict = self.verdict.clone();
        Box::pin(async move {
            gate.notified().await;
            Ok(verdict)
        })
    }
}

/// Oracle whose service turns every request away.
#[derive(Debug, Default)]
pub struct RejectingOracle {
    calls: AtomicUsize,
}

impl RejectingOracle {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Oracle for RejectingOracle {
    fn name(&self) -> &'static str {
        "rejecting"
    }

    fn solve(&self, _request: SolveRequest) -> OracleFut {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async {
            Err(OracleError::Rejected {
                message: "service refused the challenge".to_string(),
            })
        })
    }
}

pub fn build_controller(
    page: RecordingPage,
    store: impl KeyValueStore + 'static,
    oracle: Arc<dyn Oracle>,
) -> Controller<RecordingPage> {
    Controller::new(page, Box::new(store), oracle, EngineSettings::default())
}

/// Tick with a fixed `now` until a solve finishes.
pub async fn settle<P>(controller: &mut Controller<P>, now: Instant) -> SolveOutcome
where
    P: Page + ModalSurface,
{
    for _ in 0..2_000 {
        if let Some(outcome) = controller.tick(now) {
            return outcome;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("solve never settled");
}
