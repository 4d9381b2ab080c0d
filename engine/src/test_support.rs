//! In-memory collaborators for engine unit tests.

use std::future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tessera_types::{CandidateItem, ComputedStyle, ItemId, OracleVerdict, Rect, SolveRequest};

use crate::oracle::{Oracle, OracleError, OracleFut};
use crate::page::{ModalSurface, Page};
use crate::solver::{SolveOrchestrator, SolveOutcome};

pub(crate) fn id(raw: &str) -> ItemId {
    ItemId::new(raw).expect("test ids are non-empty")
}

fn tile(raw: &str, x: f64, y: f64) -> CandidateItem {
    CandidateItem::new(
        Some(id(raw)),
        Rect::new(x, y, 100.0, 100.0),
        ComputedStyle {
            background: format!("url(\"tile-{raw}.png\")"),
            ..ComputedStyle::default()
        },
    )
}

#[derive(Debug, Default)]
pub(crate) struct FakeSurface {
    pub title: String,
    pub visible: Option<String>,
    /// Modals currently shown; must never exceed one.
    pub visible_count: usize,
    pub shown: Vec<String>,
}

impl ModalSurface for FakeSurface {
    fn show_modal(&mut self, message: &str) {
        self.visible = Some(message.to_string());
        self.visible_count += 1;
        self.shown.push(message.to_string());
    }

    fn hide_modal(&mut self) {
        self.visible = None;
        self.visible_count = self.visible_count.saturating_sub(1);
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }
}

#[derive(Debug)]
pub(crate) struct FakePage {
    pub items: Vec<CandidateItem>,
    pub hooks: bool,
    pub selected: Vec<ItemId>,
    pub actions_enabled: bool,
    pub submitted: Vec<String>,
    pub status: String,
    pub status_log: Vec<String>,
    pub indicator: bool,
    pub pulse: bool,
    pub surface: FakeSurface,
}

impl Default for FakePage {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            hooks: true,
            selected: Vec::new(),
            actions_enabled: false,
            submitted: Vec::new(),
            status: String::new(),
            status_log: Vec::new(),
            indicator: false,
            pulse: false,
            surface: FakeSurface::default(),
        }
    }
}

impl FakePage {
    /// `n` visible tiles with ids `"1"..="n"`, three per row.
    pub fn grid(n: usize) -> Self {
        let items = (0..n)
            .map(|i| {
                let col = (i % 3) as f64;
                let row = (i / 3) as f64;
                tile(&(i + 1).to_string(), col * 100.0, row * 100.0)
            })
            .collect();
        Self {
            items,
            ..Self::default()
        }
    }

    pub fn push_tile(&mut self, raw: &str, x: f64) {
        self.items.push(tile(raw, x, 0.0));
    }
}

impl Page for FakePage {
    fn candidates(&self) -> Vec<CandidateItem> {
        self.items.clone()
    }

    fn has_selection_hooks(&self) -> bool {
        self.hooks
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
        if !text.is_empty() {
            self.status_log.push(text.to_string());
        }
    }

    fn set_toggle_indicator(&mut self, enabled: bool) {
        self.indicator = enabled;
    }

    fn set_toggle_pulse(&mut self, active: bool) {
        self.pulse = active;
    }
}

impl ModalSurface for FakePage {
    fn show_modal(&mut self, message: &str) {
        self.surface.show_modal(message);
    }

    fn hide_modal(&mut self) {
        self.surface.hide_modal();
    }

    fn title(&self) -> String {
        self.surface.title()
    }

    fn set_title(&mut self, title: &str) {
        self.surface.set_title(title);
    }
}

/// Answers immediately with a fixed verdict and records each call.
#[derive(Debug)]
pub(crate) struct CountingOracle {
    verdict: OracleVerdict,
    calls: AtomicUsize,
    last_request_len: Mutex<Option<usize>>,
}

impl CountingOracle {
    pub fn solved(selections: Vec<i64>) -> Arc<Self> {
        Self::with(OracleVerdict::solved(selections))
    }

    pub fn unsolved() -> Arc<Self> {
        Self::with(OracleVerdict::unsolved())
    }

    fn with(verdict: OracleVerdict) -> Arc<Self> {
        Arc::new(Self {
            verdict,
            calls: AtomicUsize::new(0),
            last_request_len: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request_len(&self) -> Option<usize> {
        *self.last_request_len.lock().expect("lock poisoned")
    }
}

impl Oracle for CountingOracle {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn solve(&self, request: SolveRequest) -> OracleFut {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request_len.lock().expect("lock poisoned") = Some(request.len());
        let verdict = self.verdict.clone();
        Box::pin(async move { Ok(verdict) })
    }
}

/// Refuses every request and counts the refusals.
#[derive(Debug, Default)]
pub(crate) struct RejectingOracle {
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
                message: "quota exhausted".to_string(),
            })
        })
    }
}

/// Never answers.
#[derive(Debug)]
pub(crate) struct PendingOracle;

impl Oracle for PendingOracle {
    fn name(&self) -> &'static str {
        "pending"
    }

    fn solve(&self, _request: SolveRequest) -> OracleFut {
        Box::pin(future::pending())
    }
}

#[derive(Debug)]
pub(crate) struct PanickingOracle;

impl Oracle for PanickingOracle {
    fn name(&self) -> &'static str {
        "panicking"
    }

    fn solve(&self, _request: SolveRequest) -> OracleFut {
        Box::pin(explode())
    }
}

async fn explode() -> Result<OracleVerdict, OracleError> {
    panic!("oracle exploded")
}

/// Poll until the in-flight run resolves, yielding to the runtime between polls.
pub(crate) async fn settle_solver(solver: &mut SolveOrchestrator, now: Instant) -> SolveOutcome {
    for _ in 0..2_000 {
        if let Some(outcome) = solver.poll(now) {
            return outcome;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("solve never settled");
}
