//! Single-flight solve workflow: scan, ask the oracle, apply its picks.
//!
//! `Idle -> Running -> Idle`. There is no error state; every way out of
//! `Running` (verdict, failure, timeout, task panic) lands back in `Idle` with
//! a status line.

use std::sync::Arc;
use std::time::Instant;

use futures_util::FutureExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use tessera_types::settings::SolverSettings;
use tessera_types::{ItemId, OracleVerdict, SolveRequest};

use crate::oracle::{Oracle, OracleError};
use crate::page::Page;
use crate::status::StatusSlot;

pub const STATUS_ANALYZING: &str = "Analyzing challenge images...";
pub const STATUS_NO_CANDIDATES: &str = "No challenge images found";
pub const STATUS_SOLVED: &str = "Challenge solved";
pub const STATUS_UNSOLVED: &str = "Failed to solve challenge";
pub const STATUS_ERROR: &str = "Error solving challenge";

/// Why `start` did or did not begin a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// Oracle call in flight with this many visible candidates.
    Started { candidates: usize },
    /// The page had no candidates; the oracle was not called.
    NoCandidates,
    /// The solver toggle is off.
    Disabled,
    /// A run is already in flight.
    AlreadyRunning,
    /// No async runtime to host the oracle call.
    NoRuntime,
}

/// How a finished run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    /// Items to activate, in verdict order.
    Solved { targets: Vec<ItemId> },
    /// The oracle answered but reported no solution.
    Unsolved,
    Failed(OracleError),
}

impl SolveOutcome {
    #[must_use]
    pub fn status_text(&self) -> &'static str {
        match self {
            SolveOutcome::Solved { .. } => STATUS_SOLVED,
            SolveOutcome::Unsolved => STATUS_UNSOLVED,
            SolveOutcome::Failed(_) => STATUS_ERROR,
        }
    }
}

#[derive(Debug)]
struct RunningSolve {
    handle: JoinHandle<Result<OracleVerdict, OracleError>>,
    /// Ids in the unfiltered page order captured at start; verdict indices address this.
    original: Vec<Option<ItemId>>,
    started_at: Instant,
}

#[derive(Debug, Default)]
enum SolveState {
    #[default]
    Idle,
    Running(RunningSolve),
}

pub struct SolveOrchestrator {
    state: SolveState,
    oracle: Arc<dyn Oracle>,
    settings: SolverSettings,
    invocations: u64,
}

impl std::fmt::Debug for SolveOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolveOrchestrator")
            .field("state", &self.state)
            .field("oracle", &self.oracle.name())
            .field("invocations", &self.invocations)
            .finish_non_exhaustive()
    }
}

impl SolveOrchestrator {
    pub fn new(oracle: Arc<dyn Oracle>, settings: SolverSettings) -> Self {
        Self {
            state: SolveState::Idle,
            oracle,
            settings,
            invocations: 0,
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self.state, SolveState::Running(_))
    }

    /// Number of oracle calls made so far.
    #[must_use]
    pub fn invocations(&self) -> u64 {
        self.invocations
    }

    /// Begin a solve attempt if enabled and idle.
    ///
    /// Everything up to the oracle call happens before this returns, so a
    /// second call in the same turn always sees `Running`.
    pub fn start(
        &mut self,
        enabled: bool,
        now: Instant,
        page: &mut impl Page,
        status: &mut StatusSlot,
    ) -> StartOutcome {
        if !enabled {
            debug!("Solve skipped, solver disabled");
            return StartOutcome::Disabled;
        }
        if self.is_running() {
            debug!("Solve skipped, a run is already in flight");
            return StartOutcome::AlreadyRunning;
        }

        status.publish(STATUS_ANALYZING, now, page);

        let items = page.candidates();
        if items.is_empty() {
            info!("No candidate items on page");
            status.publish(STATUS_NO_CANDIDATES, now, page);
            return StartOutcome::NoCandidates;
        }

        let request = SolveRequest::from_items(&items);
        let visible = request.len();
        let original: Vec<Option<ItemId>> = items.into_iter().map(|item| item.id).collect();

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("No async runtime available for the oracle call");
            status.publish(STATUS_ERROR, now, page);
            return StartOutcome::NoRuntime;
        };

        let call = self.oracle.solve(request);
        let limit = self.settings.oracle_timeout;
        let handle = runtime.spawn(async move {
            match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => Err(OracleError::Timeout { elapsed: limit }),
            }
        });
        self.invocations += 1;
        info!(
            oracle = self.oracle.name(),
            total = original.len(),
            visible,
            "Solve started"
        );
        self.state = SolveState::Running(RunningSolve {
            handle,
            original,
            started_at: now,
        });
        StartOutcome::Started {
            candidates: visible,
        }
    }

    /// Collect the oracle result if it has arrived, returning to `Idle`.
    pub fn poll(&mut self, now: Instant) -> Option<SolveOutcome> {
        match &self.state {
            SolveState::Running(run) if run.handle.is_finished() => {}
            _ => return None,
        }
        let run = match std::mem::take(&mut self.state) {
            SolveState::Running(run) => run,
            SolveState::Idle => return None,
        };

        let RunningSolve {
            handle,
            original,
            started_at,
        } = run;
        let elapsed = now.saturating_duration_since(started_at);

        let outcome = match handle.now_or_never() {
            Some(Ok(Ok(verdict))) if verdict.success => {
                let targets = verdict
                    .targets(original.len())
                    .filter_map(|index| {
                        let id = original[index].clone();
                        if id.is_none() {
                            debug!(index, "Oracle picked an item without an id, skipping");
                        }
                        id
                    })
                    .collect();
                SolveOutcome::Solved { targets }
            }
            Some(Ok(Ok(_))) => SolveOutcome::Unsolved,
            Some(Ok(Err(err))) => SolveOutcome::Failed(err),
            Some(Err(join_err)) => SolveOutcome::Failed(OracleError::Crashed {
                message: join_err.to_string(),
            }),
            None => SolveOutcome::Failed(OracleError::Crashed {
                message: "task finished without a result".to_string(),
            }),
        };

        match &outcome {
            SolveOutcome::Failed(err) => {
                warn!(elapsed_ms = elapsed.as_millis() as u64, "Solve failed: {err}");
            }
            _ => info!(
                elapsed_ms = elapsed.as_millis() as u64,
                outcome = outcome.status_text(),
                "Solve finished"
            ),
        }
        Some(outcome)
    }
}
