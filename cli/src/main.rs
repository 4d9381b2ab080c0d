//! Tessera CLI - Binary entry point and terminal session management.
//!
//! # Architecture
//!
//! The CLI bridges [`tessera_engine`] (controller state) and [`tessera_tui`]
//! (host page, rendering, input), providing RAII-based terminal management with
//! guaranteed cleanup.
//!
//! ```text
//! main() -> load config -> Controller::new(HostPage, FileStore, MockOracle)
//!        -> TerminalSession::new() -> run() -> Quit
//! ```
//!
//! # Event Loop
//!
//! Fixed 16ms render cadence:
//!
//! 1. Wait for frame tick
//! 2. Drain input queue (non-blocking via [`tessera_tui::InputPump`])
//! 3. Advance controller state (`controller.tick(now)`)
//! 4. Render frame

use std::fs::{self, OpenOptions};
use std::io::{Stdout, stdout};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use tessera_config::{GridSettings, TesseraConfig};
use tessera_engine::{
    Controller, FileStore, KeyValueStore, MemoryStore, MockOracle, StartOutcome,
};
use tessera_tui::{HostPage, InputPump, draw, handle_events};
use tessera_types::settings::UiOptions;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // If we can't open a log file, prefer "no logs" over corrupting the TUI
    // by writing to stdout/stderr.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, std::fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new().create(true).append(true).open(&candidate) {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.tessera/logs/tessera.log
    if let Some(dir) = tessera_config::tessera_dir() {
        candidates.push(dir.join("logs").join("tessera.log"));
    }

    // Fallback: ./.tessera/logs/tessera.log (useful in constrained environments)
    candidates.push(PathBuf::from(".tessera").join("logs").join("tessera.log"));

    candidates
}

/// RAII wrapper for terminal state with guaranteed cleanup on drop.
///
/// Raw mode and the alternate screen are restored on drop, so the terminal
/// stays usable after panics or early returns.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }

        match Terminal::new(CrosstermBackend::new(out)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(stdout(), LeaveAlternateScreen);
                Err(err.into())
            }
        }
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

fn open_store(config: &TesseraConfig) -> Box<dyn KeyValueStore> {
    match config.storage_path() {
        Some(path) => {
            tracing::info!(path = %path.display(), "Using file-backed toggle storage");
            Box::new(FileStore::new(path))
        }
        None => {
            tracing::warn!("No home directory; toggle state will not survive restarts");
            Box::new(MemoryStore::new())
        }
    }
}

fn build_controller(config: &TesseraConfig) -> Controller<HostPage> {
    let GridSettings {
        columns,
        rows,
        hidden,
    } = config.grid_settings();
    let page = HostPage::new(usize::from(columns), usize::from(rows), &hidden);
    let oracle = Arc::new(MockOracle::new(config.oracle_settings()));

    let mut controller = Controller::new(page, open_store(config), oracle, config.engine_settings());
    let alerts = controller.alert_sender();
    controller.page_mut().attach_alerts(alerts);
    controller
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = match TesseraConfig::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(err) => {
            tracing::warn!(path = %err.path().display(), "Using default config: {err}");
            TesseraConfig::default()
        }
    };
    let options = config.ui_options();
    let mut controller = build_controller(&config);

    let result = {
        let mut session = TerminalSession::new()?;
        run(&mut session.terminal, &mut controller, options).await
    };

    if let Err(err) = &result {
        eprintln!("Error: {err:?}");
    }
    result
}

const FRAME_DURATION: Duration = Duration::from_millis(16);

async fn run<B>(terminal: &mut Terminal<B>, controller: &mut Controller<HostPage>, options: UiOptions) -> Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    // Page lifecycle: content first, then the full load.
    controller.content_loaded();
    if let StartOutcome::Started { candidates } = controller.page_loaded(Instant::now()) {
        tracing::info!(candidates, "Solver auto-started on load");
    }

    let mut input = InputPump::new();
    let mut frames = tokio::time::interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result: Result<()> = loop {
        frames.tick().await;

        // Non-blocking input (drain queue only)
        match handle_events(controller, &mut input) {
            Ok(true) => break Ok(()),
            Ok(false) => {}
            Err(e) => break Err(e),
        }

        controller.tick(Instant::now());

        if let Err(e) = terminal.draw(|frame| draw(frame, controller, options)) {
            break Err(e.into());
        }
    };

    input.shutdown().await;
    result
}
