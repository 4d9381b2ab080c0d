//! Input handling for the Tessera terminal host.
//!
//! Terminal key presses stand in for the page's DOM events. Every key is first
//! offered to the page-wide key-up slot (which the notification modal may
//! own); only keys the slot hands back reach the host's own bindings.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tracing::debug;

use tessera_engine::{Controller, PointerTarget, Routed};

use crate::host::HostPage;

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25); // shutdown responsiveness
const INPUT_CHANNEL_CAPACITY: usize = 256;
const MAX_EVENTS_PER_FRAME: usize = 64; // never starve rendering

/// Message enqueued by the demo alert key.
pub const DEMO_ALERT: &str = "This is a non-blocking alert. Press Enter, Escape or Space.";

enum InputMsg {
    Event(Event),
    Error(String),
}

/// Background reader that forwards terminal events over a bounded channel.
pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<tokio::task::JoinHandle<()>>,
}

impl InputPump {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop2 = stop.clone();

        let join = tokio::task::spawn_blocking(move || input_loop(stop2, tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    pub async fn shutdown(&mut self) {
        self.rx.close();
        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = tokio::time::timeout(Duration::from_secs(2), join).await;
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        // Best-effort stop if caller exits early; do not block in Drop.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: Arc<AtomicBool>, tx: mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}

/// Host-level actions bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    Quit,
    ToggleSolver,
    /// Re-fire the page load event.
    Reload,
    Move { dx: isize, dy: isize },
    ClickTile,
    Undo,
    Submit,
    DemoAlert,
}

/// `KeyboardEvent.code` spelling of a terminal key.
#[must_use]
pub fn dom_code(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) if c.is_ascii_alphabetic() => format!("Key{}", c.to_ascii_uppercase()),
        KeyCode::Char(c) if c.is_ascii_digit() => format!("Digit{c}"),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Up => "ArrowUp".to_string(),
        KeyCode::Down => "ArrowDown".to_string(),
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        _ => return None,
    };
    Some(name)
}

/// Pointer events the keyboard simulates while a modal is open.
fn pointer_for(code: KeyCode) -> Option<PointerTarget> {
    match code {
        KeyCode::Backspace => Some(PointerTarget::Backdrop),
        KeyCode::Tab => Some(PointerTarget::Content),
        _ => None,
    }
}

#[must_use]
pub fn host_command(key: &KeyEvent) -> Option<HostCommand> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c')).then_some(HostCommand::Quit);
    }
    let command = match key.code {
        KeyCode::Char('q') => HostCommand::Quit,
        KeyCode::Char('t') => HostCommand::ToggleSolver,
        KeyCode::Char('r') => HostCommand::Reload,
        KeyCode::Char('u') => HostCommand::Undo,
        KeyCode::Char('s') => HostCommand::Submit,
        KeyCode::Char('a') => HostCommand::DemoAlert,
        KeyCode::Enter | KeyCode::Char(' ') => HostCommand::ClickTile,
        KeyCode::Up | KeyCode::Char('k') => HostCommand::Move { dx: 0, dy: -1 },
        KeyCode::Down | KeyCode::Char('j') => HostCommand::Move { dx: 0, dy: 1 },
        KeyCode::Left | KeyCode::Char('h') => HostCommand::Move { dx: -1, dy: 0 },
        KeyCode::Right | KeyCode::Char('l') => HostCommand::Move { dx: 1, dy: 0 },
        _ => return None,
    };
    Some(command)
}

/// Apply one host command. Returns `true` when the host should quit.
pub fn apply_command(controller: &mut Controller<HostPage>, command: HostCommand, now: Instant) -> bool {
    match command {
        HostCommand::Quit => return true,
        HostCommand::ToggleSolver => {
            controller.click_toggle(now);
        }
        HostCommand::Reload => {
            controller.page_loaded(now);
        }
        HostCommand::Move { dx, dy } => controller.page_mut().move_cursor(dx, dy),
        HostCommand::ClickTile => {
            if let Some(id) = controller.page().cursor_id() {
                controller.click_item(&id);
            }
        }
        HostCommand::Undo => controller.click_undo(),
        HostCommand::Submit => {
            controller.click_submit();
        }
        HostCommand::DemoAlert => {
            controller.alert_sender().alert(DEMO_ALERT);
        }
    }
    false
}

/// Route one key press. Returns `true` when the host should quit.
pub fn handle_key(controller: &mut Controller<HostPage>, key: KeyEvent, now: Instant) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    // Ctrl+C always quits, even under a modal.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    let routed = if let Some(target) = pointer_for(key.code)
        && controller.notifications().is_active()
    {
        controller.pointer(target, now)
    } else if let Some(code) = dom_code(key.code) {
        controller.key_up(&code, now)
    } else {
        Routed::Host(None)
    };

    match routed {
        Routed::Host(_) => host_command(&key).is_some_and(|command| apply_command(controller, command, now)),
        Routed::Dismissed(cause) => {
            debug!(?cause, "Key dismissed the alert");
            false
        }
        Routed::Swallowed => false,
    }
}

/// Drain pending terminal events. Returns `true` when the host should quit.
pub fn handle_events(controller: &mut Controller<HostPage>, input: &mut InputPump) -> Result<bool> {
    let mut processed = 0;
    while processed < MAX_EVENTS_PER_FRAME {
        let ev = match input.rx.try_recv() {
            Ok(InputMsg::Event(ev)) => ev,
            Ok(InputMsg::Error(msg)) => return Err(anyhow!("input error: {msg}")),
            Err(mpsc::error::TryRecvError::Empty) => break,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                return Err(anyhow!("input pump disconnected"));
            }
        };
        if let Event::Key(key) = ev
            && handle_key(controller, key, Instant::now())
        {
            return Ok(true);
        }
        processed += 1;
    }
    Ok(false)
}
