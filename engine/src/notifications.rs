//! Queued, non-blocking replacement for the blocking alert dialog.
//!
//! Messages arrive from anywhere and are shown one at a time on a single
//! [`ModalSurface`]. Each presentation overrides the page-wide click and key-up
//! handler slots with one layer and pops exactly that layer on dismissal.

use std::collections::VecDeque;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, info};

use tessera_types::settings::NotificationSettings;
use tessera_types::{DismissCause, DismissEvent, ModalId, PointerTarget};

use crate::page::ModalSurface;

/// Occupant of a page-wide handler slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerId {
    /// A handler the host installed.
    Host(u32),
    /// The dismiss handler of one presented modal.
    Modal(ModalId),
}

/// The page-wide click and key-up handler slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandlerSlots {
    pub click: Option<HandlerId>,
    pub key_up: Option<HandlerId>,
}

impl HandlerSlots {
    fn owned_by(id: ModalId) -> Self {
        Self {
            click: Some(HandlerId::Modal(id)),
            key_up: Some(HandlerId::Modal(id)),
        }
    }
}

/// Where an input event ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    /// The active modal closed.
    Dismissed(DismissCause),
    /// The active modal's handler saw the event and kept the modal open.
    Swallowed,
    /// Not the modal's event; delivered to whatever occupies the slot.
    Host(Option<HandlerId>),
}

#[derive(Debug)]
struct TitleFlash {
    next_flash: Instant,
    /// Undecorated title and revert deadline while decorated.
    decorated: Option<(String, Instant)>,
}

impl TitleFlash {
    fn new(now: Instant, settings: &NotificationSettings) -> Self {
        Self {
            next_flash: now + settings.flash_interval,
            decorated: None,
        }
    }

    fn tick(&mut self, now: Instant, settings: &NotificationSettings, surface: &mut impl ModalSurface) {
        if let Some((_, revert_at)) = &self.decorated
            && now >= *revert_at
        {
            self.stop(surface);
        }
        if self.decorated.is_none() && now >= self.next_flash {
            let original = surface.title();
            surface.set_title(&format!("{original}{}", settings.title_suffix));
            self.decorated = Some((original, now + settings.flash_duration));
            while self.next_flash <= now {
                self.next_flash += settings.flash_interval;
            }
        }
    }

    fn stop(&mut self, surface: &mut impl ModalSurface) {
        if let Some((original, _)) = self.decorated.take() {
            surface.set_title(&original);
        }
    }
}

#[derive(Debug)]
struct ActiveModal {
    id: ModalId,
    message: String,
    deadline: Instant,
    /// Slot values displaced by this presentation.
    saved: HandlerSlots,
    flash: TitleFlash,
}

/// FIFO of pending messages plus the single active modal.
#[derive(Debug)]
pub struct NotificationQueue {
    pending: VecDeque<String>,
    active: Option<ActiveModal>,
    slots: HandlerSlots,
    next_id: ModalId,
    presented: u64,
    settings: NotificationSettings,
}

impl NotificationQueue {
    #[must_use]
    pub fn new(settings: NotificationSettings) -> Self {
        Self {
            pending: VecDeque::new(),
            active: None,
            slots: HandlerSlots::default(),
            next_id: ModalId::new(1),
            presented: 0,
            settings,
        }
    }

    /// Append a message; presents it at once if nothing is showing.
    pub fn enqueue(&mut self, message: impl Into<String>, now: Instant, surface: &mut impl ModalSurface) {
        self.pending.push_back(message.into());
        if self.active.is_none() {
            self.present_next(now, surface);
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    #[must_use]
    pub fn active_message(&self) -> Option<&str> {
        self.active.as_ref().map(|modal| modal.message.as_str())
    }

    #[must_use]
    pub fn active_id(&self) -> Option<ModalId> {
        self.active.as_ref().map(|modal| modal.id)
    }

    /// Messages waiting behind the active one.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Total presentations so far.
    #[must_use]
    pub fn presented(&self) -> u64 {
        self.presented
    }

    #[must_use]
    pub fn slots(&self) -> HandlerSlots {
        self.slots
    }

    /// Host writes to the click slot. Overwrites whatever is there, modal layer included.
    pub fn set_click_handler(&mut self, handler: Option<HandlerId>) {
        self.slots.click = handler;
    }

    pub fn set_key_up_handler(&mut self, handler: Option<HandlerId>) {
        self.slots.key_up = handler;
    }

    /// A pointer interaction anywhere on the page.
    pub fn pointer(&mut self, target: PointerTarget, now: Instant, surface: &mut impl ModalSurface) -> Routed {
        let slot = self.slots.click;
        self.route(slot, DismissEvent::Pointer(target), now, surface)
    }

    /// A key-up anywhere on the page, by `KeyboardEvent.code`.
    pub fn key_up(&mut self, code: &str, now: Instant, surface: &mut impl ModalSurface) -> Routed {
        let slot = self.slots.key_up;
        self.route(slot, DismissEvent::KeyUp(code.to_string()), now, surface)
    }

    /// Advance title flashing and fire the auto-dismiss timeout.
    pub fn tick(&mut self, now: Instant, surface: &mut impl ModalSurface) {
        let Some(modal) = self.active.as_mut() else {
            return;
        };
        if now >= modal.deadline {
            if let Some(cause) = DismissEvent::Timeout.evaluate(&self.settings.dismiss_keys) {
                self.dismiss(cause, now, surface);
            }
            return;
        }
        modal.flash.tick(now, &self.settings, surface);
    }

    fn route(
        &mut self,
        slot: Option<HandlerId>,
        event: DismissEvent,
        now: Instant,
        surface: &mut impl ModalSurface,
    ) -> Routed {
        let owns_slot = matches!(
            (slot, self.active_id()),
            (Some(HandlerId::Modal(held)), Some(active)) if held == active
        );
        if !owns_slot {
            return Routed::Host(slot);
        }
        match event.evaluate(&self.settings.dismiss_keys) {
            Some(cause) => {
                self.dismiss(cause, now, surface);
                Routed::Dismissed(cause)
            }
            None => {
                debug!(?event, "Modal kept open");
                Routed::Swallowed
            }
        }
    }

    fn dismiss(&mut self, cause: DismissCause, now: Instant, surface: &mut impl ModalSurface) {
        let Some(mut modal) = self.active.take() else {
            return;
        };
        surface.hide_modal();
        modal.flash.stop(surface);
        self.slots = modal.saved;
        info!(modal = %modal.id, ?cause, remaining = self.pending.len(), "Alert dismissed");
        self.present_next(now, surface);
    }

    fn present_next(&mut self, now: Instant, surface: &mut impl ModalSurface) {
        while let Some(message) = self.pending.pop_front() {
            if message.is_empty() {
                debug!("Skipping empty alert message");
                continue;
            }
            let id = self.next_id;
            self.next_id = id.next();
            self.presented += 1;
            surface.show_modal(&message);
            let saved = std::mem::replace(&mut self.slots, HandlerSlots::owned_by(id));
            info!(modal = %id, remaining = self.pending.len(), "Alert presented");
            self.active = Some(ActiveModal {
                id,
                message,
                deadline: now + self.settings.timeout,
                saved,
                flash: TitleFlash::new(now, &self.settings),
            });
            return;
        }
    }
}

/// Cloneable sink standing in for the page's blocking alert primitive.
///
/// Messages are enqueued on the controller's next turn.
#[derive(Debug, Clone)]
pub struct AlertSender {
    tx: mpsc::UnboundedSender<String>,
}

impl AlertSender {
    pub(crate) fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Returns `false` once the controller is gone.
    pub fn alert(&self, message: impl Into<String>) -> bool {
        self.tx.send(message.into()).is_ok()
    }
}
