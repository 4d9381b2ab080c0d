//! Transient status line.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::page::Page;

/// Generation of one published status. A blanking only applies to the
/// generation that scheduled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct StatusToken(u64);

#[derive(Debug)]
struct StatusEntry {
    text: String,
    token: StatusToken,
    expires_at: Instant,
}

/// Single owned status slot.
#[derive(Debug)]
pub struct StatusSlot {
    ttl: Duration,
    current: Option<StatusEntry>,
    generation: u64,
}

impl StatusSlot {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            current: None,
            generation: 0,
        }
    }

    pub fn publish(&mut self, text: impl Into<String>, now: Instant, page: &mut impl Page) -> StatusToken {
        self.generation = self.generation.wrapping_add(1);
        let token = StatusToken(self.generation);
        let text = text.into();
        page.set_status_text(&text);
        debug!(status = %text, generation = self.generation, "Status published");
        self.current = Some(StatusEntry {
            text,
            token,
            expires_at: now + self.ttl,
        });
        token
    }

    /// Blank the slot if `token` is still current and its time has come.
    ///
    /// Returns `true` if the page was blanked.
    pub fn expire(&mut self, token: StatusToken, now: Instant, page: &mut impl Page) -> bool {
        let due = self
            .current
            .as_ref()
            .is_some_and(|entry| entry.token == token && now >= entry.expires_at);
        if due {
            self.current = None;
            page.set_status_text("");
        }
        due
    }

    pub fn tick(&mut self, now: Instant, page: &mut impl Page) {
        if let Some(token) = self.current.as_ref().map(|entry| entry.token) {
            self.expire(token, now, page);
        }
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.current.as_ref().map(|entry| entry.text.as_str())
    }
}
