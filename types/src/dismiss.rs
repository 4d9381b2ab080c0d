//! Dismiss triggers for the notification modal.
//!
//! Pointer, key and timeout dismissals are one closed set of events so the
//! queue evaluates them in a single place.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Key codes that may close the modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DismissKey {
    Enter,
    Escape,
    Space,
}

impl DismissKey {
    pub const ALL: [DismissKey; 3] = [DismissKey::Enter, DismissKey::Escape, DismissKey::Space];

    /// The `KeyboardEvent.code` spelling of this key.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            DismissKey::Enter => "Enter",
            DismissKey::Escape => "Escape",
            DismissKey::Space => "Space",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown dismiss key code: {0}")]
pub struct UnknownDismissKey(pub String);

impl FromStr for DismissKey {
    type Err = UnknownDismissKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.code() == s)
            .ok_or_else(|| UnknownDismissKey(s.to_string()))
    }
}

impl fmt::Display for DismissKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Where a pointer interaction landed relative to the modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// The dimmed surface behind the dialog box.
    Backdrop,
    /// The dialog box or its text.
    Content,
    /// Anything that is not part of the modal.
    Elsewhere,
}

/// An input or timer event offered to the active modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DismissEvent {
    Pointer(PointerTarget),
    /// Key-up carrying a `KeyboardEvent.code` string.
    KeyUp(String),
    Timeout,
}

/// Why a modal was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissCause {
    Backdrop,
    Key(DismissKey),
    Timeout,
}

impl DismissEvent {
    /// Decide whether this event closes the modal under the given key set.
    #[must_use]
    pub fn evaluate(&self, keys: &[DismissKey]) -> Option<DismissCause> {
        match self {
            DismissEvent::Pointer(PointerTarget::Backdrop) => Some(DismissCause::Backdrop),
            DismissEvent::Pointer(_) => None,
            DismissEvent::KeyUp(code) => keys
                .iter()
                .copied()
                .find(|key| key.code() == code)
                .map(DismissCause::Key),
            DismissEvent::Timeout => Some(DismissCause::Timeout),
        }
    }
}
