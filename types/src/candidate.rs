//! Candidate grid items as reported by the page.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ItemId;

/// On-screen bounding box of an item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Display {
    #[default]
    Shown,
    None,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

/// The subset of computed style the solver reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputedStyle {
    pub display: Display,
    pub visibility: Visibility,
    /// Rendered background descriptor, used as the item's visual fingerprint.
    pub background: String,
}

/// A selectable grid element considered for automated solving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateItem {
    pub id: Option<ItemId>,
    pub rect: Rect,
    pub style: ComputedStyle,
}

impl CandidateItem {
    #[must_use]
    pub fn new(id: Option<ItemId>, rect: Rect, style: ComputedStyle) -> Self {
        Self { id, rect, style }
    }

    /// Zero-area, `display: none` and `visibility: hidden` items are invisible.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.rect.has_area()
            && self.style.display != Display::None
            && self.style.visibility != Visibility::Hidden
    }

    #[must_use]
    pub fn position(&self) -> PositionKey {
        PositionKey::from_rect(&self.rect)
    }

    #[must_use]
    pub fn fingerprint(&self) -> &str {
        &self.style.background
    }
}

/// Rounded on-screen position used to group co-located items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PositionKey {
    pub x: i64,
    pub y: i64,
}

impl PositionKey {
    #[must_use]
    pub fn from_rect(rect: &Rect) -> Self {
        Self {
            x: rect.x.round() as i64,
            y: rect.y.round() as i64,
        }
    }
}

impl fmt::Display for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Visual fingerprints grouped by rounded position.
///
/// Fingerprints at one position keep document order. Only visible items are
/// recorded; callers filter before inserting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionGroups {
    groups: BTreeMap<PositionKey, Vec<String>>,
}

impl PositionGroups {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, position: PositionKey, fingerprint: impl Into<String>) {
        self.groups
            .entry(position)
            .or_default()
            .push(fingerprint.into());
    }

    /// Fingerprints at `position` joined with `/`.
    #[must_use]
    pub fn joined(&self, position: PositionKey) -> Option<String> {
        self.groups.get(&position).map(|prints| prints.join("/"))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PositionKey, &[String])> {
        self.groups.iter().map(|(key, prints)| (key, prints.as_slice()))
    }
}
