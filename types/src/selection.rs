//! Ordered multi-select state for the challenge grid.

use crate::ItemId;

/// Separator used when the selection is written into the form field.
pub const SELECTION_DELIMITER: char = ',';

/// Ordered set of selected item ids.
///
/// Insertion order is preserved and ids are distinct. Grids hold at most a few
/// dozen items, so membership is a linear scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: Vec<ItemId>,
}

impl SelectionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `id`.
    ///
    /// Returns `true` when the id is now selected, `false` when it was removed.
    pub fn toggle(&mut self, id: &ItemId) -> bool {
        if let Some(index) = self.ids.iter().position(|existing| existing == id) {
            self.ids.remove(index);
            false
        } else {
            self.ids.push(id.clone());
            true
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemId> {
        self.ids.iter()
    }

    /// Selected ids joined by [`SELECTION_DELIMITER`], in selection order.
    #[must_use]
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for (i, id) in self.ids.iter().enumerate() {
            if i > 0 {
                out.push(SELECTION_DELIMITER);
            }
            out.push_str(id.as_str());
        }
        out
    }
}
