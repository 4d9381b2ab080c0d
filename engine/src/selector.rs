//! Image-selection handler: binds the selection set to the page's hooks.

use tracing::{debug, info};

use tessera_types::{ItemId, SelectionSet};

use crate::page::Page;

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The serialized selection written into the form.
    Submitted(String),
    /// Nothing selected; submission suppressed.
    Empty,
    /// The handler never installed.
    Inert,
}

#[derive(Debug)]
struct BoundSelector {
    selection: SelectionSet,
    /// Items that existed when the handler installed; only these react to clicks.
    bound: Vec<ItemId>,
}

impl BoundSelector {
    fn sync_actions(&self, page: &mut impl Page) {
        page.set_actions_enabled(!self.selection.is_empty());
    }
}

#[derive(Debug, Default)]
enum SelectorState {
    #[default]
    Pending,
    Inert,
    Bound(BoundSelector),
}

/// Selection handler lifecycle.
///
/// Starts pending and installs once on content-loaded. With any required hook
/// missing it stays inert for the rest of the page lifetime.
#[derive(Debug, Default)]
pub struct ImageSelector {
    state: SelectorState,
}

impl ImageSelector {
    /// Install against the page. Later calls are ignored.
    pub fn install(&mut self, page: &impl Page) {
        if !matches!(self.state, SelectorState::Pending) {
            return;
        }
        if !page.has_selection_hooks() {
            info!("Selection hooks missing, selection handler stays inert");
            self.state = SelectorState::Inert;
            return;
        }
        let bound: Vec<ItemId> = page
            .candidates()
            .into_iter()
            .filter_map(|item| item.id)
            .collect();
        info!(items = bound.len(), "Selection handler installed");
        self.state = SelectorState::Bound(BoundSelector {
            selection: SelectionSet::new(),
            bound,
        });
    }

    #[must_use]
    pub fn is_inert(&self) -> bool {
        matches!(self.state, SelectorState::Inert)
    }

    #[must_use]
    pub fn selection(&self) -> Option<&SelectionSet> {
        match &self.state {
            SelectorState::Bound(bound) => Some(&bound.selection),
            _ => None,
        }
    }

    /// Item click. Returns the new membership, or `None` if the click had no listener.
    pub fn click(&mut self, id: &ItemId, page: &mut impl Page) -> Option<bool> {
        let SelectorState::Bound(bound) = &mut self.state else {
            debug!(id = %id, "Item click ignored, selection handler not installed");
            return None;
        };
        if !bound.bound.contains(id) {
            debug!(id = %id, "Item click ignored, item was not bound at install");
            return None;
        }
        let selected = bound.selection.toggle(id);
        page.mark_selected(id, selected);
        bound.sync_actions(page);
        Some(selected)
    }

    /// Undo control: clear the selection and every item's marker.
    pub fn undo(&mut self, page: &mut impl Page) {
        let SelectorState::Bound(bound) = &mut self.state else {
            return;
        };
        bound.selection.clear();
        for id in &bound.bound {
            page.mark_selected(id, false);
        }
        bound.sync_actions(page);
    }

    pub fn submit(&mut self, page: &mut impl Page) -> SubmitOutcome {
        let SelectorState::Bound(bound) = &mut self.state else {
            return SubmitOutcome::Inert;
        };
        if bound.selection.is_empty() {
            return SubmitOutcome::Empty;
        }
        let value = bound.selection.serialize();
        info!(selection = %value, "Submitting selection");
        page.submit_form(&value);
        for id in bound.selection.iter() {
            page.mark_selected(id, false);
        }
        bound.selection.clear();
        bound.sync_actions(page);
        SubmitOutcome::Submitted(value)
    }
}
