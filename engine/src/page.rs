//! Page collaborator seams.
//!
//! The engine never touches a document directly. Hosts (a browser bridge, the
//! terminal demo, test fakes) implement these traits and the engine drives
//! them from its event handlers.

use tessera_types::{CandidateItem, ItemId};

/// The challenge page: grid items, selection hooks, form, status line and the
/// solver toggle control.
pub trait Page {
    /// Candidate items in document order, with current geometry and style.
    fn candidates(&self) -> Vec<CandidateItem>;

    /// Whether the undo control, submit control, form and selected-values
    /// field are all present.
    fn has_selection_hooks(&self) -> bool;

    /// Apply or remove the `selected` marker on one item.
    fn mark_selected(&mut self, id: &ItemId, selected: bool);

    /// Enable or disable the undo and submit controls together.
    fn set_actions_enabled(&mut self, enabled: bool);

    /// Write `value` into the selected-values field and submit the form.
    fn submit_form(&mut self, value: &str);

    fn set_status_text(&mut self, text: &str);

    /// Reflect the solver toggle state on its control.
    fn set_toggle_indicator(&mut self, enabled: bool);

    /// Start or stop the toggle control's click pulse.
    fn set_toggle_pulse(&mut self, active: bool);
}

/// The single surface the notification modal is drawn on.
pub trait ModalSurface {
    fn show_modal(&mut self, message: &str);
    fn hide_modal(&mut self);
    fn title(&self) -> String;
    fn set_title(&mut self, title: &str);
}
