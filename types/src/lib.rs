//! Core domain types for Tessera.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application: the engine's state
//! machines, the terminal host, and the configuration loader.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod candidate;
mod dismiss;
mod ids;
mod oracle;
mod selection;
pub mod settings;

pub use candidate::{CandidateItem, ComputedStyle, Display, PositionGroups, PositionKey, Rect, Visibility};
pub use dismiss::{DismissCause, DismissEvent, DismissKey, PointerTarget, UnknownDismissKey};
pub use ids::{EmptyItemIdError, ItemId, ModalId};
pub use oracle::{CandidateSnapshot, OracleVerdict, SolveRequest};
pub use selection::{SELECTION_DELIMITER, SelectionSet};
