//! Integration scenarios, grouped by component.

mod host;
mod notifications;
mod persistence;
