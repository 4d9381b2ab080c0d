//! The solver on/off control.

use std::time::{Duration, Instant};

use tracing::info;

use crate::page::Page;
use crate::toggle::PersistentToggle;

/// Binds the toggle control to [`PersistentToggle`] and owns its click pulse.
#[derive(Debug)]
pub struct ToggleButton {
    pulse: Duration,
    pulse_until: Option<Instant>,
}

impl ToggleButton {
    #[must_use]
    pub fn new(pulse: Duration) -> Self {
        Self {
            pulse,
            pulse_until: None,
        }
    }

    /// Paint the indicator from the reconciled toggle without pulsing.
    pub fn sync(&self, toggle: &PersistentToggle, page: &mut impl Page) {
        page.set_toggle_indicator(toggle.get());
    }

    /// Handle one activation. Returns the new toggle state; the caller starts
    /// a solve when it is `true`.
    pub fn activate(&mut self, toggle: &mut PersistentToggle, now: Instant, page: &mut impl Page) -> bool {
        let enabled = toggle.toggle();
        page.set_toggle_indicator(enabled);
        page.set_toggle_pulse(true);
        self.pulse_until = Some(now + self.pulse);
        info!(
            degraded = toggle.is_degraded(),
            "Captcha solving is now {}",
            if enabled { "ON" } else { "OFF" }
        );
        enabled
    }

    #[must_use]
    pub fn is_pulsing(&self) -> bool {
        self.pulse_until.is_some()
    }

    pub fn tick(&mut self, now: Instant, page: &mut impl Page) {
        if self.pulse_until.is_some_and(|until| now >= until) {
            self.pulse_until = None;
            page.set_toggle_pulse(false);
        }
    }
}
