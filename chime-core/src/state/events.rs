//! Events that trigger state transitions

use crate::pins::Pins;

/// Events observed by the doorbell controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Debounced buttons went from all up to any down
    Pressed,
    /// Debounced buttons went from any down to all up
    Released,
    /// Hold timer fired while the button was still down
    HoldElapsed,
    /// The playing tune ran to completion
    TuneFinished,
}

impl Event {
    /// Derive a button event from two consecutive debounced readings
    ///
    /// Returns `None` when the reading changes between two non-zero
    /// values (another button joining a held one) or does not change.
    pub fn from_buttons(previous: Pins, current: Pins) -> Option<Self> {
        match (!previous.is_empty(), !current.is_empty()) {
            (false, true) => Some(Event::Pressed),
            (true, false) => Some(Event::Released),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_buttons() {
        assert_eq!(Event::from_buttons(Pins(0), Pins(0b100)), Some(Event::Pressed));
        assert_eq!(Event::from_buttons(Pins(0b101), Pins(0)), Some(Event::Released));
        assert_eq!(Event::from_buttons(Pins(0b001), Pins(0b011)), None);
        assert_eq!(Event::from_buttons(Pins(0), Pins(0)), None);
    }
}
