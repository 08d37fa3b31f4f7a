//! GPIO solenoid outputs
//!
//! Drives each solenoid channel from its own GPIO pin, directly or via a
//! MOSFET/driver board.

use chime_core::traits::{ActuatorBank, ActuatorError};
use embedded_hal::digital::OutputPin;

/// Bank of GPIO-driven solenoid lines
///
/// Line `i` is `pins[i]`. The bank can be configured as active-high
/// (default) or active-low for inverting driver boards.
pub struct PinBank<P, const N: usize> {
    pins: [P; N],
    /// If true, solenoid ON = pin LOW
    inverted: bool,
}

impl<P: OutputPin, const N: usize> PinBank<P, N> {
    /// Create a new bank
    ///
    /// # Arguments
    /// - `pins`: One output pin per channel
    /// - `inverted`: If true, a channel is ON when its pin is LOW
    ///
    /// The lines are not touched until the first write; call
    /// [`ActuatorBank::all_off`] to put them in a known state.
    pub fn new(pins: [P; N], inverted: bool) -> Self {
        Self { pins, inverted }
    }

    /// Create a bank with active-high outputs
    pub fn new_active_high(pins: [P; N]) -> Self {
        Self::new(pins, false)
    }

    /// Create a bank with active-low outputs
    pub fn new_active_low(pins: [P; N]) -> Self {
        Self::new(pins, true)
    }

    /// Give back the pins
    pub fn release(self) -> [P; N] {
        self.pins
    }
}

impl<P: OutputPin, const N: usize> ActuatorBank for PinBank<P, N> {
    fn line_count(&self) -> usize {
        N
    }

    fn set_line(&mut self, index: usize, on: bool) -> Result<(), ActuatorError> {
        assert!(index < N, "solenoid line {} out of range", index);
        let pin = &mut self.pins[index];

        let result = if on != self.inverted {
            pin.set_high()
        } else {
            pin.set_low()
        };
        result.map_err(|_| ActuatorError::Bus)
    }
}
