//! Button input trait

use crate::pins::Pins;

/// Errors that can occur when reading button lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputError {
    /// Bus transaction to the input expander failed
    Bus,
}

/// Trait for reading the raw state of the door buttons
///
/// A set bit means the corresponding button is pressed. Readings are
/// raw and may bounce; see [`crate::debounce`].
pub trait ButtonInput {
    /// Read all button lines
    fn read_lines(&mut self) -> Result<Pins, InputError>;
}
