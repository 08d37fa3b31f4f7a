//! Hardware abstraction traits
//!
//! These traits define the interface between the doorbell logic and the
//! collaborators that own the hardware: the solenoid actuator bank, the
//! door buttons, and the entropy source used to seed tune selection.

pub mod actuator;
pub mod entropy;
pub mod input;

pub use actuator::{ActuatorBank, ActuatorError};
pub use entropy::{EntropyError, EntropySource, NoEntropy};
pub use input::{ButtonInput, InputError};
