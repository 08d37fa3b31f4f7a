//! Board support
//!
//! Only the host simulation board exists so far: solenoid strikes go to
//! the log and the door buttons are driven from the console.

pub mod sim;

use chime_core::pins::MAX_LINES;
use chime_drivers::{ButtonPins, PinBank};

pub use sim::{clock_seed, spawn_console, HostEntropy};

use sim::{SimInput, SimOutput};

/// Solenoid outputs of the simulated board
pub type SolenoidBank = PinBank<SimOutput, MAX_LINES>;

/// Door button inputs of the simulated board
pub type DoorButtons = ButtonPins<SimInput, MAX_LINES>;

/// Solenoid bank with one simulated pin per line
pub fn solenoids() -> SolenoidBank {
    PinBank::new_active_high(core::array::from_fn(SimOutput::new))
}

/// Button inputs backed by the console button lines
pub fn buttons() -> DoorButtons {
    ButtonPins::new_active_high(core::array::from_fn(SimInput::new))
}
