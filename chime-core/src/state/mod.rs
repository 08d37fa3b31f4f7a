//! Doorbell state machine
//!
//! Pure transition logic for the controller. Waiting, timing and playback
//! are the caller's job; the machine only says which state comes next and
//! which command to carry out on the way.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::{Command, State};
