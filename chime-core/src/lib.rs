//! Board-agnostic core logic for the doorbell chime
//!
//! This crate contains all application logic that does not depend on
//! specific hardware or on an async runtime:
//!
//! - Collaborator traits (actuator bank, button input, entropy source)
//! - Button debouncing
//! - Tune compilation from the byte-encoded record format
//! - Tune selection without repetition
//! - Playback bookkeeping (cursor and cancellation drain)
//! - Doorbell state machine
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod debounce;
pub mod notes;
pub mod pins;
pub mod playback;
pub mod selection;
pub mod sequence;
pub mod state;
pub mod traits;

pub use pins::Pins;
