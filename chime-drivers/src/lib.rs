//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in chime-core on top of `embedded-hal` digital pins:
//!
//! - Solenoid output bank (one GPIO per channel)
//! - Door button inputs

#![no_std]
#![deny(unsafe_code)]

pub mod input;
pub mod output;

pub use input::ButtonPins;
pub use output::PinBank;
