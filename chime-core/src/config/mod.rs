//! Configuration types
//!
//! Board-agnostic chime settings. Deserializable with the `serde` feature;
//! the firmware reads them from TOML.

pub mod types;

pub use types::*;
