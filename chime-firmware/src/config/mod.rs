//! Configuration loading and parsing
//!
//! Loads the chime configuration from a TOML file, or falls back to the
//! built-in defaults.

pub mod loader;

pub use loader::{config_path, load_or_default, TuneEntry};

use chime_core::config::TimerSettings;
use chime_timer::TimerConfig;

/// Timer pool settings for [`chime_timer::Timer`]
pub fn timer_config(settings: &TimerSettings) -> TimerConfig {
    TimerConfig {
        max_idle: usize::from(settings.max_idle_workers),
        max_sleep: settings.max_sleep(),
    }
}
