//! Configuration type definitions
//!
//! Every field has a default matching the standard 24-tube chime with five
//! door buttons, so a partial config only has to name what it changes.

use core::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::notes::{Note, NOTE_COUNT};
use crate::pins::{Pins, MAX_LINES};

/// Mask covering the five door button inputs
pub const DEFAULT_BUTTON_MASK: u32 = 0x1f;

/// Timer pool settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimerSettings {
    /// Idle workers kept around for reuse
    pub max_idle_workers: u8,
    /// Longest single sleep a worker takes (ms)
    pub max_sleep_ms: u32,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            max_idle_workers: 5,
            max_sleep_ms: 500,
        }
    }
}

impl TimerSettings {
    /// Longest single worker sleep
    pub fn max_sleep(&self) -> Duration {
        Duration::from_millis(u64::from(self.max_sleep_ms))
    }
}

/// Chime configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ChimeConfig {
    /// Number of solenoid channels
    pub channel_count: u8,
    /// Button input lines to watch
    pub button_mask: u32,
    /// Solenoid energize time (ms)
    pub pulse_ms: u32,
    /// Debounce window (ms)
    pub debounce_ms: u32,
    /// Press length that starts a tune (ms)
    pub hold_ms: u32,
    /// Button polling interval (ms)
    pub poll_interval_ms: u32,
    /// Channel struck on press
    pub ding_channel: u8,
    /// Channel struck on release
    pub dong_channel: u8,
    /// Timer pool settings
    pub timer: TimerSettings,
}

impl Default for ChimeConfig {
    fn default() -> Self {
        Self {
            channel_count: NOTE_COUNT as u8,
            button_mask: DEFAULT_BUTTON_MASK,
            pulse_ms: 200,
            debounce_ms: 50,
            hold_ms: 750,
            poll_interval_ms: 1,
            ding_channel: Note::DING.channel(),
            dong_channel: Note::DONG.channel(),
            timer: TimerSettings::default(),
        }
    }
}

/// Errors that can occur when validating configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// More channels than output lines
    TooManyChannels(u8),
    /// Ding or dong channel outside the channel count
    ChannelOutOfRange(u8),
    /// Empty button mask
    InvalidButtonMask(u32),
    /// Pulse width of zero
    ZeroPulse,
    /// Poll interval of zero
    ZeroPollInterval,
}

impl ChimeConfig {
    /// Check the configuration for values the hardware can't honor
    pub fn validate(&self) -> Result<(), ConfigError> {
        if usize::from(self.channel_count) > MAX_LINES {
            return Err(ConfigError::TooManyChannels(self.channel_count));
        }
        for channel in [self.ding_channel, self.dong_channel] {
            if channel >= self.channel_count {
                return Err(ConfigError::ChannelOutOfRange(channel));
            }
        }
        if self.button_mask == 0 {
            return Err(ConfigError::InvalidButtonMask(self.button_mask));
        }
        if self.pulse_ms == 0 {
            return Err(ConfigError::ZeroPulse);
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        Ok(())
    }

    /// Channels the actuator bank drives
    pub fn channel_count(&self) -> usize {
        usize::from(self.channel_count)
    }

    /// Button lines to watch
    pub fn buttons(&self) -> Pins {
        Pins(self.button_mask)
    }

    pub fn pulse(&self) -> Duration {
        ms(self.pulse_ms)
    }

    pub fn debounce_window(&self) -> Duration {
        ms(self.debounce_ms)
    }

    pub fn hold(&self) -> Duration {
        ms(self.hold_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        ms(self.poll_interval_ms)
    }
}

fn ms(value: u32) -> Duration {
    Duration::from_millis(u64::from(value))
}
