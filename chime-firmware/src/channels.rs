//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use chime_core::Pins;

use crate::player::PlaybackLink;

/// Channel capacity for debounced button changes
pub const BUTTON_CHANNEL_SIZE: usize = 4;

/// Debounced button state changes
pub type ButtonChannel = Channel<CriticalSectionRawMutex, Pins, BUTTON_CHANNEL_SIZE>;

/// Debounced button changes from the button task to the doorbell task
pub static BUTTONS: ButtonChannel = Channel::new();

/// Play requests from the doorbell task to the player task
pub static PLAYBACK: PlaybackLink<'static> = PlaybackLink::new();
