//! Tune compilation
//!
//! A tune is stored as a flat byte stream of 3-byte records:
//!
//! ```text
//! [delay_hi, delay_lo, channel]
//! ```
//!
//! The delay is a big-endian millisecond count added to a running clock
//! before the record's channel fires. Each retained record becomes one
//! solenoid pulse: an activation at the accumulated offset and a
//! deactivation one pulse width later.

use core::time::Duration;

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum actions in a compiled sequence (two per pulse)
pub const MAX_ACTIONS: usize = 512;

/// Size of one encoded tune record
pub const RECORD_LEN: usize = 3;

/// A single transition on one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Action {
    /// Solenoid channel
    pub channel: u8,
    /// Energize (true) or release (false) the channel
    pub on: bool,
    /// Time from the start of the sequence
    pub offset: Duration,
}

impl Action {
    /// Create an activation at `offset`
    pub const fn activate(channel: u8, offset: Duration) -> Self {
        Self {
            channel,
            on: true,
            offset,
        }
    }

    /// Create a deactivation at `offset`
    pub const fn deactivate(channel: u8, offset: Duration) -> Self {
        Self {
            channel,
            on: false,
            offset,
        }
    }
}

/// Time-ordered list of actions
pub type ActionSequence = Vec<Action, MAX_ACTIONS>;

/// Errors that can occur when compiling a tune
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequenceError {
    /// Tune needs more than [`MAX_ACTIONS`] actions
    TooManyActions,
}

/// Compile tune bytes into a time-ordered action sequence
///
/// Records naming a channel `>= channel_count` are skipped but still
/// advance the clock. A trailing partial record is ignored. Actions are
/// stably sorted by offset, so actions sharing an offset keep the order in
/// which they were produced.
pub fn compile(
    channel_count: usize,
    data: &[u8],
    pulse: Duration,
) -> Result<ActionSequence, SequenceError> {
    let mut actions = ActionSequence::new();
    let mut now = Duration::ZERO;

    for record in data.chunks_exact(RECORD_LEN) {
        let delay_ms = u16::from_be_bytes([record[0], record[1]]);
        let channel = record[2];
        now += Duration::from_millis(u64::from(delay_ms));

        if usize::from(channel) >= channel_count {
            continue;
        }

        actions
            .push(Action::activate(channel, now))
            .map_err(|_| SequenceError::TooManyActions)?;
        actions
            .push(Action::deactivate(channel, now + pulse))
            .map_err(|_| SequenceError::TooManyActions)?;
    }

    sort_by_offset(&mut actions);
    Ok(actions)
}

/// Build a single pulse on `channel` starting immediately
pub fn pulse(channel: u8, width: Duration) -> ActionSequence {
    let mut actions = ActionSequence::new();
    // Capacity is far above two
    let _ = actions.push(Action::activate(channel, Duration::ZERO));
    let _ = actions.push(Action::deactivate(channel, width));
    actions
}

/// Encode `(delay_ms, channel)` records into tune bytes
///
/// Returns the number of bytes written, or `None` if `out` is too small.
pub fn encode(records: &[(u16, u8)], out: &mut [u8]) -> Option<usize> {
    let len = records.len() * RECORD_LEN;
    if out.len() < len {
        return None;
    }
    for (chunk, &(delay_ms, channel)) in out.chunks_exact_mut(RECORD_LEN).zip(records) {
        chunk[..2].copy_from_slice(&delay_ms.to_be_bytes());
        chunk[2] = channel;
    }
    Some(len)
}

/// Stable insertion sort by offset
///
/// `core` has no stable slice sort without an allocator. Compiled tunes
/// are almost sorted already (each deactivation is at most a few pulses
/// out of place), which is insertion sort's best case.
fn sort_by_offset(actions: &mut [Action]) {
    for i in 1..actions.len() {
        let mut j = i;
        while j > 0 && actions[j - 1].offset > actions[j].offset {
            actions.swap(j - 1, j);
            j -= 1;
        }
    }
}
