//! Playback bookkeeping
//!
//! [`Cursor`] walks a compiled action sequence for one playback run. It
//! tracks which channels are energized so that a cancelled run can be
//! wound down cleanly: on cancellation the remaining actions are scanned
//! in order and only the releases of energized channels are replayed,
//! until nothing is left on. Timing and the actual line writes belong to
//! the caller.

use crate::pins::Pins;
use crate::sequence::Action;

/// Playback lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlaybackState {
    /// Created, nothing applied yet
    Idle,
    /// At least one action applied
    Running,
    /// Every action applied
    Completed,
    /// Stopped early; all energized channels released
    Cancelled,
}

/// How a playback run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    Completed,
    Cancelled,
}

/// Position within a sequence being played
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    actions: &'a [Action],
    next: usize,
    active: Pins,
    state: PlaybackState,
}

impl<'a> Cursor<'a> {
    /// Start a run over `actions`
    pub fn new(actions: &'a [Action]) -> Self {
        Self {
            actions,
            next: 0,
            active: Pins::EMPTY,
            state: PlaybackState::Idle,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Channels currently energized
    pub fn active(&self) -> Pins {
        self.active
    }

    /// Next action to apply, if any
    pub fn peek(&self) -> Option<&'a Action> {
        match self.state {
            PlaybackState::Idle | PlaybackState::Running => self.actions.get(self.next),
            PlaybackState::Completed | PlaybackState::Cancelled => None,
        }
    }

    /// Record that the action returned by [`Cursor::peek`] was applied
    ///
    /// Returns the applied action. Once the last action is applied the
    /// cursor is `Completed`.
    pub fn advance(&mut self) -> Option<&'a Action> {
        let action = self.peek()?;
        self.active.set(usize::from(action.channel), action.on);
        self.next += 1;
        self.state = if self.next == self.actions.len() {
            PlaybackState::Completed
        } else {
            PlaybackState::Running
        };
        Some(action)
    }

    /// Outcome of the run, once it has finished
    pub fn outcome(&self) -> Option<Outcome> {
        match self.state {
            PlaybackState::Completed => Some(Outcome::Completed),
            PlaybackState::Cancelled => Some(Outcome::Cancelled),
            PlaybackState::Idle if self.actions.is_empty() => Some(Outcome::Completed),
            PlaybackState::Idle | PlaybackState::Running => None,
        }
    }

    /// Cancel the run
    ///
    /// Returns the releases still owed to energized channels, in sequence
    /// order. Activations are skipped. Unless the run had already completed,
    /// the cursor is `Cancelled` once the returned iterator is dropped.
    pub fn cancel(&mut self) -> Drain<'_, 'a> {
        Drain { cursor: self }
    }
}

/// Release actions owed by a cancelled run
///
/// See [`Cursor::cancel`].
#[derive(Debug)]
pub struct Drain<'c, 'a> {
    cursor: &'c mut Cursor<'a>,
}

impl<'a> Iterator for Drain<'_, 'a> {
    type Item = &'a Action;

    fn next(&mut self) -> Option<&'a Action> {
        let cursor = &mut *self.cursor;
        while !cursor.active.is_empty() {
            let action = cursor.actions.get(cursor.next)?;
            cursor.next += 1;
            let channel = usize::from(action.channel);
            if !action.on && cursor.active.is_high(channel) {
                cursor.active.low(channel);
                return Some(action);
            }
        }
        None
    }
}

impl Drop for Drain<'_, '_> {
    fn drop(&mut self) {
        // Finish the drain even if the caller stopped iterating early
        while self.next().is_some() {}
        if self.cursor.state != PlaybackState::Completed {
            self.cursor.state = PlaybackState::Cancelled;
        }
    }
}
