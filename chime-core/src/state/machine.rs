//! State machine definition
//!
//! Everything the controller does is a function of the current state and
//! an event.

use super::events::Event;

/// Controller states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// All buttons up, nothing playing
    #[default]
    WaitingForPress,
    /// Ding played, hold timer armed
    WaitingForRelease,
    /// Tune playing, button still down
    TuneHeld,
    /// Tune playing, button released; let it finish
    TuneReleased,
    /// Tune finished while the button was still down
    TuneFinishedHeld,
}

/// Work the controller carries out on a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Play the ding, then arm the hold timer
    Ding,
    /// Play the dong
    Dong,
    /// Start a freshly chosen tune
    StartTune,
    /// Cancel the playing tune, wait for it to drain, then start another
    RestartTune,
}

impl State {
    /// Check if a tune is sounding in this state
    pub fn tune_playing(&self) -> bool {
        matches!(self, State::TuneHeld | State::TuneReleased)
    }

    /// Check if the hold timer is armed in this state
    pub fn hold_armed(&self) -> bool {
        matches!(self, State::WaitingForRelease)
    }

    /// Process an event and return the next state with its command
    pub fn transition(self, event: Event) -> (Self, Option<Command>) {
        use Event::*;
        use State::*;

        match (self, event) {
            (WaitingForPress, Pressed) => (WaitingForRelease, Some(Command::Ding)),

            // Short press
            (WaitingForRelease, Released) => (WaitingForPress, Some(Command::Dong)),
            // Long press
            (WaitingForRelease, HoldElapsed) => (TuneHeld, Some(Command::StartTune)),

            (TuneHeld, Released) => (TuneReleased, None),
            (TuneHeld, TuneFinished) => (TuneFinishedHeld, None),

            // Pressed again while the tune is still sounding
            (TuneReleased, Pressed) => (TuneHeld, Some(Command::RestartTune)),
            (TuneReleased, TuneFinished) => (WaitingForPress, None),

            (TuneFinishedHeld, Released) => (WaitingForPress, None),

            // Default: stay in current state
            _ => (self, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_press() {
        let state = State::default();
        let (state, cmd) = state.transition(Event::Pressed);
        assert_eq!(state, State::WaitingForRelease);
        assert_eq!(cmd, Some(Command::Ding));
        assert!(state.hold_armed());

        let (state, cmd) = state.transition(Event::Released);
        assert_eq!(state, State::WaitingForPress);
        assert_eq!(cmd, Some(Command::Dong));
    }

    #[test]
    fn test_long_press_plays_tune() {
        let (state, _) = State::WaitingForPress.transition(Event::Pressed);
        let (state, cmd) = state.transition(Event::HoldElapsed);
        assert_eq!(state, State::TuneHeld);
        assert_eq!(cmd, Some(Command::StartTune));
        assert!(state.tune_playing());

        // Release lets the tune finish
        let (state, cmd) = state.transition(Event::Released);
        assert_eq!(state, State::TuneReleased);
        assert_eq!(cmd, None);

        let (state, cmd) = state.transition(Event::TuneFinished);
        assert_eq!(state, State::WaitingForPress);
        assert_eq!(cmd, None);
    }

    #[test]
    fn test_mashing_restarts_tune() {
        let mut state = State::TuneReleased;
        for _ in 0..3 {
            let (next, cmd) = state.transition(Event::Pressed);
            assert_eq!(next, State::TuneHeld);
            assert_eq!(cmd, Some(Command::RestartTune));
            state = next.transition(Event::Released).0;
        }
        assert_eq!(state, State::TuneReleased);
    }

    #[test]
    fn test_tune_ends_while_held() {
        let (state, cmd) = State::TuneHeld.transition(Event::TuneFinished);
        assert_eq!(state, State::TuneFinishedHeld);
        assert_eq!(cmd, None);
        assert!(!state.tune_playing());

        // No dong after a tune
        let (state, cmd) = state.transition(Event::Released);
        assert_eq!(state, State::WaitingForPress);
        assert_eq!(cmd, None);
    }

    #[test]
    fn test_irrelevant_events_ignored() {
        let cases = [
            (State::WaitingForPress, Event::Released),
            (State::WaitingForPress, Event::HoldElapsed),
            (State::WaitingForPress, Event::TuneFinished),
            (State::WaitingForRelease, Event::Pressed),
            (State::WaitingForRelease, Event::TuneFinished),
            (State::TuneHeld, Event::Pressed),
            (State::TuneHeld, Event::HoldElapsed),
            (State::TuneFinishedHeld, Event::Pressed),
        ];

        for (state, event) in cases {
            assert_eq!(state.transition(event), (state, None));
        }
    }
}
