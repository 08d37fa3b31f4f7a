//! Doorbell controller
//!
//! Turns debounced button changes into chimes. A short press plays the
//! ding on press and the dong on release. Holding the button past the hold
//! time plays a tune instead; the tune finishes on its own after release,
//! and pressing again while it sounds cuts it short and starts another.
//!
//! Decisions come from [`chime_core::state::State::transition`]; this
//! module does the waiting and talks to the player.

use std::time::Duration;

use embassy_futures::select::{select, Either};
use rand::Rng;
use tracing::{debug, info, warn};

use chime_core::playback::Outcome;
use chime_core::selection::TuneSelector;
use chime_core::sequence::Action;
use chime_core::state::{Command, Event, State};
use chime_core::Pins;
use chime_timer::Timer;

use crate::channels::ButtonChannel;
use crate::player::{PlayRequest, PlaybackLink};

/// Everything the controller needs from its surroundings
pub struct DoorbellParams<'a, R> {
    pub buttons: &'a ButtonChannel,
    pub link: &'a PlaybackLink<'a>,
    pub selector: TuneSelector<'a, R>,
    pub hold_timer: Timer,
    pub hold: Duration,
    pub ding: &'a [Action],
    pub dong: &'a [Action],
}

/// Doorbell controller
pub struct Doorbell<'a, R> {
    state: State,
    /// Last debounced button reading
    buttons_down: Pins,
    params: DoorbellParams<'a, R>,
}

impl<'a, R: Rng> Doorbell<'a, R> {
    pub fn new(params: DoorbellParams<'a, R>) -> Self {
        Self {
            state: State::default(),
            buttons_down: Pins::EMPTY,
            params,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Run the controller forever
    pub async fn run(&mut self) -> ! {
        info!(tunes = self.params.selector.len(), "doorbell ready");
        loop {
            self.step().await;
        }
    }

    /// Wait for the next event and act on it
    pub async fn step(&mut self) -> Event {
        let event = self.next_event().await;
        let (next, command) = self.state.transition(event);
        debug!(?event, from = ?self.state, to = ?next, ?command, "transition");
        self.state = next;

        if let Some(command) = command {
            self.execute(command).await;
        }
        event
    }

    /// Wait for an event that matters in the current state
    async fn next_event(&mut self) -> Event {
        let p = &self.params;
        loop {
            let event = match self.state {
                State::WaitingForPress | State::TuneFinishedHeld => {
                    let buttons = p.buttons.receive().await;
                    Self::button_event(&mut self.buttons_down, buttons)
                }
                State::WaitingForRelease => {
                    match select(p.buttons.receive(), p.hold_timer.wait()).await {
                        Either::First(buttons) => {
                            Self::button_event(&mut self.buttons_down, buttons)
                        }
                        Either::Second(()) => Some(Event::HoldElapsed),
                    }
                }
                State::TuneHeld | State::TuneReleased => {
                    match select(p.buttons.receive(), p.link.done.wait()).await {
                        Either::First(buttons) => {
                            Self::button_event(&mut self.buttons_down, buttons)
                        }
                        Either::Second(outcome) => {
                            debug!(?outcome, "tune finished");
                            Some(Event::TuneFinished)
                        }
                    }
                }
            };

            if let Some(event) = event {
                return event;
            }
        }
    }

    fn button_event(buttons_down: &mut Pins, buttons: Pins) -> Option<Event> {
        let event = Event::from_buttons(*buttons_down, buttons);
        *buttons_down = buttons;
        event
    }

    async fn execute(&mut self, command: Command) {
        match command {
            Command::Ding => {
                self.play_chime(self.params.ding).await;
                self.params.hold_timer.reset(self.params.hold);
            }
            Command::Dong => {
                self.params.hold_timer.stop();
                self.play_chime(self.params.dong).await;
            }
            Command::StartTune => self.start_tune(),
            Command::RestartTune => {
                let outcome = self.params.link.cancel_and_wait().await;
                debug!(?outcome, "previous tune stopped");
                self.start_tune();
            }
        }
    }

    /// Play a short chime to the end
    async fn play_chime(&self, actions: &'a [Action]) {
        let request = PlayRequest {
            actions,
            cancellable: false,
        };
        if self.params.link.play(request).await != Outcome::Completed {
            warn!("chime did not complete");
        }
    }

    fn start_tune(&mut self) {
        let link = self.params.link;
        match self.params.selector.choose() {
            Some(tune) => {
                info!(
                    actions = tune.len(),
                    played = self.params.selector.played_count(),
                    "starting tune"
                );
                link.start(PlayRequest {
                    actions: tune.as_slice(),
                    cancellable: true,
                });
            }
            None => {
                // Nothing to play; finish straight away so the state
                // machine moves on
                warn!("no tunes to play");
                link.done.reset();
                link.done.signal(Outcome::Completed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Instant;

    use chime_core::sequence::{compile, pulse, ActionSequence};
    use embassy_futures::block_on;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use crate::player::tests::{RecordingBank, WriteLog};
    use crate::player::Player;

    const DING: usize = 12;
    const DONG: usize = 19;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    struct Fixture {
        ding: ActionSequence,
        dong: ActionSequence,
        tunes: [ActionSequence; 2],
        buttons: ButtonChannel,
    }

    impl Fixture {
        fn new() -> Self {
            // Two single-note tunes on channels 1 and 2, 200 ms in
            let tunes = [
                compile(24, &[0, 200, 1], ms(20)).unwrap(),
                compile(24, &[0, 200, 2], ms(20)).unwrap(),
            ];
            Self {
                ding: pulse(DING as u8, ms(5)),
                dong: pulse(DONG as u8, ms(5)),
                tunes,
                buttons: ButtonChannel::new(),
            }
        }
    }

    /// Run the doorbell against a player for `steps` transitions while
    /// `script` presses buttons from another thread
    fn run_steps(
        fixture: &Fixture,
        script: impl FnOnce(&ButtonChannel) + Send,
        steps: usize,
    ) -> (Vec<Event>, State, WriteLog) {
        let link = PlaybackLink::new();
        let (bank, log) = RecordingBank::new();
        let mut player = Player::new(bank, Timer::new(), &link);
        log.lock().clear();

        let mut doorbell = Doorbell::new(DoorbellParams {
            buttons: &fixture.buttons,
            link: &link,
            selector: TuneSelector::new(&fixture.tunes, SmallRng::seed_from_u64(3)),
            hold_timer: Timer::new(),
            hold: ms(50),
            ding: &fixture.ding,
            dong: &fixture.dong,
        });

        let events = thread::scope(|s| {
            s.spawn(|| script(&fixture.buttons));
            block_on(async {
                let drive = async {
                    let mut events = Vec::new();
                    for _ in 0..steps {
                        events.push(doorbell.step().await);
                    }
                    // Let a tune that is still sounding finish
                    if doorbell.state().tune_playing() {
                        doorbell.step().await;
                    }
                    events
                };
                match select(drive, player.run()).await {
                    Either::First(events) => events,
                    Either::Second(_) => unreachable!(),
                }
            })
        });
        (events, doorbell.state(), log)
    }

    fn send(buttons: &ButtonChannel, pins: u32) {
        block_on(buttons.send(Pins(pins)));
    }

    #[test]
    fn test_short_press_plays_ding_dong() {
        let fixture = Fixture::new();
        let (events, state, log) = run_steps(
            &fixture,
            |buttons| {
                send(buttons, 0b1);
                thread::sleep(ms(20));
                send(buttons, 0);
            },
            2,
        );

        assert_eq!(events, vec![Event::Pressed, Event::Released]);
        assert_eq!(state, State::WaitingForPress);
        assert_eq!(
            *log.lock(),
            vec![(DING, true), (DING, false), (DONG, true), (DONG, false)]
        );
    }

    #[test]
    fn test_extra_button_does_not_release() {
        let fixture = Fixture::new();
        let (events, state, _) = run_steps(
            &fixture,
            |buttons| {
                send(buttons, 0b01);
                send(buttons, 0b11);
                thread::sleep(ms(10));
                send(buttons, 0);
            },
            2,
        );

        assert_eq!(events, vec![Event::Pressed, Event::Released]);
        assert_eq!(state, State::WaitingForPress);
    }

    #[test]
    fn test_hold_plays_tune_without_dong() {
        let fixture = Fixture::new();
        let start = Instant::now();
        let (events, state, log) = run_steps(
            &fixture,
            |buttons| {
                send(buttons, 0b100);
                thread::sleep(ms(100));
                send(buttons, 0);
            },
            3,
        );

        assert!(start.elapsed() >= ms(250));
        assert_eq!(
            events,
            vec![Event::Pressed, Event::HoldElapsed, Event::Released]
        );
        assert_eq!(state, State::WaitingForPress);

        let log = log.lock();
        assert_eq!(log[..2], [(DING, true), (DING, false)]);
        // One tune note and no dong
        assert_eq!(log.len(), 4);
        assert!(log[2..].iter().all(|&(line, _)| line == 1 || line == 2));
    }

    #[test]
    fn test_press_during_tune_restarts() {
        let fixture = Fixture::new();
        let (events, state, log) = run_steps(
            &fixture,
            |buttons| {
                send(buttons, 0b1);
                // Past the hold time, then press again before the note
                thread::sleep(ms(90));
                send(buttons, 0);
                thread::sleep(ms(20));
                send(buttons, 0b1);
                thread::sleep(ms(20));
                send(buttons, 0);
            },
            5,
        );

        assert_eq!(
            events,
            vec![
                Event::Pressed,
                Event::HoldElapsed,
                Event::Released,
                Event::Pressed,
                Event::Released,
            ]
        );
        assert_eq!(state, State::WaitingForPress);

        // The first tune was cut before its note; only the second sounds
        let log = log.lock();
        assert_eq!(log.len(), 4);
        let (line, on) = log[2];
        assert!(on);
        assert_eq!(log[3], (line, false));
    }
}
