//! Sequence playback
//!
//! [`play`] drives an actuator bank through a compiled sequence against
//! wall-clock deadlines. [`Player`] owns the bank and serves play requests
//! one at a time, so two sequences never drive the solenoids at once.

use std::time::Instant;

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use embassy_sync::signal::Signal;
use tracing::{debug, trace, warn};

use chime_core::playback::{Cursor, Outcome};
use chime_core::sequence::Action;
use chime_core::traits::ActuatorBank;
use chime_timer::Timer;

/// Play `actions` on `actuators`
///
/// Each action is applied at its offset from the moment this is called.
/// Waits race the timer against `cancel`; when cancel wins, the releases
/// still owed to energized channels are applied at once and the run
/// reports [`Outcome::Cancelled`]. Without a cancel signal the sequence
/// always runs to the end.
///
/// A failed actuator write is logged and playback carries on.
pub async fn play<A, M>(
    actuators: &mut A,
    actions: &[Action],
    timer: &Timer,
    cancel: Option<&Signal<M, ()>>,
) -> Outcome
where
    A: ActuatorBank,
    M: RawMutex,
{
    let start = Instant::now();
    let mut cursor = Cursor::new(actions);

    while let Some(action) = cursor.peek() {
        let now = Instant::now();
        let deadline = start + action.offset;
        if deadline > now {
            let wait = timer.after(deadline - now);
            let cancelled = match cancel {
                Some(cancel) => matches!(select(wait, cancel.wait()).await, Either::Second(())),
                None => {
                    wait.await;
                    false
                }
            };

            if cancelled {
                timer.stop();
                debug!(active = cursor.active().count(), "playback cancelled, draining");
                for release in cursor.cancel() {
                    apply(actuators, release);
                }
                return Outcome::Cancelled;
            }
        }

        apply(actuators, action);
        cursor.advance();
    }

    Outcome::Completed
}

fn apply<A: ActuatorBank>(actuators: &mut A, action: &Action) {
    trace!(channel = action.channel, on = action.on, "action");
    if let Err(e) = actuators.set_line(usize::from(action.channel), action.on) {
        warn!(
            channel = action.channel,
            on = action.on,
            error = ?e,
            "actuator write failed"
        );
    }
}

/// A sequence to play
#[derive(Debug, Clone, Copy)]
pub struct PlayRequest<'a> {
    pub actions: &'a [Action],
    /// Whether a cancel request may cut this run short
    pub cancellable: bool,
}

/// Signals between the doorbell controller and the player
///
/// Cancellation is acknowledged: after signalling `cancel`, the controller
/// waits on `done` before sending another request.
pub struct PlaybackLink<'a> {
    pub request: Signal<CriticalSectionRawMutex, PlayRequest<'a>>,
    pub cancel: Signal<CriticalSectionRawMutex, ()>,
    pub done: Signal<CriticalSectionRawMutex, Outcome>,
}

impl Default for PlaybackLink<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> PlaybackLink<'a> {
    pub const fn new() -> Self {
        Self {
            request: Signal::new(),
            cancel: Signal::new(),
            done: Signal::new(),
        }
    }

    /// Ask the player to start `request`
    ///
    /// Any stale completion is cleared first.
    pub fn start(&self, request: PlayRequest<'a>) {
        self.done.reset();
        self.request.signal(request);
    }

    /// Start `request` and wait for it to finish
    pub async fn play(&self, request: PlayRequest<'a>) -> Outcome {
        self.start(request);
        self.done.wait().await
    }

    /// Cancel the running sequence and wait until it has drained
    ///
    /// Returns immediately if the sequence already finished on its own.
    pub async fn cancel_and_wait(&self) -> Outcome {
        if let Some(outcome) = self.done.try_take() {
            return outcome;
        }
        self.cancel.signal(());
        self.done.wait().await
    }
}

/// Owner of the actuator bank
pub struct Player<'a, A> {
    actuators: A,
    timer: Timer,
    link: &'a PlaybackLink<'a>,
}

impl<'a, A: ActuatorBank> Player<'a, A> {
    /// Create a player, driving every line off first
    pub fn new(mut actuators: A, timer: Timer, link: &'a PlaybackLink<'a>) -> Self {
        if let Err(e) = actuators.all_off() {
            warn!(error = ?e, "failed to clear actuator lines");
        }
        Self {
            actuators,
            timer,
            link,
        }
    }

    /// Serve play requests forever
    pub async fn run(&mut self) -> ! {
        loop {
            self.serve().await;
        }
    }

    /// Wait for one request and play it
    pub async fn serve(&mut self) -> Outcome {
        let request = self.link.request.wait().await;
        // A cancel aimed at an earlier run must not cut this one short
        self.link.cancel.reset();

        debug!(
            actions = request.actions.len(),
            cancellable = request.cancellable,
            "playing"
        );
        let cancel = request.cancellable.then_some(&self.link.cancel);
        let outcome = play(&mut self.actuators, request.actions, &self.timer, cancel).await;
        debug!(?outcome, "playback finished");

        self.link.done.signal(outcome);
        outcome
    }
}
