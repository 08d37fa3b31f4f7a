//! Pooled one-shot timers
//!
//! A [`Timer`] is a rearmable deadline with a single-slot notification.
//! Deadlines are served by a small pool of sleeping worker threads rather
//! than one thread per timer. Each worker sleeps for at most
//! [`TimerConfig::max_sleep`], then re-checks the real deadline, so a
//! worker parked on a long or abandoned deadline is never stuck for long.
//!
//! When a worker finds nothing left to do it parks as idle and waits to be
//! handed the next wake time. At most [`TimerConfig::max_idle`] workers
//! park; any beyond that exit. Bursts of resets to ever shorter deadlines
//! can spawn extra workers, but the pool shrinks back once they wake.
//!
//! The notification slot is an `embassy_sync` channel, so async code can
//! race a deadline against other signals.

#![deny(unsafe_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use parking_lot::{Condvar, Mutex, MutexGuard};
use tracing::trace;

/// Default number of idle workers kept for reuse
pub const DEFAULT_MAX_IDLE: usize = 5;

/// Default longest single sleep of a worker
pub const DEFAULT_MAX_SLEEP: Duration = Duration::from_millis(500);

/// Worker pool settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    /// Idle workers kept for reuse; extra workers exit
    pub max_idle: usize,
    /// Longest single sleep; longer deadlines are slept in steps
    pub max_sleep: Duration,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            max_idle: DEFAULT_MAX_IDLE,
            max_sleep: DEFAULT_MAX_SLEEP,
        }
    }
}

/// Bookkeeping guarded by the timer lock
#[derive(Debug, Default)]
struct State {
    /// Current deadline; `None` when stopped
    expiry: Option<Instant>,
    /// Workers parked waiting for a handoff
    idle: usize,
    /// Workers alive, sleeping or idle
    workers: usize,
    /// When each sleeping worker will wake
    wake_times: Vec<Instant>,
    /// Wake times handed to idle workers, not yet picked up
    handoff: VecDeque<Instant>,
    closed: bool,
}

impl State {
    fn first_wakeup(&self) -> Option<Instant> {
        self.wake_times.iter().copied().min()
    }

    fn remove_wake_time(&mut self, wakeup: Instant) {
        // Sleepers don't always wake in order, so search the whole list
        if let Some(i) = self.wake_times.iter().position(|&t| t == wakeup) {
            self.wake_times.swap_remove(i);
        }
    }
}

struct Shared {
    config: TimerConfig,
    state: Mutex<State>,
    /// Signalled when a wake time is handed off or the timer closes
    handoff_ready: Condvar,
    notify: Channel<CriticalSectionRawMutex, (), 1>,
}

impl Shared {
    /// Take back a notification that was sent but not received
    fn retract(&self) {
        let _ = self.notify.try_receive();
    }

    /// Fire if the deadline has passed
    ///
    /// Returns the next wake time when the deadline is still ahead and no
    /// other worker will wake in time to handle it.
    fn maybe_send(&self, state: &mut State) -> Option<Instant> {
        let expiry = state.expiry?;
        let now = Instant::now();
        if now < expiry {
            // Either the deadline moved later or it was farther out than
            // one sleep
            if state.first_wakeup().is_some_and(|first| first <= expiry) {
                return None;
            }
            return Some(expiry.min(now + self.config.max_sleep));
        }

        // Slot already full means the pending value stands for this one
        let _ = self.notify.try_send(());
        state.expiry = None;
        None
    }

    fn close(&self) {
        let mut state = self.state.lock();
        self.retract();
        state.expiry = None;
        state.closed = true;
        self.handoff_ready.notify_all();
    }
}

/// Rearmable one-shot timer
///
/// Meant for a single consumer at a time. Dropping the timer (or calling
/// [`Timer::close`]) releases its workers: idle ones exit at once, sleeping
/// ones when they next wake.
pub struct Timer {
    shared: Arc<Shared>,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a stopped timer with the default pool settings
    pub fn new() -> Self {
        Self::with_config(TimerConfig::default())
    }

    /// Create a stopped timer
    pub fn with_config(config: TimerConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                config,
                state: Mutex::new(State::default()),
                handoff_ready: Condvar::new(),
                notify: Channel::new(),
            }),
        }
    }

    /// Arm the timer to fire `duration` from now
    ///
    /// Replaces any pending deadline. A notification from an earlier
    /// deadline that was never received is taken back first.
    pub fn reset(&self, duration: Duration) {
        let now = Instant::now();
        let expiry = now + duration;
        let mut state = self.shared.state.lock();
        self.shared.retract();
        state.expiry = Some(expiry);

        if state.first_wakeup().is_some_and(|first| first <= expiry) {
            // A sleeper wakes in time and will reschedule as needed
            return;
        }

        let wakeup = expiry.min(now + self.shared.config.max_sleep);
        state.wake_times.push(wakeup);

        if state.idle > 0 {
            state.idle -= 1;
            state.handoff.push_back(wakeup);
            self.shared.handoff_ready.notify_one();
            return;
        }

        state.workers += 1;
        trace!(workers = state.workers, "starting timer worker");
        let shared = Arc::clone(&self.shared);
        thread::Builder::new()
            .name("chime-timer".into())
            .spawn(move || worker(shared, wakeup))
            .expect("failed to spawn timer worker");
    }

    /// Disarm the timer
    ///
    /// No notification is observed afterwards until the timer is reset.
    pub fn stop(&self) {
        let mut state = self.shared.state.lock();
        self.shared.retract();
        state.expiry = None;
    }

    /// Arm the timer and wait for it to fire
    ///
    /// The timer is armed when this is called, not when the future is
    /// first polled.
    pub fn after(&self, duration: Duration) -> impl Future<Output = ()> + '_ {
        self.reset(duration);
        self.wait()
    }

    /// Wait for the next notification
    pub fn wait(&self) -> impl Future<Output = ()> + '_ {
        self.shared.notify.receive()
    }

    /// Take a pending notification without waiting
    pub fn try_wait(&self) -> bool {
        self.shared.notify.try_receive().is_ok()
    }

    /// Release the timer's workers
    pub fn close(self) {
        drop(self);
    }

    /// Workers parked waiting for a deadline
    pub fn idle_workers(&self) -> usize {
        self.shared.state.lock().idle
    }

    /// Workers alive, sleeping or idle
    pub fn live_workers(&self) -> usize {
        self.shared.state.lock().workers
    }

    /// Workers currently sleeping toward a wake time
    pub fn pending_wakes(&self) -> usize {
        self.shared.state.lock().wake_times.len()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        trace!("closing timer");
        self.shared.close();
    }
}

impl core::fmt::Debug for Timer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("Timer")
            .field("expiry", &state.expiry)
            .field("idle", &state.idle)
            .field("workers", &state.workers)
            .finish()
    }
}

fn worker(shared: Arc<Shared>, mut wakeup: Instant) {
    loop {
        thread::sleep(wakeup.saturating_duration_since(Instant::now()));

        let mut state = shared.state.lock();
        state.remove_wake_time(wakeup);
        if state.closed {
            state.workers -= 1;
            return;
        }

        match shared.maybe_send(&mut state) {
            Some(next) => {
                state.wake_times.push(next);
                wakeup = next;
            }
            None => match park(&shared, state) {
                Some(next) => wakeup = next,
                None => return,
            },
        }
    }
}

/// Park as idle until handed a wake time
///
/// Returns `None` when the worker should exit instead: the pool already
/// has enough idle workers, or the timer closed.
fn park(shared: &Shared, mut state: MutexGuard<'_, State>) -> Option<Instant> {
    if state.idle >= shared.config.max_idle {
        state.workers -= 1;
        trace!(workers = state.workers, "timer worker exiting");
        return None;
    }

    state.idle += 1;
    loop {
        // The waker already took us off the idle count
        if let Some(next) = state.handoff.pop_front() {
            return Some(next);
        }
        if state.closed {
            state.idle -= 1;
            state.workers -= 1;
            return None;
        }
        shared.handoff_ready.wait(&mut state);
    }
}
