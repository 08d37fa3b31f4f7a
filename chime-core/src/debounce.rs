//! Button debouncing
//!
//! Filters the raw, bouncing button reading into a stable state. An edge
//! that follows a period of stability is reported immediately, so a real
//! press adds no latency; any further toggling is absorbed until the
//! reading has held still for the debounce window.

use core::time::Duration;

use crate::pins::Pins;

/// Default debounce window
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(50);

/// Button debouncer
///
/// Call [`Debouncer::update`] on every poll with the latest raw reading
/// and a monotonic timestamp, then read the filtered value with
/// [`Debouncer::state`]. The caller decides the polling cadence
/// (sub-millisecond to a few milliseconds).
#[derive(Debug, Clone)]
pub struct Debouncer<T = Pins> {
    window: Duration,
    /// Last raw reading
    raw: T,
    /// Last reading considered stable
    stable_state: T,
    /// Whether the raw reading has held still for the window
    stable: bool,
    /// Time of the last raw change
    last_change: Duration,
}

impl<T: Copy + PartialEq + Default> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEBOUNCE_WINDOW)
    }
}

impl<T: Copy + PartialEq + Default> Debouncer<T> {
    /// Create a debouncer that starts out stable at `T::default()`
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            raw: T::default(),
            stable_state: T::default(),
            stable: true,
            last_change: Duration::ZERO,
        }
    }

    /// Most recent stable reading
    pub fn state(&self) -> T {
        self.stable_state
    }

    /// Whether the raw reading has settled
    pub fn is_stable(&self) -> bool {
        self.stable
    }

    /// Feed the latest raw reading taken at `now`
    ///
    /// `now` is monotonic time since any fixed origin.
    pub fn update(&mut self, raw: T, now: Duration) {
        if raw != self.raw {
            self.last_change = now;
            self.raw = raw;
            if self.stable {
                // First edge after a quiet period: trust it now
                self.stable = false;
                self.stable_state = raw;
            }
        } else if now > self.last_change + self.window {
            self.stable = true;
            self.stable_state = raw;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_press_after_quiet_is_immediate() {
        let mut d: Debouncer = Debouncer::default();
        let mut now = Duration::from_secs(1);
        d.update(Pins(0), now);
        assert_eq!(d.state(), Pins(0));

        now += MS;
        d.update(Pins(1), now);
        assert_eq!(d.state(), Pins(1));
    }

    #[test]
    fn test_bounce_is_absorbed() {
        let mut d: Debouncer = Debouncer::default();
        let mut now = Duration::from_secs(1);
        d.update(Pins(0), now);

        now += MS;
        d.update(Pins(1), now);
        assert_eq!(d.state(), Pins(1));

        // Subsequent fast changes don't change the state
        now += MS;
        d.update(Pins(0), now);
        assert_eq!(d.state(), Pins(1));

        now += MS;
        d.update(Pins(0), now);
        assert_eq!(d.state(), Pins(1));

        now += MS;
        d.update(Pins(1), now);
        assert_eq!(d.state(), Pins(1));

        now += DEBOUNCE_WINDOW + Duration::from_nanos(1);
        d.update(Pins(1), now);
        assert_eq!(d.state(), Pins(1));
        assert!(d.is_stable());

        // Stable again, so the next change is reported at once
        now += Duration::from_nanos(1);
        d.update(Pins(0), now);
        assert_eq!(d.state(), Pins(0));
    }

    #[test]
    fn test_settles_to_final_value() {
        let mut d: Debouncer = Debouncer::default();
        let mut now = Duration::from_secs(1);
        d.update(Pins(1), now);
        now += MS;
        d.update(Pins(0), now);
        assert_eq!(d.state(), Pins(1));

        // Unchanged but inside the window: untouched
        now += Duration::from_millis(49);
        d.update(Pins(0), now);
        assert_eq!(d.state(), Pins(1));

        now += Duration::from_millis(2);
        d.update(Pins(0), now);
        assert_eq!(d.state(), Pins(0));
    }

    #[test]
    fn test_exactly_at_window_is_not_stable() {
        let mut d: Debouncer = Debouncer::default();
        let start = Duration::from_secs(1);
        d.update(Pins(1), start);
        d.update(Pins(0), start + MS);
        d.update(Pins(0), start + MS + DEBOUNCE_WINDOW);
        assert_eq!(d.state(), Pins(1));
    }

    proptest! {
        #[test]
        fn glitch_inside_window_never_sticks(
            glitch in 1u32..0x1f,
            gap_us in 1u64..49_000,
        ) {
            // Settle on a pressed state first so the glitch lands in an
            // unstable period
            let mut d: Debouncer = Debouncer::default();
            let t0 = Duration::from_secs(1);
            d.update(Pins(0x20), t0);
            let pressed = d.state();

            let t1 = t0 + Duration::from_micros(gap_us);
            d.update(Pins(glitch), t1);
            d.update(Pins(0x20), t1 + Duration::from_micros(1));
            prop_assert_eq!(d.state(), pressed);
        }

        #[test]
        fn held_change_produces_one_transition(hold_ms in 51u64..500) {
            let mut d: Debouncer = Debouncer::default();
            let mut now = Duration::from_secs(1);
            d.update(Pins(0), now);
            // Leave the initial state unstable so the change must wait
            d.update(Pins(2), now + MS);
            d.update(Pins(0), now + 2 * MS);
            let before = d.state();

            let mut transitions = 0;
            let mut last = before;
            now += 3 * MS;
            let end = now + Duration::from_millis(hold_ms);
            d.update(Pins(1), now);
            while now < end {
                now += MS;
                d.update(Pins(1), now);
                if d.state() != last {
                    transitions += 1;
                    last = d.state();
                }
            }
            prop_assert_eq!(d.state(), Pins(1));
            prop_assert_eq!(transitions, 1);
        }
    }
}
