//! Button polling task
//!
//! Samples the door buttons at a fixed interval, debounces the reading and
//! forwards every change of the debounced state to the doorbell task.

use std::time::Duration;

use embassy_time::{Instant, Ticker};
use tracing::{debug, info, warn};

use chime_core::debounce::Debouncer;
use chime_core::traits::ButtonInput;
use chime_core::Pins;

use crate::board::DoorButtons;
use crate::channels::ButtonChannel;

/// Button sampler and debouncer
pub struct ButtonPoller<'a, B> {
    input: B,
    /// Lines that are door buttons
    mask: Pins,
    debouncer: Debouncer,
    /// Last raw reading, reused when a read fails
    raw: Pins,
    /// Last state sent to the doorbell task
    reported: Pins,
    read_failed: bool,
    buttons: &'a ButtonChannel,
}

impl<'a, B: ButtonInput> ButtonPoller<'a, B> {
    pub fn new(input: B, mask: Pins, window: Duration, buttons: &'a ButtonChannel) -> Self {
        Self {
            input,
            mask,
            debouncer: Debouncer::new(window),
            raw: Pins::EMPTY,
            reported: Pins::EMPTY,
            read_failed: false,
            buttons,
        }
    }

    /// Take one sample at `now`
    ///
    /// Returns the new debounced state if it changed.
    pub fn poll(&mut self, now: Duration) -> Option<Pins> {
        match self.input.read_lines() {
            Ok(lines) => {
                if self.read_failed {
                    info!("button input recovered");
                    self.read_failed = false;
                }
                self.raw = Pins(lines.bits() & self.mask.bits());
            }
            Err(e) => {
                if !self.read_failed {
                    warn!(error = ?e, "button read failed, holding last reading");
                    self.read_failed = true;
                }
            }
        }

        self.debouncer.update(self.raw, now);
        let state = self.debouncer.state();
        if state == self.reported {
            return None;
        }
        self.reported = state;
        Some(state)
    }

    /// Poll forever
    pub async fn run(&mut self, interval: Duration) -> ! {
        let start = Instant::now();
        let period = embassy_time::Duration::from_micros(interval.as_micros() as u64);
        let mut ticker = Ticker::every(period);

        loop {
            ticker.next().await;
            let now = Duration::from_micros(start.elapsed().as_micros());
            if let Some(buttons) = self.poll(now) {
                debug!(buttons = buttons.bits(), "buttons changed");
                self.buttons.send(buttons).await;
            }
        }
    }
}

/// Button polling task
#[embassy_executor::task]
pub async fn buttons_task(mut poller: ButtonPoller<'static, DoorButtons>, interval: Duration) {
    info!(?interval, "Button task started");
    poller.run(interval).await
}
