//! Tune selection
//!
//! Picks tunes at random without repeating one until every tune has been
//! played, then starts a fresh random cycle.

use rand::Rng;

use crate::sequence::ActionSequence;
use crate::traits::{EntropyError, EntropySource};

/// Maximum number of tunes a selector can track
pub const MAX_TUNES: usize = 16;

/// Random tune picker
///
/// Owns its random generator; nothing here is global.
#[derive(Debug)]
pub struct TuneSelector<'a, R> {
    tunes: &'a [ActionSequence],
    rng: R,
    /// Bit `i` set once tune `i` has played in the current cycle
    played: u32,
    played_count: usize,
}

impl<'a, R: Rng> TuneSelector<'a, R> {
    /// Create a selector over `tunes`
    ///
    /// Only the first [`MAX_TUNES`] tunes are used.
    pub fn new(tunes: &'a [ActionSequence], rng: R) -> Self {
        let tunes = &tunes[..tunes.len().min(MAX_TUNES)];
        Self {
            tunes,
            rng,
            played: 0,
            played_count: 0,
        }
    }

    /// Number of tunes to choose from
    pub fn len(&self) -> usize {
        self.tunes.len()
    }

    /// Check if there are no tunes
    pub fn is_empty(&self) -> bool {
        self.tunes.is_empty()
    }

    /// Number of tunes played in the current cycle
    pub fn played_count(&self) -> usize {
        self.played_count
    }

    /// Choose the next tune
    ///
    /// Returns `None` only when there are no tunes.
    pub fn choose(&mut self) -> Option<&'a ActionSequence> {
        if self.tunes.is_empty() {
            return None;
        }
        if self.played_count >= self.tunes.len() {
            self.reset();
        }

        let mut n = self.rng.random_range(0..self.tunes.len() - self.played_count);
        for (index, tune) in self.tunes.iter().enumerate() {
            if self.played & (1 << index) != 0 {
                continue;
            }
            if n == 0 {
                self.played |= 1 << index;
                self.played_count += 1;
                return Some(tune);
            }
            n -= 1;
        }
        None
    }

    /// Forget which tunes have played
    pub fn reset(&mut self) {
        self.played = 0;
        self.played_count = 0;
    }
}

/// Produce a random seed from hardware entropy
///
/// Falls back to `fallback()` (typically derived from the clock) when the
/// source is unavailable or returns a short read.
pub fn seed_from_entropy<E, F>(source: &mut E, fallback: F) -> u64
where
    E: EntropySource,
    F: FnOnce() -> u64,
{
    let mut buf = [0u8; 8];
    match source.fill(&mut buf) {
        Ok(n) if n == buf.len() => u64::from_le_bytes(buf),
        Ok(_) | Err(EntropyError::Unavailable) => fallback(),
    }
}
