//! Line bitmask
//!
//! A `Pins` value holds one bit per line. It is used for the raw and
//! debounced button state, for the set of energized solenoid channels
//! during playback, and for bulk actuator writes.

use core::fmt;
use core::ops::{BitAnd, BitOr, Not};

/// Number of lines a `Pins` value can describe
pub const MAX_LINES: usize = 32;

/// Bitmask with one bit per line (bit `i` = line `i`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pins(pub u32);

impl Pins {
    /// No lines set
    pub const EMPTY: Pins = Pins(0);

    /// Mask with the lowest `count` lines set
    ///
    /// Panics if `count` exceeds [`MAX_LINES`].
    pub const fn all(count: usize) -> Self {
        assert!(count <= MAX_LINES, "line count out of range");
        if count == MAX_LINES {
            Pins(u32::MAX)
        } else {
            Pins((1u32 << count) - 1)
        }
    }

    /// Raw bit representation
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Set line `index` high
    pub fn high(&mut self, index: usize) {
        self.0 |= Self::bit(index);
    }

    /// Set line `index` low
    pub fn low(&mut self, index: usize) {
        self.0 &= !Self::bit(index);
    }

    /// Set line `index` to `on`
    pub fn set(&mut self, index: usize, on: bool) {
        if on {
            self.high(index);
        } else {
            self.low(index);
        }
    }

    /// Check whether line `index` is high
    pub fn is_high(self, index: usize) -> bool {
        self.0 & Self::bit(index) != 0
    }

    /// Check whether no line is high
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of high lines
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Iterate over the indices of the high lines, lowest first
    pub fn iter_high(self) -> impl Iterator<Item = usize> {
        let mut bits = self.0;
        core::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let index = bits.trailing_zeros() as usize;
            bits &= bits - 1;
            Some(index)
        })
    }

    fn bit(index: usize) -> u32 {
        assert!(index < MAX_LINES, "pin out of range");
        1 << index
    }
}

impl BitAnd for Pins {
    type Output = Pins;

    fn bitand(self, rhs: Pins) -> Pins {
        Pins(self.0 & rhs.0)
    }
}

impl BitOr for Pins {
    type Output = Pins;

    fn bitor(self, rhs: Pins) -> Pins {
        Pins(self.0 | rhs.0)
    }
}

impl Not for Pins {
    type Output = Pins;

    fn not(self) -> Pins {
        Pins(!self.0)
    }
}

impl From<u32> for Pins {
    fn from(bits: u32) -> Self {
        Pins(bits)
    }
}

impl fmt::Binary for Pins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Binary::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_then_low_clears_line() {
        let mut pins = Pins::EMPTY;
        pins.high(3);
        assert!(pins.is_high(3));

        pins.low(3);
        assert!(!pins.is_high(3));
        assert!(pins.is_empty());
    }

    #[test]
    fn test_low_leaves_other_lines() {
        let mut pins = Pins(0b1011);
        pins.low(1);
        assert_eq!(pins, Pins(0b1001));
    }

    #[test]
    fn test_set() {
        let mut pins = Pins::EMPTY;
        pins.set(31, true);
        pins.set(0, true);
        assert_eq!(pins.count(), 2);
        pins.set(31, false);
        assert_eq!(pins, Pins(1));
    }

    #[test]
    fn test_all() {
        assert_eq!(Pins::all(0), Pins::EMPTY);
        assert_eq!(Pins::all(5), Pins(0x1f));
        assert_eq!(Pins::all(32), Pins(u32::MAX));
    }

    #[test]
    fn test_iter_high() {
        let mut lines = Pins(0b1010_0001).iter_high();
        assert_eq!(lines.next(), Some(0));
        assert_eq!(lines.next(), Some(5));
        assert_eq!(lines.next(), Some(7));
        assert_eq!(lines.next(), None);
    }

    #[test]
    #[should_panic(expected = "pin out of range")]
    fn test_out_of_range_panics() {
        let mut pins = Pins::EMPTY;
        pins.high(32);
    }
}
