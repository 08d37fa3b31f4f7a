//! Actuator bank trait

use crate::pins::Pins;

/// Errors that can occur when driving actuator lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorError {
    /// Bus transaction to the output expander failed
    Bus,
    /// Output driver reported a fault
    Fault,
}

/// Trait for a bank of on/off output lines
///
/// Each line drives one solenoid channel. Implementations wrap whatever
/// owns the physical outputs (GPIO pins, port expanders, relays).
///
/// Passing an index `>= line_count()` is a wiring error and panics.
pub trait ActuatorBank {
    /// Number of lines in the bank
    fn line_count(&self) -> usize;

    /// Drive one line on (energized) or off
    fn set_line(&mut self, index: usize, on: bool) -> Result<(), ActuatorError>;

    /// Drive several lines at once
    ///
    /// Every line set in `mask` is driven to its value in `values`.
    /// Lines outside `mask` are left untouched. The default implementation
    /// writes line by line and stops at the first failure; banks backed by
    /// a port register should override it with a single write.
    fn set_lines(&mut self, values: Pins, mask: Pins) -> Result<(), ActuatorError> {
        for index in mask.iter_high() {
            self.set_line(index, values.is_high(index))?;
        }
        Ok(())
    }

    /// Drive every line in the bank off
    fn all_off(&mut self) -> Result<(), ActuatorError> {
        let count = self.line_count();
        self.set_lines(Pins::EMPTY, Pins::all(count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeBank {
        lines: Pins,
        writes: usize,
    }

    impl ActuatorBank for FakeBank {
        fn line_count(&self) -> usize {
            4
        }

        fn set_line(&mut self, index: usize, on: bool) -> Result<(), ActuatorError> {
            assert!(index < 4, "line out of range");
            self.writes += 1;
            self.lines.set(index, on);
            Ok(())
        }
    }

    #[test]
    fn test_set_lines_respects_mask() {
        let mut bank = FakeBank {
            lines: Pins(0b1000),
            writes: 0,
        };
        bank.set_lines(Pins(0b0011), Pins(0b0110)).unwrap();

        // Line 0 outside the mask, line 3 untouched
        assert_eq!(bank.lines, Pins(0b1010));
        assert_eq!(bank.writes, 2);
    }

    #[test]
    fn test_all_off() {
        let mut bank = FakeBank {
            lines: Pins(0b1111),
            writes: 0,
        };
        bank.all_off().unwrap();
        assert!(bank.lines.is_empty());
        assert_eq!(bank.writes, 4);
    }
}
