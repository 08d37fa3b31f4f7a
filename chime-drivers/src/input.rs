//! GPIO door buttons

use chime_core::traits::{ButtonInput, InputError};
use chime_core::Pins;
use embedded_hal::digital::InputPin;

/// Door buttons wired to GPIO inputs
///
/// Button `i` is `pins[i]` and maps to bit `i` of the reading. Buttons are
/// usually wired to ground with a pull-up, so active-low is the common
/// case.
pub struct ButtonPins<P, const N: usize> {
    pins: [P; N],
    /// If true, pressed = pin LOW
    active_low: bool,
}

impl<P: InputPin, const N: usize> ButtonPins<P, N> {
    pub fn new(pins: [P; N], active_low: bool) -> Self {
        assert!(N <= chime_core::pins::MAX_LINES, "too many button pins");
        Self { pins, active_low }
    }

    pub fn new_active_low(pins: [P; N]) -> Self {
        Self::new(pins, true)
    }

    pub fn new_active_high(pins: [P; N]) -> Self {
        Self::new(pins, false)
    }
}

impl<P: InputPin, const N: usize> ButtonInput for ButtonPins<P, N> {
    fn read_lines(&mut self) -> Result<Pins, InputError> {
        let mut lines = Pins::EMPTY;
        for (index, pin) in self.pins.iter_mut().enumerate() {
            let high = pin.is_high().map_err(|_| InputError::Bus)?;
            lines.set(index, high != self.active_low);
        }
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::{ErrorKind, ErrorType};

    struct MockPin {
        high: bool,
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl InputPin for MockPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.high)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.high)
        }
    }

    struct BrokenPin;

    impl ErrorType for BrokenPin {
        type Error = ErrorKind;
    }

    impl InputPin for BrokenPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Err(ErrorKind::Other)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Err(ErrorKind::Other)
        }
    }

    fn pins<const N: usize>(levels: [bool; N]) -> [MockPin; N] {
        levels.map(|high| MockPin { high })
    }

    #[test]
    fn test_active_low_buttons() {
        let mut buttons = ButtonPins::new_active_low(pins([true, false, true, false]));
        assert_eq!(buttons.read_lines(), Ok(Pins(0b1010)));
    }

    #[test]
    fn test_active_high_buttons() {
        let mut buttons = ButtonPins::new_active_high(pins([true, false, true]));
        assert_eq!(buttons.read_lines(), Ok(Pins(0b101)));
    }

    #[test]
    fn test_read_error() {
        let mut buttons = ButtonPins::new_active_low([BrokenPin, BrokenPin]);
        assert_eq!(buttons.read_lines(), Err(InputError::Bus));
    }
}
