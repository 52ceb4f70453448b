//! GPIO endstop
//!
//! The Z-minimum switch read through a digital input. Mechanical switches
//! wired to ground with a pull-up read low when pressed; use
//! [`GpioEndstop::new_active_low`] for those.

use embedded_hal::digital::InputPin;

use quadlift_core::traits::{Endstop, EndstopError};

/// Endstop on a digital input
pub struct GpioEndstop<P> {
    pin: P,
    /// If true, pressed = pin LOW
    inverted: bool,
}

impl<P: InputPin> GpioEndstop<P> {
    /// Create an endstop with the given polarity
    pub fn new(pin: P, inverted: bool) -> Self {
        Self { pin, inverted }
    }

    /// Pressed when the pin reads high
    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    /// Pressed when the pin reads low
    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }

    /// Release the pin
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: InputPin> Endstop for GpioEndstop<P> {
    fn is_triggered(&mut self) -> Result<bool, EndstopError> {
        let high = self.pin.is_high().map_err(|_| EndstopError)?;
        Ok(high != self.inverted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::{ErrorKind, ErrorType};

    /// Input pin with a fixed level, or `None` for a read fault
    struct MockInput(Option<bool>);

    impl ErrorType for MockInput {
        type Error = ErrorKind;
    }

    impl InputPin for MockInput {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            self.0.ok_or(ErrorKind::Other)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            self.is_high().map(|high| !high)
        }
    }

    #[test]
    fn test_active_high() {
        let mut endstop = GpioEndstop::new_active_high(MockInput(Some(true)));
        assert_eq!(endstop.is_triggered(), Ok(true));

        let mut endstop = GpioEndstop::new_active_high(MockInput(Some(false)));
        assert_eq!(endstop.is_triggered(), Ok(false));
    }

    #[test]
    fn test_active_low() {
        let mut endstop = GpioEndstop::new_active_low(MockInput(Some(false)));
        assert_eq!(endstop.is_triggered(), Ok(true));

        let mut endstop = GpioEndstop::new_active_low(MockInput(Some(true)));
        assert_eq!(endstop.is_triggered(), Ok(false));
    }

    #[test]
    fn test_read_fault() {
        let mut endstop = GpioEndstop::new_active_low(MockInput(None));
        assert_eq!(endstop.is_triggered(), Err(EndstopError));
    }
}
