//! Static display on chained 74HC595 registers
//!
//! One register per digit, the register nearest the MCU drives digit 0.
//! A whole frame goes out as one transfer with one latch pulse.

use core::convert::Infallible;

use sevseg_core::buffer::{check_digit_count, MAX_DIGITS};
use sevseg_core::{ConfigError, Polarity, SegmentBackend, SegmentPattern};
use sevseg_hal::OutputPin;

use crate::shift_register::ShiftRegister;

/// Static display behind a chain of `digits` 74HC595s
pub struct StaticHc595<D, C, L> {
    register: ShiftRegister<D, C, L>,
    digits: usize,
    polarity: Polarity,
    /// Canonical patterns currently latched, physical order
    shown: [SegmentPattern; MAX_DIGITS],
}

impl<D: OutputPin, C: OutputPin, L: OutputPin> StaticHc595<D, C, L> {
    /// Create the backend and blank the display
    ///
    /// A rejected digit count drops the register; use
    /// [`check_digit_count`] first to keep it.
    pub fn new(
        register: ShiftRegister<D, C, L>,
        digits: usize,
        polarity: Polarity,
    ) -> Result<Self, ConfigError> {
        check_digit_count(digits)?;

        let mut display = Self {
            register,
            digits,
            polarity,
            shown: [SegmentPattern::BLANK; MAX_DIGITS],
        };
        display.push();
        Ok(display)
    }

    /// Shift the shown frame out, last digit first
    fn push(&mut self) {
        let mut bytes = [0u8; MAX_DIGITS];
        for (byte, pattern) in bytes
            .iter_mut()
            .zip(self.shown[..self.digits].iter().rev())
        {
            *byte = self.polarity.segment_level(*pattern);
        }
        self.register.send(&bytes[..self.digits]);
    }

    /// Give the register chain back
    pub fn release(self) -> ShiftRegister<D, C, L> {
        self.register
    }
}

impl<D: OutputPin, C: OutputPin, L: OutputPin> SegmentBackend for StaticHc595<D, C, L> {
    type Error = Infallible;

    fn digit_count(&self) -> usize {
        self.digits
    }

    fn polarity(&self) -> Polarity {
        self.polarity
    }

    fn write_digit(&mut self, physical: usize, pattern: SegmentPattern) -> Result<(), Infallible> {
        if physical < self.digits {
            self.shown[physical] = pattern;
            self.push();
        }
        Ok(())
    }

    fn write_all(&mut self, frame: &[SegmentPattern]) -> Result<(), Infallible> {
        let count = frame.len().min(self.digits);
        self.shown[..count].copy_from_slice(&frame[..count]);
        self.push();
        Ok(())
    }

    fn end(&mut self) -> Result<(), Infallible> {
        self.shown = [SegmentPattern::BLANK; MAX_DIGITS];
        self.push();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Bus, Hc595Chain, MockPin};
    use sevseg_core::segment::digit;

    const DATA: u8 = 0;
    const CLOCK: u8 = 1;
    const LATCH: u8 = 2;

    fn replay<const N: usize>(bus: &core::cell::RefCell<Bus>) -> (Hc595Chain<N>, usize) {
        let mut chain = Hc595Chain::<N>::new(DATA, CLOCK, LATCH);
        let latches = bus
            .borrow()
            .log
            .iter()
            .filter(|event| chain.feed(event))
            .count();
        (chain, latches)
    }

    #[test]
    fn test_frame_lands_in_order_with_one_latch() {
        let bus = Bus::new();
        let register = ShiftRegister::new(
            MockPin::new(&bus, DATA),
            MockPin::new(&bus, CLOCK),
            MockPin::new(&bus, LATCH),
        );
        let mut display = StaticHc595::new(register, 3, Polarity::CommonCathode).unwrap();
        bus.borrow_mut().log.clear();

        display.refresh(&[digit(1), digit(2), digit(3)]).unwrap();

        let (chain, latches) = replay::<3>(&bus);
        assert_eq!(latches, 1);
        assert_eq!(
            chain.outputs,
            [digit(1).bits(), digit(2).bits(), digit(3).bits()]
        );
    }

    #[test]
    fn test_common_anode_inverts() {
        let bus = Bus::new();
        let register = ShiftRegister::new(
            MockPin::new(&bus, DATA),
            MockPin::new(&bus, CLOCK),
            MockPin::new(&bus, LATCH),
        );
        let mut display = StaticHc595::new(register, 2, Polarity::CommonAnode).unwrap();

        display.write_digit(1, digit(8)).unwrap();

        let (chain, _) = replay::<2>(&bus);
        assert_eq!(chain.outputs, [0xFF, !digit(8).bits()]);
    }

    #[test]
    fn test_digit_count_checked() {
        let bus = Bus::new();
        let register = ShiftRegister::new(
            MockPin::new(&bus, DATA),
            MockPin::new(&bus, CLOCK),
            MockPin::new(&bus, LATCH),
        );
        assert!(matches!(
            StaticHc595::new(register, 0, Polarity::CommonAnode),
            Err(ConfigError::DigitCount)
        ));
    }
}
