//! Multiplexed display behind two 74HC595 registers
//!
//! The common 4- and 8-digit modules chain a segment register and a digit
//! select register. Every tick shifts the segment byte, then the select
//! byte (`1 << digit`), and latches both at once. Since the old digit is
//! switched off in the same latch edge that switches the new one on,
//! there is no ghosting window.

use core::convert::Infallible;

use sevseg_core::{ConfigError, Polarity, SegmentBackend, SegmentPattern};
use sevseg_hal::OutputPin;

use super::next_digit;
use crate::shift_register::ShiftRegister;

/// Fewest digits a select register drives
pub const MIN_DIGITS: usize = 2;

/// Most digits a select register drives
pub const MAX_DIGITS: usize = 8;

/// Check that one select register can drive `digits`
pub fn check_digit_count(digits: usize) -> Result<(), ConfigError> {
    if (MIN_DIGITS..=MAX_DIGITS).contains(&digits) {
        Ok(())
    } else {
        Err(ConfigError::DigitCount)
    }
}

/// Multiplexed display on a segment + select register pair
pub struct DynamicHc595<D, C, L> {
    register: ShiftRegister<D, C, L>,
    digits: usize,
    polarity: Polarity,
    current: usize,
}

impl<D: OutputPin, C: OutputPin, L: OutputPin> DynamicHc595<D, C, L> {
    /// Create the backend and leave every digit dark
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
            current: 0,
        };
        display.dark();
        Ok(display)
    }

    /// Digit the next refresh will light
    pub fn current(&self) -> usize {
        self.current
    }

    /// Select byte with only `physical` active (or none)
    fn select_byte(&self, physical: Option<usize>) -> u8 {
        let active = physical.map_or(0, |digit| 1u8 << digit);
        if self.polarity.select_active_high() {
            active
        } else {
            !active
        }
    }

    fn dark(&mut self) {
        let segments = self.polarity.segment_level(SegmentPattern::BLANK);
        let select = self.select_byte(None);
        self.register.send(&[segments, select]);
    }

    /// Give the register chain back
    pub fn release(self) -> ShiftRegister<D, C, L> {
        self.register
    }
}

impl<D: OutputPin, C: OutputPin, L: OutputPin> SegmentBackend for DynamicHc595<D, C, L> {
    type Error = Infallible;

    fn digit_count(&self) -> usize {
        self.digits
    }

    fn polarity(&self) -> Polarity {
        self.polarity
    }

    fn is_multiplexed(&self) -> bool {
        true
    }

    fn write_digit(&mut self, physical: usize, pattern: SegmentPattern) -> Result<(), Infallible> {
        if physical >= self.digits {
            return Ok(());
        }
        let segments = self.polarity.segment_level(pattern);
        let select = self.select_byte(Some(physical));
        self.register.send(&[segments, select]);
        Ok(())
    }

    fn refresh(&mut self, frame: &[SegmentPattern]) -> Result<(), Infallible> {
        let physical = self.current;
        let pattern = frame.get(physical).copied().unwrap_or(SegmentPattern::BLANK);
        self.write_digit(physical, pattern)?;
        self.current = next_digit(physical, self.digits);
        Ok(())
    }

    fn end(&mut self) -> Result<(), Infallible> {
        self.dark();
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

    type Mock<'a> = DynamicHc595<MockPin<'a>, MockPin<'a>, MockPin<'a>>;

    fn display(bus: &core::cell::RefCell<Bus>, digits: usize, polarity: Polarity) -> Mock<'_> {
        let register = ShiftRegister::new(
            MockPin::new(bus, DATA),
            MockPin::new(bus, CLOCK),
            MockPin::new(bus, LATCH),
        );
        DynamicHc595::new(register, digits, polarity).unwrap()
    }

    /// Latched (select, segments) pairs, one per output change
    fn latched(bus: &Bus) -> heapless::Vec<(u8, u8), 32> {
        let mut chain = Hc595Chain::<2>::new(DATA, CLOCK, LATCH);
        let mut out = heapless::Vec::new();
        for event in bus.log.iter() {
            if chain.feed(event) {
                out.push((chain.outputs[0], chain.outputs[1])).unwrap();
            }
        }
        out
    }

    #[test]
    fn test_digit_count_bounds() {
        assert_eq!(check_digit_count(2), Ok(()));
        assert_eq!(check_digit_count(8), Ok(()));
        assert_eq!(check_digit_count(9), Err(ConfigError::DigitCount));

        let bus = Bus::new();
        for digits in [0, 1, 9] {
            let register = ShiftRegister::new(
                MockPin::new(&bus, DATA),
                MockPin::new(&bus, CLOCK),
                MockPin::new(&bus, LATCH),
            );
            assert!(matches!(
                DynamicHc595::new(register, digits, Polarity::CommonAnode),
                Err(ConfigError::DigitCount)
            ));
        }
    }

    #[test]
    fn test_one_digit_per_refresh() {
        let bus = Bus::new();
        let mut display = display(&bus, 4, Polarity::CommonAnode);
        let frame = [digit(1), digit(2), digit(3), digit(4)];

        for _ in 0..4 {
            display.refresh(&frame).unwrap();
        }

        let latched = latched(&bus.borrow());
        // Dark frame from construction, then one latch per digit
        assert_eq!(latched[0], (0x00, 0xFF));
        let selects: heapless::Vec<u8, 8> = latched[1..].iter().map(|&(sel, _)| sel).collect();
        assert_eq!(selects.as_slice(), &[0b0001, 0b0010, 0b0100, 0b1000]);
        assert_eq!(latched[3].1, !digit(3).bits());
        assert_eq!(display.current(), 0);
    }

    #[test]
    fn test_common_cathode_select_is_active_low() {
        let bus = Bus::new();
        let mut display = display(&bus, 2, Polarity::CommonCathode);

        display.refresh(&[SegmentPattern::BLANK, digit(7)]).unwrap();
        display.refresh(&[SegmentPattern::BLANK, digit(7)]).unwrap();

        let latched = latched(&bus.borrow());
        assert_eq!(latched[0], (0xFF, 0x00));
        assert_eq!(latched.last(), Some(&(0b1111_1101, digit(7).bits())));
    }
}
