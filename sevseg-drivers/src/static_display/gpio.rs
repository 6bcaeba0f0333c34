//! Static display on direct GPIO lines

use core::convert::Infallible;

use sevseg_core::buffer::check_digit_count;
use sevseg_core::{ConfigError, Polarity, SegmentBackend, SegmentPattern};
use sevseg_hal::OutputPin;

/// `N` digits, eight segment lines each (a..g, dp)
pub struct StaticGpio<P, const N: usize> {
    segments: [[P; 8]; N],
    polarity: Polarity,
}

impl<P: OutputPin, const N: usize> StaticGpio<P, N> {
    /// Take the segment lines, `segments[digit][bit]`, and turn every
    /// segment off
    ///
    /// A rejected digit count drops the pins; `N` is checked with
    /// [`check_digit_count`].
    pub fn new(segments: [[P; 8]; N], polarity: Polarity) -> Result<Self, ConfigError> {
        check_digit_count(N)?;

        let mut display = Self { segments, polarity };
        display.blank();
        Ok(display)
    }

    fn blank(&mut self) {
        for physical in 0..N {
            self.drive(physical, SegmentPattern::BLANK);
        }
    }

    fn drive(&mut self, physical: usize, pattern: SegmentPattern) {
        let polarity = self.polarity;
        if let Some(pins) = self.segments.get_mut(physical) {
            for (bit, pin) in pins.iter_mut().enumerate() {
                pin.set_state(polarity.segment_high(pattern.bits() & (1 << bit) != 0));
            }
        }
    }

    /// Give the pins back
    pub fn release(self) -> [[P; 8]; N] {
        self.segments
    }
}

impl<P: OutputPin, const N: usize> SegmentBackend for StaticGpio<P, N> {
    type Error = Infallible;

    fn digit_count(&self) -> usize {
        N
    }

    fn polarity(&self) -> Polarity {
        self.polarity
    }

    fn write_digit(&mut self, physical: usize, pattern: SegmentPattern) -> Result<(), Infallible> {
        self.drive(physical, pattern);
        Ok(())
    }

    fn end(&mut self) -> Result<(), Infallible> {
        self.blank();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{pins, Bus};
    use sevseg_core::segment::digit;

    #[test]
    fn test_common_anode_drives_low() {
        let bus = Bus::new();
        let mut display =
            StaticGpio::new([pins::<8>(&bus, 0), pins::<8>(&bus, 8)], Polarity::CommonAnode)
                .unwrap();

        // Blank at start: every line high
        assert!((0..16).all(|pin| bus.borrow().level(pin)));

        display.refresh(&[digit(1), digit(7)]).unwrap();

        let bus = bus.borrow();
        // "1" lights b and c
        let lit: [bool; 8] = core::array::from_fn(|bit| !bus.level(bit as u8));
        assert_eq!(lit, [false, true, true, false, false, false, false, false]);
        // "7" lights a, b and c
        let lit: [bool; 8] = core::array::from_fn(|bit| !bus.level(8 + bit as u8));
        assert_eq!(lit, [true, true, true, false, false, false, false, false]);
    }

    #[test]
    fn test_common_cathode_and_end() {
        let bus = Bus::new();
        let mut display =
            StaticGpio::new([pins::<8>(&bus, 0)], Polarity::CommonCathode).unwrap();

        display.write_digit(0, SegmentPattern::DOT).unwrap();
        assert!(bus.borrow().level(7));
        assert!(!bus.borrow().level(0));

        display.end().unwrap();
        assert!((0..8).all(|pin| !bus.borrow().level(pin)));
    }

    #[test]
    fn test_not_multiplexed() {
        let bus = Bus::new();
        let display = StaticGpio::new([pins::<8>(&bus, 0)], Polarity::CommonAnode).unwrap();
        assert!(!display.is_multiplexed());
        assert_eq!(display.digit_count(), 1);
    }
}
