//! Multiplexed display on direct GPIO lines

use core::convert::Infallible;

use sevseg_core::buffer::check_digit_count;
use sevseg_core::{ConfigError, Polarity, SegmentBackend, SegmentPattern};
use sevseg_hal::OutputPin;

use super::next_digit;

/// Eight shared segment lines and `N` digit select lines
pub struct DynamicGpio<S, D, const N: usize> {
    segments: [S; 8],
    selects: [D; N],
    polarity: Polarity,
    /// Digit serviced by the next refresh
    current: usize,
}

impl<S: OutputPin, D: OutputPin, const N: usize> DynamicGpio<S, D, N> {
    /// Take the lines and leave every digit dark
    ///
    /// A rejected digit count drops the pins; `N` is checked with
    /// [`check_digit_count`].
    pub fn new(segments: [S; 8], selects: [D; N], polarity: Polarity) -> Result<Self, ConfigError> {
        check_digit_count(N)?;

        let mut display = Self {
            segments,
            selects,
            polarity,
            current: 0,
        };
        display.deselect_all();
        display.drive_segments(SegmentPattern::BLANK);
        Ok(display)
    }

    /// Digit the next refresh will light
    pub fn current(&self) -> usize {
        self.current
    }

    fn deselect_all(&mut self) {
        let inactive = !self.polarity.select_active_high();
        for pin in self.selects.iter_mut() {
            pin.set_state(inactive);
        }
    }

    fn drive_segments(&mut self, pattern: SegmentPattern) {
        let polarity = self.polarity;
        for (bit, pin) in self.segments.iter_mut().enumerate() {
            pin.set_state(polarity.segment_high(pattern.bits() & (1 << bit) != 0));
        }
    }

    /// Give the pins back
    pub fn release(self) -> ([S; 8], [D; N]) {
        (self.segments, self.selects)
    }
}

impl<S: OutputPin, D: OutputPin, const N: usize> SegmentBackend for DynamicGpio<S, D, N> {
    type Error = Infallible;

    fn digit_count(&self) -> usize {
        N
    }

    fn polarity(&self) -> Polarity {
        self.polarity
    }

    fn is_multiplexed(&self) -> bool {
        true
    }

    /// Light one digit: deselect all, set the segments, then select it
    fn write_digit(&mut self, physical: usize, pattern: SegmentPattern) -> Result<(), Infallible> {
        self.deselect_all();
        self.drive_segments(pattern);
        self.select_digit(physical)
    }

    fn select_digit(&mut self, physical: usize) -> Result<(), Infallible> {
        let active = self.polarity.select_active_high();
        for (index, pin) in self.selects.iter_mut().enumerate() {
            pin.set_state(if index == physical { active } else { !active });
        }
        Ok(())
    }

    fn refresh(&mut self, frame: &[SegmentPattern]) -> Result<(), Infallible> {
        let physical = self.current;
        let pattern = frame.get(physical).copied().unwrap_or(SegmentPattern::BLANK);
        self.write_digit(physical, pattern)?;
        self.current = next_digit(physical, N);
        Ok(())
    }

    fn end(&mut self) -> Result<(), Infallible> {
        self.deselect_all();
        self.drive_segments(SegmentPattern::BLANK);
        Ok(())
    }
}
