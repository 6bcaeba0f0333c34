//! Hardware backend trait
//!
//! A backend gets one frame of segment patterns onto physical pins or into a
//! controller chip. Frames are always handed over in physical digit order
//! and canonical polarity; polarity correction happens in the backend, at
//! the moment of output.

use crate::segment::{Polarity, SegmentPattern};

/// Trait for display hardware
///
/// Implementations exist per wiring scheme: static (every segment has its
/// own line), multiplexed over GPIO, multiplexed through shift registers,
/// and controller chips that multiplex on their own.
pub trait SegmentBackend {
    /// Error type for hardware operations
    type Error;

    /// Number of digits the hardware drives
    fn digit_count(&self) -> usize;

    /// LED wiring polarity
    fn polarity(&self) -> Polarity;

    /// Check if the backend lights one digit at a time
    ///
    /// Multiplexed backends need [`refresh`](Self::refresh) called often
    /// enough for persistence of vision (every digit serviced at least
    /// ~100 times per second, aggregate).
    fn is_multiplexed(&self) -> bool {
        false
    }

    /// Push one digit's pattern to the hardware
    fn write_digit(&mut self, physical: usize, pattern: SegmentPattern) -> Result<(), Self::Error>;

    /// Push a whole frame
    fn write_all(&mut self, frame: &[SegmentPattern]) -> Result<(), Self::Error> {
        for (physical, pattern) in frame.iter().enumerate() {
            self.write_digit(physical, *pattern)?;
        }
        Ok(())
    }

    /// Activate exactly one digit's common line
    ///
    /// Only meaningful for multiplexed hardware.
    fn select_digit(&mut self, _physical: usize) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Perform one refresh tick with the effective frame
    ///
    /// Static hardware writes the whole frame; multiplexed hardware
    /// services exactly one digit per call, round-robin.
    fn refresh(&mut self, frame: &[SegmentPattern]) -> Result<(), Self::Error> {
        self.write_all(frame)
    }

    /// Bring the hardware into a displaying state
    fn begin(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Turn the display dark
    fn end(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
