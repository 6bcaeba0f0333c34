//! Display buffer and digit ordering
//!
//! The buffer holds one canonical [`SegmentPattern`] per logical digit,
//! index 0 being the leftmost digit. [`DigitOrder`] maps those logical
//! positions to the physical positions the hardware addresses.

use heapless::Vec;

use crate::error::{ConfigError, DisplayError};
use crate::segment::SegmentPattern;

/// Largest supported display, in digits (TM1639 address space)
pub const MAX_DIGITS: usize = 16;

/// Check a digit count against the supported range
pub fn check_digit_count(count: usize) -> Result<(), ConfigError> {
    if count == 0 || count > MAX_DIGITS {
        return Err(ConfigError::DigitCount);
    }
    Ok(())
}

/// Segment patterns for every digit, in logical order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayBuffer {
    digits: Vec<SegmentPattern, MAX_DIGITS>,
}

impl DisplayBuffer {
    /// Create a blank buffer of `count` digits
    pub fn new(count: usize) -> Result<Self, ConfigError> {
        check_digit_count(count)?;
        let mut digits = Vec::new();
        digits
            .resize(count, SegmentPattern::BLANK)
            .map_err(|_| ConfigError::DigitCount)?;
        Ok(Self { digits })
    }

    /// Number of digits (fixed at construction)
    pub fn len(&self) -> usize {
        self.digits.len()
    }

    /// Always false: a buffer has at least one digit
    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// Pattern at a logical index
    pub fn get(&self, index: usize) -> Option<SegmentPattern> {
        self.digits.get(index).copied()
    }

    /// Write one pattern at a logical index
    pub fn set(&mut self, index: usize, pattern: SegmentPattern) -> Result<(), DisplayError> {
        let slot = self
            .digits
            .get_mut(index)
            .ok_or(DisplayError::Index(index))?;
        *slot = pattern;
        Ok(())
    }

    /// Set every digit to the same pattern
    pub fn fill(&mut self, pattern: SegmentPattern) {
        self.digits.iter_mut().for_each(|d| *d = pattern);
    }

    /// Replace the whole content
    ///
    /// `patterns` must have exactly [`len`](Self::len) entries.
    pub fn replace(&mut self, patterns: &[SegmentPattern]) -> Result<(), DisplayError> {
        if patterns.len() != self.digits.len() {
            return Err(DisplayError::Overflow);
        }
        self.digits.copy_from_slice(patterns);
        Ok(())
    }

    /// Check if every digit is blank
    pub fn is_blank(&self) -> bool {
        self.digits.iter().all(|d| d.is_blank())
    }

    /// Patterns in logical order
    pub fn as_slice(&self) -> &[SegmentPattern] {
        &self.digits
    }
}

/// Logical to physical digit mapping
///
/// `order[logical] == physical`. Always a bijection over `0..len`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitOrder {
    order: Vec<u8, MAX_DIGITS>,
}

impl DigitOrder {
    /// Identity mapping (logical index == physical index)
    pub fn identity(count: usize) -> Result<Self, ConfigError> {
        check_digit_count(count)?;
        let order = (0..count as u8).collect();
        Ok(Self { order })
    }

    /// Build a mapping from a slice, checking it is a permutation
    pub fn try_from_slice(mapping: &[u8]) -> Result<Self, ConfigError> {
        check_digit_count(mapping.len())?;

        let mut seen: u16 = 0;
        for &physical in mapping {
            if physical as usize >= mapping.len() {
                return Err(ConfigError::DigitOrder);
            }
            let bit = 1u16 << physical;
            if seen & bit != 0 {
                return Err(ConfigError::DigitOrder);
            }
            seen |= bit;
        }

        let order = Vec::from_slice(mapping).map_err(|_| ConfigError::DigitOrder)?;
        Ok(Self { order })
    }

    /// Number of digits covered by the mapping
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Always false: a mapping covers at least one digit
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Physical position of a logical digit
    pub fn physical(&self, logical: usize) -> Option<usize> {
        self.order.get(logical).map(|&p| p as usize)
    }

    /// Check if this is the identity mapping
    pub fn is_identity(&self) -> bool {
        self.order.iter().enumerate().all(|(i, &p)| i == p as usize)
    }

    /// Scatter a logical frame into physical order
    ///
    /// Both slices must be [`len`](Self::len) long.
    pub fn apply(&self, logical: &[SegmentPattern], physical: &mut [SegmentPattern]) {
        for (pattern, &slot) in logical.iter().zip(self.order.iter()) {
            if let Some(out) = physical.get_mut(slot as usize) {
                *out = *pattern;
            }
        }
    }

    /// The raw mapping
    pub fn as_slice(&self) -> &[u8] {
        &self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::digit;

    #[test]
    fn test_buffer_bounds() {
        assert_eq!(DisplayBuffer::new(0), Err(ConfigError::DigitCount));
        assert_eq!(
            DisplayBuffer::new(MAX_DIGITS + 1),
            Err(ConfigError::DigitCount)
        );

        let mut buffer = DisplayBuffer::new(4).unwrap();
        assert_eq!(buffer.len(), 4);
        assert!(buffer.is_blank());
        assert_eq!(buffer.set(4, digit(1)), Err(DisplayError::Index(4)));

        buffer.set(3, digit(1)).unwrap();
        assert_eq!(buffer.get(3), Some(digit(1)));
        assert!(!buffer.is_blank());
    }

    #[test]
    fn test_order_rejects_out_of_range() {
        assert_eq!(
            DigitOrder::try_from_slice(&[0, 1, 4, 2]),
            Err(ConfigError::DigitOrder)
        );
    }

    #[test]
    fn test_order_rejects_duplicates() {
        assert_eq!(
            DigitOrder::try_from_slice(&[0, 1, 1, 2]),
            Err(ConfigError::DigitOrder)
        );
    }

    #[test]
    fn test_order_apply() {
        let order = DigitOrder::try_from_slice(&[3, 2, 1, 0]).unwrap();
        assert!(!order.is_identity());

        let logical = [digit(1), digit(2), digit(3), digit(4)];
        let mut physical = [SegmentPattern::BLANK; 4];
        order.apply(&logical, &mut physical);

        assert_eq!(physical, [digit(4), digit(3), digit(2), digit(1)]);
    }

    #[test]
    fn test_identity() {
        let order = DigitOrder::identity(6).unwrap();
        assert!(order.is_identity());
        assert_eq!(order.physical(5), Some(5));
        assert_eq!(order.physical(6), None);
    }
}
