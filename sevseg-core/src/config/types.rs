//! Display configuration types
//!
//! Everything a board crate needs to describe a display besides the pins
//! themselves. With the `serde` feature these load from TOML or postcard.

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::buffer::{check_digit_count, DigitOrder, MAX_DIGITS};
use crate::error::ConfigError;
use crate::overlay::{check_rate, WaitStyle, DEFAULT_BLINK_MS, DEFAULT_WAIT_MS, MAX_WAIT_GLYPHS};
use crate::segment::{Polarity, SegmentPattern};

/// Blink periods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BlinkConfig {
    /// Time shown per cycle (ms)
    pub on_ms: u32,
    /// Time blanked per cycle (ms); 0 = same as `on_ms`
    pub off_ms: u32,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            on_ms: DEFAULT_BLINK_MS,
            off_ms: DEFAULT_BLINK_MS,
        }
    }
}

/// Wait animation settings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WaitConfig {
    /// Step period (ms)
    pub rate_ms: u32,
    /// Glyph layout
    pub style: WaitStyle,
    /// Custom glyph sequence; empty keeps the built-in spinner
    pub glyphs: Vec<SegmentPattern, MAX_WAIT_GLYPHS>,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            rate_ms: DEFAULT_WAIT_MS,
            style: WaitStyle::Spin,
            glyphs: Vec::new(),
        }
    }
}

/// Display configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DisplayConfig {
    /// LED wiring polarity
    pub polarity: Polarity,
    /// Logical to physical digit mapping; None = identity
    pub digit_order: Option<Vec<u8, MAX_DIGITS>>,
    /// Blink periods
    pub blink: BlinkConfig,
    /// Wait animation
    pub wait: WaitConfig,
}

impl DisplayConfig {
    /// Default configuration for the given polarity
    pub fn new(polarity: Polarity) -> Self {
        Self {
            polarity,
            ..Self::default()
        }
    }

    /// Builder-style digit order
    pub fn with_digit_order(mut self, order: &[u8]) -> Result<Self, ConfigError> {
        self.digit_order = Some(Vec::from_slice(order).map_err(|_| ConfigError::DigitOrder)?);
        Ok(self)
    }

    /// Resolve the digit order for a display of `digit_count` digits
    pub fn resolve_order(&self, digit_count: usize) -> Result<DigitOrder, ConfigError> {
        match &self.digit_order {
            None => DigitOrder::identity(digit_count),
            Some(order) if order.len() != digit_count => Err(ConfigError::DigitOrder),
            Some(order) => DigitOrder::try_from_slice(order),
        }
    }

    /// Check the configuration against the hardware's digit count
    pub fn validate(&self, digit_count: usize) -> Result<(), ConfigError> {
        check_digit_count(digit_count)?;
        self.resolve_order(digit_count)?;

        let off_ms = if self.blink.off_ms == 0 {
            self.blink.on_ms
        } else {
            self.blink.off_ms
        };
        check_rate(self.blink.on_ms)?;
        check_rate(off_ms)?;
        check_rate(self.wait.rate_ms)?;

        Ok(())
    }
}
