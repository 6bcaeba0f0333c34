//! Error kinds
//!
//! Every error here is a deterministic programmer or configuration mistake.
//! Retrying the same call with the same input fails the same way.

/// Invalid construction or runtime configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Digit count is zero or above what the engine/hardware supports
    DigitCount,
    /// Digit order is not a permutation of `0..digit_count`
    DigitOrder,
    /// Blink or wait period outside the accepted range
    RateOutOfRange,
    /// Wait sequence is empty or longer than supported
    WaitSequence,
    /// Brightness level above the chip's maximum
    Brightness,
    /// Configured polarity differs from the backend's wiring
    Polarity,
}

/// Errors reported by the display engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Character has no seven-segment representation
    Encoding(char),
    /// Value needs more digits than the display has
    Overflow,
    /// Digit index out of range
    Index(usize),
    /// Invalid configuration
    Config(ConfigError),
}

impl From<ConfigError> for DisplayError {
    fn from(err: ConfigError) -> Self {
        DisplayError::Config(err)
    }
}
