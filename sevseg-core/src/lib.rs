//! Hardware-independent seven-segment display logic
//!
//! This crate contains everything that does not depend on how a display
//! is wired:
//!
//! - Segment patterns, polarity and the glyph table
//! - Content encoding (integers, floats, text, gauges)
//! - Content buffer and logical to physical digit order
//! - Blink and wait overlay
//! - The [`Display`] engine and the [`SegmentBackend`] trait it drives
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

pub mod buffer;
pub mod config;
pub mod encoder;
pub mod engine;
pub mod error;
pub mod overlay;
pub mod segment;
pub mod traits;

pub use buffer::{DigitOrder, DisplayBuffer, MAX_DIGITS};
pub use config::DisplayConfig;
pub use encoder::{Content, NumberFormat};
pub use engine::Display;
pub use error::{ConfigError, DisplayError};
pub use overlay::{DigitState, WaitMode, WaitStyle};
pub use segment::{Polarity, SegmentPattern};
pub use traits::SegmentBackend;
