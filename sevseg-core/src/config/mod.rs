//! Configuration types
//!
//! These types describe a display's wiring polarity, digit order and
//! animation timing. Parsing them from a file is up to the board crate.

pub mod types;

pub use types::{BlinkConfig, DisplayConfig, WaitConfig};
