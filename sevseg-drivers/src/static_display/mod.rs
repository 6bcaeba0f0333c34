//! Static (non-multiplexed) backends
//!
//! Every segment of every digit has its own output, either a GPIO line or
//! a 74HC595 output. Digits stay lit between refreshes, so the refresh
//! rate only matters for blink and wait timing.

pub mod gpio;
pub mod hc595;

pub use gpio::StaticGpio;
pub use hc595::StaticHc595;
