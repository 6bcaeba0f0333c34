//! Hardware backends for seven-segment displays
//!
//! This crate provides concrete implementations of the
//! [`SegmentBackend`](sevseg_core::SegmentBackend) trait defined in
//! sevseg-core for the common wiring schemes:
//!
//! - Static displays (direct GPIO, chained 74HC595)
//! - Multiplexed displays (direct GPIO, 74HC595 segment + select pair)
//! - Controller chips (TM1637, TM1639)
//! - The 74HC595 shift primitive they share

#![no_std]
#![deny(unsafe_code)]

pub mod controller;
pub mod dynamic;
pub mod shift_register;
pub mod static_display;

#[cfg(test)]
extern crate std;

#[cfg(test)]
mod mock;

pub use controller::{Tm163x, Tm163xError};
pub use dynamic::{DynamicGpio, DynamicHc595};
pub use shift_register::ShiftRegister;
pub use static_display::{StaticGpio, StaticHc595};
