//! sevseg Hardware Abstraction Layer
//!
//! This crate defines the collaborator interfaces the display engine and
//! its backends consume: raw pin I/O and a monotonic millisecond clock.
//! Board support crates implement them for their chip; the optional
//! `embedded-hal` feature adapts any `embedded-hal` 1.0 pin instead.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application main loop                  │
//! └─────────────────────────────────────────┘
//!                     │  refresh(now_ms)
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  sevseg-core (Display engine)           │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  sevseg-drivers (backends)              │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  sevseg-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`gpio::FlexPin`] - Pin with switchable direction
//! - [`time::Monotonic`] - Millisecond time source

#![no_std]
#![deny(unsafe_code)]

#[cfg(any(feature = "embedded-hal", test))]
pub mod eh;
pub mod gpio;
pub mod time;

// Re-export key traits at crate root for convenience
pub use gpio::{FlexPin, InputPin, OutputPin};
pub use time::Monotonic;
