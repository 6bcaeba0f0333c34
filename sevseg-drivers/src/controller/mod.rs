//! Controller chip backends
//!
//! These chips scan the digits themselves, so a backend only uploads the
//! frame and never needs a per-digit refresh tick.

pub mod tm163x;

pub use tm163x::{ChipModel, Tm163x, Tm163xConfig, Tm163xError};
