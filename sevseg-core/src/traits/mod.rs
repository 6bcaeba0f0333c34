//! Hardware abstraction traits
//!
//! These traits define the interface between the display engine
//! and wiring-specific implementations.

pub mod backend;

pub use backend::SegmentBackend;
