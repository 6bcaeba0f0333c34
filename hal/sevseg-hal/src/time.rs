//! Time source abstraction

/// Monotonic millisecond clock
///
/// The counter is free-running and wraps at `u32::MAX` (about 49.7 days).
/// Consumers must compare timestamps with wrapping arithmetic.
pub trait Monotonic {
    /// Milliseconds since an arbitrary, fixed origin
    fn now_ms(&self) -> u32;

    /// Milliseconds elapsed since `earlier`, wrap-safe
    fn elapsed_since(&self, earlier: u32) -> u32 {
        self.now_ms().wrapping_sub(earlier)
    }
}

impl<T: Monotonic + ?Sized> Monotonic for &T {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}
