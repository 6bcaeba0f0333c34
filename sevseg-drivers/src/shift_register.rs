//! 74HC595 serial-in, parallel-out shift register chain
//!
//! Three lines drive any number of chained registers:
//!
//! - DATA (SER/DS): bit presented before each clock edge
//! - CLOCK (SRCLK/SHCP): shifts on the rising edge
//! - LATCH (RCLK/STCP): copies the shift stages to the outputs on the
//!   rising edge
//!
//! The outputs only change when the latch rises, after every bit has been
//! clocked in, so a half-shifted pattern is never visible.

use sevseg_hal::OutputPin;

/// Chain of 74HC595 registers
pub struct ShiftRegister<D, C, L> {
    data: D,
    clock: C,
    latch: L,
}

impl<D: OutputPin, C: OutputPin, L: OutputPin> ShiftRegister<D, C, L> {
    /// Take the three control lines
    ///
    /// The latch idles high and the clock low, so the first rising edge
    /// is a real shift.
    pub fn new(mut data: D, mut clock: C, mut latch: L) -> Self {
        latch.set_high();
        clock.set_low();
        data.set_low();
        Self { data, clock, latch }
    }

    /// Shift `bytes` out, MSB first, and latch once at the end
    ///
    /// The first byte sent ends up in the register farthest from the MCU.
    pub fn send(&mut self, bytes: &[u8]) {
        self.latch.set_low();
        for &byte in bytes {
            self.shift_byte(byte);
        }
        self.latch.set_high();
    }

    fn shift_byte(&mut self, byte: u8) {
        for bit in (0..8).rev() {
            self.data.set_state(byte & (1 << bit) != 0);
            self.clock.set_high();
            self.clock.set_low();
        }
    }

    /// Give the pins back
    pub fn release(self) -> (D, C, L) {
        (self.data, self.clock, self.latch)
    }
}
