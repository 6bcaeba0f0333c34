//! Adapters from `embedded-hal` 1.0 digital pins
//!
//! Most chip HALs (embassy, rp-hal, esp-hal) expose push-pull and open-drain
//! pins whose error type is [`Infallible`]. These wrappers let such pins be
//! handed straight to the display backends.

use core::cell::RefCell;
use core::convert::Infallible;

use embedded_hal::digital::{self, ErrorType};

use crate::gpio::{FlexPin, InputPin, OutputPin};

fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

/// Push-pull output adapter
///
/// Tracks the driven level locally because `embedded-hal` state queries
/// need `&mut self`.
pub struct EhOutput<P> {
    pin: P,
    high: bool,
}

impl<P> EhOutput<P>
where
    P: digital::OutputPin + ErrorType<Error = Infallible>,
{
    /// Wrap a pin and drive it to a known low level
    pub fn new(mut pin: P) -> Self {
        infallible(pin.set_low());
        Self { pin, high: false }
    }

    /// Give the wrapped pin back
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P> OutputPin for EhOutput<P>
where
    P: digital::OutputPin + ErrorType<Error = Infallible>,
{
    fn set_high(&mut self) {
        infallible(self.pin.set_high());
        self.high = true;
    }

    fn set_low(&mut self) {
        infallible(self.pin.set_low());
        self.high = false;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// Open-drain adapter usable as a bidirectional [`FlexPin`]
///
/// Switching to input releases the line (drives it "high", i.e. floating);
/// switching back to output restores the last requested level.
pub struct EhOpenDrain<P> {
    pin: RefCell<P>,
    high: bool,
}

impl<P> EhOpenDrain<P>
where
    P: digital::OutputPin + digital::InputPin + ErrorType<Error = Infallible>,
{
    /// Wrap an open-drain pin, leaving the line released
    pub fn new(mut pin: P) -> Self {
        infallible(pin.set_high());
        Self {
            pin: RefCell::new(pin),
            high: true,
        }
    }

    /// Give the wrapped pin back
    pub fn release(self) -> P {
        self.pin.into_inner()
    }
}

impl<P> OutputPin for EhOpenDrain<P>
where
    P: digital::OutputPin + digital::InputPin + ErrorType<Error = Infallible>,
{
    fn set_high(&mut self) {
        infallible(self.pin.get_mut().set_high());
        self.high = true;
    }

    fn set_low(&mut self) {
        infallible(self.pin.get_mut().set_low());
        self.high = false;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

impl<P> InputPin for EhOpenDrain<P>
where
    P: digital::OutputPin + digital::InputPin + ErrorType<Error = Infallible>,
{
    fn is_high(&self) -> bool {
        infallible(self.pin.borrow_mut().is_high())
    }
}

impl<P> FlexPin for EhOpenDrain<P>
where
    P: digital::OutputPin + digital::InputPin + ErrorType<Error = Infallible>,
{
    fn set_as_output(&mut self) {
        let high = self.high;
        self.set_state(high);
    }

    fn set_as_input(&mut self) {
        infallible(self.pin.get_mut().set_high());
    }
}
