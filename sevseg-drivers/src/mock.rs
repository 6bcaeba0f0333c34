//! Recording pins shared by the driver tests
//!
//! Every pin created from one [`Bus`] appends to the same log, so tests can
//! check the relative order of edges across pins.

use core::cell::RefCell;

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use sevseg_hal::{FlexPin, InputPin, OutputPin};

pub const LOG_LEN: usize = 4096;
const MAX_PINS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Pin driven to a level
    Level { pin: u8, high: bool },
    /// Pin released to input
    Input { pin: u8 },
    /// Pin driven again
    Output { pin: u8 },
}

pub struct Bus {
    levels: [bool; MAX_PINS],
    inputs: [bool; MAX_PINS],
    /// The chip on the other end pulls released lines low
    pub acknowledges: bool,
    pub log: Vec<Event, LOG_LEN>,
}

impl Bus {
    pub fn new() -> RefCell<Self> {
        RefCell::new(Self {
            levels: [false; MAX_PINS],
            inputs: [false; MAX_PINS],
            acknowledges: true,
            log: Vec::new(),
        })
    }

    pub fn level(&self, pin: u8) -> bool {
        self.levels[pin as usize]
    }

    fn record(&mut self, event: Event) {
        self.log.push(event).unwrap();
    }
}

pub struct MockPin<'a> {
    id: u8,
    bus: &'a RefCell<Bus>,
}

impl<'a> MockPin<'a> {
    pub fn new(bus: &'a RefCell<Bus>, id: u8) -> Self {
        Self { id, bus }
    }
}

/// Pins `first..first + N` on one bus
pub fn pins<const N: usize>(bus: &RefCell<Bus>, first: u8) -> [MockPin<'_>; N] {
    core::array::from_fn(|i| MockPin::new(bus, first + i as u8))
}

impl OutputPin for MockPin<'_> {
    fn set_high(&mut self) {
        let mut bus = self.bus.borrow_mut();
        bus.levels[self.id as usize] = true;
        bus.record(Event::Level {
            pin: self.id,
            high: true,
        });
    }

    fn set_low(&mut self) {
        let mut bus = self.bus.borrow_mut();
        bus.levels[self.id as usize] = false;
        bus.record(Event::Level {
            pin: self.id,
            high: false,
        });
    }

    fn is_set_high(&self) -> bool {
        self.bus.borrow().levels[self.id as usize]
    }
}

impl InputPin for MockPin<'_> {
    fn is_high(&self) -> bool {
        let bus = self.bus.borrow();
        if bus.inputs[self.id as usize] {
            !bus.acknowledges
        } else {
            bus.levels[self.id as usize]
        }
    }
}

impl FlexPin for MockPin<'_> {
    fn set_as_output(&mut self) {
        let mut bus = self.bus.borrow_mut();
        bus.inputs[self.id as usize] = false;
        bus.record(Event::Output { pin: self.id });
    }

    fn set_as_input(&mut self) {
        let mut bus = self.bus.borrow_mut();
        bus.inputs[self.id as usize] = true;
        bus.record(Event::Input { pin: self.id });
    }
}

pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

/// Replays a log through a chain of 74HC595 registers
///
/// Returns the latched outputs after every event, nearest register first.
pub struct Hc595Chain<const N: usize> {
    data: u8,
    clock: u8,
    latch: u8,
    data_high: bool,
    clock_high: bool,
    latch_high: bool,
    shift: [u8; N],
    pub outputs: [u8; N],
}

impl<const N: usize> Hc595Chain<N> {
    pub fn new(data: u8, clock: u8, latch: u8) -> Self {
        Self {
            data,
            clock,
            latch,
            data_high: false,
            clock_high: false,
            latch_high: false,
            shift: [0; N],
            outputs: [0; N],
        }
    }

    /// Feed one event; returns true when the outputs changed
    pub fn feed(&mut self, event: &Event) -> bool {
        let Event::Level { pin, high } = *event else {
            return false;
        };

        if pin == self.data {
            self.data_high = high;
        } else if pin == self.clock {
            if high && !self.clock_high {
                // Rising edge: every stage passes its top bit on
                let mut carry = self.data_high as u8;
                for stage in self.shift.iter_mut() {
                    let out = *stage >> 7;
                    *stage = (*stage << 1) | carry;
                    carry = out;
                }
            }
            self.clock_high = high;
        } else if pin == self.latch {
            let rising = high && !self.latch_high;
            self.latch_high = high;
            if rising && self.outputs != self.shift {
                self.outputs = self.shift;
                return true;
            }
        }
        false
    }
}

/// Bytes of every TM163x transfer in the log (start to stop)
pub fn tm163x_transfers(
    log: &[Event],
    clk: u8,
    dio: u8,
) -> Vec<Vec<u8, 20>, 8> {
    let mut transfers = Vec::new();
    let mut current: Vec<u8, 20> = Vec::new();
    let mut clk_high = false;
    let mut dio_high = false;
    let mut dio_input = false;
    let mut bits = 0u8;
    let mut byte = 0u8;
    let mut in_transfer = false;

    for event in log {
        match *event {
            Event::Input { pin } if pin == dio => dio_input = true,
            Event::Output { pin } if pin == dio => dio_input = false,
            Event::Level { pin, high } if pin == dio => {
                if clk_high && dio_high && !high {
                    in_transfer = true;
                    current.clear();
                    bits = 0;
                    byte = 0;
                } else if clk_high && !dio_high && high && in_transfer {
                    in_transfer = false;
                    transfers.push(current.clone()).unwrap();
                }
                dio_high = high;
            }
            Event::Level { pin, high } if pin == clk => {
                if high && !clk_high && in_transfer && !dio_input {
                    byte |= (dio_high as u8) << bits;
                    bits += 1;
                    if bits == 8 {
                        current.push(byte).unwrap();
                        bits = 0;
                        byte = 0;
                    }
                }
                clk_high = high;
            }
            _ => {}
        }
    }
    transfers
}
