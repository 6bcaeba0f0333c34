//! TM1637 / TM1639 LED controller (two-wire mode)
//!
//! The chip multiplexes the digits on its own; this backend only has to
//! write display RAM when the frame changes.
//!
//! # Wire Protocol
//!
//! A two-wire, I2C-like bus without addresses, bytes sent LSB first:
//! - Start: DIO falls while CLK is high
//! - Each bit: DIO set while CLK is low, sampled on the CLK rising edge
//! - After every byte the chip pulls DIO low for one clock (ACK)
//! - Stop: DIO rises while CLK is high
//!
//! A frame is three transfers: data command, address + display RAM, and
//! display control (on/off, brightness).

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use sevseg_core::buffer::MAX_DIGITS;
use sevseg_core::{ConfigError, Polarity, SegmentBackend, SegmentPattern};
use sevseg_hal::{FlexPin, OutputPin};

/// TM163x command bytes
pub mod cmd {
    /// Data command: write display RAM, auto-increment address
    pub const DATA_WRITE: u8 = 0x40;
    /// Data command: write display RAM, fixed address
    pub const DATA_WRITE_FIXED: u8 = 0x44;
    /// Address command, OR-ed with the start address
    pub const ADDRESS: u8 = 0xC0;
    /// Display control: display on, OR-ed with the brightness
    pub const DISPLAY_ON: u8 = 0x88;
    /// Display control: display off
    pub const DISPLAY_OFF: u8 = 0x80;
}

/// Highest brightness level
pub const MAX_BRIGHTNESS: u8 = 7;

/// Half clock period (us); keeps the bus well under the chip's 250 kHz
const BIT_DELAY_US: u32 = 5;

/// Supported chips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChipModel {
    /// 6 grids
    Tm1637,
    /// 16 bytes of display RAM
    Tm1639,
}

impl ChipModel {
    /// Digits the chip can address
    pub const fn max_digits(self) -> usize {
        match self {
            ChipModel::Tm1637 => 6,
            ChipModel::Tm1639 => 16,
        }
    }
}

/// TM163x configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tm163xConfig {
    /// Chip variant
    pub model: ChipModel,
    /// Digits wired to the chip
    pub digits: usize,
    /// Wiring of the attached digits (the chip drives both kinds)
    pub polarity: Polarity,
    /// Brightness 0..=7
    pub brightness: u8,
}

impl Tm163xConfig {
    /// Typical 4-digit TM1637 module at full brightness
    pub const fn tm1637(digits: usize) -> Self {
        Self {
            model: ChipModel::Tm1637,
            digits,
            polarity: Polarity::CommonAnode,
            brightness: MAX_BRIGHTNESS,
        }
    }

    /// Check the digit count against the chip and the brightness level
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.digits == 0 || self.digits > self.model.max_digits() {
            return Err(ConfigError::DigitCount);
        }
        if self.brightness > MAX_BRIGHTNESS {
            return Err(ConfigError::Brightness);
        }
        Ok(())
    }
}

/// TM163x communication errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tm163xError {
    /// The chip did not acknowledge a byte
    Nack,
}

/// TM163x backend, bit-banged over two lines
pub struct Tm163x<CLK, DIO, DELAY> {
    clk: CLK,
    dio: DIO,
    delay: DELAY,
    config: Tm163xConfig,
    display_on: bool,
    /// Display RAM contents as last acknowledged by the chip
    sent: Option<Vec<u8, MAX_DIGITS>>,
    /// Display control byte needs to be (re)sent
    control_dirty: bool,
}

impl<CLK, DIO, DELAY> Tm163x<CLK, DIO, DELAY>
where
    CLK: OutputPin,
    DIO: FlexPin,
    DELAY: DelayNs,
{
    /// Create the backend; nothing is sent until the first refresh
    ///
    /// The pins are consumed even when the config is rejected; call
    /// [`Tm163xConfig::validate`] first to keep them on failure.
    pub fn new(
        mut clk: CLK,
        mut dio: DIO,
        delay: DELAY,
        config: Tm163xConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        // Idle bus: both lines high
        dio.set_as_output();
        clk.set_high();
        dio.set_high();

        Ok(Self {
            clk,
            dio,
            delay,
            config,
            display_on: true,
            sent: None,
            control_dirty: true,
        })
    }

    /// Current configuration
    pub fn config(&self) -> &Tm163xConfig {
        &self.config
    }

    /// Change the brightness, applied with the next refresh
    pub fn set_brightness(&mut self, level: u8) -> Result<(), ConfigError> {
        if level > MAX_BRIGHTNESS {
            return Err(ConfigError::Brightness);
        }
        if level != self.config.brightness {
            self.config.brightness = level;
            self.control_dirty = true;
        }
        Ok(())
    }

    /// Current brightness
    pub fn brightness(&self) -> u8 {
        self.config.brightness
    }

    /// Check if the display is switched on
    pub fn is_on(&self) -> bool {
        self.display_on
    }

    /// Give the lines and delay back
    pub fn release(self) -> (CLK, DIO, DELAY) {
        (self.clk, self.dio, self.delay)
    }

    fn control_byte(&self) -> u8 {
        if self.display_on {
            cmd::DISPLAY_ON | self.config.brightness
        } else {
            cmd::DISPLAY_OFF
        }
    }

    fn send_control(&mut self) -> Result<(), Tm163xError> {
        let control = self.control_byte();
        self.transfer(&[control])?;
        self.control_dirty = false;
        Ok(())
    }

    /// One start..stop transfer; always ends with a stop condition
    fn transfer(&mut self, bytes: &[u8]) -> Result<(), Tm163xError> {
        self.start();
        let result = bytes.iter().try_for_each(|&byte| self.write_byte(byte));
        self.stop();

        #[cfg(feature = "defmt")]
        if result.is_err() {
            defmt::warn!("tm163x: no ACK, {} byte transfer dropped", bytes.len());
        }

        result
    }

    fn start(&mut self) {
        self.clk.set_high();
        self.dio.set_high();
        self.delay.delay_us(BIT_DELAY_US);
        self.dio.set_low();
        self.delay.delay_us(BIT_DELAY_US);
    }

    fn stop(&mut self) {
        self.clk.set_low();
        self.delay.delay_us(BIT_DELAY_US);
        self.dio.set_low();
        self.delay.delay_us(BIT_DELAY_US);
        self.clk.set_high();
        self.delay.delay_us(BIT_DELAY_US);
        self.dio.set_high();
        self.delay.delay_us(BIT_DELAY_US);
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), Tm163xError> {
        for bit in 0..8 {
            self.clk.set_low();
            self.dio.set_state(byte & (1 << bit) != 0);
            self.delay.delay_us(BIT_DELAY_US);
            self.clk.set_high();
            self.delay.delay_us(BIT_DELAY_US);
        }

        // Ninth clock: the chip pulls DIO low to acknowledge
        self.clk.set_low();
        self.dio.set_as_input();
        self.delay.delay_us(BIT_DELAY_US);
        let acked = self.dio.is_low();
        self.clk.set_high();
        self.delay.delay_us(BIT_DELAY_US);
        self.clk.set_low();
        self.dio.set_as_output();

        if acked {
            Ok(())
        } else {
            Err(Tm163xError::Nack)
        }
    }
}

impl<CLK, DIO, DELAY> SegmentBackend for Tm163x<CLK, DIO, DELAY>
where
    CLK: OutputPin,
    DIO: FlexPin,
    DELAY: DelayNs,
{
    type Error = Tm163xError;

    fn digit_count(&self) -> usize {
        self.config.digits
    }

    fn polarity(&self) -> Polarity {
        self.config.polarity
    }

    /// Write one RAM cell in fixed-address mode
    fn write_digit(&mut self, physical: usize, pattern: SegmentPattern) -> Result<(), Tm163xError> {
        if physical >= self.config.digits {
            return Ok(());
        }

        self.transfer(&[cmd::DATA_WRITE_FIXED])?;
        self.transfer(&[cmd::ADDRESS | physical as u8, pattern.bits()])?;

        if let Some(cell) = self.sent.as_mut().and_then(|sent| sent.get_mut(physical)) {
            *cell = pattern.bits();
        }
        Ok(())
    }

    /// Write the whole display RAM, auto-increment mode
    fn write_all(&mut self, frame: &[SegmentPattern]) -> Result<(), Tm163xError> {
        let count = frame.len().min(self.config.digits);

        // Address command followed by the RAM bytes
        let mut bytes = [0u8; MAX_DIGITS + 1];
        bytes[0] = cmd::ADDRESS;
        for (byte, pattern) in bytes[1..].iter_mut().zip(&frame[..count]) {
            *byte = pattern.bits();
        }

        self.transfer(&[cmd::DATA_WRITE])?;
        self.transfer(&bytes[..=count])?;
        self.sent = Vec::from_slice(&bytes[1..=count]).ok();
        Ok(())
    }

    /// Send the frame if it changed since the last successful write
    fn refresh(&mut self, frame: &[SegmentPattern]) -> Result<(), Tm163xError> {
        let count = frame.len().min(self.config.digits);
        let unchanged = self.sent.as_ref().is_some_and(|sent| {
            sent.len() == count
                && sent
                    .iter()
                    .zip(&frame[..count])
                    .all(|(&byte, pattern)| byte == pattern.bits())
        });

        if !unchanged {
            self.write_all(frame)?;
        }
        if self.control_dirty {
            self.send_control()?;
        }
        Ok(())
    }

    fn begin(&mut self) -> Result<(), Tm163xError> {
        self.display_on = true;
        self.send_control()
    }

    fn end(&mut self) -> Result<(), Tm163xError> {
        self.display_on = false;
        self.send_control()
    }
}
