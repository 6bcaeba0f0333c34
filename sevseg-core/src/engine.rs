//! Display engine
//!
//! [`Display`] owns the content buffer, the digit order and the overlay,
//! and hands every refresh tick to its [`SegmentBackend`]. Content calls
//! encode into scratch space first; a rejected value leaves whatever was
//! shown before untouched.
//!
//! # Usage
//!
//! ```ignore
//! let mut display = Display::new(backend, DisplayConfig::default())?;
//! display.set_content(-42)?;
//! display.set_blink_mask(&[0], 300)?;
//!
//! loop {
//!     display.poll(&clock)?;
//! }
//! ```

use sevseg_hal::Monotonic;

use crate::buffer::{DigitOrder, DisplayBuffer, MAX_DIGITS};
use crate::config::DisplayConfig;
use crate::encoder::{self, Content, NumberFormat, Scratch};
use crate::error::{ConfigError, DisplayError};
use crate::overlay::{DigitState, Overlay, WaitMode, WaitStyle};
use crate::segment::{glyph, Polarity, SegmentPattern};
use crate::traits::SegmentBackend;

/// Seven-segment display driven through a backend
pub struct Display<B: SegmentBackend> {
    backend: B,
    buffer: DisplayBuffer,
    order: DigitOrder,
    overlay: Overlay,
}

impl<B: SegmentBackend> Display<B> {
    /// Create a display, checking the configuration against the hardware
    ///
    /// The content starts blank, blink and wait start inactive.
    pub fn new(backend: B, config: DisplayConfig) -> Result<Self, DisplayError> {
        let digit_count = backend.digit_count();
        config.validate(digit_count)?;

        if config.polarity != backend.polarity() {
            return Err(ConfigError::Polarity.into());
        }

        let mut overlay = Overlay::new(digit_count);
        overlay
            .blink_mut()
            .set_rates(config.blink.on_ms, config.blink.off_ms)?;
        overlay.wait_mut().set_rate(config.wait.rate_ms)?;
        overlay.wait_mut().set_style(config.wait.style);
        if !config.wait.glyphs.is_empty() {
            overlay.wait_mut().set_sequence(&config.wait.glyphs)?;
        }

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "display: {} digits, {}, multiplexed={}",
            digit_count,
            config.polarity,
            backend.is_multiplexed()
        );

        Ok(Self {
            buffer: DisplayBuffer::new(digit_count)?,
            order: config.resolve_order(digit_count)?,
            overlay,
            backend,
        })
    }

    /// Number of digits
    pub fn digit_count(&self) -> usize {
        self.buffer.len()
    }

    /// LED wiring polarity of the backend
    pub fn polarity(&self) -> Polarity {
        self.backend.polarity()
    }

    /// Smallest and largest integer that fits
    pub fn value_range(&self) -> (i32, i32) {
        encoder::value_range(self.digit_count())
    }

    // --- Content ---

    /// Show an integer, float or text
    ///
    /// Integers are right-aligned, floats get as many decimals as fit,
    /// text is left-aligned. Accepted content ends a [`wait`](Self::wait)
    /// animation; [`wait_on_blank`](Self::wait_on_blank) keeps running.
    pub fn set_content<'a>(&mut self, content: impl Into<Content<'a>>) -> Result<(), DisplayError> {
        let encoded = encoder::encode(content.into(), self.digit_count());
        self.commit(encoded)
    }

    /// Show an integer with explicit alignment and padding
    pub fn set_int(&mut self, value: i32, format: NumberFormat) -> Result<(), DisplayError> {
        let encoded = encoder::encode_int(value, self.digit_count(), format);
        self.commit(encoded)
    }

    /// Show a float with a fixed number of decimals
    pub fn set_float(
        &mut self,
        value: f32,
        decimals: u8,
        format: NumberFormat,
    ) -> Result<(), DisplayError> {
        let encoded = encoder::encode_float(value, decimals, self.digit_count(), format);
        self.commit(encoded)
    }

    /// Show text
    pub fn set_text(&mut self, text: &str) -> Result<(), DisplayError> {
        let encoded = encoder::encode_text(text, self.digit_count());
        self.commit(encoded)
    }

    /// Write a raw pattern at a logical digit
    pub fn set_raw_segments(
        &mut self,
        index: usize,
        pattern: SegmentPattern,
    ) -> Result<(), DisplayError> {
        self.buffer.set(index, pattern)
    }

    /// Write one glyph at a logical digit
    pub fn set_char(&mut self, index: usize, ch: char) -> Result<(), DisplayError> {
        let pattern = glyph(ch).ok_or(DisplayError::Encoding(ch))?;
        self.buffer.set(index, pattern)
    }

    /// Blank every digit
    pub fn clear(&mut self) {
        self.buffer.fill(SegmentPattern::BLANK);
    }

    /// Check if the content is blank
    pub fn is_blank(&self) -> bool {
        self.buffer.is_blank()
    }

    /// Content buffer, logical order
    pub fn buffer(&self) -> &DisplayBuffer {
        &self.buffer
    }

    /// Show a labelled bar gauge, `level` 0..=3
    pub fn gauge(&mut self, level: u8, label: char) -> Result<(), DisplayError> {
        let encoded = encoder::encode_gauge(level, label, self.digit_count());
        self.commit(encoded)
    }

    /// Show a labelled bar gauge for a 0.0..=1.0 ratio
    pub fn gauge_ratio(&mut self, ratio: f32, label: char) -> Result<(), DisplayError> {
        let level = encoder::gauge_level(ratio)?;
        self.gauge(level, label)
    }

    /// Show two labelled gauges side by side
    pub fn double_gauge(
        &mut self,
        left: u8,
        right: u8,
        left_label: char,
        right_label: char,
    ) -> Result<(), DisplayError> {
        let encoded =
            encoder::encode_double_gauge(left, right, left_label, right_label, self.digit_count());
        self.commit(encoded)
    }

    fn commit(&mut self, encoded: Result<Scratch, DisplayError>) -> Result<(), DisplayError> {
        match encoded {
            Ok(patterns) => {
                self.buffer.replace(&patterns)?;
                if self.overlay.wait().mode() == WaitMode::All {
                    self.set_wait_mode(WaitMode::Off);
                }
                Ok(())
            }
            Err(err) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("display: content rejected: {}", err);
                Err(err)
            }
        }
    }

    // --- Digit order ---

    /// Install a logical to physical digit mapping
    ///
    /// `order[logical] == physical`; must be a permutation of
    /// `0..digit_count`.
    pub fn set_digits_order(&mut self, order: &[u8]) -> Result<(), DisplayError> {
        if order.len() != self.digit_count() {
            return Err(ConfigError::DigitOrder.into());
        }
        self.order = DigitOrder::try_from_slice(order)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("display: digit order {}", order);

        Ok(())
    }

    /// Current digit mapping
    pub fn digits_order(&self) -> &DigitOrder {
        &self.order
    }

    // --- Blink ---

    /// Blink the given logical digits every `rate_ms`
    ///
    /// `rate_ms == 0` or an empty index list stops blinking.
    pub fn set_blink_mask(&mut self, indices: &[usize], rate_ms: u32) -> Result<(), DisplayError> {
        if rate_ms == 0 || indices.is_empty() {
            self.no_blink();
            return Ok(());
        }

        let mask = self.overlay.mask_of(indices)?;
        self.overlay.blink_mut().set_rates(rate_ms, rate_ms)?;
        self.overlay.blink_mut().start(mask);

        #[cfg(feature = "defmt")]
        defmt::debug!("display: blink mask {=u16:b} every {} ms", mask, rate_ms);

        Ok(())
    }

    /// Change the blink periods; `off_ms == 0` reuses `on_ms`
    pub fn set_blink_rate(&mut self, on_ms: u32, off_ms: u32) -> Result<(), DisplayError> {
        self.overlay.blink_mut().set_rates(on_ms, off_ms)?;
        Ok(())
    }

    /// Blink every digit at the current rate
    pub fn blink(&mut self) {
        let mask = self.overlay.full_mask();
        self.overlay.blink_mut().start(mask);

        #[cfg(feature = "defmt")]
        defmt::debug!("display: blink all");
    }

    /// Stop blinking
    pub fn no_blink(&mut self) {
        self.overlay.blink_mut().stop();

        #[cfg(feature = "defmt")]
        defmt::debug!("display: blink off");
    }

    /// Check if any digit blinks
    pub fn is_blinking(&self) -> bool {
        self.overlay.blink().is_active()
    }

    // --- Wait ---

    /// Replace the wait animation glyphs (1..=8 patterns)
    pub fn set_wait_char(&mut self, sequence: &[SegmentPattern]) -> Result<(), DisplayError> {
        self.overlay.wait_mut().set_sequence(sequence)?;
        Ok(())
    }

    /// Change the wait animation step period
    pub fn set_wait_rate(&mut self, rate_ms: u32) -> Result<(), DisplayError> {
        self.overlay.wait_mut().set_rate(rate_ms)?;
        Ok(())
    }

    /// Change how wait glyphs are laid out
    pub fn set_wait_style(&mut self, style: WaitStyle) {
        self.overlay.wait_mut().set_style(style);
    }

    /// Run the wait animation on every digit
    pub fn wait(&mut self) {
        self.set_wait_mode(WaitMode::All);
    }

    /// Run the wait animation on blank digits only
    pub fn wait_on_blank(&mut self) {
        self.set_wait_mode(WaitMode::Blank);
    }

    /// Stop the wait animation
    pub fn no_wait(&mut self) {
        self.set_wait_mode(WaitMode::Off);
    }

    /// Check if the wait animation runs
    pub fn is_waiting(&self) -> bool {
        self.overlay.wait().is_active()
    }

    fn set_wait_mode(&mut self, mode: WaitMode) {
        self.overlay.wait_mut().set_mode(mode);

        #[cfg(feature = "defmt")]
        defmt::debug!("display: wait {}", mode);
    }

    /// What a logical digit shows as of the last refresh
    pub fn digit_state(&self, index: usize) -> Result<DigitState, DisplayError> {
        let content = self.buffer.get(index).ok_or(DisplayError::Index(index))?;
        Ok(self.overlay.digit_state(index, content))
    }

    // --- Service ---

    /// Perform one refresh tick
    ///
    /// Advances the blink and wait clocks to `now_ms`, composes the
    /// effective frame and passes it to the backend in physical order.
    /// Multiplexed backends light one digit per call, so call this from
    /// the main loop often enough for every digit to be serviced about
    /// 100 times per second.
    pub fn refresh(&mut self, now_ms: u32) -> Result<(), B::Error> {
        self.overlay.advance(now_ms);

        let count = self.digit_count();
        let frame = self.physical_frame();
        self.backend.refresh(&frame[..count])
    }

    /// Refresh using the current time of `clock`
    pub fn poll<M: Monotonic>(&mut self, clock: &M) -> Result<(), B::Error> {
        self.refresh(clock.now_ms())
    }

    /// Effective patterns in physical order
    ///
    /// Only the first [`digit_count`](Self::digit_count) entries are used.
    pub fn physical_frame(&self) -> [SegmentPattern; MAX_DIGITS] {
        let count = self.digit_count();

        let mut logical = [SegmentPattern::BLANK; MAX_DIGITS];
        for (index, (slot, &content)) in logical
            .iter_mut()
            .zip(self.buffer.as_slice())
            .enumerate()
        {
            *slot = self.overlay.effective(index, content);
        }

        let mut physical = [SegmentPattern::BLANK; MAX_DIGITS];
        self.order.apply(&logical[..count], &mut physical[..count]);
        physical
    }

    /// Bring the hardware up
    pub fn begin(&mut self) -> Result<(), B::Error> {
        self.backend.begin()
    }

    /// Turn the hardware dark
    pub fn end(&mut self) -> Result<(), B::Error> {
        self.backend.end()
    }

    /// The backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The backend, mutably (brightness and other chip settings)
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Give the backend back
    pub fn release(self) -> B {
        self.backend
    }
}
