//! Blink and wait overlay
//!
//! The overlay decides, for every digit on every refresh, whether the
//! display shows the buffered content, a blank, or a wait glyph. It never
//! touches the content buffer itself.
//!
//! Both animations run on phase clocks owned by the overlay and advanced
//! only by the timestamps passed to [`Overlay::advance`]. The clocks are
//! anchored lazily at the first refresh after (re)activation.

use heapless::Vec;

use crate::error::{ConfigError, DisplayError};
use crate::segment::SegmentPattern;

/// Shortest accepted blink/wait period (ms)
pub const MIN_RATE_MS: u32 = 100;

/// Longest accepted blink/wait period (ms)
pub const MAX_RATE_MS: u32 = 2000;

/// Default blink on and off period (ms)
pub const DEFAULT_BLINK_MS: u32 = 500;

/// Default wait animation step (ms)
pub const DEFAULT_WAIT_MS: u32 = 250;

/// Longest wait glyph sequence
pub const MAX_WAIT_GLYPHS: usize = 8;

/// Default wait sequence: a single segment running around the digit
pub const SPINNER: [SegmentPattern; 6] = [
    SegmentPattern::SEG_A,
    SegmentPattern::SEG_B,
    SegmentPattern::SEG_C,
    SegmentPattern::SEG_D,
    SegmentPattern::SEG_E,
    SegmentPattern::SEG_F,
];

/// Check a period against [`MIN_RATE_MS`]..=[`MAX_RATE_MS`]
pub fn check_rate(rate_ms: u32) -> Result<(), ConfigError> {
    if !(MIN_RATE_MS..=MAX_RATE_MS).contains(&rate_ms) {
        return Err(ConfigError::RateOutOfRange);
    }
    Ok(())
}

/// What a digit shows on the current refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DigitState {
    /// Buffered content
    Normal,
    /// Blank, during the off half of a blink
    Blanked,
    /// Wait animation glyph
    WaitGlyph(SegmentPattern),
}

/// Which digits the wait animation covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaitMode {
    /// No wait animation
    #[default]
    Off,
    /// Only digits whose content is blank
    Blank,
    /// Every digit (explicit waiting mode)
    All,
}

/// How the wait glyphs are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WaitStyle {
    /// Every covered digit shows the same step of the glyph sequence
    #[default]
    Spin,
    /// Progress bar: the first glyph fills in from the right, one more
    /// digit per step, then starts over empty
    Fill,
}

/// Blink state: mask, periods and phase clock
#[derive(Debug, Clone)]
pub struct Blink {
    /// Bit n set = logical digit n blinks
    mask: u16,
    on_ms: u32,
    off_ms: u32,
    /// Currently in the "on" half of the cycle
    showing: bool,
    /// Start of the current half, None until the next refresh
    phase_start: Option<u32>,
}

impl Default for Blink {
    fn default() -> Self {
        Self {
            mask: 0,
            on_ms: DEFAULT_BLINK_MS,
            off_ms: DEFAULT_BLINK_MS,
            showing: false,
            phase_start: None,
        }
    }
}

impl Blink {
    /// Check if any digit blinks
    pub fn is_active(&self) -> bool {
        self.mask != 0
    }

    /// Current mask
    pub fn mask(&self) -> u16 {
        self.mask
    }

    /// On and off periods (ms)
    pub fn rates(&self) -> (u32, u32) {
        (self.on_ms, self.off_ms)
    }

    /// Start blinking the digits in `mask`
    ///
    /// A cycle always begins with the off half.
    pub fn start(&mut self, mask: u16) {
        let was_active = self.is_active();
        self.mask = mask;
        if mask != 0 && !was_active {
            self.showing = false;
            self.phase_start = None;
        }
    }

    /// Stop blinking (mask becomes empty)
    pub fn stop(&mut self) {
        self.mask = 0;
        self.phase_start = None;
    }

    /// Change the periods; `off_ms == 0` reuses `on_ms`
    pub fn set_rates(&mut self, on_ms: u32, off_ms: u32) -> Result<(), ConfigError> {
        let off_ms = if off_ms == 0 { on_ms } else { off_ms };
        check_rate(on_ms)?;
        check_rate(off_ms)?;
        self.on_ms = on_ms;
        self.off_ms = off_ms;
        // Keep the half we are in, re-anchor it at the next refresh
        self.phase_start = None;
        Ok(())
    }

    /// Advance the phase clock to `now_ms`
    pub fn advance(&mut self, now_ms: u32) {
        if !self.is_active() {
            return;
        }

        let Some(mut start) = self.phase_start else {
            self.phase_start = Some(now_ms);
            return;
        };

        let cycle = self.on_ms + self.off_ms;
        let mut elapsed = now_ms.wrapping_sub(start);

        // Skip whole cycles at once after a long gap between refreshes
        if elapsed >= cycle {
            let skip = elapsed - elapsed % cycle;
            start = start.wrapping_add(skip);
            elapsed -= skip;
        }

        loop {
            let half = if self.showing { self.on_ms } else { self.off_ms };
            if elapsed < half {
                break;
            }
            start = start.wrapping_add(half);
            elapsed -= half;
            self.showing = !self.showing;
        }

        self.phase_start = Some(start);
    }

    /// Check if a digit is blanked right now
    pub fn blanks(&self, index: usize) -> bool {
        !self.showing && index < 16 && self.mask & (1 << index) != 0
    }
}

/// Wait animation state
#[derive(Debug, Clone)]
pub struct Wait {
    mode: WaitMode,
    style: WaitStyle,
    rate_ms: u32,
    sequence: Vec<SegmentPattern, MAX_WAIT_GLYPHS>,
    /// Current step of the animation
    phase: usize,
    phase_start: Option<u32>,
}

impl Default for Wait {
    fn default() -> Self {
        Self {
            mode: WaitMode::Off,
            style: WaitStyle::Spin,
            rate_ms: DEFAULT_WAIT_MS,
            sequence: Vec::from_slice(&SPINNER).unwrap_or_default(),
            phase: 0,
            phase_start: None,
        }
    }
}

impl Wait {
    /// Current coverage
    pub fn mode(&self) -> WaitMode {
        self.mode
    }

    /// Check if the animation is running
    pub fn is_active(&self) -> bool {
        self.mode != WaitMode::Off
    }

    /// Step period (ms)
    pub fn rate(&self) -> u32 {
        self.rate_ms
    }

    /// Glyph sequence
    pub fn sequence(&self) -> &[SegmentPattern] {
        &self.sequence
    }

    /// Current animation step
    pub fn phase(&self) -> usize {
        self.phase
    }

    /// Switch coverage, restarting the animation when it starts
    pub fn set_mode(&mut self, mode: WaitMode) {
        if mode != WaitMode::Off && self.mode == WaitMode::Off {
            self.phase = 0;
            self.phase_start = None;
        }
        self.mode = mode;
    }

    /// Change the layout style; restarts the animation
    pub fn set_style(&mut self, style: WaitStyle) {
        self.style = style;
        self.phase = 0;
        self.phase_start = None;
    }

    /// Replace the glyph sequence; restarts the animation
    pub fn set_sequence(&mut self, sequence: &[SegmentPattern]) -> Result<(), ConfigError> {
        if sequence.is_empty() {
            return Err(ConfigError::WaitSequence);
        }
        self.sequence = Vec::from_slice(sequence).map_err(|_| ConfigError::WaitSequence)?;
        self.phase = 0;
        self.phase_start = None;
        Ok(())
    }

    /// Change the step period
    pub fn set_rate(&mut self, rate_ms: u32) -> Result<(), ConfigError> {
        check_rate(rate_ms)?;
        self.rate_ms = rate_ms;
        self.phase_start = None;
        Ok(())
    }

    fn cycle_len(&self, digit_count: usize) -> usize {
        match self.style {
            WaitStyle::Spin => self.sequence.len(),
            WaitStyle::Fill => digit_count + 1,
        }
    }

    /// Advance the animation to `now_ms`
    pub fn advance(&mut self, now_ms: u32, digit_count: usize) {
        if !self.is_active() {
            return;
        }

        let Some(start) = self.phase_start else {
            self.phase_start = Some(now_ms);
            return;
        };

        let elapsed = now_ms.wrapping_sub(start);
        let steps = elapsed / self.rate_ms;
        if steps == 0 {
            return;
        }

        let cycle = self.cycle_len(digit_count).max(1);
        self.phase = (self.phase + steps as usize % cycle) % cycle;
        self.phase_start = Some(start.wrapping_add(steps * self.rate_ms));
    }

    /// Wait glyph for a digit, if the animation covers it
    pub fn glyph_for(
        &self,
        index: usize,
        content: SegmentPattern,
        digit_count: usize,
    ) -> Option<SegmentPattern> {
        let covered = match self.mode {
            WaitMode::Off => false,
            WaitMode::Blank => content.is_blank(),
            WaitMode::All => true,
        };
        if !covered {
            return None;
        }

        match self.style {
            WaitStyle::Spin => self.sequence.get(self.phase).copied(),
            WaitStyle::Fill => {
                let from_right = digit_count.saturating_sub(index + 1);
                let glyph = self.sequence.first().copied()?;
                Some(if from_right < self.phase {
                    glyph
                } else {
                    SegmentPattern::BLANK
                })
            }
        }
    }
}

/// Blink and wait layers composed over the content buffer
#[derive(Debug, Clone)]
pub struct Overlay {
    digit_count: usize,
    blink: Blink,
    wait: Wait,
}

impl Overlay {
    /// Create an inactive overlay for `digit_count` digits
    pub fn new(digit_count: usize) -> Self {
        Self {
            digit_count,
            blink: Blink::default(),
            wait: Wait::default(),
        }
    }

    /// Blink layer
    pub fn blink(&self) -> &Blink {
        &self.blink
    }

    /// Mutable blink layer
    pub fn blink_mut(&mut self) -> &mut Blink {
        &mut self.blink
    }

    /// Wait layer
    pub fn wait(&self) -> &Wait {
        &self.wait
    }

    /// Mutable wait layer
    pub fn wait_mut(&mut self) -> &mut Wait {
        &mut self.wait
    }

    /// Build a blink mask from digit indices
    pub fn mask_of(&self, indices: &[usize]) -> Result<u16, DisplayError> {
        indices.iter().try_fold(0u16, |mask, &index| {
            if index >= self.digit_count {
                return Err(DisplayError::Index(index));
            }
            Ok(mask | (1 << index))
        })
    }

    /// Mask covering every digit
    pub fn full_mask(&self) -> u16 {
        if self.digit_count >= 16 {
            u16::MAX
        } else {
            (1u16 << self.digit_count) - 1
        }
    }

    /// Advance both phase clocks
    pub fn advance(&mut self, now_ms: u32) {
        self.blink.advance(now_ms);
        self.wait.advance(now_ms, self.digit_count);
    }

    /// State of one digit given its buffered content
    pub fn digit_state(&self, index: usize, content: SegmentPattern) -> DigitState {
        if let Some(glyph) = self.wait.glyph_for(index, content, self.digit_count) {
            return DigitState::WaitGlyph(glyph);
        }
        if self.blink.blanks(index) {
            return DigitState::Blanked;
        }
        DigitState::Normal
    }

    /// Pattern actually shown for one digit
    pub fn effective(&self, index: usize, content: SegmentPattern) -> SegmentPattern {
        match self.digit_state(index, content) {
            DigitState::Normal => content,
            DigitState::Blanked => SegmentPattern::BLANK,
            DigitState::WaitGlyph(glyph) => glyph,
        }
    }
}
