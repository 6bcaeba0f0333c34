//! Content to segment encoding
//!
//! Every function here renders into a scratch buffer of exactly `width`
//! patterns. Nothing is written to the display until encoding has fully
//! succeeded, so a rejected value never leaves a half-written buffer.
//!
//! Values wider than the display are rejected with
//! [`DisplayError::Overflow`]; they are never truncated.

use core::fmt::Write;

use heapless::{String, Vec};

use crate::buffer::MAX_DIGITS;
use crate::error::{ConfigError, DisplayError};
use crate::segment::{glyph, SegmentPattern};

/// Encoded patterns for a whole display, logical order
pub type Scratch = Vec<SegmentPattern, MAX_DIGITS>;

/// Room for the longest rendered number plus padding and sign
type NumText = String<48>;

/// Something that can be shown on the display
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Content<'a> {
    /// Integer, right-aligned, space padded
    Int(i32),
    /// Float with as many decimals as fit
    Float(f32),
    /// Float with a fixed number of decimals
    Fixed {
        /// Value to render (truncated toward zero)
        value: f32,
        /// Digits after the decimal point
        decimals: u8,
    },
    /// Text made of glyphs from [`GLYPHS`](crate::segment::GLYPHS)
    Text(&'a str),
}

impl From<i32> for Content<'_> {
    fn from(value: i32) -> Self {
        Content::Int(value)
    }
}

impl From<f32> for Content<'_> {
    fn from(value: f32) -> Self {
        Content::Float(value)
    }
}

impl<'a> From<&'a str> for Content<'a> {
    fn from(text: &'a str) -> Self {
        Content::Text(text)
    }
}

/// Alignment and padding for numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NumberFormat {
    /// Align to the rightmost digit (otherwise leftmost)
    pub right_align: bool,
    /// Fill unused leading positions with zeros (right alignment only)
    pub zero_pad: bool,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            right_align: true,
            zero_pad: false,
        }
    }
}

impl NumberFormat {
    /// Right-aligned, zero padded
    pub const ZERO_PADDED: Self = Self {
        right_align: true,
        zero_pad: true,
    };

    /// Left-aligned
    pub const LEFT: Self = Self {
        right_align: false,
        zero_pad: false,
    };
}

/// Smallest and largest integer a `width`-digit display can show
///
/// One position is reserved for the minus sign of negative values. Wide
/// displays are limited by `i32` itself.
pub fn value_range(width: usize) -> (i32, i32) {
    let width = width.clamp(1, MAX_DIGITS) as u32;
    let max = 10i64.pow(width) - 1;
    let min = -(10i64.pow(width - 1) - 1);
    (
        min.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
        max.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
    )
}

/// Encode any [`Content`]
pub fn encode(content: Content<'_>, width: usize) -> Result<Scratch, DisplayError> {
    match content {
        Content::Int(value) => encode_int(value, width, NumberFormat::default()),
        Content::Float(value) => encode_float_auto(value, width),
        Content::Fixed { value, decimals } => {
            encode_float(value, decimals, width, NumberFormat::default())
        }
        Content::Text(text) => encode_text(text, width),
    }
}

/// Encode text, left-aligned
///
/// A `.` lights the decimal point of the glyph before it. A leading `.` or
/// one following another `.` takes a position of its own.
pub fn encode_text(text: &str, width: usize) -> Result<Scratch, DisplayError> {
    check_width(width)?;

    // Unsupported glyphs are reported before any width problem
    if let Some(bad) = text.chars().find(|&c| glyph(c).is_none()) {
        return Err(DisplayError::Encoding(bad));
    }

    let mut out = Scratch::new();
    let mut dot_can_merge = false;

    for ch in text.chars() {
        let pattern = glyph(ch).ok_or(DisplayError::Encoding(ch))?;

        if ch == '.' && dot_can_merge {
            if let Some(last) = out.last_mut() {
                *last = last.with_dot();
            }
            dot_can_merge = false;
            continue;
        }

        if out.len() == width {
            return Err(DisplayError::Overflow);
        }
        out.push(pattern).map_err(|_| DisplayError::Overflow)?;
        dot_can_merge = ch != '.';
    }

    pad_to(&mut out, width)?;
    Ok(out)
}

/// Encode an integer
pub fn encode_int(value: i32, width: usize, format: NumberFormat) -> Result<Scratch, DisplayError> {
    check_width(width)?;

    let (min, max) = value_range(width);
    if value < min || value > max {
        return Err(DisplayError::Overflow);
    }

    let mut body = NumText::new();
    write!(body, "{}", value.unsigned_abs()).map_err(|_| DisplayError::Overflow)?;

    let text = layout_number(value < 0, &body, width, format)?;
    encode_text(&text, width)
}

/// Encode a float with a fixed number of decimals
///
/// The value is truncated toward zero at `decimals` places. Zero decimals
/// renders as an integer. Non-finite values never fit.
pub fn encode_float(
    value: f32,
    decimals: u8,
    width: usize,
    format: NumberFormat,
) -> Result<Scratch, DisplayError> {
    check_width(width)?;

    if !value.is_finite() {
        return Err(DisplayError::Overflow);
    }

    if decimals == 0 {
        if value >= i32::MAX as f32 || value <= i32::MIN as f32 {
            return Err(DisplayError::Overflow);
        }
        return encode_int(value as i32, width, format);
    }

    // At least the units digit must stay in front of the decimals
    if decimals as usize >= width {
        return Err(DisplayError::Overflow);
    }

    // Truncate the shortest decimal form, not the binary value: 1.05 is
    // stored as 1.0499999
    let mut repr: String<64> = String::new();
    write!(repr, "{}", value.abs()).map_err(|_| DisplayError::Overflow)?;
    let (int_digits, frac_digits) = repr.split_once('.').unwrap_or((repr.as_str(), ""));

    let mut body = NumText::new();
    body.push_str(int_digits).map_err(|_| DisplayError::Overflow)?;
    body.push('.').map_err(|_| DisplayError::Overflow)?;
    for ch in frac_digits
        .chars()
        .chain(core::iter::repeat('0'))
        .take(decimals as usize)
    {
        body.push(ch).map_err(|_| DisplayError::Overflow)?;
    }

    let negative = value < 0.0 && body.chars().any(|c| matches!(c, '1'..='9'));
    let text = layout_number(negative, &body, width, format)?;
    encode_text(&text, width)
}

/// Encode a float with the most decimals that fit
pub fn encode_float_auto(value: f32, width: usize) -> Result<Scratch, DisplayError> {
    check_width(width)?;

    let most = (width - 1).min(u8::MAX as usize) as u8;
    for decimals in (0..=most).rev() {
        match encode_float(value, decimals, width, NumberFormat::default()) {
            Err(DisplayError::Overflow) => continue,
            result => return result,
        }
    }
    Err(DisplayError::Overflow)
}

/// Level characters for gauges, empty to full
const GAUGE_LEVELS: [char; 4] = [' ', '_', '=', '~'];

/// Encode a single bar gauge: label then up to three rising bars
///
/// Needs at least four digits. `level` is 0..=3.
pub fn encode_gauge(level: u8, label: char, width: usize) -> Result<Scratch, DisplayError> {
    check_width(width)?;
    if width < 4 {
        return Err(DisplayError::Config(ConfigError::DigitCount));
    }

    let bars = match level {
        0 => "   ",
        1 => "_  ",
        2 => "_= ",
        3 => "_=~",
        _ => return Err(DisplayError::Overflow),
    };

    let mut text: String<8> = String::new();
    text.push(label).map_err(|_| DisplayError::Overflow)?;
    text.push_str(bars).map_err(|_| DisplayError::Overflow)?;
    encode_text(&text, width)
}

/// Map a 0.0..=1.0 ratio to a gauge level
pub fn gauge_level(ratio: f32) -> Result<u8, DisplayError> {
    if !(0.0..=1.0).contains(&ratio) {
        return Err(DisplayError::Overflow);
    }
    Ok(match ratio {
        r if r < 0.25 => 0,
        r if r < 0.50 => 1,
        r if r < 0.75 => 2,
        _ => 3,
    })
}

/// Encode two labelled single-character gauges side by side
///
/// Extra digits beyond four are split as spacing between the two halves.
pub fn encode_double_gauge(
    left: u8,
    right: u8,
    left_label: char,
    right_label: char,
    width: usize,
) -> Result<Scratch, DisplayError> {
    check_width(width)?;
    if width < 4 {
        return Err(DisplayError::Config(ConfigError::DigitCount));
    }

    let left_level = *GAUGE_LEVELS
        .get(left as usize)
        .ok_or(DisplayError::Overflow)?;
    let right_level = *GAUGE_LEVELS
        .get(right as usize)
        .ok_or(DisplayError::Overflow)?;

    let mut text: String<MAX_DIGITS> = String::new();
    let spacing = (width - 4) / 2;
    let parts = [left_label, left_level]
        .into_iter()
        .chain(core::iter::repeat(' ').take(spacing))
        .chain([right_label, right_level]);
    for ch in parts {
        text.push(ch).map_err(|_| DisplayError::Overflow)?;
    }
    encode_text(&text, width)
}

fn check_width(width: usize) -> Result<(), DisplayError> {
    if width == 0 || width > MAX_DIGITS {
        return Err(DisplayError::Config(ConfigError::DigitCount));
    }
    Ok(())
}

fn pad_to(out: &mut Scratch, width: usize) -> Result<(), DisplayError> {
    out.resize(width, SegmentPattern::BLANK)
        .map_err(|_| DisplayError::Overflow)
}

/// Add sign and padding to an unsigned number body
///
/// `body` may contain one `.`, which does not take a position.
fn layout_number(
    negative: bool,
    body: &str,
    width: usize,
    format: NumberFormat,
) -> Result<NumText, DisplayError> {
    let positions = body.chars().filter(|&c| c != '.').count() + usize::from(negative);
    if positions > width {
        return Err(DisplayError::Overflow);
    }
    let pad = width - positions;

    let mut text = NumText::new();
    let push = |text: &mut NumText, ch: char| text.push(ch).map_err(|_| DisplayError::Overflow);

    if format.right_align && format.zero_pad {
        if negative {
            push(&mut text, '-')?;
        }
        for _ in 0..pad {
            push(&mut text, '0')?;
        }
    } else {
        if format.right_align {
            for _ in 0..pad {
                push(&mut text, ' ')?;
            }
        }
        if negative {
            push(&mut text, '-')?;
        }
    }
    text.push_str(body).map_err(|_| DisplayError::Overflow)?;
    Ok(text)
}
