//! Segment patterns, wiring polarity and the glyph table
//!
//! Segment bit layout (canonical polarity, bit set = segment lit):
//!
//! ```text
//!      a            bit 0 = a
//!    f   b          bit 1 = b
//!      g            bit 2 = c
//!    e   c          bit 3 = d
//!      d   dp       bit 4 = e
//!                   bit 5 = f
//!                   bit 6 = g
//!                   bit 7 = dp
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One digit's worth of lit segments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SegmentPattern(pub u8);

impl SegmentPattern {
    /// All segments off
    pub const BLANK: Self = Self(0x00);
    /// Only the decimal point
    pub const DOT: Self = Self(0x80);
    /// All segments and the decimal point
    pub const ALL: Self = Self(0xFF);

    pub const SEG_A: Self = Self(0x01);
    pub const SEG_B: Self = Self(0x02);
    pub const SEG_C: Self = Self(0x04);
    pub const SEG_D: Self = Self(0x08);
    pub const SEG_E: Self = Self(0x10);
    pub const SEG_F: Self = Self(0x20);
    pub const SEG_G: Self = Self(0x40);

    /// Raw canonical bits
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Same pattern with the decimal point lit
    pub const fn with_dot(self) -> Self {
        Self(self.0 | Self::DOT.0)
    }

    /// Check if the decimal point is lit
    pub const fn has_dot(self) -> bool {
        self.0 & Self::DOT.0 != 0
    }

    /// Check if no segment is lit
    pub const fn is_blank(self) -> bool {
        self.0 == 0
    }
}

impl From<u8> for SegmentPattern {
    fn from(bits: u8) -> Self {
        Self(bits)
    }
}

/// LED wiring scheme of the display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Polarity {
    /// Segments share the anode: a segment lights when its line is LOW,
    /// the digit is selected by driving its common line HIGH
    #[default]
    CommonAnode,
    /// Segments share the cathode: a segment lights when its line is HIGH,
    /// the digit is selected by driving its common line LOW
    CommonCathode,
}

impl Polarity {
    /// Byte to put on the segment lines for a canonical pattern
    pub const fn segment_level(self, pattern: SegmentPattern) -> u8 {
        match self {
            Polarity::CommonAnode => !pattern.0,
            Polarity::CommonCathode => pattern.0,
        }
    }

    /// Level of a single segment line
    pub const fn segment_high(self, lit: bool) -> bool {
        match self {
            Polarity::CommonAnode => !lit,
            Polarity::CommonCathode => lit,
        }
    }

    /// Level that activates a digit's common line
    pub const fn select_active_high(self) -> bool {
        matches!(self, Polarity::CommonAnode)
    }
}

/// Character to segment lookup table
///
/// `*` stands for the degree sign, `~` for the equivalence sign and `=` for
/// the low (d + g) equal sign.
pub const GLYPHS: &[(char, SegmentPattern)] = &[
    ('0', SegmentPattern(0x3F)),
    ('1', SegmentPattern(0x06)),
    ('2', SegmentPattern(0x5B)),
    ('3', SegmentPattern(0x4F)),
    ('4', SegmentPattern(0x66)),
    ('5', SegmentPattern(0x6D)),
    ('6', SegmentPattern(0x7D)),
    ('7', SegmentPattern(0x07)),
    ('8', SegmentPattern(0x7F)),
    ('9', SegmentPattern(0x6F)),
    ('A', SegmentPattern(0x77)),
    ('a', SegmentPattern(0x5F)),
    ('b', SegmentPattern(0x7C)),
    ('C', SegmentPattern(0x39)),
    ('c', SegmentPattern(0x58)),
    ('d', SegmentPattern(0x5E)),
    ('E', SegmentPattern(0x79)),
    ('e', SegmentPattern(0x7B)),
    ('F', SegmentPattern(0x71)),
    ('G', SegmentPattern(0x3D)),
    ('H', SegmentPattern(0x76)),
    ('h', SegmentPattern(0x74)),
    ('I', SegmentPattern(0x06)),
    ('i', SegmentPattern(0x04)),
    ('J', SegmentPattern(0x0E)),
    ('L', SegmentPattern(0x38)),
    ('l', SegmentPattern(0x30)),
    ('n', SegmentPattern(0x54)),
    ('O', SegmentPattern(0x3F)),
    ('o', SegmentPattern(0x5C)),
    ('P', SegmentPattern(0x73)),
    ('q', SegmentPattern(0x67)),
    ('r', SegmentPattern(0x50)),
    ('S', SegmentPattern(0x6D)),
    ('t', SegmentPattern(0x78)),
    ('U', SegmentPattern(0x3E)),
    ('u', SegmentPattern(0x1C)),
    ('Y', SegmentPattern(0x6E)),
    ('-', SegmentPattern(0x40)),
    ('_', SegmentPattern(0x08)),
    ('=', SegmentPattern(0x48)),
    ('~', SegmentPattern(0x49)),
    ('*', SegmentPattern(0x63)),
    (' ', SegmentPattern(0x00)),
    ('.', SegmentPattern(0x80)),
];

/// Look up the pattern for a character
pub fn glyph(ch: char) -> Option<SegmentPattern> {
    GLYPHS
        .iter()
        .find(|(c, _)| *c == ch)
        .map(|(_, pattern)| *pattern)
}

/// Pattern for a decimal digit (0-9)
pub const fn digit(value: u8) -> SegmentPattern {
    const DIGITS: [u8; 10] = [0x3F, 0x06, 0x5B, 0x4F, 0x66, 0x6D, 0x7D, 0x07, 0x7F, 0x6F];
    SegmentPattern(DIGITS[(value % 10) as usize])
}
