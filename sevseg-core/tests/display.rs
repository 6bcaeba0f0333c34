//! Display engine behaviour through the public API, against a recording backend

use core::convert::Infallible;

use sevseg_core::encoder::value_range;
use sevseg_core::segment::{digit, GLYPHS};
use sevseg_core::{
    DigitState, Display, DisplayConfig, DisplayError, Polarity, SegmentBackend, SegmentPattern,
};

/// Non-multiplexed backend remembering what landed on each physical digit
struct RecordingBackend {
    physical: Vec<SegmentPattern>,
    writes: usize,
}

impl RecordingBackend {
    fn new(digits: usize) -> Self {
        Self {
            physical: vec![SegmentPattern::BLANK; digits],
            writes: 0,
        }
    }
}

impl SegmentBackend for RecordingBackend {
    type Error = Infallible;

    fn digit_count(&self) -> usize {
        self.physical.len()
    }

    fn polarity(&self) -> Polarity {
        Polarity::CommonAnode
    }

    fn write_digit(&mut self, physical: usize, pattern: SegmentPattern) -> Result<(), Infallible> {
        self.physical[physical] = pattern;
        self.writes += 1;
        Ok(())
    }
}

fn display(digits: usize) -> Display<RecordingBackend> {
    Display::new(RecordingBackend::new(digits), DisplayConfig::default()).unwrap()
}

#[test]
fn every_glyph_lands_in_the_buffer() {
    let mut display = display(4);
    let mut text = [0u8; 4];

    for &(ch, pattern) in GLYPHS {
        display.set_text(ch.encode_utf8(&mut text)).unwrap();
        assert_eq!(display.buffer().get(0), Some(pattern), "glyph {:?}", ch);
    }
}

#[test]
fn every_order_permutation_reaches_hardware() {
    let mut display = display(4);
    display.set_text("1234").unwrap();

    for a in 0..4u8 {
        for b in 0..4u8 {
            for c in 0..4u8 {
                for d in 0..4u8 {
                    let order = [a, b, c, d];
                    let distinct = (0..4).all(|i| !order[i + 1..].contains(&order[i]));

                    if !distinct {
                        assert!(display.set_digits_order(&order).is_err());
                        continue;
                    }

                    display.set_digits_order(&order).unwrap();
                    display.refresh(0).unwrap();
                    for (logical, &physical) in order.iter().enumerate() {
                        assert_eq!(
                            display.backend().physical[physical as usize],
                            digit(logical as u8 + 1)
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn blinking_digit_alternates_and_neighbour_stays() {
    const RATE: u32 = 250;

    let mut display = display(4);
    display.set_text("8888").unwrap();
    display.set_blink_mask(&[0], RATE).unwrap();

    let mut saw_on = false;
    let mut saw_off = false;
    for now in (10_000..10_000 + 2 * RATE + 10).step_by(10) {
        display.refresh(now).unwrap();

        let hw = &display.backend().physical;
        if hw[0].is_blank() {
            saw_off = true;
        } else {
            saw_on = true;
        }
        assert_eq!(hw[1], digit(8));
    }

    assert!(saw_on && saw_off);
}

#[test]
fn same_content_same_buffer() {
    let mut display = display(6);

    display.set_content(-3.25f32).unwrap();
    let first = display.buffer().clone();
    display.set_content(-3.25f32).unwrap();
    assert_eq!(display.buffer(), &first);
}

#[test]
fn too_wide_value_is_rejected() {
    let mut display = display(4);
    display.set_content(-99).unwrap();
    let before = display.buffer().clone();

    for _ in 0..3 {
        assert_eq!(display.set_content(12345), Err(DisplayError::Overflow));
        assert_eq!(display.buffer(), &before);
    }

    let (min, max) = value_range(4);
    assert_eq!((min, max), (-999, 9999));
    assert!(display.set_content(max).is_ok());
    assert!(display.set_content(min).is_ok());
    assert_eq!(display.set_content(min - 1), Err(DisplayError::Overflow));
}

#[test]
fn wait_glyph_overrides_blanked_digit() {
    let mut display = display(4);
    display.set_content(5).unwrap();
    display.blink();
    display.wait_on_blank();
    display.refresh(0).unwrap();

    assert_eq!(
        display.digit_state(0),
        Ok(DigitState::WaitGlyph(SegmentPattern::SEG_A))
    );
    assert_eq!(display.digit_state(3), Ok(DigitState::Blanked));
    assert_eq!(display.digit_state(4), Err(DisplayError::Index(4)));
}

#[test]
fn static_refresh_writes_every_digit() {
    let mut display = display(3);
    display.refresh(0).unwrap();
    display.refresh(1).unwrap();
    assert_eq!(display.backend().writes, 6);

    let backend = display.release();
    assert_eq!(backend.physical.len(), 3);
}
