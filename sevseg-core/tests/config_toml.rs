//! Loading display configuration from TOML

#![cfg(feature = "serde")]

use sevseg_core::config::{BlinkConfig, DisplayConfig};
use sevseg_core::{ConfigError, Polarity, SegmentPattern, WaitStyle};

#[test]
fn full_config_parses() {
    let text = r#"
        polarity = "CommonCathode"
        digit_order = [3, 2, 1, 0]

        [blink]
        on_ms = 300

        [wait]
        rate_ms = 150
        style = "Fill"
        glyphs = [64]
    "#;

    let config: DisplayConfig = toml::from_str(text).unwrap();
    assert_eq!(config.polarity, Polarity::CommonCathode);
    assert_eq!(config.digit_order.as_deref(), Some(&[3u8, 2, 1, 0][..]));
    assert_eq!(
        config.blink,
        BlinkConfig {
            on_ms: 300,
            off_ms: 500
        }
    );
    assert_eq!(config.wait.rate_ms, 150);
    assert_eq!(config.wait.style, WaitStyle::Fill);
    assert_eq!(config.wait.glyphs.as_slice(), &[SegmentPattern::SEG_G]);

    assert!(config.validate(4).is_ok());
    assert_eq!(config.validate(6), Err(ConfigError::DigitOrder));
}

#[test]
fn empty_config_is_default() {
    let config: DisplayConfig = toml::from_str("").unwrap();
    assert_eq!(config, DisplayConfig::default());
}

#[test]
fn out_of_range_rate_parses_but_fails_validation() {
    let config: DisplayConfig = toml::from_str("[wait]\nrate_ms = 10\n").unwrap();
    assert_eq!(config.validate(4), Err(ConfigError::RateOutOfRange));
}

#[test]
fn config_survives_serialization() {
    let config = DisplayConfig::new(Polarity::CommonCathode)
        .with_digit_order(&[1, 0])
        .unwrap();

    let text = toml::to_string(&config).unwrap();
    let back: DisplayConfig = toml::from_str(&text).unwrap();
    assert_eq!(back, config);
}
