//! Integration tests for RgbIndicator

mod common;
use common::*;

use knx_blink::{IndicatorDriver, LedColor, PROGRAMMING_COLOR, RgbIndicator, Srgb};

const BLACK: Srgb = Srgb::new(0.0, 0.0, 0.0);

#[test]
fn single_channel_colors_at_full_brightness() {
    let mut indicator = RgbIndicator::new(MockLed::new());

    indicator.set_on(LedColor::Red);
    assert!(colors_equal(indicator.led().get_last_color(), Srgb::new(1.0, 0.0, 0.0)));

    indicator.set_on(LedColor::Green);
    assert!(colors_equal(indicator.led().get_last_color(), Srgb::new(0.0, 1.0, 0.0)));

    indicator.set_on(LedColor::Blue);
    assert!(colors_equal(indicator.led().get_last_color(), Srgb::new(0.0, 0.0, 1.0)));

    indicator.set_off();
    assert!(colors_equal(indicator.led().get_last_color(), BLACK));
}

#[test]
fn off_color_keeps_pixel_dark() {
    let mut indicator = RgbIndicator::new(MockLed::new());
    indicator.set_on(LedColor::Off);

    assert_eq!(indicator.requested(), Some(LedColor::Off));
    assert!(colors_equal(indicator.led().get_last_color(), BLACK));
}

#[test]
fn programming_mode_overrides_and_restores_requested_state() {
    let mut indicator = RgbIndicator::new(MockLed::new());
    indicator.set_on(LedColor::Blue);

    indicator.set_programming_indicator(true);
    assert!(indicator.is_programming());
    assert!(colors_equal(indicator.led().get_last_color(), PROGRAMMING_COLOR));

    // Blink toggles while programming are recorded but not shown
    indicator.set_off();
    indicator.set_on(LedColor::Green);
    assert!(colors_equal(indicator.led().get_last_color(), PROGRAMMING_COLOR));
    assert_eq!(indicator.requested(), Some(LedColor::Green));

    indicator.set_programming_indicator(false);
    assert!(colors_equal(indicator.led().get_last_color(), Srgb::new(0.0, 1.0, 0.0)));
}

#[test]
fn leaving_programming_mode_while_off_turns_pixel_dark() {
    let mut indicator = RgbIndicator::new(MockLed::new());

    indicator.set_programming_indicator(true);
    indicator.set_programming_indicator(false);

    let history = indicator.into_inner();
    assert_eq!(history.color_history().len(), 3);
    assert!(colors_equal(history.get_last_color(), BLACK));
}
