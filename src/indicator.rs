//! Indicator hardware abstraction.
//!
//! [`IndicatorDriver`] is what the blink controller talks to. [`RgbIndicator`]
//! implements it on top of a single RGB pixel ([`RgbLed`]) and multiplexes the
//! bus stack's programming-mode signal onto the same pixel.

use crate::params::LedColor;
use palette::Srgb;

/// Color shown while the bus stack is in programming mode.
pub const PROGRAMMING_COLOR: Srgb = Srgb::new(1.0, 0.0, 0.0);

/// Trait for abstracting RGB LED hardware.
///
/// Implement this for your pixel hardware (WS2812 over PIO/SPI, PWM
/// channels, etc.). Color components are in the range 0.0-1.0. Handle any
/// hardware errors internally - this method cannot fail.
pub trait RgbLed {
    /// Sets the LED to the specified RGB color.
    fn set_color(&mut self, color: Srgb);
}

/// Abstraction over the indicator LED used by the blink controller.
///
/// All operations are fire-and-forget side effects and must not block.
pub trait IndicatorDriver {
    /// Drives the indicator to full brightness in `color`.
    fn set_on(&mut self, color: LedColor);

    /// Drives the indicator to zero brightness.
    fn set_off(&mut self);

    /// Shows or hides the programming-mode signal.
    ///
    /// Independent of the on/off state requested through [`set_on`] and
    /// [`set_off`].
    ///
    /// [`set_on`]: IndicatorDriver::set_on
    /// [`set_off`]: IndicatorDriver::set_off
    fn set_programming_indicator(&mut self, active: bool);
}

/// [`IndicatorDriver`] for a single RGB pixel.
///
/// While programming mode is active the pixel shows [`PROGRAMMING_COLOR`] and
/// on/off requests are only recorded. When programming mode ends the last
/// requested state is restored, so blinking resumes with the correct phase.
/// During programming mode the blink pattern is therefore not visible.
pub struct RgbIndicator<L: RgbLed> {
    led: L,
    requested: Option<LedColor>,
    programming: bool,
}

impl<L: RgbLed> RgbIndicator<L> {
    /// Wraps `led` and turns it off.
    pub fn new(mut led: L) -> Self {
        led.set_color(LedColor::Off.to_srgb());

        Self {
            led,
            requested: None,
            programming: false,
        }
    }

    /// Returns the color currently requested by the controller, `None` if off.
    pub fn requested(&self) -> Option<LedColor> {
        self.requested
    }

    /// Returns true while the programming-mode signal is shown.
    pub fn is_programming(&self) -> bool {
        self.programming
    }

    /// Returns a reference to the wrapped LED.
    pub fn led(&self) -> &L {
        &self.led
    }

    /// Consumes the indicator and returns the wrapped LED.
    pub fn into_inner(self) -> L {
        self.led
    }

    fn refresh(&mut self) {
        let color = if self.programming {
            PROGRAMMING_COLOR
        } else {
            self.requested.unwrap_or(LedColor::Off).to_srgb()
        };
        self.led.set_color(color);
    }
}

impl<L: RgbLed> IndicatorDriver for RgbIndicator<L> {
    fn set_on(&mut self, color: LedColor) {
        self.requested = Some(color);
        if !self.programming {
            self.refresh();
        }
    }

    fn set_off(&mut self) {
        self.requested = None;
        if !self.programming {
            self.refresh();
        }
    }

    fn set_programming_indicator(&mut self, active: bool) {
        if self.programming == active {
            return;
        }
        self.programming = active;
        self.refresh();
    }
}
