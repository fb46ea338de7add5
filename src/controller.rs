//! Blink controller state machine.
//!
//! Provides [`BlinkController`] which turns activation commands and periodic
//! ticks into indicator updates and state values to publish on the bus.
//! Every operation is a bounded in-memory transition plus at most one
//! indicator write, so it is safe to call from a cooperative scheduler that
//! must not be blocked.

use crate::indicator::IndicatorDriver;
use crate::params::{BlinkMode, ParameterSet};
use crate::time::{TimeDuration, TimeInstant};

/// The current state of a blink controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkState {
    /// Channel deactivated. LED is off.
    Idle,
    /// Activated in steady mode. LED is on.
    SteadyOn,
    /// Activated in blink mode, LED currently on.
    BlinkOn,
    /// Activated in blink mode, LED currently off.
    BlinkOff,
}

/// Drives the indicator from activation commands and the blink parameters.
///
/// Each transition returns the LED state to publish on the bus, or `None` if
/// the LED state did not change. The returned values are an exact mirror of
/// every change of the LED's on/off state.
///
/// # Type Parameters
/// * `I` - Time instant type
/// * `D` - Indicator implementation type
pub struct BlinkController<I: TimeInstant, D: IndicatorDriver> {
    indicator: D,
    params: ParameterSet,
    interval: Option<I::Duration>,
    state: BlinkState,
    last_toggle: Option<I>,
}

impl<I: TimeInstant, D: IndicatorDriver> BlinkController<I, D> {
    /// Creates an idle controller and turns the indicator off.
    pub fn new(params: ParameterSet, mut indicator: D) -> Self {
        indicator.set_off();

        let interval = match params.blink_mode() {
            BlinkMode::Steady => None,
            BlinkMode::Blink { interval_ms } => Some(I::Duration::from_millis(interval_ms as u64)),
        };

        Self {
            indicator,
            params,
            interval,
            state: BlinkState::Idle,
            last_toggle: None,
        }
    }

    /// Handles a new value of the inbound activation object.
    ///
    /// Activating an idle channel turns the LED on immediately and starts a
    /// fresh blink phase at `now`. Activating an already active channel keeps
    /// the running phase. Deactivating forces the LED off.
    ///
    /// # Returns
    /// * `Some(value)` - LED state changed, publish `value`
    /// * `None` - Nothing to publish
    #[must_use]
    pub fn on_activation_changed(&mut self, active: bool, now: I) -> Option<bool> {
        match (active, self.state) {
            (true, BlinkState::Idle) => {
                self.last_toggle = Some(now);
                self.state = match self.interval {
                    None => BlinkState::SteadyOn,
                    Some(_) => BlinkState::BlinkOn,
                };
                self.indicator.set_on(self.params.color());
                Some(true)
            }
            (true, _) => None,
            (false, BlinkState::Idle) => None,
            (false, previous) => {
                self.state = BlinkState::Idle;
                self.last_toggle = None;
                self.indicator.set_off();
                // Only a lit LED changes state when switched off.
                if previous == BlinkState::BlinkOff {
                    None
                } else {
                    Some(false)
                }
            }
        }
    }

    /// Advances the blink timing to `now`.
    ///
    /// Toggles the LED once the blink interval has elapsed since the last
    /// toggle. Elapsed time is measured with [`TimeInstant::duration_since`],
    /// so the comparison stays correct across counter overflow. Missed
    /// intervals are not caught up; the next period starts at `now`.
    ///
    /// # Returns
    /// * `Some(value)` - LED toggled, publish `value`
    /// * `None` - Nothing changed
    #[must_use]
    pub fn tick(&mut self, now: I) -> Option<bool> {
        let (Some(interval), Some(last_toggle)) = (self.interval, self.last_toggle) else {
            return None;
        };

        if now.duration_since(last_toggle) < interval {
            return None;
        }

        self.last_toggle = Some(now);
        match self.state {
            BlinkState::BlinkOn => {
                self.state = BlinkState::BlinkOff;
                self.indicator.set_off();
                Some(false)
            }
            BlinkState::BlinkOff => {
                self.state = BlinkState::BlinkOn;
                self.indicator.set_on(self.params.color());
                Some(true)
            }
            BlinkState::Idle | BlinkState::SteadyOn => None,
        }
    }

    /// Returns the time left until the next toggle, if blinking.
    ///
    /// Lets an integration sleep between ticks. Returns `ZERO` if a toggle
    /// is already due and `None` if no toggle is pending.
    pub fn time_until_toggle(&self, now: I) -> Option<I::Duration> {
        match self.state {
            BlinkState::BlinkOn | BlinkState::BlinkOff => {
                let interval = self.interval?;
                let elapsed = now.duration_since(self.last_toggle?);
                Some(interval.saturating_sub(elapsed))
            }
            BlinkState::Idle | BlinkState::SteadyOn => None,
        }
    }

    /// Forwards the programming-mode signal to the indicator.
    pub fn set_programming_indicator(&mut self, active: bool) {
        self.indicator.set_programming_indicator(active);
    }

    /// Returns the current state of the controller.
    pub fn state(&self) -> BlinkState {
        self.state
    }

    /// Returns true if the last activation command was `true`.
    pub fn is_activated(&self) -> bool {
        self.state != BlinkState::Idle
    }

    /// Returns true if the LED is currently lit.
    pub fn is_led_on(&self) -> bool {
        matches!(self.state, BlinkState::SteadyOn | BlinkState::BlinkOn)
    }

    /// Returns the parameters the controller was built with.
    pub fn parameters(&self) -> &ParameterSet {
        &self.params
    }

    /// Returns a reference to the indicator.
    pub fn indicator(&self) -> &D {
        &self.indicator
    }
}
