#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`ParameterSet`**: Color, blink flag and blink interval decoded from the device configuration
//! - **`ConfigService`**: Trait to implement for reading parameter memory
//! - **`IndicatorDriver`**: Trait the controller uses to switch the LED
//! - **`RgbIndicator`**: `IndicatorDriver` for one RGB pixel, sharing it with the programming-mode signal
//! - **`RgbLed`**: Trait to implement for your pixel hardware
//! - **`BlinkController`**: The activation/blink state machine
//! - **`BusBinding`**: Wires the controller to the group objects of a `BusStack`
//! - **`TimeSource`**: Trait to implement for your timing system
//!
//! Nothing in the controller or the binding blocks, sleeps or allocates, so
//! `BusBinding::poll` can run in the same loop as the bus stack's own
//! time-critical processing.

// Re-export Srgb from palette for user convenience
pub use palette::Srgb;

#[macro_use]
mod fmt;

pub mod time;
pub mod params;
pub mod indicator;
pub mod controller;
pub mod binding;

pub use binding::{
    ACTIVATE_OBJECT, BusBinding, BusStack, DatapointType, GROUP_OBJECTS, GroupObjectHandler,
    ObjectId, STATE_OBJECT,
};
pub use controller::{BlinkController, BlinkState};
pub use indicator::{IndicatorDriver, PROGRAMMING_COLOR, RgbIndicator, RgbLed};
pub use params::{
    BlinkMode, ConfigService, INTERVAL_UNIT_MS, LedColor, ParameterError, ParameterLayout,
    ParameterSet,
};
pub use time::{Millis, MillisDuration, TimeDuration, TimeInstant, TimeSource};
