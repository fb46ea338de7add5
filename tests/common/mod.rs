//! Shared test infrastructure for knx-blink integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use heapless::{Deque, Vec};
use knx_blink::{
    BusStack, ConfigService, DatapointType, GroupObjectHandler, IndicatorDriver, LedColor, Millis,
    ObjectId, RgbLed, Srgb, TimeSource,
};

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock millisecond clock with controllable time
pub struct MockTimeSource {
    current_time: core::cell::Cell<Millis>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: core::cell::Cell::new(Millis(0)),
        }
    }

    /// Advance time by the given number of milliseconds, wrapping like the hardware counter
    pub fn advance(&self, millis: u32) {
        let current = self.current_time.get();
        self.current_time.set(Millis(current.0.wrapping_add(millis)));
    }

    pub fn set_time(&self, millis: u32) {
        self.current_time.set(Millis(millis));
    }
}

impl TimeSource<Millis> for MockTimeSource {
    fn now(&self) -> Millis {
        self.current_time.get()
    }
}

// ============================================================================
// Mock Indicator
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorEvent {
    On(LedColor),
    Off,
    Programming(bool),
}

/// Mock indicator that records every call
pub struct MockIndicator {
    events: Vec<IndicatorEvent, 64>,
    lit: Option<LedColor>,
}

impl MockIndicator {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            lit: None,
        }
    }

    pub fn events(&self) -> &[IndicatorEvent] {
        &self.events
    }

    /// Color currently shown, `None` if dark
    pub fn lit(&self) -> Option<LedColor> {
        self.lit
    }
}

impl IndicatorDriver for MockIndicator {
    fn set_on(&mut self, color: LedColor) {
        self.lit = Some(color);
        let _ = self.events.push(IndicatorEvent::On(color));
    }

    fn set_off(&mut self) {
        self.lit = None;
        let _ = self.events.push(IndicatorEvent::Off);
    }

    fn set_programming_indicator(&mut self, active: bool) {
        let _ = self.events.push(IndicatorEvent::Programming(active));
    }
}

// ============================================================================
// Mock LED
// ============================================================================

/// Mock pixel that records all color changes
pub struct MockLed {
    current_color: Srgb,
    color_history: Vec<Srgb, 32>,
}

impl MockLed {
    pub fn new() -> Self {
        Self {
            current_color: Srgb::new(0.0, 0.0, 0.0),
            color_history: Vec::new(),
        }
    }

    pub fn get_last_color(&self) -> Srgb {
        self.current_color
    }

    pub fn color_history(&self) -> &[Srgb] {
        &self.color_history
    }
}

impl RgbLed for MockLed {
    fn set_color(&mut self, color: Srgb) {
        self.current_color = color;
        let _ = self.color_history.push(color);
    }
}

// ============================================================================
// Mock Bus Stack
// ============================================================================

/// Event delivered to the handler on the next processing step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusEvent {
    Telegram(ObjectId, bool),
    ProgrammingMode(bool),
}

/// Mock bus stack with parameter memory, an inbound queue and recorded writes
pub struct MockBus {
    configured: bool,
    params: [u8; 2],
    inbound: Deque<BusEvent, 16>,
    writes: Vec<(ObjectId, bool), 64>,
    datapoint_types: Vec<(ObjectId, DatapointType), 4>,
    steps: u32,
}

impl MockBus {
    /// Configured device with raw parameter bytes
    pub fn configured(params: [u8; 2]) -> Self {
        Self {
            configured: true,
            params,
            inbound: Deque::new(),
            writes: Vec::new(),
            datapoint_types: Vec::new(),
            steps: 0,
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::configured([0, 0])
        }
    }

    /// Queue a telegram for the next processing step
    pub fn receive(&mut self, object: ObjectId, value: bool) {
        self.inbound
            .push_back(BusEvent::Telegram(object, value))
            .expect("inbound queue full");
    }

    pub fn programming_mode(&mut self, active: bool) {
        self.inbound
            .push_back(BusEvent::ProgrammingMode(active))
            .expect("inbound queue full");
    }

    pub fn writes(&self) -> &[(ObjectId, bool)] {
        &self.writes
    }

    pub fn datapoint_types(&self) -> &[(ObjectId, DatapointType)] {
        &self.datapoint_types
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }
}

impl ConfigService for MockBus {
    fn is_configured(&self) -> bool {
        self.configured
    }

    fn param_byte(&self, offset: u16) -> u8 {
        self.params.get(offset as usize).copied().unwrap_or(0)
    }
}

impl BusStack for MockBus {
    fn set_datapoint_type(&mut self, object: ObjectId, dpt: DatapointType) {
        let _ = self.datapoint_types.push((object, dpt));
    }

    fn write(&mut self, object: ObjectId, value: bool) {
        let _ = self.writes.push((object, value));
    }

    fn process_step(&mut self, handler: &mut dyn GroupObjectHandler) {
        self.steps += 1;
        while let Some(event) = self.inbound.pop_front() {
            match event {
                BusEvent::Telegram(object, value) => handler.on_write(object, value),
                BusEvent::ProgrammingMode(active) => handler.on_programming_mode(active),
            }
        }
    }
}

// ============================================================================
// Parameter encoding
// ============================================================================

/// Encodes parameter memory in the default layout
pub fn param_bytes(color_code: u8, blink: bool, interval_units: u8) -> [u8; 2] {
    let mut first = (color_code & 0x03) << 6;
    if blink {
        first |= 0x20;
    }
    [first, interval_units]
}

/// Compare two colors with floating-point tolerance
pub fn colors_equal(a: Srgb, b: Srgb) -> bool {
    const EPSILON: f32 = 0.001;
    (a.red - b.red).abs() < EPSILON
        && (a.green - b.green).abs() < EPSILON
        && (a.blue - b.blue).abs() < EPSILON
}
