//! Behavioral parameters loaded from the device's project configuration.
//!
//! The engineering tool writes the parameters into the device's parameter
//! memory; [`ParameterSet::load`] decodes them once at startup through a
//! [`ConfigService`]. After that the set is immutable.

use palette::Srgb;

/// Milliseconds represented by one unit of the raw interval parameter.
pub const INTERVAL_UNIT_MS: u32 = 10;

/// Read access to the device's parameter memory.
///
/// Implemented by the bus stack integration. Bit offsets follow the
/// engineering tool's convention and count from the most significant bit
/// of the byte (bit offset 0 is `0x80`).
pub trait ConfigService {
    /// Returns true if the device holds a valid project configuration.
    fn is_configured(&self) -> bool;

    /// Reads the parameter byte at `offset`.
    fn param_byte(&self, offset: u16) -> u8;

    /// Reads a single parameter bit.
    ///
    /// `bit_offset` is in `0..=7`; higher values wrap within the byte.
    fn param_bit(&self, offset: u16, bit_offset: u8) -> bool {
        let shift = 7 - (bit_offset & 0x07);
        (self.param_byte(offset) >> shift) & 0x01 == 0x01
    }
}

/// Single-channel color the indicator shows when on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedColor {
    /// Parameter code 0.
    Red,
    /// Parameter code 1.
    Green,
    /// Parameter code 2.
    Blue,
    /// Parameter code 3, undefined by the project. All channels stay dark,
    /// while the published state still follows the on/off cycle.
    Off,
}

impl LedColor {
    /// Decodes the 2-bit color code. Only the low two bits are considered.
    pub fn from_code(code: u8) -> Self {
        match code & 0x03 {
            0 => LedColor::Red,
            1 => LedColor::Green,
            2 => LedColor::Blue,
            _ => LedColor::Off,
        }
    }

    /// Full-brightness color value for an RGB pixel.
    pub fn to_srgb(self) -> Srgb {
        match self {
            LedColor::Red => Srgb::new(1.0, 0.0, 0.0),
            LedColor::Green => Srgb::new(0.0, 1.0, 0.0),
            LedColor::Blue => Srgb::new(0.0, 0.0, 1.0),
            LedColor::Off => Srgb::new(0.0, 0.0, 0.0),
        }
    }
}

/// Whether the indicator holds steady or blinks while activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkMode {
    /// LED stays on for as long as the channel is activated.
    Steady,
    /// LED toggles every `interval_ms`. Zero toggles on every tick.
    Blink { interval_ms: u32 },
}

/// Location of each parameter in parameter memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterLayout {
    /// Byte holding the 2-bit color field.
    pub color_offset: u16,
    /// Mask applied to the color byte.
    pub color_mask: u8,
    /// Right shift applied after masking. Shifts of 8 or more read as 0.
    pub color_shift: u8,
    /// Byte holding the blink flag.
    pub blink_offset: u16,
    /// Bit offset of the blink flag, MSB first.
    pub blink_bit_offset: u8,
    /// Byte holding the raw interval.
    pub interval_offset: u16,
}

impl Default for ParameterLayout {
    /// Layout of the shipped project: color at byte 0 bits 0-1, blink flag
    /// at byte 0 bit 2, interval in byte 1.
    fn default() -> Self {
        Self {
            color_offset: 0,
            color_mask: 0xC0,
            color_shift: 6,
            blink_offset: 0,
            blink_bit_offset: 2,
            interval_offset: 1,
        }
    }
}

/// Errors that can occur while loading parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParameterError {
    /// The device has not been configured by the engineering tool yet.
    NotConfigured,
}

impl core::fmt::Display for ParameterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParameterError::NotConfigured => {
                write!(f, "device has no valid project configuration")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParameterError {}

/// Decoded behavioral parameters of the indicator channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParameterSet {
    color: LedColor,
    blink_enabled: bool,
    blink_interval_units: u8,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            color: LedColor::Red,
            blink_enabled: false,
            blink_interval_units: 0,
        }
    }
}

impl ParameterSet {
    /// Creates a parameter set from already decoded values.
    pub const fn new(color: LedColor, blink_enabled: bool, blink_interval_units: u8) -> Self {
        Self {
            color,
            blink_enabled,
            blink_interval_units,
        }
    }

    /// Loads the parameters using the default [`ParameterLayout`].
    pub fn load<C: ConfigService + ?Sized>(config: &C) -> Result<Self, ParameterError> {
        Self::load_with_layout(config, &ParameterLayout::default())
    }

    /// Loads the parameters from the given layout.
    ///
    /// # Errors
    /// * `NotConfigured` - The device reports no valid configuration. The
    ///   caller should leave the channel disabled.
    pub fn load_with_layout<C: ConfigService + ?Sized>(
        config: &C,
        layout: &ParameterLayout,
    ) -> Result<Self, ParameterError> {
        if !config.is_configured() {
            return Err(ParameterError::NotConfigured);
        }

        let raw_color = (config.param_byte(layout.color_offset) & layout.color_mask)
            .checked_shr(u32::from(layout.color_shift))
            .unwrap_or(0);
        let color = LedColor::from_code(raw_color);
        debug!("parameter color: {=u8:#x}", raw_color);
        if color == LedColor::Off {
            warn!("undefined color code {=u8}, indicator stays dark", raw_color);
        }

        let blink_enabled = config.param_bit(layout.blink_offset, layout.blink_bit_offset);
        debug!("parameter blink: {=bool}", blink_enabled);

        let blink_interval_units = config.param_byte(layout.interval_offset);
        debug!("parameter interval: {=u8}", blink_interval_units);
        if blink_enabled && blink_interval_units == 0 {
            warn!("blink interval is zero, LED toggles on every tick");
        }

        Ok(Self::new(color, blink_enabled, blink_interval_units))
    }

    /// Returns the configured color.
    pub fn color(&self) -> LedColor {
        self.color
    }

    /// Returns true if blinking is enabled.
    pub fn blink_enabled(&self) -> bool {
        self.blink_enabled
    }

    /// Returns the raw interval in units of [`INTERVAL_UNIT_MS`].
    pub fn blink_interval_units(&self) -> u8 {
        self.blink_interval_units
    }

    /// Returns the effective blink behavior.
    pub fn blink_mode(&self) -> BlinkMode {
        if self.blink_enabled {
            BlinkMode::Blink {
                interval_ms: self.blink_interval_units as u32 * INTERVAL_UNIT_MS,
            }
        } else {
            BlinkMode::Steady
        }
    }
}
