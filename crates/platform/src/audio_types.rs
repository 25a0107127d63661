//! Audio domain newtypes for compile-time safety.
//!
//! These zero-cost abstractions prevent common errors:
//! - `ControlValue`: clamps 0–127, the MIDI controller value range
//! - `SampleRateHz`: validates 8000–96000 Hz, the SGTL5000 clocking range
//! - `I2cAddress`: the two strap-selectable SGTL5000 bus addresses

// ── Error type ───────────────────────────────────────────────────────────────

/// Error returned when a value is out of the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutOfRangeError {
    /// The value that was out of range.
    pub value: u32,
    /// The inclusive minimum allowed value.
    pub min: u32,
    /// The inclusive maximum allowed value.
    pub max: u32,
}

impl core::fmt::Display for OutOfRangeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} is outside {}..={}", self.value, self.min, self.max)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for OutOfRangeError {}

// ── ControlValue ─────────────────────────────────────────────────────────────

/// A controller value, clamped to 0–127.
///
/// Wraps a `u8` with the invariant `0 <= value <= 127`.
/// Construct with [`ControlValue::new`] (clamping) or
/// [`ControlValue::try_new`] (fallible, strict).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct ControlValue(u8);

impl ControlValue {
    /// Largest controller value.
    pub const MAX: u8 = 127;

    /// Create a `ControlValue`, clamping values above 127 to 127.
    #[must_use]
    pub fn new(value: u8) -> Self {
        Self(value.min(Self::MAX))
    }

    /// Create a `ControlValue`, returning an error if `value > 127`.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `value > 127`.
    pub fn try_new(value: u8) -> Result<Self, OutOfRangeError> {
        if value > Self::MAX {
            Err(OutOfRangeError {
                value: u32::from(value),
                min: 0,
                max: u32::from(Self::MAX),
            })
        } else {
            Ok(Self(value))
        }
    }

    /// Return the inner value (0–127).
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl From<ControlValue> for u8 {
    fn from(value: ControlValue) -> Self {
        value.0
    }
}

// ── SampleRateHz ─────────────────────────────────────────────────────────────

/// Sample rate in Hz, validated to the range the SGTL5000 can clock.
///
/// Valid range: 8000–96000 Hz. Whether a rate inside the range is an exact
/// SYS_FS / RATE_MODE combination is decided by the codec crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct SampleRateHz(u32);

impl SampleRateHz {
    /// Minimum supported sample rate: 8000 Hz (48 kHz / 6).
    pub const MIN_HZ: u32 = 8_000;

    /// Maximum supported sample rate: 96000 Hz.
    pub const MAX_HZ: u32 = 96_000;

    /// Create a `SampleRateHz`, returning an error if out of 8000–96000 Hz.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `hz < 8000` or `hz > 96000`.
    pub fn new(hz: u32) -> Result<Self, OutOfRangeError> {
        if !(Self::MIN_HZ..=Self::MAX_HZ).contains(&hz) {
            Err(OutOfRangeError {
                value: hz,
                min: Self::MIN_HZ,
                max: Self::MAX_HZ,
            })
        } else {
            Ok(Self(hz))
        }
    }

    /// Return the sample rate in Hz.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

// ── I2cAddress ───────────────────────────────────────────────────────────────

/// SGTL5000 7-bit I²C address, selected by the `CTRL_ADR0_CS` strap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cAddress {
    /// `CTRL_ADR0_CS` low: 0x0A.
    #[default]
    Normal,
    /// `CTRL_ADR0_CS` high: 0x2A.
    Alternate,
}

impl I2cAddress {
    /// Return the 7-bit I²C address.
    #[must_use]
    pub const fn get(self) -> u8 {
        match self {
            Self::Normal => 0x0A,
            Self::Alternate => 0x2A,
        }
    }
}
