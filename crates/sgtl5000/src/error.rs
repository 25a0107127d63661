//! Driver error type.
//!
//! Every fallible operation returns [`CodecError`], generic over the
//! register port's transport error. Nothing in this crate is fatal: the
//! caller decides whether to retry, escalate or ignore.

use core::fmt;

use crate::biquad::BiquadError;
use crate::codec::RangeError;

/// Errors reported by the SGTL5000 driver.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodecError<E> {
    /// A register read or write did not complete.
    ///
    /// Never folded into a decoded zero: a getter either returns the value
    /// the chip reported or this error.
    Transport(E),
    /// A domain value outside a control's range, for controls whose policy
    /// is rejection rather than clamping.
    OutOfRange {
        /// Label of the control that rejected the value.
        control: &'static str,
        /// The rejected value.
        value: u8,
        /// Largest accepted value.
        max: u8,
    },
    /// No control is mapped to this CC number.
    UnknownControl(u8),
    /// Graphic EQ band outside 0..=4.
    InvalidBand(u8),
    /// Parametric EQ filter index outside 0..=6.
    InvalidFilter(u8),
    /// Filter parameters the biquad equations cannot realise.
    Biquad(BiquadError),
    /// `CHIP_ID` did not carry the SGTL5000 part id.
    WrongChip(u16),
    /// Master clock settings the PLL cannot use (zero MCLK, or an MCLK too
    /// slow for the 5-bit integer divisor).
    InvalidClock,
}

impl<E> CodecError<E> {
    /// True for bus failures, which may succeed on retry.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl<E> From<RangeError> for CodecError<E> {
    fn from(err: RangeError) -> Self {
        Self::OutOfRange {
            control: err.control,
            value: err.value,
            max: err.max,
        }
    }
}

impl<E> From<BiquadError> for CodecError<E> {
    fn from(err: BiquadError) -> Self {
        Self::Biquad(err)
    }
}

impl<E> fmt::Display for CodecError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(_) => f.write_str("register transport failure"),
            Self::OutOfRange {
                control,
                value,
                max,
            } => write!(f, "{control}: value {value} exceeds maximum {max}"),
            Self::UnknownControl(cc) => write!(f, "no control mapped to CC {cc}"),
            Self::InvalidBand(band) => write!(f, "EQ band {band} out of range 0..=4"),
            Self::InvalidFilter(index) => write!(f, "PEQ filter {index} out of range 0..=6"),
            Self::Biquad(err) => write!(f, "biquad synthesis failed: {err}"),
            Self::WrongChip(id) => write!(f, "unexpected CHIP_ID {id:#06x}"),
            Self::InvalidClock => f.write_str("PLL divisors cannot be derived from this MCLK"),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for CodecError<E> {}
