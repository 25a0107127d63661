//! Parametric EQ coefficient synthesis.
//!
//! The design equations come from the `biquad` crate (RBJ audio EQ
//! cookbook). This module validates the parameters and converts the
//! normalised floating-point result into the SGTL5000 coefficient format:
//!
//! - 20-bit two's complement per coefficient
//! - half scale: `raw = round(coef * unit / 2)`, with `unit` = 2^19 by default
//! - feedback terms stored negated (`-a1`, `-a2`)
//!
//! Rounding is half away from zero. Values beyond the 20-bit range
//! saturate to `[-2^19, 2^19 - 1]` and are flagged in
//! [`BiquadCoefficients::clamped`]; nothing wraps.

use core::fmt;

use ::biquad::{Coefficients, Hertz, Type};

/// Default quantization unit: full scale of a 20-bit coefficient.
pub const DEFAULT_QUANTIZATION_UNIT: u32 = 1 << 19;

/// Smallest representable coefficient.
pub const COEFFICIENT_MIN: i32 = -(1 << 19);
/// Largest representable coefficient.
pub const COEFFICIENT_MAX: i32 = (1 << 19) - 1;

/// Filter response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FilterType {
    /// Second-order low-pass.
    LowPass,
    /// Second-order high-pass.
    HighPass,
    /// Band-pass, constant 0 dB peak gain.
    BandPass,
    /// Band-reject.
    Notch,
    /// Peaking EQ (bell).
    Peaking,
    /// Low shelf.
    LowShelf,
    /// High shelf.
    HighShelf,
}

/// Parameters for one filter.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterSpec {
    /// Response shape.
    pub filter: FilterType,
    /// Center or corner frequency.
    pub frequency_hz: f32,
    /// Gain for peaking and shelving filters; ignored otherwise.
    pub gain_db: f32,
    /// Quality factor, > 0.
    pub q: f32,
}

impl FilterSpec {
    /// Peaking filter.
    pub fn peaking(frequency_hz: f32, gain_db: f32, q: f32) -> Self {
        Self {
            filter: FilterType::Peaking,
            frequency_hz,
            gain_db,
            q,
        }
    }
}

/// Parameters the design equations cannot realise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BiquadError {
    /// Frequency at or above half the sample rate.
    OutsideNyquist,
    /// Q not a positive finite number.
    InvalidQ,
    /// Frequency or sample rate not a positive finite number.
    InvalidFrequency,
    /// Gain not finite.
    InvalidGain,
}

impl fmt::Display for BiquadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OutsideNyquist => "frequency above Nyquist",
            Self::InvalidQ => "Q must be positive",
            Self::InvalidFrequency => "frequency must be positive",
            Self::InvalidGain => "gain must be finite",
        })
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BiquadError {}

impl From<::biquad::Errors> for BiquadError {
    fn from(err: ::biquad::Errors) -> Self {
        match err {
            ::biquad::Errors::OutsideNyquist => Self::OutsideNyquist,
            ::biquad::Errors::NegativeQ => Self::InvalidQ,
            ::biquad::Errors::NegativeFrequency => Self::InvalidFrequency,
        }
    }
}

/// Quantized coefficients in chip format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BiquadCoefficients {
    /// Response the coefficients implement.
    pub filter: FilterType,
    /// Feed-forward b0.
    pub b0: i32,
    /// Feed-forward b1.
    pub b1: i32,
    /// Feed-forward b2.
    pub b2: i32,
    /// Feedback a1, stored negated.
    pub a1: i32,
    /// Feedback a2, stored negated.
    pub a2: i32,
    /// Quantization unit used.
    pub unit: u32,
    /// Per coefficient (`b0, b1, b2, a1, a2`): saturated to the 20-bit range.
    pub clamped: [bool; 5],
}

impl BiquadCoefficients {
    /// Coefficients in register order: `b0, b1, b2, a1, a2`.
    pub fn as_array(&self) -> [i32; 5] {
        [self.b0, self.b1, self.b2, self.a1, self.a2]
    }

    /// True if any coefficient saturated.
    pub fn any_clamped(&self) -> bool {
        self.clamped.iter().any(|&c| c)
    }

    /// `(msb, lsb)` register words per coefficient: bits 19:4 and 3:0.
    pub fn register_words(&self) -> [(u16, u16); 5] {
        self.as_array().map(split_coefficient)
    }
}

/// Split a 20-bit coefficient into its MSB (bits 19:4) and LSB (bits 3:0)
/// register words.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn split_coefficient(coefficient: i32) -> (u16, u16) {
    // Safety: two's complement reinterpretation, then masked to 20 bits;
    // both halves fit u16 after masking.
    let raw = (coefficient as u32) & 0x000F_FFFF;
    (((raw >> 4) & 0xFFFF) as u16, (raw & 0x000F) as u16)
}

/// Compute chip-format coefficients for `spec` at `sample_rate_hz`.
///
/// # Errors
///
/// [`BiquadError`] for non-positive or non-finite frequency, sample rate
/// or Q, a non-finite gain, or a frequency at or above Nyquist.
pub fn synthesize(
    spec: &FilterSpec,
    sample_rate_hz: u32,
    unit: u32,
) -> Result<BiquadCoefficients, BiquadError> {
    #[allow(clippy::cast_precision_loss)] // audio sample rates are exact in f32
    let fs = sample_rate_hz as f32;
    if !(spec.frequency_hz.is_finite() && spec.frequency_hz > 0.0) || fs <= 0.0 {
        return Err(BiquadError::InvalidFrequency);
    }
    if !(spec.q.is_finite() && spec.q > 0.0) {
        return Err(BiquadError::InvalidQ);
    }
    if !spec.gain_db.is_finite() {
        return Err(BiquadError::InvalidGain);
    }
    if spec.frequency_hz * 2.0 >= fs {
        return Err(BiquadError::OutsideNyquist);
    }

    let kind = match spec.filter {
        FilterType::LowPass => Type::LowPass,
        FilterType::HighPass => Type::HighPass,
        FilterType::BandPass => Type::BandPass,
        FilterType::Notch => Type::Notch,
        FilterType::Peaking => Type::PeakingEQ(spec.gain_db),
        FilterType::LowShelf => Type::LowShelf(spec.gain_db),
        FilterType::HighShelf => Type::HighShelf(spec.gain_db),
    };
    let c = Coefficients::<f32>::from_params(
        kind,
        Hertz::<f32>::from_hz(fs)?,
        Hertz::<f32>::from_hz(spec.frequency_hz)?,
        spec.q,
    )?;

    let (b0, cb0) = quantize(c.b0, unit);
    let (b1, cb1) = quantize(c.b1, unit);
    let (b2, cb2) = quantize(c.b2, unit);
    let (a1, ca1) = quantize(-c.a1, unit);
    let (a2, ca2) = quantize(-c.a2, unit);
    let coefficients = BiquadCoefficients {
        filter: spec.filter,
        b0,
        b1,
        b2,
        a1,
        a2,
        unit,
        clamped: [cb0, cb1, cb2, ca1, ca2],
    };
    if coefficients.any_clamped() {
        debug!("biquad coefficients saturated at {} Hz", sample_rate_hz);
    }
    Ok(coefficients)
}

/// Scale, round half away from zero and saturate one coefficient.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn quantize(normalised: f32, unit: u32) -> (i32, bool) {
    let scaled = normalised * (unit as f32) / 2.0;
    let rounded = libm::roundf(scaled);
    let min = COEFFICIENT_MIN as f32;
    let max = COEFFICIENT_MAX as f32;
    let clamped = !(min..=max).contains(&rounded);
    // Safety: clamped into the 20-bit range before the cast.
    (rounded.clamp(min, max) as i32, clamped)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)] // Tests compare coefficient sums
mod tests {
    use super::*;

    #[test]
    fn test_peaking_zero_db_is_identity() {
        let c = synthesize(
            &FilterSpec::peaking(1_000.0, 0.0, 0.707),
            44_100,
            DEFAULT_QUANTIZATION_UNIT,
        )
        .unwrap();
        assert!((c.b0 - (1 << 18)).abs() <= 1, "b0 = {}", c.b0);
        // Numerator equals denominator: b1 = a1, stored a1 is negated.
        assert!((c.b1 + c.a1).abs() <= 1);
        assert!((c.b2 + c.a2).abs() <= 1);
        assert!(!c.any_clamped());
    }

    #[test]
    fn test_big_boost_saturates_instead_of_wrapping() {
        let c = synthesize(
            &FilterSpec::peaking(5_000.0, 24.0, 0.3),
            44_100,
            DEFAULT_QUANTIZATION_UNIT,
        )
        .unwrap();
        assert_eq!(c.b0, COEFFICIENT_MAX);
        assert!(c.clamped[0]);
    }

    #[test]
    fn test_rejects_above_nyquist() {
        let spec = FilterSpec::peaking(30_000.0, 3.0, 1.0);
        assert_eq!(
            synthesize(&spec, 48_000, DEFAULT_QUANTIZATION_UNIT),
            Err(BiquadError::OutsideNyquist)
        );
    }

    #[test]
    fn test_rejects_non_positive_q() {
        let spec = FilterSpec::peaking(1_000.0, 3.0, 0.0);
        assert_eq!(
            synthesize(&spec, 48_000, DEFAULT_QUANTIZATION_UNIT),
            Err(BiquadError::InvalidQ)
        );
    }

    #[test]
    fn test_rejects_negative_frequency() {
        let spec = FilterSpec::peaking(-5.0, 3.0, 1.0);
        assert_eq!(
            synthesize(&spec, 48_000, DEFAULT_QUANTIZATION_UNIT),
            Err(BiquadError::InvalidFrequency)
        );
    }

    #[test]
    fn test_quantize_rounds_half_away_from_zero() {
        // unit 2: raw = coef, so 1.5 → 2 and -1.5 → -2
        assert_eq!(quantize(1.5, 2), (2, false));
        assert_eq!(quantize(-1.5, 2), (-2, false));
        assert_eq!(quantize(2.4, 2), (2, false));
    }

    #[test]
    fn test_split_keeps_twenty_bits() {
        assert_eq!(split_coefficient(0x12345), (0x1234, 0x5));
        // -1 → 0xFFFFF
        assert_eq!(split_coefficient(-1), (0xFFFF, 0xF));
        assert_eq!(split_coefficient(COEFFICIENT_MIN), (0x8000, 0x0));
    }

    #[test]
    fn test_low_pass_has_unity_dc_gain() {
        let c = synthesize(
            &FilterSpec {
                filter: FilterType::LowPass,
                frequency_hz: 500.0,
                gain_db: 0.0,
                q: 0.707,
            },
            48_000,
            DEFAULT_QUANTIZATION_UNIT,
        )
        .unwrap();
        // H(1) = (b0 + b1 + b2) / (1 + a1 + a2); stored a1, a2 are negated
        // and everything is at half scale.
        let num = i64::from(c.b0) + i64::from(c.b1) + i64::from(c.b2);
        let den = i64::from(1 << 18) - i64::from(c.a1) - i64::from(c.a2);
        assert!((num - den).abs() <= 4, "num {num} den {den}");
    }
}
