//! Clocking configuration supplied at enable time.
//!
//! # Clock sources
//!
//! | Mode     | Who drives SCLK/LRCLK | SGTL5000 system clock           |
//! |----------|-----------------------|---------------------------------|
//! | `Slave`  | host                  | MCLK pin, must be 256 × fs      |
//! | `Master` | SGTL5000              | internal PLL locked to MCLK     |
//!
//! The sample rate is a SYS_FS base rate (32, 44.1, 48 or 96 kHz) divided
//! by RATE_MODE (1, 2, 4 or 6).

use platform::SampleRateHz;

use crate::registers::{CLK_CTRL_MCLK_FREQ_PLL, CLK_TOP_CTRL_INPUT_FREQ_DIV2};

/// MCLK above this goes through the ÷2 input stage before the PLL.
pub const PLL_INPUT_DIV2_THRESHOLD_HZ: u32 = 17_000_000;

/// Largest value of the PLL_CTRL integer divisor field.
pub const PLL_INTEGER_MAX: u16 = 0x1F;

/// Supported sample rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SampleRate {
    /// 8 kHz (48 kHz / 6).
    Hz8000,
    /// 11.025 kHz (44.1 kHz / 4).
    Hz11025,
    /// 12 kHz (48 kHz / 4).
    Hz12000,
    /// 16 kHz (32 kHz / 2).
    Hz16000,
    /// 22.05 kHz (44.1 kHz / 2).
    Hz22050,
    /// 24 kHz (48 kHz / 2).
    Hz24000,
    /// 32 kHz.
    Hz32000,
    /// 44.1 kHz.
    #[default]
    Hz44100,
    /// 48 kHz.
    Hz48000,
    /// 96 kHz.
    Hz96000,
}

impl SampleRate {
    /// All rates, ascending.
    pub const ALL: [SampleRate; 10] = [
        SampleRate::Hz8000,
        SampleRate::Hz11025,
        SampleRate::Hz12000,
        SampleRate::Hz16000,
        SampleRate::Hz22050,
        SampleRate::Hz24000,
        SampleRate::Hz32000,
        SampleRate::Hz44100,
        SampleRate::Hz48000,
        SampleRate::Hz96000,
    ];

    /// Rate in Hz.
    pub fn hz(self) -> u32 {
        match self {
            SampleRate::Hz8000 => 8_000,
            SampleRate::Hz11025 => 11_025,
            SampleRate::Hz12000 => 12_000,
            SampleRate::Hz16000 => 16_000,
            SampleRate::Hz22050 => 22_050,
            SampleRate::Hz24000 => 24_000,
            SampleRate::Hz32000 => 32_000,
            SampleRate::Hz44100 => 44_100,
            SampleRate::Hz48000 => 48_000,
            SampleRate::Hz96000 => 96_000,
        }
    }

    /// The exact rate matching `hz`, if the chip can clock it.
    pub fn from_hz(hz: SampleRateHz) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.hz() == hz.get())
    }

    /// `(SYS_FS, RATE_MODE)` field codes.
    fn codes(self) -> (u16, u16) {
        match self {
            SampleRate::Hz8000 => (2, 3),
            SampleRate::Hz11025 => (1, 2),
            SampleRate::Hz12000 => (2, 2),
            SampleRate::Hz16000 => (0, 1),
            SampleRate::Hz22050 => (1, 1),
            SampleRate::Hz24000 => (2, 1),
            SampleRate::Hz32000 => (0, 0),
            SampleRate::Hz44100 => (1, 0),
            SampleRate::Hz48000 => (2, 0),
            SampleRate::Hz96000 => (3, 0),
        }
    }
}

/// Who generates the I2S clocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockMode {
    /// Host supplies MCLK at 256 × fs and drives SCLK/LRCLK.
    #[default]
    Slave,
    /// SGTL5000 runs its PLL from `mclk_hz` and drives SCLK/LRCLK.
    Master {
        /// Frequency at the MCLK pin.
        mclk_hz: u32,
        /// PLL output, normally 4096 × fs (180.6336 MHz at 44.1 kHz).
        pll_hz: u32,
    },
}

impl ClockMode {
    /// Master mode with the PLL at 4096 × `rate`.
    pub fn master(mclk_hz: u32, rate: SampleRate) -> Self {
        ClockMode::Master {
            mclk_hz,
            pll_hz: rate.hz().saturating_mul(4096),
        }
    }
}

/// Clocking handed to [`crate::Sgtl5000::enable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockConfig {
    /// Clock source.
    pub mode: ClockMode,
    /// Sample rate.
    pub rate: SampleRate,
}

/// PLL divisor split for `CHIP_PLL_CTRL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PllDivisors {
    /// `CLK_TOP_CTRL` value (input ÷2 stage).
    pub clk_top_ctrl: u16,
    /// Integer divisor, 5 bits.
    pub integer: u16,
    /// Fractional divisor in 1/2048 units, 11 bits.
    pub fractional: u16,
}

impl PllDivisors {
    /// Compute divisors for `pll_hz` from `mclk_hz`, in integer arithmetic.
    ///
    /// Returns `None` for a zero MCLK, or when the integer divisor does not
    /// fit its 5-bit field.
    pub fn new(mclk_hz: u32, pll_hz: u32) -> Option<Self> {
        let divided = mclk_hz > PLL_INPUT_DIV2_THRESHOLD_HZ;
        let input = if divided { mclk_hz / 2 } else { mclk_hz };
        let integer = u16::try_from(pll_hz.checked_div(input)?)
            .ok()
            .filter(|&i| i <= PLL_INTEGER_MAX)?;
        let remainder = pll_hz.checked_rem(input)?;
        let fractional = u64::from(remainder)
            .checked_mul(2048)?
            .checked_div(u64::from(input))?;
        Some(Self {
            clk_top_ctrl: if divided { CLK_TOP_CTRL_INPUT_FREQ_DIV2 } else { 0 },
            integer,
            fractional: u16::try_from(fractional & 0x7FF).ok()?,
        })
    }

    /// `CHIP_PLL_CTRL` value.
    pub fn pll_ctrl(&self) -> u16 {
        self.integer.checked_shl(11).unwrap_or(0) | self.fractional
    }
}

impl ClockConfig {
    /// `CHIP_CLK_CTRL` value.
    pub fn clk_ctrl(&self) -> u16 {
        let (sys_fs, rate_mode) = self.rate.codes();
        let mclk_freq = match self.mode {
            ClockMode::Slave => 0,
            ClockMode::Master { .. } => CLK_CTRL_MCLK_FREQ_PLL,
        };
        rate_mode.checked_shl(4).unwrap_or(0) | sys_fs.checked_shl(2).unwrap_or(0) | mclk_freq
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_slave_44k1_matches_power_on_default() {
        let cfg = ClockConfig::default();
        assert_eq!(cfg.clk_ctrl(), 0x0004);
    }

    #[test]
    fn test_master_adds_pll_source() {
        let cfg = ClockConfig {
            mode: ClockMode::master(12_288_000, SampleRate::Hz48000),
            rate: SampleRate::Hz48000,
        };
        assert_eq!(cfg.clk_ctrl(), 0x000B);
    }

    #[test]
    fn test_divided_rates_set_rate_mode() {
        let cfg = ClockConfig {
            mode: ClockMode::Slave,
            rate: SampleRate::Hz8000,
        };
        assert_eq!(cfg.clk_ctrl(), (3 << 4) | (2 << 2));
    }

    #[test]
    fn test_pll_divisors_for_teensy_mclk() {
        // 11.2896 MHz MCLK, 4096 × 44.1 kHz PLL: exactly 16.0
        let pll = PllDivisors::new(11_289_600, 180_633_600).unwrap();
        assert_eq!(pll.integer, 16);
        assert_eq!(pll.fractional, 0);
        assert_eq!(pll.clk_top_ctrl, 0);
        assert_eq!(pll.pll_ctrl(), 16 << 11);
    }

    #[test]
    fn test_pll_fraction_is_truncated_2048ths() {
        // 12 MHz → 180.6336 MHz: 15.0528 → int 15, frac 0.0528 × 2048 = 108.1
        let pll = PllDivisors::new(12_000_000, 180_633_600).unwrap();
        assert_eq!(pll.integer, 15);
        assert_eq!(pll.fractional, 108);
    }

    #[test]
    fn test_fast_mclk_uses_input_divider() {
        let pll = PllDivisors::new(24_000_000, 180_633_600).unwrap();
        assert_eq!(pll.clk_top_ctrl, CLK_TOP_CTRL_INPUT_FREQ_DIV2);
        assert_eq!(pll.integer, 15);
    }

    #[test]
    fn test_zero_mclk_is_rejected() {
        assert!(PllDivisors::new(0, 180_633_600).is_none());
    }

    #[test]
    fn test_slow_mclk_overflowing_integer_divisor_is_rejected() {
        // 180.6336 MHz / 2 MHz = 90, past the 5-bit field
        assert!(PllDivisors::new(2_000_000, 180_633_600).is_none());
        // 31 still fits
        let pll = PllDivisors::new(5_826_890, 180_633_600).unwrap();
        assert_eq!(pll.integer, PLL_INTEGER_MAX);
    }

    #[test]
    fn test_sample_rate_lookup() {
        let hz = SampleRateHz::new(22_050).unwrap();
        assert_eq!(SampleRate::from_hz(hz), Some(SampleRate::Hz22050));
        let odd = SampleRateHz::new(44_000).unwrap();
        assert_eq!(SampleRate::from_hz(odd), None);
    }
}
