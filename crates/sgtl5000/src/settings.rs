//! Whole-codec settings and auto volume configuration.
//!
//! [`CodecSettings`] is the client-side snapshot of every readable control.
//! The driver can apply one ([`crate::Sgtl5000::apply_settings`]) or read
//! one back ([`crate::Sgtl5000::capture_settings`]); storing it is the
//! client's business (behind the `serde` feature it serializes directly).

use crate::codec::{Band, Channel, Control};

/// Left and right values of a stereo control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StereoLevel {
    /// Left channel.
    pub left: u8,
    /// Right channel.
    pub right: u8,
}

impl StereoLevel {
    /// Same value on both channels.
    pub const fn both(value: u8) -> Self {
        Self {
            left: value,
            right: value,
        }
    }

    fn get(&self, channel: Channel) -> u8 {
        match channel {
            Channel::Left => self.left,
            Channel::Right => self.right,
        }
    }

    fn set(&mut self, channel: Channel, value: u8) {
        match channel {
            Channel::Left => self.left = value,
            Channel::Right => self.right = value,
        }
    }
}

/// Public value of every readable control.
///
/// Field domains match the corresponding [`Control`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[allow(missing_docs)]
pub struct CodecSettings {
    pub input: u8,
    pub mic_gain: u8,
    pub line_in_level: StereoLevel,
    pub dac_volume: StereoLevel,
    pub dac_volume_ramp: u8,
    pub line_out_level: StereoLevel,
    pub headphone_select: u8,
    pub headphone_volume: StereoLevel,
    pub mute_headphone: u8,
    pub mute_line_out: u8,
    pub adc_high_pass_filter: u8,
    pub dap_enable: u8,
    pub auto_volume_enable: u8,
    pub surround_enable: u8,
    pub surround_width: u8,
    pub bass_enhance_enable: u8,
    pub bass_enhance_cutoff_enable: u8,
    pub bass_enhance_cutoff: u8,
    pub bass_enhance_boost: u8,
    pub bass_enhance_volume: u8,
    pub eq_select: u8,
    pub peq_filter_count: u8,
    pub eq_bands: [u8; 5],
}

impl Default for CodecSettings {
    /// Line-in to the ADC, DAC at 0 dB, headphone at -6 dB, DAP routed
    /// after I2S in with every DAP block off and a flat EQ.
    fn default() -> Self {
        Self {
            input: 0,
            mic_gain: 1,
            line_in_level: StereoLevel::both(5),
            dac_volume: StereoLevel::both(0),
            dac_volume_ramp: 0,
            line_out_level: StereoLevel::both(13),
            headphone_select: 0,
            headphone_volume: StereoLevel::both(91),
            mute_headphone: 0,
            mute_line_out: 0,
            adc_high_pass_filter: 0,
            dap_enable: 2,
            auto_volume_enable: 0,
            surround_enable: 0,
            surround_width: 4,
            bass_enhance_enable: 0,
            bass_enhance_cutoff_enable: 1,
            bass_enhance_cutoff: 4,
            bass_enhance_boost: 96,
            bass_enhance_volume: 58,
            eq_select: 0,
            peq_filter_count: 0,
            eq_bands: [47; 5],
        }
    }
}

/// Number of `(Control, value)` pairs in [`CodecSettings::entries`].
pub const SETTINGS_ENTRIES: usize = 31;

impl CodecSettings {
    /// Every setting paired with its control, in the order they should be
    /// applied: routing and analog gains first, outputs, then the DAP.
    pub fn entries(&self) -> [(Control, u8); SETTINGS_ENTRIES] {
        use Channel::{Left, Right};
        let [b0, b1, b2, b3, b4] = self.eq_bands;
        [
            (Control::Input, self.input),
            (Control::MicGain, self.mic_gain),
            (Control::LineInLevel(Left), self.line_in_level.left),
            (Control::LineInLevel(Right), self.line_in_level.right),
            (Control::DacVolume(Left), self.dac_volume.left),
            (Control::DacVolume(Right), self.dac_volume.right),
            (Control::DacVolumeRamp, self.dac_volume_ramp),
            (Control::LineOutLevel(Left), self.line_out_level.left),
            (Control::LineOutLevel(Right), self.line_out_level.right),
            (Control::HeadphoneSelect, self.headphone_select),
            (Control::HeadphoneVolume(Left), self.headphone_volume.left),
            (Control::HeadphoneVolume(Right), self.headphone_volume.right),
            (Control::MuteHeadphone, self.mute_headphone),
            (Control::MuteLineOut, self.mute_line_out),
            (Control::AdcHighPassFilter, self.adc_high_pass_filter),
            (Control::DapEnable, self.dap_enable),
            (Control::AutoVolumeEnable, self.auto_volume_enable),
            (Control::SurroundEnable, self.surround_enable),
            (Control::SurroundWidth, self.surround_width),
            (Control::BassEnhanceEnable, self.bass_enhance_enable),
            (Control::BassEnhanceCutoffEnable, self.bass_enhance_cutoff_enable),
            (Control::BassEnhanceCutoff, self.bass_enhance_cutoff),
            (Control::BassEnhanceBoost, self.bass_enhance_boost),
            (Control::BassEnhanceVolume, self.bass_enhance_volume),
            (Control::EqSelect, self.eq_select),
            (Control::PeqFilterCount, self.peq_filter_count),
            (Control::EqBand(Band::Bass), b0),
            (Control::EqBand(Band::Band1), b1),
            (Control::EqBand(Band::Band2), b2),
            (Control::EqBand(Band::Band3), b3),
            (Control::EqBand(Band::Treble), b4),
        ]
    }

    /// Store a decoded value into the matching field.
    pub fn set(&mut self, control: Control, value: u8) {
        match control {
            Control::Input => self.input = value,
            Control::MicGain => self.mic_gain = value,
            Control::LineInLevel(ch) => self.line_in_level.set(ch, value),
            Control::DacVolume(ch) => self.dac_volume.set(ch, value),
            Control::DacVolumeRamp => self.dac_volume_ramp = value,
            Control::LineOutLevel(ch) => self.line_out_level.set(ch, value),
            Control::HeadphoneSelect => self.headphone_select = value,
            Control::HeadphoneVolume(ch) => self.headphone_volume.set(ch, value),
            Control::MuteHeadphone => self.mute_headphone = value,
            Control::MuteLineOut => self.mute_line_out = value,
            Control::AdcHighPassFilter => self.adc_high_pass_filter = value,
            Control::DapEnable => self.dap_enable = value,
            Control::AutoVolumeEnable => self.auto_volume_enable = value,
            Control::SurroundEnable => self.surround_enable = value,
            Control::SurroundWidth => self.surround_width = value,
            Control::BassEnhanceEnable => self.bass_enhance_enable = value,
            Control::BassEnhanceCutoffEnable => self.bass_enhance_cutoff_enable = value,
            Control::BassEnhanceCutoff => self.bass_enhance_cutoff = value,
            Control::BassEnhanceBoost => self.bass_enhance_boost = value,
            Control::BassEnhanceVolume => self.bass_enhance_volume = value,
            Control::EqSelect => self.eq_select = value,
            Control::PeqFilterCount => self.peq_filter_count = value,
            Control::EqBand(band) => {
                if let Some(slot) = self.eq_bands.get_mut(band.index()) {
                    *slot = value;
                }
            }
        }
    }

    /// The stored value for `control`.
    pub fn get(&self, control: Control) -> u8 {
        match control {
            Control::Input => self.input,
            Control::MicGain => self.mic_gain,
            Control::LineInLevel(ch) => self.line_in_level.get(ch),
            Control::DacVolume(ch) => self.dac_volume.get(ch),
            Control::DacVolumeRamp => self.dac_volume_ramp,
            Control::LineOutLevel(ch) => self.line_out_level.get(ch),
            Control::HeadphoneSelect => self.headphone_select,
            Control::HeadphoneVolume(ch) => self.headphone_volume.get(ch),
            Control::MuteHeadphone => self.mute_headphone,
            Control::MuteLineOut => self.mute_line_out,
            Control::AdcHighPassFilter => self.adc_high_pass_filter,
            Control::DapEnable => self.dap_enable,
            Control::AutoVolumeEnable => self.auto_volume_enable,
            Control::SurroundEnable => self.surround_enable,
            Control::SurroundWidth => self.surround_width,
            Control::BassEnhanceEnable => self.bass_enhance_enable,
            Control::BassEnhanceCutoffEnable => self.bass_enhance_cutoff_enable,
            Control::BassEnhanceCutoff => self.bass_enhance_cutoff,
            Control::BassEnhanceBoost => self.bass_enhance_boost,
            Control::BassEnhanceVolume => self.bass_enhance_volume,
            Control::EqSelect => self.eq_select,
            Control::PeqFilterCount => self.peq_filter_count,
            Control::EqBand(band) => self.eq_bands.get(band.index()).copied().unwrap_or(47),
        }
    }
}

// ── Auto volume control ──────────────────────────────────────────────────────

/// Compressor / limiter parameters for the DAP auto volume block.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AutoVolumeConfig {
    /// Expansion headroom: 0 (0 dB), 1 (6 dB), 2 (12 dB). Larger is 2.
    pub max_gain: u8,
    /// Level integration time: 0 (0 ms), 1 (25 ms), 2 (50 ms), 3 (100 ms).
    pub lbi_response: u8,
    /// Hard limiter instead of a soft-knee compressor.
    pub hard_limit: bool,
    /// Threshold in dBFS, 0 to -96.
    pub threshold_db: f32,
    /// Gain reduction rate above threshold, dB/s.
    pub attack_db_per_s: f32,
    /// Gain recovery rate below threshold, dB/s.
    pub decay_db_per_s: f32,
}

impl Default for AutoVolumeConfig {
    /// Soft-knee compressor at -18 dBFS, 50 ms integration.
    fn default() -> Self {
        Self {
            max_gain: 1,
            lbi_response: 2,
            hard_limit: false,
            threshold_db: -18.0,
            attack_db_per_s: 32.0,
            decay_db_per_s: 4.0,
        }
    }
}

/// Register words for one [`AutoVolumeConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AutoVolumeRegisters {
    /// `DAP_AVC_CTRL` bits for max gain, LBI response and hard limit.
    pub ctrl_bits: u16,
    /// `DAP_AVC_THRESHOLD`.
    pub threshold: u16,
    /// `DAP_AVC_ATTACK`.
    pub attack: u16,
    /// `DAP_AVC_DECAY`.
    pub decay: u16,
}

/// `DAP_AVC_CTRL` bits owned by [`AutoVolumeRegisters::ctrl_bits`].
pub const AVC_CTRL_CONFIG_MASK: u16 = (0x3 << 12) | (0x3 << 8) | (1 << 5);

/// Attack and decay are 12-bit rates.
const AVC_RATE_MAX: f32 = 4095.0;

impl AutoVolumeConfig {
    /// Convert to register words for a codec running at `sample_rate_hz`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn registers(&self, sample_rate_hz: u32) -> AutoVolumeRegisters {
        use crate::registers::{AVC_CTRL_HARD_LIMIT_EN, AVC_CTRL_LBI_RESPONSE_SHIFT, AVC_CTRL_MAX_GAIN_SHIFT};

        let max_gain = u16::from(self.max_gain.min(2));
        let lbi = u16::from(self.lbi_response & 0x3);
        let ctrl_bits = max_gain.checked_shl(u32::from(AVC_CTRL_MAX_GAIN_SHIFT)).unwrap_or(0)
            | lbi.checked_shl(u32::from(AVC_CTRL_LBI_RESPONSE_SHIFT)).unwrap_or(0)
            | if self.hard_limit { AVC_CTRL_HARD_LIMIT_EN } else { 0 };

        let threshold_db = self.threshold_db.clamp(-96.0, 0.0);
        let threshold = libm::powf(10.0, threshold_db / 20.0) * 0.636 * 32_768.0;

        let per_sample = 20.0 * sample_rate_hz.max(1) as f32;
        let rate = |db_per_s: f32, scale: f32| {
            let r = (1.0 - libm::powf(10.0, -(db_per_s.max(0.0) / per_sample))) * scale;
            r.clamp(0.0, AVC_RATE_MAX)
        };

        // Safety: all values clamped to u16 range above; float → int casts saturate.
        AutoVolumeRegisters {
            ctrl_bits,
            threshold: libm::roundf(threshold) as u16,
            attack: libm::roundf(rate(self.attack_db_per_s, 524_288.0)) as u16,
            decay: libm::roundf(rate(self.decay_db_per_s, 8_388_608.0)) as u16,
        }
    }
}
