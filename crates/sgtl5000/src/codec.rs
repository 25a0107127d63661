//! Register codec: logical controls to register bit-fields and back.
//!
//! Every control is described by a static [`Descriptor`]: the register
//! field it lives in, its public maximum, the rule that converts between
//! the public 0..=max domain and the raw field, and what happens to
//! out-of-range input. Encoding and decoding are pure; register I/O lives
//! in the driver.
//!
//! # Lossy controls
//!
//! Some fields can hold raw values the encoder never produces (DAC volume
//! below 0x3C, reserved table codes, EQ bands above 95). Those decode to
//! the nearest public value, so only `encode(decode(encode(x))) ==
//! encode(x)` holds for them. [`Descriptor::is_lossy`] reports which.

use crate::registers::*;

/// Left or right channel of a stereo control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// Left channel.
    Left,
    /// Right channel.
    Right,
}

/// One of the five graphic EQ bands.
///
/// Tone control mode uses [`Band::Bass`] and [`Band::Treble`] only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Band {
    /// Band 0, 115 Hz (tone bass).
    Bass,
    /// Band 1, 330 Hz.
    Band1,
    /// Band 2, 990 Hz.
    Band2,
    /// Band 3, 3 kHz.
    Band3,
    /// Band 4, 9.9 kHz (tone treble).
    Treble,
}

impl Band {
    /// All bands in register order.
    pub const ALL: [Band; 5] = [
        Band::Bass,
        Band::Band1,
        Band::Band2,
        Band::Band3,
        Band::Treble,
    ];

    /// Band by index 0..=4.
    pub fn new(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }

    /// Index 0..=4.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Band gain register.
    pub fn register(self) -> u16 {
        match self {
            Band::Bass => DAP_AUDIO_EQ_BASS_BAND0,
            Band::Band1 => DAP_AUDIO_EQ_BAND1,
            Band::Band2 => DAP_AUDIO_EQ_BAND2,
            Band::Band3 => DAP_AUDIO_EQ_BAND3,
            Band::Treble => DAP_AUDIO_EQ_TREBLE_BAND4,
        }
    }
}

/// Every logical control the driver exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Control {
    /// ADC source: 0 line-in, 1 microphone.
    Input,
    /// Microphone preamp: 0, 20, 30, 40 dB.
    MicGain,
    /// Line-in analog gain, 0..=15 in 1.5 dB steps.
    LineInLevel(Channel),
    /// DAC attenuation, 0 = 0 dB … 127 = -63.5 dB.
    DacVolume(Channel),
    /// DAC volume ramp: 0 exponential, 1 linear, 2 off.
    DacVolumeRamp,
    /// Line-out level, 0..=31, larger is louder; 18 is the documented
    /// clip-free maximum.
    LineOutLevel(Channel),
    /// Headphone source: 0 DAC, 1 line-in bypass.
    HeadphoneSelect,
    /// Headphone level, 0..=127, larger is louder; 103 = 0 dB.
    HeadphoneVolume(Channel),
    /// Headphone mute.
    MuteHeadphone,
    /// Line-out mute.
    MuteLineOut,
    /// ADC high-pass filter: 0 on, 1 frozen, 2 bypassed.
    AdcHighPassFilter,
    /// DAP routing: 0 off, 1 before I2S out, 2 after I2S in.
    DapEnable,
    /// Auto volume control enable.
    AutoVolumeEnable,
    /// Surround: 0 off, 1 mono, 2 stereo.
    SurroundEnable,
    /// Surround width, 0..=7.
    SurroundWidth,
    /// Bass enhance enable.
    BassEnhanceEnable,
    /// Bass enhance high-pass cutoff enable.
    BassEnhanceCutoffEnable,
    /// Bass enhance cutoff, 0..=6 (80 Hz … 225 Hz in 25 Hz steps).
    BassEnhanceCutoff,
    /// Bass harmonics boost, 0..=127.
    BassEnhanceBoost,
    /// Bass enhance output level, 0..=63.
    BassEnhanceVolume,
    /// EQ mode: 0 flat, 1 parametric, 2 tone, 3 graphic.
    EqSelect,
    /// Enabled parametric EQ filters, 0..=7.
    PeqFilterCount,
    /// Graphic EQ / tone band gain, 0..=95 in 0.25 dB steps; 47 = 0 dB.
    EqBand(Band),
}

/// How a public value maps onto a raw field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// `raw = value`.
    Linear,
    /// `raw = top - value`.
    Inverted {
        /// Raw value for public 0.
        top: u16,
    },
    /// `raw = base + value`.
    Offset {
        /// Raw value for public 0.
        base: u16,
    },
    /// `raw = codes[value]`; unknown raw codes decode to 0.
    Table {
        /// Raw code per public value.
        codes: &'static [u16],
    },
    /// Single bit; `active_low` means public 1 clears it.
    Flag {
        /// Public 1 clears the bit.
        active_low: bool,
    },
}

/// What to do with a public value above the control's maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePolicy {
    /// Use the maximum instead.
    Clamp,
    /// Fail with [`RangeError`].
    Reject,
}

/// A bit-field inside one register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Register address.
    pub register: u16,
    /// In-register mask (already shifted).
    pub mask: u16,
    /// Position of the field's least significant bit.
    pub shift: u16,
}

impl Field {
    const fn new(register: u16, mask: u16, shift: u16) -> Self {
        Self {
            register,
            mask,
            shift,
        }
    }

    /// Largest raw value the field can hold.
    pub fn raw_max(&self) -> u16 {
        self.mask.checked_shr(u32::from(self.shift)).unwrap_or(0)
    }

    /// Extract the raw field value from a register value.
    pub fn extract(&self, register_value: u16) -> u16 {
        (register_value & self.mask)
            .checked_shr(u32::from(self.shift))
            .unwrap_or(0)
    }

    /// Place a raw field value at the field's position.
    pub fn place(&self, raw: u16) -> u16 {
        raw.checked_shl(u32::from(self.shift)).unwrap_or(0) & self.mask
    }
}

/// Static description of one control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    /// Diagnostic name.
    pub label: &'static str,
    /// Where the control lives.
    pub field: Field,
    /// Largest public value.
    pub max: u8,
    /// Public ↔ raw conversion.
    pub rule: Rule,
    /// Out-of-range handling.
    pub policy: RangePolicy,
}

/// A public value rejected by a [`RangePolicy::Reject`] control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RangeError {
    /// Control label.
    pub control: &'static str,
    /// Rejected value.
    pub value: u8,
    /// Largest accepted value.
    pub max: u8,
}

/// Result of encoding a public value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoded {
    /// Register address.
    pub register: u16,
    /// Bits owned by the control.
    pub mask: u16,
    /// New contents of the masked bits.
    pub bits: u16,
    /// Public value actually encoded (after clamping).
    pub value: u8,
    /// The requested value was above the maximum and was clamped.
    pub clamped: bool,
}

const DAC_RAMP_CODES: &[u16] = &[
    ADCDAC_VOL_RAMP_EN | ADCDAC_VOL_EXPO_RAMP,
    ADCDAC_VOL_RAMP_EN,
    0,
];
const HPF_CODES: &[u16] = &[0, ADCDAC_ADC_HPF_FREEZE, ADCDAC_ADC_HPF_BYPASS];
const DAP_ROUTING_CODES: &[u16] = &[SSS_DAP_DISABLED, SSS_DAP_PRE, SSS_DAP_POST];
const SURROUND_CODES: &[u16] = &[0, 2, 3];

const fn desc(
    label: &'static str,
    field: Field,
    max: u8,
    rule: Rule,
    policy: RangePolicy,
) -> Descriptor {
    Descriptor {
        label,
        field,
        max,
        rule,
        policy,
    }
}

#[allow(clippy::arithmetic_side_effects)] // Safety: left masks fit in the low byte, shift <= 8
const fn stereo(channel: Channel, register: u16, left_mask: u16, right_shift: u16) -> Field {
    match channel {
        Channel::Left => Field::new(register, left_mask, 0),
        Channel::Right => Field::new(register, left_mask << right_shift, right_shift),
    }
}

use RangePolicy::{Clamp, Reject};

impl Control {
    /// The control's static descriptor.
    pub fn descriptor(self) -> Descriptor {
        match self {
            Control::Input => desc(
                "Input",
                Field::new(CHIP_ANA_CTRL, ANA_CTRL_SELECT_ADC, 2),
                1,
                Rule::Flag { active_low: true },
                Clamp,
            ),
            Control::MicGain => desc(
                "MicGain",
                Field::new(CHIP_MIC_CTRL, 0x0003, 0),
                3,
                Rule::Linear,
                Clamp,
            ),
            Control::LineInLevel(ch) => desc(
                match ch {
                    Channel::Left => "LineInLevelLeft",
                    Channel::Right => "LineInLevelRight",
                },
                stereo(ch, CHIP_ANA_ADC_CTRL, 0x000F, 4),
                15,
                Rule::Linear,
                Clamp,
            ),
            Control::DacVolume(ch) => desc(
                match ch {
                    Channel::Left => "DacVolumeLeft",
                    Channel::Right => "DacVolumeRight",
                },
                stereo(ch, CHIP_DAC_VOL, 0x00FF, 8),
                127,
                Rule::Offset { base: 0x3C },
                Clamp,
            ),
            Control::DacVolumeRamp => desc(
                "DacVolumeRamp",
                Field::new(CHIP_ADCDAC_CTRL, 0x0300, 0),
                2,
                Rule::Table {
                    codes: DAC_RAMP_CODES,
                },
                Clamp,
            ),
            Control::LineOutLevel(ch) => desc(
                match ch {
                    Channel::Left => "LineOutLevelLeft",
                    Channel::Right => "LineOutLevelRight",
                },
                stereo(ch, CHIP_LINE_OUT_VOL, 0x001F, 8),
                31,
                Rule::Inverted { top: 31 },
                Clamp,
            ),
            Control::HeadphoneSelect => desc(
                "HeadphoneSelect",
                Field::new(CHIP_ANA_CTRL, ANA_CTRL_SELECT_HP, 6),
                1,
                Rule::Flag { active_low: false },
                Clamp,
            ),
            Control::HeadphoneVolume(ch) => desc(
                match ch {
                    Channel::Left => "HeadphoneVolumeLeft",
                    Channel::Right => "HeadphoneVolumeRight",
                },
                stereo(ch, CHIP_ANA_HP_CTRL, 0x007F, 8),
                127,
                Rule::Inverted { top: 127 },
                Clamp,
            ),
            Control::MuteHeadphone => desc(
                "MuteHeadphone",
                Field::new(CHIP_ANA_CTRL, ANA_CTRL_MUTE_HP, 4),
                1,
                Rule::Flag { active_low: false },
                Clamp,
            ),
            Control::MuteLineOut => desc(
                "MuteLineOut",
                Field::new(CHIP_ANA_CTRL, ANA_CTRL_MUTE_LO, 8),
                1,
                Rule::Flag { active_low: false },
                Clamp,
            ),
            Control::AdcHighPassFilter => desc(
                "AdcHighPassFilter",
                Field::new(CHIP_ADCDAC_CTRL, 0x0003, 0),
                2,
                Rule::Table { codes: HPF_CODES },
                Clamp,
            ),
            Control::DapEnable => desc(
                "DapEnable",
                Field::new(CHIP_SSS_CTRL, SSS_ROUTING_MASK, 0),
                2,
                Rule::Table {
                    codes: DAP_ROUTING_CODES,
                },
                Reject,
            ),
            Control::AutoVolumeEnable => desc(
                "AutoVolumeEnable",
                Field::new(DAP_AVC_CTRL, AVC_CTRL_EN, 0),
                1,
                Rule::Flag { active_low: false },
                Clamp,
            ),
            Control::SurroundEnable => desc(
                "SurroundEnable",
                Field::new(DAP_SGTL_SURROUND, 0x0003, 0),
                2,
                Rule::Table {
                    codes: SURROUND_CODES,
                },
                Clamp,
            ),
            Control::SurroundWidth => desc(
                "SurroundWidth",
                Field::new(DAP_SGTL_SURROUND, 0x0070, 4),
                7,
                Rule::Linear,
                Clamp,
            ),
            Control::BassEnhanceEnable => desc(
                "BassEnhanceEnable",
                Field::new(DAP_BASS_ENHANCE, BASS_ENHANCE_EN, 0),
                1,
                Rule::Flag { active_low: false },
                Clamp,
            ),
            Control::BassEnhanceCutoffEnable => desc(
                "BassEnhanceCutoffEnable",
                Field::new(DAP_BASS_ENHANCE, BASS_ENHANCE_BYPASS_HPF, 8),
                1,
                Rule::Flag { active_low: true },
                Clamp,
            ),
            Control::BassEnhanceCutoff => desc(
                "BassEnhanceCutoff",
                Field::new(DAP_BASS_ENHANCE, 0x0070, 4),
                6,
                Rule::Linear,
                Clamp,
            ),
            Control::BassEnhanceBoost => desc(
                "BassEnhanceBoost",
                Field::new(DAP_BASS_ENHANCE_CTRL, 0x007F, 0),
                127,
                Rule::Inverted { top: 0x7F },
                Clamp,
            ),
            Control::BassEnhanceVolume => desc(
                "BassEnhanceVolume",
                Field::new(DAP_BASS_ENHANCE_CTRL, 0x3F00, 8),
                63,
                Rule::Inverted { top: 0x3F },
                Clamp,
            ),
            Control::EqSelect => desc(
                "EqSelect",
                Field::new(DAP_AUDIO_EQ, 0x0003, 0),
                3,
                Rule::Linear,
                Reject,
            ),
            Control::PeqFilterCount => desc(
                "PeqFilterCount",
                Field::new(DAP_PEQ, 0x0007, 0),
                7,
                Rule::Linear,
                Clamp,
            ),
            Control::EqBand(band) => desc(
                match band {
                    Band::Bass => "EqBand0",
                    Band::Band1 => "EqBand1",
                    Band::Band2 => "EqBand2",
                    Band::Band3 => "EqBand3",
                    Band::Treble => "EqBand4",
                },
                Field::new(band.register(), 0x007F, 0),
                95,
                Rule::Linear,
                Clamp,
            ),
        }
    }

    /// Diagnostic name.
    pub fn label(self) -> &'static str {
        self.descriptor().label
    }
}

impl Descriptor {
    /// Whether some raw field values decode to a public value that encodes
    /// back to a different raw value.
    pub fn is_lossy(&self) -> bool {
        let states = u32::from(self.field.raw_max()).saturating_add(1);
        let public = u32::from(self.max).saturating_add(1);
        match self.rule {
            Rule::Flag { .. } => false,
            Rule::Table { codes } => {
                let field_states = 1u32
                    .checked_shl(self.field.mask.count_ones())
                    .unwrap_or(u32::MAX);
                u32::try_from(codes.len()).map_or(true, |n| n < field_states)
            }
            Rule::Linear | Rule::Inverted { .. } | Rule::Offset { .. } => public < states,
        }
    }
}

/// Encode a public value for `control`.
///
/// # Errors
///
/// [`RangeError`] if `value` exceeds the maximum of a control whose policy
/// is [`RangePolicy::Reject`].
pub fn encode(control: Control, value: u8) -> Result<Encoded, RangeError> {
    let d = control.descriptor();
    let clamped = value > d.max;
    if clamped && d.policy == RangePolicy::Reject {
        return Err(RangeError {
            control: d.label,
            value,
            max: d.max,
        });
    }
    let value = value.min(d.max);
    let v = u16::from(value);
    let bits = match d.rule {
        Rule::Linear => d.field.place(v),
        Rule::Inverted { top } => d.field.place(top.saturating_sub(v)),
        Rule::Offset { base } => d.field.place(base.saturating_add(v)),
        // Table codes are pre-positioned in the register.
        Rule::Table { codes } => codes.get(usize::from(value)).copied().unwrap_or(0) & d.field.mask,
        Rule::Flag { active_low } => {
            if (value != 0) != active_low {
                d.field.mask
            } else {
                0
            }
        }
    };
    Ok(Encoded {
        register: d.field.register,
        mask: d.field.mask,
        bits,
        value,
        clamped,
    })
}

/// Decode a register value into `control`'s public domain.
pub fn decode(control: Control, register_value: u16) -> u8 {
    let d = control.descriptor();
    let public = match d.rule {
        Rule::Linear => d.field.extract(register_value),
        Rule::Inverted { top } => top.saturating_sub(d.field.extract(register_value)),
        Rule::Offset { base } => d.field.extract(register_value).saturating_sub(base),
        Rule::Table { codes } => {
            let raw = register_value & d.field.mask;
            codes
                .iter()
                .position(|&code| code & d.field.mask == raw)
                .and_then(|i| u16::try_from(i).ok())
                .unwrap_or(0)
        }
        Rule::Flag { active_low } => u16::from((register_value & d.field.mask != 0) != active_low),
    };
    u8::try_from(public).unwrap_or(u8::MAX).min(d.max)
}

/// Both channels of a stereo control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Stereo {
    /// Line-in analog gain.
    LineInLevel,
    /// DAC attenuation.
    DacVolume,
    /// Line-out level.
    LineOutLevel,
    /// Headphone level.
    HeadphoneVolume,
}

impl Stereo {
    /// The per-channel control.
    pub fn channel(self, channel: Channel) -> Control {
        match self {
            Stereo::LineInLevel => Control::LineInLevel(channel),
            Stereo::DacVolume => Control::DacVolume(channel),
            Stereo::LineOutLevel => Control::LineOutLevel(channel),
            Stereo::HeadphoneVolume => Control::HeadphoneVolume(channel),
        }
    }
}

/// Encode the same value into both channels as one masked write.
pub fn encode_stereo(control: Stereo, value: u8) -> Result<Encoded, RangeError> {
    let left = encode(control.channel(Channel::Left), value)?;
    let right = encode(control.channel(Channel::Right), value)?;
    Ok(Encoded {
        register: left.register,
        mask: left.mask | right.mask,
        bits: left.bits | right.bits,
        value: left.value,
        clamped: left.clamped,
    })
}
