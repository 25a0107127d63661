//! MIDI-style CC routing.
//!
//! [`CC_TABLE`] is a static, total map from controller number to control.
//! CC numbers 20..=55 are assigned; everything else is unknown. Stereo
//! entries and the defaults trigger can only be written.

use platform::{ControlValue, RegisterPort};

use crate::codec::{Band, Channel, Control, Stereo};
use crate::driver::Sgtl5000;
use crate::error::CodecError;

/// Number of mapped CC numbers.
pub const CC_COUNT: usize = 36;

/// What a CC number drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CcTarget {
    /// A single readable control.
    Control(Control),
    /// Both channels of a stereo control; write-only.
    Stereo(Stereo),
    /// Apply the default settings; write-only, the value is ignored.
    SetDefaults,
}

/// One row of [`CC_TABLE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CcEntry {
    /// Controller number.
    pub cc: u8,
    /// Diagnostic name.
    pub label: &'static str,
    /// Routed control.
    pub target: CcTarget,
}

impl CcEntry {
    /// Whether [`Sgtl5000::query`] can report a value for this entry.
    pub fn is_readable(&self) -> bool {
        matches!(self.target, CcTarget::Control(_))
    }
}

const fn control(cc: u8, label: &'static str, control: Control) -> CcEntry {
    CcEntry {
        cc,
        label,
        target: CcTarget::Control(control),
    }
}

const fn stereo(cc: u8, label: &'static str, stereo: Stereo) -> CcEntry {
    CcEntry {
        cc,
        label,
        target: CcTarget::Stereo(stereo),
    }
}

use Channel::{Left, Right};

/// Every mapped CC number, ascending.
pub static CC_TABLE: [CcEntry; CC_COUNT] = [
    control(20, "Input", Control::Input),
    control(21, "MicGain", Control::MicGain),
    stereo(22, "LineInLevel", Stereo::LineInLevel),
    control(23, "LineInLevelLeft", Control::LineInLevel(Left)),
    control(24, "LineInLevelRight", Control::LineInLevel(Right)),
    stereo(25, "DacVolume", Stereo::DacVolume),
    control(26, "DacVolumeLeft", Control::DacVolume(Left)),
    control(27, "DacVolumeRight", Control::DacVolume(Right)),
    control(28, "DacVolumeRamp", Control::DacVolumeRamp),
    stereo(29, "LineOutLevel", Stereo::LineOutLevel),
    control(30, "LineOutLevelLeft", Control::LineOutLevel(Left)),
    control(31, "LineOutLevelRight", Control::LineOutLevel(Right)),
    control(32, "HeadphoneSelect", Control::HeadphoneSelect),
    stereo(33, "HeadphoneVolume", Stereo::HeadphoneVolume),
    control(34, "HeadphoneVolumeLeft", Control::HeadphoneVolume(Left)),
    control(35, "HeadphoneVolumeRight", Control::HeadphoneVolume(Right)),
    control(36, "MuteHeadphone", Control::MuteHeadphone),
    control(37, "MuteLineOut", Control::MuteLineOut),
    control(38, "AdcHighPassFilter", Control::AdcHighPassFilter),
    control(39, "DapEnable", Control::DapEnable),
    control(40, "AutoVolumeEnable", Control::AutoVolumeEnable),
    control(41, "SurroundEnable", Control::SurroundEnable),
    control(42, "SurroundWidth", Control::SurroundWidth),
    control(43, "BassEnhanceEnable", Control::BassEnhanceEnable),
    control(44, "BassEnhanceCutoffEnable", Control::BassEnhanceCutoffEnable),
    control(45, "BassEnhanceCutoff", Control::BassEnhanceCutoff),
    control(46, "BassEnhanceBoost", Control::BassEnhanceBoost),
    control(47, "BassEnhanceVolume", Control::BassEnhanceVolume),
    control(48, "EqSelect", Control::EqSelect),
    control(49, "EqBand0", Control::EqBand(Band::Bass)),
    control(50, "EqBand1", Control::EqBand(Band::Band1)),
    control(51, "EqBand2", Control::EqBand(Band::Band2)),
    control(52, "EqBand3", Control::EqBand(Band::Band3)),
    control(53, "EqBand4", Control::EqBand(Band::Treble)),
    control(54, "PeqFilterCount", Control::PeqFilterCount),
    CcEntry {
        cc: 55,
        label: "SetDefaults",
        target: CcTarget::SetDefaults,
    },
];

/// The entry for `cc`, if mapped.
pub fn lookup(cc: u8) -> Option<&'static CcEntry> {
    CC_TABLE.iter().find(|entry| entry.cc == cc)
}

/// Result of [`Sgtl5000::query`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CcReading {
    /// Decoded current value.
    Value(u8),
    /// Mapped, but has no meaningful read.
    WriteOnly,
    /// Not mapped.
    Unknown,
}

impl CcReading {
    /// Integer form for hosts that expect one number per CC: the value,
    /// 255 for write-only, -1 for unknown.
    pub fn to_legacy(self) -> i16 {
        match self {
            CcReading::Value(value) => i16::from(value),
            CcReading::WriteOnly => 255,
            CcReading::Unknown => -1,
        }
    }
}

/// One line of [`Sgtl5000::dump`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpEntry<E> {
    /// Controller number.
    pub cc: u8,
    /// Diagnostic name.
    pub label: &'static str,
    /// Reading, or the transport error that prevented it.
    pub reading: Result<CcReading, E>,
}

impl<P: RegisterPort> Sgtl5000<P> {
    /// Route a CC message to its control.
    ///
    /// `value` is clamped to 0..=127 first, then handled by the control's
    /// own range policy. An unmapped `cc` fails with
    /// [`CodecError::UnknownControl`] without touching the chip.
    pub fn dispatch(&mut self, cc: u8, value: u8) -> Result<(), CodecError<P::Error>> {
        let Some(entry) = lookup(cc) else {
            debug!("CC {} is not mapped", cc);
            return Err(CodecError::UnknownControl(cc));
        };
        let value = ControlValue::new(value).get();
        trace!("CC {} {} <- {}", cc, entry.label, value);
        match entry.target {
            CcTarget::Control(control) => self.set_control(control, value).map(|_| ()),
            CcTarget::Stereo(stereo) => self.set_stereo(stereo, value).map(|_| ()),
            CcTarget::SetDefaults => self.set_defaults(),
        }
    }

    /// Current value behind `cc`.
    ///
    /// EQ bands report the register, not a ramp target. Only a transport
    /// failure is an error; unmapped and write-only CCs are readings.
    pub fn query(&mut self, cc: u8) -> Result<CcReading, CodecError<P::Error>> {
        match lookup(cc).map(|entry| entry.target) {
            None => Ok(CcReading::Unknown),
            Some(CcTarget::Control(control)) => self.get_control(control).map(CcReading::Value),
            Some(CcTarget::Stereo(_) | CcTarget::SetDefaults) => Ok(CcReading::WriteOnly),
        }
    }

    /// Read every mapped CC. Only reads; a failed read is kept in its entry
    /// and the walk continues.
    pub fn dump(&mut self) -> heapless::Vec<DumpEntry<P::Error>, CC_COUNT> {
        let mut entries = heapless::Vec::new();
        for entry in &CC_TABLE {
            let reading = match self.query(entry.cc) {
                Ok(reading) => Ok(reading),
                Err(CodecError::Transport(err)) => Err(err),
                Err(_) => Ok(CcReading::Unknown),
            };
            let line = DumpEntry {
                cc: entry.cc,
                label: entry.label,
                reading,
            };
            if entries.push(line).is_err() {
                break;
            }
        }
        entries
    }

    /// [`dump`](Self::dump) to the log, one line per CC, tagged with
    /// `context`.
    pub fn log_dump(&mut self, context: &str) {
        info!("{}: SGTL5000 controls", context);
        for line in self.dump() {
            match line.reading {
                Ok(CcReading::Value(value)) => {
                    info!("  CC {} {} = {}", line.cc, line.label, value);
                }
                Ok(CcReading::WriteOnly) => {
                    info!("  CC {} {} (write-only)", line.cc, line.label);
                }
                Ok(CcReading::Unknown) => {}
                Err(_) => warn!("  CC {} {} read failed", line.cc, line.label),
            }
        }
    }
}
