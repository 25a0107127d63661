//! CC routing against a simulated chip.

#![allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::arithmetic_side_effects)]

use embedded_hal_mock::eh1::delay::NoopDelay;
use platform::{MockBusError, MockRegisterPort};
use sgtl5000::registers::*;
use sgtl5000::{CcReading, CcTarget, ClockConfig, CodecError, CodecSettings, Sgtl5000, CC_TABLE};

fn enabled() -> Sgtl5000<MockRegisterPort> {
    let mut codec = Sgtl5000::new(MockRegisterPort::with_registers(RESET_VALUES));
    codec
        .enable(&ClockConfig::default(), &mut NoopDelay::new())
        .unwrap();
    codec.port_mut().clear_log();
    codec
}

#[test]
fn every_cc_number_has_a_defined_reading() {
    let mut codec = enabled();
    for cc in 0..=u8::MAX {
        let legacy = codec.query(cc).unwrap().to_legacy();
        match cc {
            22 | 25 | 29 | 33 | 55 => assert_eq!(legacy, 255, "CC {cc}"),
            20..=55 => assert!((0..=127).contains(&legacy), "CC {cc} = {legacy}"),
            _ => assert_eq!(legacy, -1, "CC {cc}"),
        }
    }
    assert!(codec.port().writes().is_empty());
}

#[test]
fn write_only_entries_match_the_table() {
    for entry in &CC_TABLE {
        let write_only = matches!(entry.target, CcTarget::Stereo(_) | CcTarget::SetDefaults);
        assert_eq!(entry.is_readable(), !write_only, "{}", entry.label);
    }
}

#[test]
fn readable_controls_read_back_what_dispatch_wrote() {
    let mut codec = enabled();
    let cases: &[(u8, u8)] = &[
        (20, 1),   // Input: microphone
        (21, 2),   // MicGain: 30 dB
        (23, 9),   // LineInLevelLeft
        (27, 40),  // DacVolumeRight
        (28, 1),   // DacVolumeRamp: linear
        (30, 18),  // LineOutLevelLeft
        (32, 1),   // HeadphoneSelect: line-in bypass
        (35, 103), // HeadphoneVolumeRight: 0 dB
        (37, 1),   // MuteLineOut
        (38, 2),   // AdcHighPassFilter: bypassed
        (39, 1),   // DapEnable: pre
        (40, 1),   // AutoVolumeEnable
        (41, 1),   // SurroundEnable: mono
        (42, 6),   // SurroundWidth
        (43, 1),   // BassEnhanceEnable
        (44, 0),   // BassEnhanceCutoffEnable
        (45, 3),   // BassEnhanceCutoff
        (46, 100), // BassEnhanceBoost
        (47, 40),  // BassEnhanceVolume
        (48, 3),   // EqSelect: graphic
        (54, 5),   // PeqFilterCount
    ];
    for &(cc, value) in cases {
        codec.dispatch(cc, value).unwrap();
        assert_eq!(codec.query(cc).unwrap(), CcReading::Value(value), "CC {cc}");
    }
}

#[test]
fn out_of_range_values_clamp_to_control_maximum() {
    let mut codec = enabled();
    codec.dispatch(21, 127).unwrap();
    assert_eq!(codec.query(21).unwrap(), CcReading::Value(3));
    codec.dispatch(42, 255).unwrap();
    assert_eq!(codec.query(42).unwrap(), CcReading::Value(7));
}

#[test]
fn rejecting_controls_leave_the_chip_alone() {
    let mut codec = enabled();
    for (cc, value) in [(39, 3), (48, 4), (48, 127)] {
        assert!(matches!(
            codec.dispatch(cc, value),
            Err(CodecError::OutOfRange { .. })
        ));
    }
    assert!(codec.port().writes().is_empty());
}

#[test]
fn dispatch_surfaces_write_failures() {
    let mut codec = enabled();
    codec.port_mut().fail_writes_to(Some(CHIP_DAC_VOL));
    for (cc, value) in [(25, 20), (26, 20), (27, 20)] {
        assert_eq!(
            codec.dispatch(cc, value),
            Err(CodecError::Transport(MockBusError::WriteFailed)),
            "CC {cc}"
        );
    }
    assert_eq!(codec.port().peek(CHIP_DAC_VOL), 0x3C3C);
    assert_eq!(codec.query(26).unwrap(), CcReading::Value(0));

    // Other registers are unaffected.
    codec.dispatch(21, 2).unwrap();
    assert_eq!(codec.query(21).unwrap(), CcReading::Value(2));
}

#[test]
fn shared_register_neighbours_survive() {
    let mut codec = enabled();
    codec.dispatch(41, 2).unwrap(); // SurroundEnable: stereo
    codec.dispatch(42, 1).unwrap(); // SurroundWidth
    assert_eq!(codec.query(41).unwrap(), CcReading::Value(2));
    codec.dispatch(26, 20).unwrap(); // DacVolumeLeft
    assert_eq!(codec.query(27).unwrap(), CcReading::Value(0));
    assert_eq!(codec.port().peek(CHIP_DAC_VOL), 0x3C50);
}

#[test]
fn mute_flags_track_dispatch() {
    let mut codec = enabled();
    assert!(codec.state().headphone_muted);
    codec.dispatch(36, 0).unwrap();
    assert!(!codec.state().headphone_muted);
    codec.dispatch(37, 1).unwrap();
    assert!(codec.state().line_out_muted);
    assert_eq!(codec.query(36).unwrap(), CcReading::Value(0));
}

#[test]
fn eq_band_dispatch_ramps_to_target() {
    let mut codec = enabled();
    codec.dispatch(49, 95).unwrap();
    let mut ticks = 0;
    while codec.any_pending() {
        codec.advance().unwrap();
        ticks += 1;
    }
    // 47 → 95 in 0.5 dB steps.
    assert_eq!(ticks, 24);
    assert_eq!(codec.query(49).unwrap(), CcReading::Value(95));
}

#[test]
fn set_defaults_trigger_applies_default_settings() {
    let mut codec = enabled();
    codec.dispatch(34, 10).unwrap();
    codec.dispatch(55, 127).unwrap();
    assert_eq!(codec.capture_settings().unwrap(), CodecSettings::default());
}

#[test]
fn dump_is_side_effect_free() {
    let mut codec = enabled();
    codec.dispatch(50, 80).unwrap();
    codec.port_mut().clear_log();
    let lines = codec.dump();
    assert_eq!(lines.len(), CC_TABLE.len());
    assert!(codec.port().writes().is_empty());
    assert!(codec.any_pending());
    assert_eq!(lines[0].cc, 20);
    assert_eq!(lines[2].reading, Ok(CcReading::WriteOnly));
}

#[cfg(feature = "tracing")]
#[test]
fn log_dump_emits_through_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
    let mut codec = enabled();
    codec.log_dump("test");
    assert!(codec.port().writes().is_empty());
}
