//! Property-based tests for the register codec and EQ automation.

#![allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::arithmetic_side_effects)]

use embedded_hal_mock::eh1::delay::NoopDelay;
use platform::MockRegisterPort;
use proptest::prelude::*;
use sgtl5000::codec::{self, Control, RangePolicy};
use sgtl5000::registers::RESET_VALUES;
use sgtl5000::{Band, CcTarget, ClockConfig, Request, Sgtl5000, CC_TABLE};

/// Every readable control, taken from the CC table.
fn controls() -> Vec<Control> {
    CC_TABLE
        .iter()
        .filter_map(|entry| match entry.target {
            CcTarget::Control(control) => Some(control),
            _ => None,
        })
        .collect()
}

fn control_strategy() -> impl Strategy<Value = Control> {
    proptest::sample::select(controls())
}

/// Ordered pairs of clamping controls sharing a register.
fn neighbours() -> Vec<(Control, Control)> {
    let all: Vec<Control> = controls()
        .into_iter()
        .filter(|c| c.descriptor().policy == RangePolicy::Clamp && !matches!(c, Control::EqBand(_)))
        .collect();
    let mut pairs = Vec::new();
    for &a in &all {
        for &b in &all {
            let (fa, fb) = (a.descriptor().field, b.descriptor().field);
            if a != b && fa.register == fb.register && fa.mask & fb.mask == 0 {
                pairs.push((a, b));
            }
        }
    }
    pairs
}

fn enabled() -> Sgtl5000<MockRegisterPort> {
    let mut codec = Sgtl5000::new(MockRegisterPort::with_registers(RESET_VALUES));
    codec
        .enable(&ClockConfig::default(), &mut NoopDelay::new())
        .unwrap();
    codec
}

proptest! {
    /// Whatever encode produces decodes back to the encoded value.
    #[test]
    fn encode_then_decode_returns_encoded_value(control in control_strategy(), value in 0u8..=127) {
        if let Ok(encoded) = codec::encode(control, value) {
            prop_assert_eq!(codec::decode(control, encoded.bits), encoded.value);
            prop_assert!(encoded.value <= control.descriptor().max);
            prop_assert_eq!(encoded.bits & !encoded.mask, 0);
        }
    }

    /// Any raw register content decodes into range, and re-encoding the
    /// decoded value is stable.
    #[test]
    fn decode_of_arbitrary_register_is_stable(control in control_strategy(), raw in any::<u16>()) {
        let decoded = codec::decode(control, raw);
        prop_assert!(decoded <= control.descriptor().max);
        let once = codec::encode(control, decoded).unwrap();
        let twice = codec::encode(control, codec::decode(control, once.bits)).unwrap();
        prop_assert_eq!(once.bits, twice.bits);
    }

    /// Non-lossy controls map raw fields one-to-one.
    #[test]
    fn non_lossy_controls_round_trip_raw_fields(control in control_strategy(), raw in any::<u16>()) {
        let d = control.descriptor();
        prop_assume!(!d.is_lossy());
        let field_bits = raw & d.field.mask;
        let encoded = codec::encode(control, codec::decode(control, field_bits)).unwrap();
        prop_assert_eq!(encoded.bits, field_bits);
    }

    /// Out-of-range input is clamped or rejected, never wrapped.
    #[test]
    fn out_of_range_follows_policy(control in control_strategy(), value in any::<u8>()) {
        let d = control.descriptor();
        prop_assume!(value > d.max);
        match (codec::encode(control, value), d.policy) {
            (Ok(encoded), RangePolicy::Clamp) => {
                prop_assert_eq!(encoded.value, d.max);
                prop_assert!(encoded.clamped);
            }
            (Err(err), RangePolicy::Reject) => prop_assert_eq!(err.value, value),
            (result, policy) => prop_assert!(false, "{:?} under {:?}", result, policy),
        }
    }

    /// Writing one control never disturbs another control in the same
    /// register.
    #[test]
    fn writes_leave_neighbour_fields_alone(
        (a, b) in proptest::sample::select(neighbours()),
        va in 0u8..=127,
        vb in 0u8..=127,
    ) {
        let mut codec = enabled();
        codec.set_control(a, va).unwrap();
        let before = codec.get_control(a).unwrap();
        codec.set_control(b, vb).unwrap();
        prop_assert_eq!(codec.get_control(a).unwrap(), before);
    }

    /// A ramp moves monotonically toward its target, at most two units per
    /// tick, and arrives in ceil(distance / 2) ticks.
    #[test]
    fn ramps_are_monotonic_and_bounded(band in 0u8..5, start in 0u8..=95, target in 0u8..=95) {
        let mut codec = enabled();
        codec.set_eq_band(band, start, true).unwrap();
        let request = codec.set_eq_band(band, target, false).unwrap();
        prop_assert_eq!(request == Request::Unchanged, start == target);

        let register = Band::new(band).unwrap().register();
        codec.port_mut().clear_log();
        let mut ticks = 0u32;
        while codec.any_pending() {
            prop_assert!(ticks < 100);
            codec.advance().unwrap();
            ticks += 1;
        }
        let steps = codec.port().writes_to(register);
        prop_assert_eq!(ticks, u32::from(start.abs_diff(target)).div_ceil(2));
        prop_assert_eq!(steps.len(), ticks as usize);

        let mut previous = u16::from(start);
        for step in steps {
            prop_assert!(step.abs_diff(previous) <= 2);
            prop_assert_eq!(step > previous, target > start);
            previous = step;
        }
        prop_assert_eq!(previous, u16::from(target));
        prop_assert_eq!(codec.get_eq_band(band).unwrap(), target);
    }

    /// Retargeting mid-ramp never overshoots the newest target.
    #[test]
    fn retarget_mid_ramp_settles_on_latest(
        first in 0u8..=95,
        second in 0u8..=95,
        ticks_before in 0usize..10,
    ) {
        let mut codec = enabled();
        codec.set_eq_band(3, first, false).unwrap();
        for _ in 0..ticks_before {
            codec.advance().unwrap();
        }
        codec.set_eq_band(3, second, false).unwrap();
        while codec.any_pending() {
            codec.advance().unwrap();
        }
        prop_assert_eq!(codec.get_eq_band(3).unwrap(), second);
    }
}
