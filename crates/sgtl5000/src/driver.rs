//! SGTL5000 driver instance.
//!
//! [`Sgtl5000`] owns the register port, the device state and the EQ
//! automation. Every operation goes through `&mut self`, so register I/O
//! is serialized by construction.

use core::sync::atomic::AtomicBool;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use platform::{I2cAddress, I2cRegisterPort, RegisterPort};

use crate::automation::{Automation, Request};
use crate::biquad::{self, BiquadCoefficients, FilterSpec, DEFAULT_QUANTIZATION_UNIT};
use crate::clock::{ClockConfig, ClockMode, PllDivisors, SampleRate};
use crate::codec::{self, Band, Control, Encoded, Stereo};
use crate::error::CodecError;
use crate::registers::*;
use crate::settings::{AutoVolumeConfig, CodecSettings, AVC_CTRL_CONFIG_MASK};

/// Number of parametric EQ filters.
pub const PEQ_FILTERS: u8 = 7;

/// Mutable device state held alongside the port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceState {
    /// Bus address in use when the port is I²C; `None` for other ports.
    pub address: Option<I2cAddress>,
    /// Last value written to `CHIP_ANA_CTRL`, which packs the input
    /// selector, headphone source, mutes and zero-cross enables. `None`
    /// until first read or written.
    pub ana_ctrl: Option<u16>,
    /// Headphone output muted.
    pub headphone_muted: bool,
    /// Line output muted.
    pub line_out_muted: bool,
    /// [`Sgtl5000::enable`] completed.
    pub enabled: bool,
    /// Rate programmed at enable; used for filter synthesis.
    pub sample_rate: SampleRate,
}

/// SGTL5000 codec driver.
pub struct Sgtl5000<P> {
    port: P,
    state: DeviceState,
    automation: Automation,
}

type Result<T, P> = core::result::Result<T, CodecError<<P as RegisterPort>::Error>>;

impl<I: I2c> Sgtl5000<I2cRegisterPort<I>> {
    /// Driver on an I²C bus at `address`.
    pub fn new_i2c(i2c: I, address: I2cAddress) -> Self {
        let mut driver = Self::new(I2cRegisterPort::new(i2c, address));
        driver.state.address = Some(address);
        driver
    }

    /// Talk to the chip at the `CTRL_ADR0_CS`-high address.
    pub fn set_alt_address(&mut self) {
        self.port.set_address(I2cAddress::Alternate);
        self.state.address = Some(I2cAddress::Alternate);
    }
}

impl<P: RegisterPort> Sgtl5000<P> {
    /// Driver over any register port. Nothing is sent until
    /// [`enable`](Self::enable).
    pub fn new(port: P) -> Self {
        Self {
            port,
            state: DeviceState::default(),
            automation: Automation::new(),
        }
    }

    /// Like [`new`](Self::new), mirroring "automation in progress" into
    /// `busy` for readers outside the owning task.
    pub fn with_busy_flag(port: P, busy: &'static AtomicBool) -> Self {
        Self {
            port,
            state: DeviceState::default(),
            automation: Automation::with_busy_flag(busy),
        }
    }

    /// Current device state.
    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    /// EQ automation state.
    pub fn automation(&self) -> &Automation {
        &self.automation
    }

    /// Borrow the port.
    pub fn port(&self) -> &P {
        &self.port
    }

    /// Borrow the port mutably. Writes made through it bypass the
    /// `ANA_CTRL` shadow and the automation slots.
    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    /// Give the port back.
    pub fn release(self) -> P {
        self.port
    }

    // ── Register access ─────────────────────────────────────────────────────

    fn read(&mut self, register: u16) -> Result<u16, P> {
        self.port.read_register(register).map_err(|e| {
            warn!("read {:#x} failed", register);
            CodecError::Transport(e)
        })
    }

    fn write(&mut self, register: u16, value: u16) -> Result<(), P> {
        trace!("write {:#x} = {:#x}", register, value);
        self.port.write_register(register, value).map_err(|e| {
            warn!("write {:#x} failed", register);
            CodecError::Transport(e)
        })
    }

    fn modify(&mut self, register: u16, mask: u16, bits: u16) -> Result<u16, P> {
        if register == CHIP_ANA_CTRL {
            return self.modify_ana_ctrl(mask, bits);
        }
        trace!("modify {:#x} mask {:#x} bits {:#x}", register, mask, bits);
        self.port.modify_register(register, mask, bits).map_err(|e| {
            warn!("modify {:#x} failed", register);
            CodecError::Transport(e)
        })
    }

    /// Read-modify-write against the shadow, reading the chip only when no
    /// shadow exists yet.
    fn modify_ana_ctrl(&mut self, mask: u16, bits: u16) -> Result<u16, P> {
        let current = match self.state.ana_ctrl {
            Some(value) => value,
            None => self.read(CHIP_ANA_CTRL)?,
        };
        let value = (current & !mask) | (bits & mask);
        self.write(CHIP_ANA_CTRL, value)?;
        self.set_ana_ctrl_shadow(value);
        Ok(value)
    }

    fn set_ana_ctrl_shadow(&mut self, value: u16) {
        self.state.ana_ctrl = Some(value);
        self.state.headphone_muted = value & ANA_CTRL_MUTE_HP != 0;
        self.state.line_out_muted = value & ANA_CTRL_MUTE_LO != 0;
    }

    fn apply(&mut self, encoded: &Encoded) -> Result<u16, P> {
        self.modify(encoded.register, encoded.mask, encoded.bits)
    }

    // ── Enable ──────────────────────────────────────────────────────────────

    /// Power up and configure the chip.
    ///
    /// Checks `CHIP_ID`, powers the analog and digital blocks, waits for
    /// the analog references to settle, programs clocking and the I2S
    /// format, routes I2S in to the DAC at 0 dB and leaves the headphone
    /// muted at its lowest level. Finally reads the EQ band registers into
    /// the automation slots.
    pub fn enable(&mut self, clock: &ClockConfig, delay: &mut impl DelayNs) -> Result<(), P> {
        info!("enabling SGTL5000 at {} Hz", clock.rate.hz());
        self.state.enabled = false;

        let id = self.read(CHIP_ID)?;
        if id & CHIP_ID_PARTID_MASK != CHIP_ID_PARTID_SGTL5000 {
            warn!("CHIP_ID {:#x} is not an SGTL5000", id);
            return Err(CodecError::WrongChip(id));
        }

        let pll = match clock.mode {
            ClockMode::Slave => None,
            ClockMode::Master { mclk_hz, pll_hz } => {
                Some(PllDivisors::new(mclk_hz, pll_hz).ok_or(CodecError::InvalidClock)?)
            }
        };

        self.write(CHIP_ANA_POWER, ANA_POWER_STARTUP)?;
        self.write(CHIP_LINREG_CTRL, LINREG_STARTUP)?;
        self.write(CHIP_REF_CTRL, REF_CTRL_STARTUP)?;
        self.write(CHIP_LINE_OUT_CTRL, LINE_OUT_CTRL_STARTUP)?;
        self.write(CHIP_SHORT_CTRL, SHORT_CTRL_STARTUP)?;
        self.write(CHIP_ANA_CTRL, ANA_CTRL_STARTUP)?;
        self.set_ana_ctrl_shadow(ANA_CTRL_STARTUP);

        let mut ana_power = ANA_POWER_RUNNING;
        let mut i2s_ctrl = I2S_CTRL_16BIT_I2S;
        if let Some(pll) = pll {
            debug!("PLL int {} frac {}", pll.integer, pll.fractional);
            self.write(CHIP_CLK_TOP_CTRL, pll.clk_top_ctrl)?;
            self.write(CHIP_PLL_CTRL, pll.pll_ctrl())?;
            ana_power |= ANA_POWER_PLL_POWERUP | ANA_POWER_VCOAMP_POWERUP;
            i2s_ctrl |= I2S_CTRL_MASTER;
        }
        self.write(CHIP_ANA_POWER, ana_power)?;
        self.write(CHIP_DIG_POWER, DIG_POWER_RUNNING)?;

        delay.delay_ms(POWER_UP_SETTLE_MS);

        self.write(CHIP_LINE_OUT_VOL, LINE_OUT_VOL_STARTUP)?;
        self.write(CHIP_CLK_CTRL, clock.clk_ctrl())?;
        self.write(CHIP_I2S_CTRL, i2s_ctrl)?;
        self.write(CHIP_SSS_CTRL, SSS_DAP_DISABLED)?;
        self.write(CHIP_ADCDAC_CTRL, 0x0000)?;
        self.write(CHIP_DAC_VOL, DAC_VOL_0DB)?;
        self.write(CHIP_ANA_HP_CTRL, HP_VOL_MIN)?;
        self.write(CHIP_ANA_CTRL, ANA_CTRL_RUNNING)?;
        self.set_ana_ctrl_shadow(ANA_CTRL_RUNNING);

        self.automation
            .sync_from_device(&mut self.port)
            .map_err(CodecError::Transport)?;

        self.state.sample_rate = clock.rate;
        self.state.enabled = true;
        info!("SGTL5000 enabled");
        Ok(())
    }

    // ── Controls ────────────────────────────────────────────────────────────

    /// Set one control to a public value.
    ///
    /// Out-of-range values are clamped or rejected per the control's
    /// policy. [`Control::EqBand`] requests are ramped by the automation;
    /// everything else is written at once. Returns the value actually
    /// applied.
    pub fn set_control(&mut self, control: Control, value: u8) -> Result<u8, P> {
        match control {
            Control::EqBand(band) => {
                let applied = codec::encode(control, value)?.value;
                self.request_band(band, applied, false)?;
                Ok(applied)
            }
            Control::DapEnable => self.set_dap_enable(value),
            _ => {
                let encoded = codec::encode(control, value)?;
                if encoded.clamped {
                    debug!("{} clamped {} -> {}", control.label(), value, encoded.value);
                }
                self.apply(&encoded)?;
                Ok(encoded.value)
            }
        }
    }

    /// Read one control back from the chip.
    ///
    /// A failed read is an error, never a zero.
    pub fn get_control(&mut self, control: Control) -> Result<u8, P> {
        let register = control.descriptor().field.register;
        let raw = self.read(register)?;
        Ok(codec::decode(control, raw))
    }

    /// Set both channels of a stereo control in one register write.
    pub fn set_stereo(&mut self, control: Stereo, value: u8) -> Result<u8, P> {
        let encoded = codec::encode_stereo(control, value)?;
        self.apply(&encoded)?;
        Ok(encoded.value)
    }

    /// Route the DAP: 0 off, 1 before I2S out, 2 after I2S in.
    ///
    /// Enabling powers the DAP before switching the route to it; disabling
    /// switches the route away before powering it down.
    pub fn set_dap_enable(&mut self, value: u8) -> Result<u8, P> {
        let encoded = codec::encode(Control::DapEnable, value)?;
        if encoded.value == 0 {
            self.apply(&encoded)?;
            self.modify(DAP_CONTROL, DAP_CONTROL_DAP_EN, 0)?;
        } else {
            self.modify(DAP_CONTROL, DAP_CONTROL_DAP_EN, DAP_CONTROL_DAP_EN)?;
            self.apply(&encoded)?;
        }
        Ok(encoded.value)
    }

    /// Mute or unmute the headphone amplifier.
    pub fn mute_headphone(&mut self, mute: bool) -> Result<(), P> {
        self.set_control(Control::MuteHeadphone, u8::from(mute)).map(|_| ())
    }

    /// Mute or unmute the line output.
    pub fn mute_line_out(&mut self, mute: bool) -> Result<(), P> {
        self.set_control(Control::MuteLineOut, u8::from(mute)).map(|_| ())
    }

    // ── EQ bands ────────────────────────────────────────────────────────────

    /// Set graphic EQ / tone band `band` (0..=4) to `value` (0..=95).
    ///
    /// Without `force` the band ramps there through [`advance`](Self::advance);
    /// with `force` it is written at once and any ramp is dropped.
    pub fn set_eq_band(&mut self, band: u8, value: u8, force: bool) -> Result<Request, P> {
        let band = Band::new(band).ok_or(CodecError::InvalidBand(band))?;
        let applied = codec::encode(Control::EqBand(band), value)?.value;
        self.request_band(band, applied, force)
    }

    /// Current band register value, independent of any ramp in flight.
    pub fn get_eq_band(&mut self, band: u8) -> Result<u8, P> {
        let band = Band::new(band).ok_or(CodecError::InvalidBand(band))?;
        self.get_control(Control::EqBand(band))
    }

    fn request_band(&mut self, band: Band, value: u8, force: bool) -> Result<Request, P> {
        self.automation
            .request_target(&mut self.port, band, value, force)
            .map_err(CodecError::Transport)
    }

    /// Move every ramping EQ band one 0.5 dB step.
    ///
    /// Call periodically after [`enable`](Self::enable) while
    /// [`any_pending`](Self::any_pending). Returns the number of register
    /// writes; a transport failure leaves the affected bands pending for
    /// the next call.
    pub fn advance(&mut self) -> Result<usize, P> {
        self.automation
            .advance(&mut self.port)
            .map_err(CodecError::Transport)
    }

    /// Any EQ band still ramping.
    pub fn any_pending(&self) -> bool {
        self.automation.any_pending()
    }

    // ── Parametric EQ ───────────────────────────────────────────────────────

    /// Load coefficients into parametric filter `index` (0..=6).
    pub fn write_peq_filter(&mut self, index: u8, coefficients: &BiquadCoefficients) -> Result<(), P> {
        if index >= PEQ_FILTERS {
            return Err(CodecError::InvalidFilter(index));
        }
        for ((msb_reg, lsb_reg), (msb, lsb)) in COEF_WR_REGISTERS
            .into_iter()
            .zip(coefficients.register_words())
        {
            self.write(msb_reg, msb)?;
            self.write(lsb_reg, lsb)?;
        }
        self.write(DAP_FILTER_COEF_ACCESS, FILTER_COEF_ACCESS_WR | u16::from(index))?;
        debug!("PEQ filter {} loaded", index);
        Ok(())
    }

    /// Synthesize `spec` at the enabled sample rate and load it into
    /// filter `index`. Returns the coefficients written.
    pub fn configure_peq_filter(&mut self, index: u8, spec: &FilterSpec) -> Result<BiquadCoefficients, P> {
        if index >= PEQ_FILTERS {
            return Err(CodecError::InvalidFilter(index));
        }
        let coefficients =
            biquad::synthesize(spec, self.state.sample_rate.hz(), DEFAULT_QUANTIZATION_UNIT)?;
        self.write_peq_filter(index, &coefficients)?;
        Ok(coefficients)
    }

    // ── Auto volume ─────────────────────────────────────────────────────────

    /// Program the auto volume compressor / limiter. Does not enable it;
    /// use [`Control::AutoVolumeEnable`].
    pub fn configure_auto_volume(&mut self, config: &AutoVolumeConfig) -> Result<(), P> {
        let regs = config.registers(self.state.sample_rate.hz());
        self.write(DAP_AVC_THRESHOLD, regs.threshold)?;
        self.write(DAP_AVC_ATTACK, regs.attack)?;
        self.write(DAP_AVC_DECAY, regs.decay)?;
        self.modify(DAP_AVC_CTRL, AVC_CTRL_CONFIG_MASK, regs.ctrl_bits)?;
        Ok(())
    }

    // ── Settings ────────────────────────────────────────────────────────────

    /// Apply every setting. EQ bands are forced, not ramped. Stops at the
    /// first failure.
    pub fn apply_settings(&mut self, settings: &CodecSettings) -> Result<(), P> {
        for (control, value) in settings.entries() {
            match control {
                Control::EqBand(band) => {
                    let applied = codec::encode(control, value)?.value;
                    self.request_band(band, applied, true)?;
                }
                _ => {
                    self.set_control(control, value)?;
                }
            }
        }
        info!("settings applied");
        Ok(())
    }

    /// Read every setting back from the chip.
    pub fn capture_settings(&mut self) -> Result<CodecSettings, P> {
        let mut settings = CodecSettings::default();
        for (control, _) in CodecSettings::default().entries() {
            let value = self.get_control(control)?;
            settings.set(control, value);
        }
        Ok(settings)
    }

    /// Apply [`CodecSettings::default`].
    pub fn set_defaults(&mut self) -> Result<(), P> {
        self.apply_settings(&CodecSettings::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use platform::{MockBusError, MockRegisterPort};

    fn enabled() -> Sgtl5000<MockRegisterPort> {
        let mut codec = Sgtl5000::new(MockRegisterPort::with_registers(RESET_VALUES));
        codec
            .enable(&ClockConfig::default(), &mut NoopDelay::new())
            .unwrap();
        codec.port_mut().clear_log();
        codec
    }

    #[test]
    fn test_enable_rejects_wrong_chip() {
        let mut port = MockRegisterPort::with_registers(RESET_VALUES);
        port.preset(CHIP_ID, 0x1234);
        let mut codec = Sgtl5000::new(port);
        let err = codec
            .enable(&ClockConfig::default(), &mut NoopDelay::new())
            .unwrap_err();
        assert_eq!(err, CodecError::WrongChip(0x1234));
        assert!(codec.port().writes().is_empty());
    }

    #[test]
    fn test_enable_leaves_headphone_muted() {
        let codec = enabled();
        assert!(codec.state().enabled);
        assert!(codec.state().headphone_muted);
        assert!(!codec.state().line_out_muted);
        assert_eq!(codec.state().ana_ctrl, Some(ANA_CTRL_RUNNING));
    }

    #[test]
    fn test_ana_ctrl_uses_shadow_not_reads() {
        let mut codec = enabled();
        codec.mute_headphone(false).unwrap();
        codec.set_control(Control::Input, 1).unwrap();
        assert_eq!(codec.port().read_count(), 0);
        assert_eq!(
            codec.port().writes_to(CHIP_ANA_CTRL),
            vec![0x0026, 0x0022]
        );
        assert!(!codec.state().headphone_muted);
    }

    #[test]
    fn test_ana_ctrl_reads_once_before_enable() {
        let mut codec = Sgtl5000::new(MockRegisterPort::with_registers(RESET_VALUES));
        codec.mute_line_out(false).unwrap();
        codec.mute_line_out(true).unwrap();
        assert_eq!(codec.port().read_count(), 1);
        // Reset value 0x0111 with MUTE_LO cleared, then set again.
        assert_eq!(codec.port().writes_to(CHIP_ANA_CTRL), vec![0x0011, 0x0111]);
    }

    #[test]
    fn test_dap_enable_orders_power_and_route() {
        let mut codec = enabled();
        codec.set_dap_enable(1).unwrap();
        codec.set_dap_enable(0).unwrap();
        assert_eq!(
            codec.port().writes(),
            &[
                (DAP_CONTROL, 0x0001),
                (CHIP_SSS_CTRL, SSS_DAP_PRE),
                (CHIP_SSS_CTRL, SSS_DAP_DISABLED),
                (DAP_CONTROL, 0x0000),
            ]
        );
    }

    #[test]
    fn test_dap_enable_rejects_three() {
        let mut codec = enabled();
        assert!(matches!(
            codec.set_dap_enable(3),
            Err(CodecError::OutOfRange { max: 2, .. })
        ));
        assert!(codec.port().writes().is_empty());
    }

    #[test]
    fn test_stereo_write_is_single() {
        let mut codec = enabled();
        codec.set_stereo(Stereo::DacVolume, 10).unwrap();
        assert_eq!(codec.port().writes(), &[(CHIP_DAC_VOL, 0x4646)]);
    }

    #[test]
    fn test_eq_band_index_checked() {
        let mut codec = enabled();
        assert_eq!(codec.set_eq_band(5, 47, false), Err(CodecError::InvalidBand(5)));
        assert_eq!(codec.get_eq_band(9), Err(CodecError::InvalidBand(9)));
    }

    #[test]
    fn test_get_control_propagates_read_failure() {
        let mut codec = enabled();
        codec.port_mut().fail_next_reads(1);
        assert!(matches!(
            codec.get_control(Control::MicGain),
            Err(CodecError::Transport(_))
        ));
    }

    #[test]
    fn test_set_control_write_failure_is_transport_error() {
        let mut codec = enabled();
        codec.port_mut().fail_writes_to(Some(CHIP_MIC_CTRL));
        assert_eq!(
            codec.set_control(Control::MicGain, 2),
            Err(CodecError::Transport(MockBusError::WriteFailed))
        );
        assert_eq!(codec.port().peek(CHIP_MIC_CTRL), 0x0000);
        codec.port_mut().fail_writes_to(None);
        assert_eq!(codec.get_control(Control::MicGain).unwrap(), 0);
    }

    #[test]
    fn test_set_stereo_write_failure_is_transport_error() {
        let mut codec = enabled();
        codec.port_mut().fail_next_writes(1);
        assert_eq!(
            codec.set_stereo(Stereo::DacVolume, 20),
            Err(CodecError::Transport(MockBusError::WriteFailed))
        );
        assert!(codec.port().writes().is_empty());
        assert_eq!(codec.port().peek(CHIP_DAC_VOL), 0x3C3C);
    }

    #[test]
    fn test_failed_ana_ctrl_write_keeps_shadow_and_mute_flags() {
        let mut codec = enabled();
        codec.port_mut().fail_writes_to(Some(CHIP_ANA_CTRL));
        assert!(codec.mute_headphone(false).unwrap_err().is_transport());
        assert!(codec.mute_line_out(true).unwrap_err().is_transport());
        assert_eq!(codec.state().ana_ctrl, Some(ANA_CTRL_RUNNING));
        assert!(codec.state().headphone_muted);
        assert!(!codec.state().line_out_muted);

        // The next write merges into the untouched shadow.
        codec.port_mut().fail_writes_to(None);
        codec.mute_line_out(true).unwrap();
        assert_eq!(
            codec.port().writes(),
            &[(CHIP_ANA_CTRL, ANA_CTRL_RUNNING | ANA_CTRL_MUTE_LO)]
        );
        assert!(codec.state().headphone_muted);
        assert!(codec.state().line_out_muted);
    }

    #[test]
    fn test_peq_filter_write_sequence() {
        let mut codec = enabled();
        let coefficients = biquad::synthesize(
            &FilterSpec::peaking(1_000.0, 0.0, 1.0),
            44_100,
            DEFAULT_QUANTIZATION_UNIT,
        )
        .unwrap();
        codec.write_peq_filter(3, &coefficients).unwrap();
        let writes = codec.port().writes();
        assert_eq!(writes.len(), 11);
        let (b0_msb, b0_lsb) = coefficients.register_words()[0];
        assert_eq!(writes.first(), Some(&(DAP_COEF_WR_B0_MSB, b0_msb)));
        assert_eq!(writes.get(1), Some(&(DAP_COEF_WR_B0_LSB, b0_lsb)));
        assert_eq!(writes.get(9), Some(&(DAP_COEF_WR_A2_LSB, coefficients.register_words()[4].1)));
        assert_eq!(writes.last(), Some(&(DAP_FILTER_COEF_ACCESS, 0x0103)));
    }

    #[test]
    fn test_peq_filter_index_checked() {
        let mut codec = enabled();
        let spec = FilterSpec::peaking(1_000.0, 3.0, 1.0);
        assert_eq!(
            codec.configure_peq_filter(7, &spec),
            Err(CodecError::InvalidFilter(7))
        );
    }

    #[test]
    fn test_auto_volume_preserves_enable_bit() {
        let mut codec = enabled();
        codec.set_control(Control::AutoVolumeEnable, 1).unwrap();
        codec
            .configure_auto_volume(&AutoVolumeConfig::default())
            .unwrap();
        let ctrl = codec.port().peek(DAP_AVC_CTRL);
        assert_eq!(ctrl & AVC_CTRL_EN, AVC_CTRL_EN);
        assert_eq!(ctrl & AVC_CTRL_CONFIG_MASK, (1 << 12) | (2 << 8));
    }

    #[test]
    fn test_settings_round_trip_through_chip() {
        let mut codec = enabled();
        let mut wanted = CodecSettings::default();
        wanted.headphone_volume.left = 80;
        wanted.eq_bands = [10, 20, 47, 60, 95];
        wanted.surround_enable = 2;
        codec.apply_settings(&wanted).unwrap();
        assert!(!codec.any_pending());
        assert_eq!(codec.capture_settings().unwrap(), wanted);
    }
}
