//! SGTL5000 register addresses and constants.
//!
//! Reference: NXP SGTL5000 datasheet Rev. 6, Section 6 (Register Map).
//!
//! Registers are 16 bits wide at even 16-bit addresses. `CHIP_*` registers
//! control the analog blocks and clocking, `DAP_*` registers the digital
//! audio processor.

// ── CHIP registers ───────────────────────────────────────────────────────────

/// 0x0000: Part id (bits 15:8) and revision (bits 7:0). Read-only.
pub const CHIP_ID: u16 = 0x0000;
/// 0x0002: Digital block power (ADC, DAC, DAP, I2S in/out).
pub const CHIP_DIG_POWER: u16 = 0x0002;
/// 0x0004: RATE_MODE (5:4), SYS_FS (3:2), MCLK_FREQ (1:0).
pub const CHIP_CLK_CTRL: u16 = 0x0004;
/// 0x0006: I2S format, word length, master/slave.
pub const CHIP_I2S_CTRL: u16 = 0x0006;
/// 0x000A: Source select switch (signal routing).
pub const CHIP_SSS_CTRL: u16 = 0x000A;
/// 0x000E: DAC volume ramp, DAC mute, ADC high-pass filter.
pub const CHIP_ADCDAC_CTRL: u16 = 0x000E;
/// 0x0010: DAC_VOL_RIGHT (15:8), DAC_VOL_LEFT (7:0); 0x3C = 0 dB.
pub const CHIP_DAC_VOL: u16 = 0x0010;
/// 0x0014: I2S/I2C pad drive strength.
pub const CHIP_PAD_STRENGTH: u16 = 0x0014;
/// 0x0020: Line-in analog gain, right (7:4) and left (3:0), 1.5 dB steps.
pub const CHIP_ANA_ADC_CTRL: u16 = 0x0020;
/// 0x0022: Headphone volume, right (14:8) and left (6:0); 0x00 = +12 dB.
pub const CHIP_ANA_HP_CTRL: u16 = 0x0022;
/// 0x0024: Analog mutes, zero-cross detectors and input selectors.
pub const CHIP_ANA_CTRL: u16 = 0x0024;
/// 0x0026: Linear regulator control.
pub const CHIP_LINREG_CTRL: u16 = 0x0026;
/// 0x0028: Analog ground and bias reference.
pub const CHIP_REF_CTRL: u16 = 0x0028;
/// 0x002A: Microphone bias and gain (1:0).
pub const CHIP_MIC_CTRL: u16 = 0x002A;
/// 0x002C: Line-out analog ground and bias current.
pub const CHIP_LINE_OUT_CTRL: u16 = 0x002C;
/// 0x002E: Line-out volume, right (12:8) and left (4:0).
pub const CHIP_LINE_OUT_VOL: u16 = 0x002E;
/// 0x0030: Analog block power.
pub const CHIP_ANA_POWER: u16 = 0x0030;
/// 0x0032: PLL integer (15:11) and fractional (10:0) divisors.
pub const CHIP_PLL_CTRL: u16 = 0x0032;
/// 0x0034: Internal oscillator and MCLK input divider.
pub const CHIP_CLK_TOP_CTRL: u16 = 0x0034;
/// 0x0036: Analog status (headphone short, PLL lock).
pub const CHIP_ANA_STATUS: u16 = 0x0036;
/// 0x003C: Headphone short detection.
pub const CHIP_SHORT_CTRL: u16 = 0x003C;

// ── DAP registers ────────────────────────────────────────────────────────────

/// 0x0100: DAP enable (bit 0) and mixer enable (bit 4).
pub const DAP_CONTROL: u16 = 0x0100;
/// 0x0102: Number of enabled parametric EQ filters (2:0).
pub const DAP_PEQ: u16 = 0x0102;
/// 0x0104: Bass enhance enable, cutoff and high-pass bypass.
pub const DAP_BASS_ENHANCE: u16 = 0x0104;
/// 0x0106: Bass enhance LR level (13:8) and bass boost (6:0), both inverted.
pub const DAP_BASS_ENHANCE_CTRL: u16 = 0x0106;
/// 0x0108: Tone / EQ mode select (1:0).
pub const DAP_AUDIO_EQ: u16 = 0x0108;
/// 0x010A: Surround width (6:4) and select (1:0).
pub const DAP_SGTL_SURROUND: u16 = 0x010A;
/// 0x010C: Parametric EQ coefficient write strobe and filter index.
pub const DAP_FILTER_COEF_ACCESS: u16 = 0x010C;
/// 0x010E: Coefficient B0 bits 19:4.
pub const DAP_COEF_WR_B0_MSB: u16 = 0x010E;
/// 0x0110: Coefficient B0 bits 3:0.
pub const DAP_COEF_WR_B0_LSB: u16 = 0x0110;
/// 0x0116: Graphic EQ band 0 (115 Hz) / tone bass.
pub const DAP_AUDIO_EQ_BASS_BAND0: u16 = 0x0116;
/// 0x0118: Graphic EQ band 1 (330 Hz).
pub const DAP_AUDIO_EQ_BAND1: u16 = 0x0118;
/// 0x011A: Graphic EQ band 2 (990 Hz).
pub const DAP_AUDIO_EQ_BAND2: u16 = 0x011A;
/// 0x011C: Graphic EQ band 3 (3000 Hz).
pub const DAP_AUDIO_EQ_BAND3: u16 = 0x011C;
/// 0x011E: Graphic EQ band 4 (9900 Hz) / tone treble.
pub const DAP_AUDIO_EQ_TREBLE_BAND4: u16 = 0x011E;
/// 0x0120: DAP main channel volume.
pub const DAP_MAIN_CHAN: u16 = 0x0120;
/// 0x0122: DAP mix channel volume.
pub const DAP_MIX_CHAN: u16 = 0x0122;
/// 0x0124: Auto volume control.
pub const DAP_AVC_CTRL: u16 = 0x0124;
/// 0x0126: AVC threshold.
pub const DAP_AVC_THRESHOLD: u16 = 0x0126;
/// 0x0128: AVC attack rate.
pub const DAP_AVC_ATTACK: u16 = 0x0128;
/// 0x012A: AVC decay rate.
pub const DAP_AVC_DECAY: u16 = 0x012A;
/// 0x012C: Coefficient B1 bits 19:4.
pub const DAP_COEF_WR_B1_MSB: u16 = 0x012C;
/// 0x012E: Coefficient B1 bits 3:0.
pub const DAP_COEF_WR_B1_LSB: u16 = 0x012E;
/// 0x0130: Coefficient B2 bits 19:4.
pub const DAP_COEF_WR_B2_MSB: u16 = 0x0130;
/// 0x0132: Coefficient B2 bits 3:0.
pub const DAP_COEF_WR_B2_LSB: u16 = 0x0132;
/// 0x0134: Coefficient A1 bits 19:4.
pub const DAP_COEF_WR_A1_MSB: u16 = 0x0134;
/// 0x0136: Coefficient A1 bits 3:0.
pub const DAP_COEF_WR_A1_LSB: u16 = 0x0136;
/// 0x0138: Coefficient A2 bits 19:4.
pub const DAP_COEF_WR_A2_MSB: u16 = 0x0138;
/// 0x013A: Coefficient A2 bits 3:0.
pub const DAP_COEF_WR_A2_LSB: u16 = 0x013A;


/// Coefficient `(msb, lsb)` register pairs in `b0, b1, b2, a1, a2` order.
pub const COEF_WR_REGISTERS: [(u16, u16); 5] = [
    (DAP_COEF_WR_B0_MSB, DAP_COEF_WR_B0_LSB),
    (DAP_COEF_WR_B1_MSB, DAP_COEF_WR_B1_LSB),
    (DAP_COEF_WR_B2_MSB, DAP_COEF_WR_B2_LSB),
    (DAP_COEF_WR_A1_MSB, DAP_COEF_WR_A1_LSB),
    (DAP_COEF_WR_A2_MSB, DAP_COEF_WR_A2_LSB),
];

// ── Bit fields ───────────────────────────────────────────────────────────────

/// CHIP_ID: part id field.
pub const CHIP_ID_PARTID_MASK: u16 = 0xFF00;
/// CHIP_ID: SGTL5000 part id, already shifted into bits 15:8.
pub const CHIP_ID_PARTID_SGTL5000: u16 = 0xA0 << 8;

/// ANA_CTRL: line-out mute.
pub const ANA_CTRL_MUTE_LO: u16 = 1 << 8;
/// ANA_CTRL: headphone source, 1 = line-in bypass.
pub const ANA_CTRL_SELECT_HP: u16 = 1 << 6;
/// ANA_CTRL: headphone zero-cross detector.
pub const ANA_CTRL_EN_ZCD_HP: u16 = 1 << 5;
/// ANA_CTRL: headphone mute.
pub const ANA_CTRL_MUTE_HP: u16 = 1 << 4;
/// ANA_CTRL: ADC source, 1 = line-in, 0 = microphone.
pub const ANA_CTRL_SELECT_ADC: u16 = 1 << 2;
/// ANA_CTRL: ADC zero-cross detector.
pub const ANA_CTRL_EN_ZCD_ADC: u16 = 1 << 1;
/// ANA_CTRL: ADC mute.
pub const ANA_CTRL_MUTE_ADC: u16 = 1 << 0;

/// ADCDAC_CTRL: volume ramp enable.
pub const ADCDAC_VOL_RAMP_EN: u16 = 1 << 9;
/// ADCDAC_CTRL: exponential (1) or linear (0) ramp.
pub const ADCDAC_VOL_EXPO_RAMP: u16 = 1 << 8;
/// ADCDAC_CTRL: ADC high-pass filter freeze.
pub const ADCDAC_ADC_HPF_FREEZE: u16 = 1 << 1;
/// ADCDAC_CTRL: ADC high-pass filter bypass.
pub const ADCDAC_ADC_HPF_BYPASS: u16 = 1 << 0;

/// SSS_CTRL bits owned by DAP routing: DAP_SELECT, DAC_SELECT, I2S_SELECT.
pub const SSS_ROUTING_MASK: u16 = 0x00F3;
/// SSS_CTRL: ADC → I2S_OUT, I2S_IN → DAC (DAP bypassed).
pub const SSS_DAP_DISABLED: u16 = 0x0010;
/// SSS_CTRL: ADC → DAP → I2S_OUT, I2S_IN → DAC.
pub const SSS_DAP_PRE: u16 = 0x0013;
/// SSS_CTRL: ADC → I2S_OUT, I2S_IN → DAP → DAC.
pub const SSS_DAP_POST: u16 = 0x0070;

/// DAP_CONTROL: DAP enable.
pub const DAP_CONTROL_DAP_EN: u16 = 1 << 0;

/// BASS_ENHANCE: high-pass bypass (1 = cutoff filter off).
pub const BASS_ENHANCE_BYPASS_HPF: u16 = 1 << 8;
/// BASS_ENHANCE: enable.
pub const BASS_ENHANCE_EN: u16 = 1 << 0;

/// AVC_CTRL: max gain field (13:12).
pub const AVC_CTRL_MAX_GAIN_SHIFT: u16 = 12;
/// AVC_CTRL: LBI response field (9:8).
pub const AVC_CTRL_LBI_RESPONSE_SHIFT: u16 = 8;
/// AVC_CTRL: hard limiter.
pub const AVC_CTRL_HARD_LIMIT_EN: u16 = 1 << 5;
/// AVC_CTRL: enable.
pub const AVC_CTRL_EN: u16 = 1 << 0;

/// FILTER_COEF_ACCESS: write strobe, OR'd with the filter index.
pub const FILTER_COEF_ACCESS_WR: u16 = 1 << 8;

/// I2S_CTRL: 64·fs SCLK, 16-bit words, I2S framing.
pub const I2S_CTRL_16BIT_I2S: u16 = 0x0030;
/// I2S_CTRL: SGTL5000 drives SCLK and LRCLK.
pub const I2S_CTRL_MASTER: u16 = 1 << 7;

/// CLK_CTRL: MCLK_FREQ = 3, clocks derived from the PLL.
pub const CLK_CTRL_MCLK_FREQ_PLL: u16 = 0x0003;

/// CLK_TOP_CTRL: divide MCLK by two before the PLL.
pub const CLK_TOP_CTRL_INPUT_FREQ_DIV2: u16 = 1 << 3;

/// ANA_POWER: PLL power up.
pub const ANA_POWER_PLL_POWERUP: u16 = 1 << 10;
/// ANA_POWER: VCO amplifier power up.
pub const ANA_POWER_VCOAMP_POWERUP: u16 = 1 << 8;

// ── Power-up sequence values ─────────────────────────────────────────────────

/// ANA_POWER before the analog blocks are brought up: VDDD from the
/// internal regulator, reference and line-out powered.
pub const ANA_POWER_STARTUP: u16 = 0x4060;
/// LINREG_CTRL: VDDD = 1.2 V, charge pump from VDDIO.
pub const LINREG_STARTUP: u16 = 0x006C;
/// REF_CTRL: VAG = 1.575 V, normal bias, slow ramp.
pub const REF_CTRL_STARTUP: u16 = 0x01F2;
/// LINE_OUT_CTRL: LO_VAGCNTRL = 1.65 V, 0.36 mA bias.
pub const LINE_OUT_CTRL_STARTUP: u16 = 0x0F22;
/// SHORT_CTRL: headphone short-circuit trip levels.
pub const SHORT_CTRL_STARTUP: u16 = 0x4446;
/// ANA_CTRL during bring-up: everything muted, line-in to ADC.
pub const ANA_CTRL_STARTUP: u16 = 0x0137;
/// ANA_POWER: line-out, headphone, ADC and DAC powered.
pub const ANA_POWER_RUNNING: u16 = 0x40FF;
/// DIG_POWER: I2S in/out, DAP, DAC and ADC powered.
pub const DIG_POWER_RUNNING: u16 = 0x0073;
/// LINE_OUT_VOL after bring-up: 1.29 Vrms at VDDA = 3.3 V.
pub const LINE_OUT_VOL_STARTUP: u16 = 0x1D1D;
/// DAC_VOL: both channels at 0 dB.
pub const DAC_VOL_0DB: u16 = 0x3C3C;
/// ANA_HP_CTRL: both channels at the lowest level.
pub const HP_VOL_MIN: u16 = 0x7F7F;
/// ANA_CTRL after bring-up: line-out live, headphone muted, zero-cross on.
pub const ANA_CTRL_RUNNING: u16 = 0x0036;

/// Analog blocks need this long after power-up before clocks are changed.
pub const POWER_UP_SETTLE_MS: u32 = 400;

/// Graphic EQ band reset value (0 dB).
pub const EQ_BAND_0DB: u8 = 0x2F;

/// Register contents after power-on reset.
///
/// `CHIP_ID` holds revision 0x11.
pub const RESET_VALUES: &[(u16, u16)] = &[
    (CHIP_ID, 0xA011),
    (CHIP_DIG_POWER, 0x0000),
    (CHIP_CLK_CTRL, 0x0008),
    (CHIP_I2S_CTRL, 0x0010),
    (CHIP_SSS_CTRL, 0x0010),
    (CHIP_ADCDAC_CTRL, 0x020C),
    (CHIP_DAC_VOL, 0x3C3C),
    (CHIP_PAD_STRENGTH, 0x015F),
    (CHIP_ANA_ADC_CTRL, 0x0000),
    (CHIP_ANA_HP_CTRL, 0x1818),
    (CHIP_ANA_CTRL, 0x0111),
    (CHIP_LINREG_CTRL, 0x0000),
    (CHIP_REF_CTRL, 0x0000),
    (CHIP_MIC_CTRL, 0x0000),
    (CHIP_LINE_OUT_CTRL, 0x0000),
    (CHIP_LINE_OUT_VOL, 0x0404),
    (CHIP_ANA_POWER, 0x7060),
    (CHIP_PLL_CTRL, 0x5000),
    (CHIP_CLK_TOP_CTRL, 0x0000),
    (CHIP_SHORT_CTRL, 0x0000),
    (DAP_CONTROL, 0x0000),
    (DAP_PEQ, 0x0000),
    (DAP_BASS_ENHANCE, 0x0040),
    (DAP_BASS_ENHANCE_CTRL, 0x051F),
    (DAP_AUDIO_EQ, 0x0000),
    (DAP_SGTL_SURROUND, 0x0040),
    (DAP_AUDIO_EQ_BASS_BAND0, 0x002F),
    (DAP_AUDIO_EQ_BAND1, 0x002F),
    (DAP_AUDIO_EQ_BAND2, 0x002F),
    (DAP_AUDIO_EQ_BAND3, 0x002F),
    (DAP_AUDIO_EQ_TREBLE_BAND4, 0x002F),
    (DAP_MAIN_CHAN, 0x8000),
    (DAP_MIX_CHAN, 0x0000),
    (DAP_AVC_CTRL, 0x5100),
    (DAP_AVC_THRESHOLD, 0x1473),
    (DAP_AVC_ATTACK, 0x0028),
    (DAP_AVC_DECAY, 0x0050),
];
