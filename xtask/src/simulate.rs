//! Host-side simulation: the real driver against an in-memory register file.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use embedded_hal_mock::eh1::delay::NoopDelay;
use platform::MockRegisterPort;
use sgtl5000::registers::RESET_VALUES;
use sgtl5000::{CcReading, ClockConfig, CodecSettings, Sgtl5000};
use tracing_subscriber::EnvFilter;

/// Parse a `cc=value` argument.
pub fn parse_cc(arg: &str) -> Result<(u8, u8), String> {
    let (cc, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected cc=value, got '{arg}'"))?;
    let cc = cc.trim().parse().map_err(|e| format!("bad CC '{cc}': {e}"))?;
    let value = value
        .trim()
        .parse()
        .map_err(|e| format!("bad value '{value}': {e}"))?;
    Ok((cc, value))
}

pub fn run(settings: Option<&Path>, messages: &[(u8, u8)], verbose: bool) -> Result<()> {
    let default_level = if verbose { "sgtl5000=trace" } else { "sgtl5000=info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .try_init();

    let settings = match settings {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&json)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        }
        None => CodecSettings::default(),
    };

    let mut codec = Sgtl5000::new(MockRegisterPort::with_registers(RESET_VALUES));
    codec
        .enable(&ClockConfig::default(), &mut NoopDelay::new())
        .map_err(|e| anyhow::anyhow!("enable failed: {e}"))?;
    codec
        .apply_settings(&settings)
        .map_err(|e| anyhow::anyhow!("apply settings failed: {e}"))?;

    for &(cc, value) in messages {
        if let Err(e) = codec.dispatch(cc, value) {
            eprintln!("{}", format!("  ⚠ CC {cc} = {value}: {e}").yellow());
        }
    }

    let mut ticks = 0u32;
    while codec.any_pending() {
        codec
            .advance()
            .map_err(|e| anyhow::anyhow!("advance failed: {e}"))?;
        ticks = ticks.saturating_add(1);
    }
    if ticks > 0 {
        println!("{}", format!("  EQ ramps settled after {ticks} ticks").dimmed());
    }

    println!();
    println!("{}", "SGTL5000 controls".cyan().bold());
    for line in codec.dump() {
        let shown = match line.reading {
            Ok(CcReading::Value(v)) => v.to_string().normal(),
            Ok(CcReading::WriteOnly) => "write-only".dimmed(),
            Ok(CcReading::Unknown) => "unknown".dimmed(),
            Err(_) => "read failed".red(),
        };
        println!("  CC {:>3}  {:<24} {}", line.cc, line.label, shown);
    }
    println!();
    println!(
        "{}",
        format!("  {} register writes", codec.port().writes().len()).dimmed()
    );
    println!();

    Ok(())
}
