// Desktop/tooling crate: unwrap/expect/panic acceptable in non-embedded code.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod check;
mod simulate;
mod test;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "SGTL5000 driver development tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the driver builds for the embedded target and the host, lint
    /// and build the docs
    Check,
    /// Run all tests (unit, integration, doc)
    Test {
        /// Run only unit tests
        #[arg(long)]
        unit: bool,
        /// Run only integration tests
        #[arg(long)]
        integration: bool,
    },
    /// Drive a simulated SGTL5000 and print its CC dump
    Simulate {
        /// Settings JSON to apply after enable (defaults when omitted)
        #[arg(long)]
        settings: Option<std::path::PathBuf>,
        /// `cc=value` messages to dispatch after the settings
        #[arg(long = "cc", value_parser = simulate::parse_cc)]
        messages: Vec<(u8, u8)>,
        /// Log every register write
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => check::run(),
        Commands::Test { unit, integration } => test::run(unit, integration),
        Commands::Simulate {
            settings,
            messages,
            verbose,
        } => simulate::run(settings.as_deref(), &messages, verbose),
    }
}
