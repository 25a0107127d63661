//! SGTL5000 control-plane driver
//!
//! Translates 0–127 controller values into SGTL5000 register fields, ramps
//! the EQ band registers in click-free 0.5 dB steps, synthesizes parametric
//! EQ coefficients and routes MIDI-style CC numbers to controls.
//!
//! # Architecture
//!
//! ```text
//! dispatch(cc, value) / set_control(..)       advance()  (periodic tick)
//!         ↓                                       ↓
//! CC table (cc) → Register codec (codec) → Automation (automation)
//!         ↓                                       ↓
//!         └────────── RegisterPort (platform) ────┘
//! ```
//!
//! The driver owns all device state; there are no globals. It is not
//! `Sync`: every call, including [`Sgtl5000::advance`], must come from the
//! one task that owns it.
//!
//! # Features
//!
//! - `std`: `std::error::Error` impls
//! - `defmt`: defmt logging and `defmt::Format` derives (hardware builds)
//! - `tracing`: tracing logging (host builds)
//! - `serde`: serialize [`CodecSettings`] and filter specs
//!
//! # Example
//!
//! ```no_run
//! use embedded_hal::{delay::DelayNs, i2c::I2c};
//! use platform::I2cAddress;
//! use sgtl5000::{ClockConfig, Sgtl5000};
//!
//! fn bring_up<I: I2c>(i2c: I, delay: &mut impl DelayNs) {
//!     let mut codec = Sgtl5000::new_i2c(i2c, I2cAddress::Normal);
//!     if codec.enable(&ClockConfig::default(), delay).is_ok() {
//!         let _ = codec.set_defaults();
//!         let _ = codec.dispatch(49, 60); // EQ band 0, ramped
//!         while codec.any_pending() {
//!             let _ = codec.advance();
//!         }
//!     }
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![allow(clippy::doc_markdown)] // register names in doc comments
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::wildcard_imports)] // register constants

#[cfg(feature = "std")]
extern crate std;

#[macro_use]
mod fmt;

pub mod automation;
pub mod biquad;
pub mod cc;
pub mod clock;
pub mod codec;
pub mod driver;
pub mod error;
pub mod registers;
pub mod settings;

pub use automation::{Automation, RampSlot, Request};
pub use crate::biquad::{BiquadCoefficients, BiquadError, FilterSpec, FilterType};
pub use cc::{CcEntry, CcReading, CcTarget, DumpEntry, CC_TABLE};
pub use clock::{ClockConfig, ClockMode, SampleRate};
pub use codec::{Band, Channel, Control, Stereo};
pub use driver::{DeviceState, Sgtl5000};
pub use error::CodecError;
pub use settings::{AutoVolumeConfig, CodecSettings, StereoLevel};
