//! Register-level hardware abstraction for 16-bit register codecs
//!
//! This crate keeps bus transport out of codec logic, so drivers can be
//! developed and tested without physical hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Codec driver (sgtl5000 crate)
//!         ↓
//! Register port (this crate - RegisterPort trait)
//!         ↓
//! Bus (embedded-hal 1.0 I2C, or MockRegisterPort in tests)
//! ```
//!
//! # Features
//!
//! - `std`: Enable standard library support (mocks, `std::error::Error`)
//! - `defmt`: Enable defmt logging
//!
//! # Example
//!
//! ```no_run
//! use platform::{I2cAddress, I2cRegisterPort, RegisterPort};
//!
//! fn chip_id<I: embedded_hal::i2c::I2c>(i2c: I) -> Result<u16, I::Error> {
//!     let mut port = I2cRegisterPort::new(i2c, I2cAddress::Normal);
//!     port.read_register(0x0000)
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
// Pedantic lints suppressed for this hardware HAL crate:
#![allow(clippy::doc_markdown)] // hex addresses and register names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors, callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

#[cfg(feature = "std")]
extern crate std;

pub mod audio_types;
pub mod mocks;
pub mod register_port;

pub use audio_types::{ControlValue, I2cAddress, OutOfRangeError, SampleRateHz};
pub use register_port::{I2cRegisterPort, RegisterPort};

#[cfg(any(test, feature = "std"))]
pub use mocks::{MockBusError, MockRegisterPort};
