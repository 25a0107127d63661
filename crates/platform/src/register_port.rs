//! Device register port.
//!
//! The codec logic never talks to a bus directly. It reads and writes 16-bit
//! registers through [`RegisterPort`], which keeps the transport (I²C here,
//! a recording mock in tests) behind a three-method interface.
//!
//! # Read ambiguity
//!
//! On the wire a failed read and a register that genuinely holds zero can
//! look alike (a NAK'd transfer may leave the receive buffer untouched).
//! `RegisterPort` keeps them apart: a failed transfer is `Err`, a zero
//! register is `Ok(0)`. Callers must never fold an `Err` into a decoded
//! zero value.
//!
//! # SGTL5000 framing
//!
//! | Transfer | Bytes on the bus                                   |
//! |----------|----------------------------------------------------|
//! | write    | `addr[15:8] addr[7:0] value[15:8] value[7:0]`      |
//! | read     | write `addr[15:8] addr[7:0]`, repeated start, read 2 bytes (big-endian) |

use embedded_hal::i2c::I2c;

use crate::audio_types::I2cAddress;

/// Raw access to a device's 16-bit register file.
///
/// Implementations perform exactly one bus transaction per call and never
/// retry; retry policy belongs to the caller.
pub trait RegisterPort {
    /// Transport error type.
    type Error: core::fmt::Debug;

    /// Read one register.
    fn read_register(&mut self, address: u16) -> Result<u16, Self::Error>;

    /// Write one register.
    fn write_register(&mut self, address: u16, value: u16) -> Result<(), Self::Error>;

    /// Replace the bits selected by `mask` with `bits`, preserving the rest.
    ///
    /// Reads the register first; if that read fails nothing is written.
    /// Returns the value that was written.
    fn modify_register(&mut self, address: u16, mask: u16, bits: u16) -> Result<u16, Self::Error> {
        let current = self.read_register(address)?;
        let value = (current & !mask) | (bits & mask);
        self.write_register(address, value)?;
        Ok(value)
    }
}

impl<T: RegisterPort + ?Sized> RegisterPort for &mut T {
    type Error = T::Error;

    fn read_register(&mut self, address: u16) -> Result<u16, Self::Error> {
        T::read_register(self, address)
    }

    fn write_register(&mut self, address: u16, value: u16) -> Result<(), Self::Error> {
        T::write_register(self, address, value)
    }

    fn modify_register(&mut self, address: u16, mask: u16, bits: u16) -> Result<u16, Self::Error> {
        T::modify_register(self, address, mask, bits)
    }
}

/// [`RegisterPort`] over a blocking `embedded-hal` 1.0 I²C bus.
///
/// Holds the bus exclusively; wrap a shared bus with
/// `embedded-hal-bus` before handing it over if other devices live on it.
pub struct I2cRegisterPort<I> {
    i2c: I,
    address: I2cAddress,
}

impl<I: I2c> I2cRegisterPort<I> {
    /// Create a port talking to the chip at `address`.
    pub fn new(i2c: I, address: I2cAddress) -> Self {
        Self { i2c, address }
    }

    /// Currently selected device address.
    pub fn address(&self) -> I2cAddress {
        self.address
    }

    /// Switch to the other `CTRL_ADR0_CS` strap position.
    ///
    /// Must be called before the first transfer if the board straps the
    /// pin high.
    pub fn set_address(&mut self, address: I2cAddress) {
        self.address = address;
    }

    /// Give the bus back.
    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: I2c> RegisterPort for I2cRegisterPort<I> {
    type Error = I::Error;

    fn read_register(&mut self, address: u16) -> Result<u16, Self::Error> {
        let mut value = [0u8; 2];
        self.i2c
            .write_read(self.address.get(), &address.to_be_bytes(), &mut value)?;
        Ok(u16::from_be_bytes(value))
    }

    fn write_register(&mut self, address: u16, value: u16) -> Result<(), Self::Error> {
        let [addr_hi, addr_lo] = address.to_be_bytes();
        let [value_hi, value_lo] = value.to_be_bytes();
        self.i2c
            .write(self.address.get(), &[addr_hi, addr_lo, value_hi, value_lo])
    }
}
