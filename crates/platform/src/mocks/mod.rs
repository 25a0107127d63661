//! Mock implementations for testing
//!
//! [`MockRegisterPort`] stands in for a real chip: a 16-bit register file,
//! a log of every write, and fault injection for transport failures.

#![cfg(any(test, feature = "std"))]

use std::vec::Vec;

use crate::RegisterPort;

/// Number of 16-bit register slots (byte addresses 0x0000..=0x01FE).
const REGISTER_SLOTS: usize = 0x100;

/// Transport failure reported by [`MockRegisterPort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBusError {
    /// Injected read failure.
    ReadFailed,
    /// Injected write failure.
    WriteFailed,
    /// Register address is odd or outside the register file.
    BadAddress(u16),
}

/// In-memory register file that records writes.
#[derive(Debug, Clone)]
pub struct MockRegisterPort {
    registers: Vec<u16>,
    writes: Vec<(u16, u16)>,
    reads: usize,
    fail_reads: usize,
    fail_writes: usize,
    fail_writes_to: Option<u16>,
}

impl MockRegisterPort {
    /// All registers zero.
    pub fn new() -> Self {
        Self {
            registers: std::vec![0; REGISTER_SLOTS],
            writes: Vec::new(),
            reads: 0,
            fail_reads: 0,
            fail_writes: 0,
            fail_writes_to: None,
        }
    }

    /// Start from the given register contents (e.g. a chip's reset values).
    pub fn with_registers(values: &[(u16, u16)]) -> Self {
        let mut port = Self::new();
        for &(address, value) in values {
            port.preset(address, value);
        }
        port
    }

    /// Set a register without logging a write.
    pub fn preset(&mut self, address: u16, value: u16) {
        if let Some(slot) = slot(address).and_then(|i| self.registers.get_mut(i)) {
            *slot = value;
        }
    }

    /// Current register contents (not counted as a bus read).
    pub fn peek(&self, address: u16) -> u16 {
        slot(address)
            .and_then(|i| self.registers.get(i))
            .copied()
            .unwrap_or(0)
    }

    /// Every successful write as `(address, value)`, oldest first.
    pub fn writes(&self) -> &[(u16, u16)] {
        &self.writes
    }

    /// Writes that targeted `address`.
    pub fn writes_to(&self, address: u16) -> Vec<u16> {
        self.writes
            .iter()
            .filter(|(a, _)| *a == address)
            .map(|(_, v)| *v)
            .collect()
    }

    /// Number of successful reads.
    pub fn read_count(&self) -> usize {
        self.reads
    }

    /// Forget logged writes and reads.
    pub fn clear_log(&mut self) {
        self.writes.clear();
        self.reads = 0;
    }

    /// Make the next `count` reads fail.
    pub fn fail_next_reads(&mut self, count: usize) {
        self.fail_reads = count;
    }

    /// Make the next `count` writes fail.
    pub fn fail_next_writes(&mut self, count: usize) {
        self.fail_writes = count;
    }

    /// Make every write to `address` fail until cleared with `None`.
    pub fn fail_writes_to(&mut self, address: Option<u16>) {
        self.fail_writes_to = address;
    }
}

impl Default for MockRegisterPort {
    fn default() -> Self {
        Self::new()
    }
}

fn slot(address: u16) -> Option<usize> {
    if address % 2 != 0 {
        return None;
    }
    let index = usize::from(address / 2);
    (index < REGISTER_SLOTS).then_some(index)
}

impl RegisterPort for MockRegisterPort {
    type Error = MockBusError;

    fn read_register(&mut self, address: u16) -> Result<u16, Self::Error> {
        if self.fail_reads > 0 {
            self.fail_reads = self.fail_reads.saturating_sub(1);
            return Err(MockBusError::ReadFailed);
        }
        let value = slot(address)
            .and_then(|i| self.registers.get(i))
            .copied()
            .ok_or(MockBusError::BadAddress(address))?;
        self.reads = self.reads.saturating_add(1);
        Ok(value)
    }

    fn write_register(&mut self, address: u16, value: u16) -> Result<(), Self::Error> {
        if self.fail_writes > 0 {
            self.fail_writes = self.fail_writes.saturating_sub(1);
            return Err(MockBusError::WriteFailed);
        }
        if self.fail_writes_to == Some(address) {
            return Err(MockBusError::WriteFailed);
        }
        let target = slot(address)
            .and_then(|i| self.registers.get_mut(i))
            .ok_or(MockBusError::BadAddress(address))?;
        *target = value;
        self.writes.push((address, value));
        Ok(())
    }
}
