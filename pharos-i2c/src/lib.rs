//! Batched I2C transport for page-addressed display controllers
//!
//! Every transaction on the wire is one control prefix followed by
//! payload bytes:
//!
//! ```text
//! ┌────────┬──────────────┐
//! │ PREFIX │ PAYLOAD      │
//! │ 1B     │ 1–16B        │
//! └────────┴──────────────┘
//! ```
//!
//! 0x00 addresses the command register, 0x40 the RAM data register.
//! Consecutive buffered RAM writes coalesce into a single transaction to
//! amortize the per-transaction bus overhead; commands and immediate RAM
//! writes end the open transaction. Batching is a performance contract
//! only — the byte sequence reaching the controller is unchanged.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

use embedded_hal::i2c::I2c;
use heapless::Vec;
use pharos_core::{DisplayTransport, WriteMode};

/// Control prefix selecting the controller command register.
pub const CONTROL_COMMAND: u8 = 0x00;
/// Control prefix selecting the RAM data register.
pub const CONTROL_RAM: u8 = 0x40;
/// Common I2C address for SSD1306-class controllers (0x3C or 0x3D).
pub const DEFAULT_ADDRESS: u8 = 0x3C;
/// Maximum payload bytes coalesced into one transaction.
pub const BATCH_CAPACITY: usize = 16;

/// [`DisplayTransport`] over a blocking I2C bus.
///
/// Owns the bus handle; pending buffered bytes live here until the
/// transaction is ended by a command, an immediate write, the batch cap
/// or an explicit flush.
pub struct I2cTransport<I> {
    i2c: I,
    address: u8,
    /// Control prefix plus payload of the open transaction.
    pending: Vec<u8, { BATCH_CAPACITY + 1 }>,
}

impl<I: I2c> I2cTransport<I> {
    /// Wrap an I2C bus for the display at `address`.
    pub fn new(i2c: I, address: u8) -> Self {
        Self {
            i2c,
            address,
            pending: Vec::new(),
        }
    }

    /// Give the bus back.
    pub fn release(self) -> I {
        self.i2c
    }

    fn flush_pending(&mut self) -> Result<(), I::Error> {
        if !self.pending.is_empty() {
            self.i2c.write(self.address, &self.pending)?;
            self.pending.clear();
        }
        Ok(())
    }
}

impl<I: I2c> DisplayTransport for I2cTransport<I> {
    type Error = I::Error;

    fn write(&mut self, byte: u8, mode: WriteMode) -> Result<(), I::Error> {
        match mode {
            WriteMode::Command => {
                self.flush_pending()?;
                self.i2c.write(self.address, &[CONTROL_COMMAND, byte])
            }
            WriteMode::Ram | WriteMode::RamBuffered => {
                if self.pending.is_full() {
                    self.flush_pending()?;
                }
                if self.pending.is_empty() {
                    // Capacity checked above; these pushes cannot fail.
                    let _ = self.pending.push(CONTROL_RAM);
                }
                let _ = self.pending.push(byte);
                if mode == WriteMode::Ram {
                    // Immediate writes join the open transaction and
                    // terminate it.
                    self.flush_pending()
                } else {
                    Ok(())
                }
            }
        }
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.flush_pending()
    }
}
