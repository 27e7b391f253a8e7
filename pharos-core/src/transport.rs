//! Display transport capability trait
//!
//! The rasterizer depends only on this seam, never on a concrete bus, so
//! test doubles can record the emitted byte/mode sequence.

/// Addressing mode for one display byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WriteMode {
    /// Write to the controller command register. Sent immediately.
    Command,
    /// Write one byte to display RAM. Sent immediately.
    Ram,
    /// Write to display RAM with possible batching until the next
    /// command/immediate write or an explicit flush.
    RamBuffered,
}

/// Byte-oriented command/data path to the display controller.
///
/// Implementations own the bus handle for the lifetime of the display
/// object. Batching buffered RAM writes is a performance contract, not a
/// correctness one; the byte sequence reaching the controller is the same
/// either way.
pub trait DisplayTransport {
    /// Error type of the underlying bus.
    type Error;

    /// Write a byte in the given mode.
    fn write(&mut self, byte: u8, mode: WriteMode) -> Result<(), Self::Error>;

    /// End any open buffered transaction.
    fn flush(&mut self) -> Result<(), Self::Error>;
}
