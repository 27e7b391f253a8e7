//! Test doubles and fixtures shared by the driver tests.

use crate::TextDisplay;
use pharos_core::{DeviceConfig, DisplayTransport, WriteMode};

/// Transport double that records every (mode, byte) write in order.
pub struct RecordingTransport {
    pub writes: Vec<(WriteMode, u8)>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self { writes: Vec::new() }
    }

    /// Current position in the write log, for slicing later.
    pub fn mark(&self) -> usize {
        self.writes.len()
    }

    /// RAM payload bytes (immediate and buffered) recorded after `mark`.
    pub fn ram_since(&self, mark: usize) -> Vec<u8> {
        self.writes[mark..]
            .iter()
            .filter(|(mode, _)| matches!(mode, WriteMode::Ram | WriteMode::RamBuffered))
            .map(|&(_, byte)| byte)
            .collect()
    }

    /// Command bytes recorded after `mark`.
    pub fn commands_since(&self, mark: usize) -> Vec<u8> {
        self.writes[mark..]
            .iter()
            .filter(|(mode, _)| matches!(mode, WriteMode::Command))
            .map(|&(_, byte)| byte)
            .collect()
    }
}

impl DisplayTransport for RecordingTransport {
    type Error = core::convert::Infallible;

    fn write(&mut self, byte: u8, mode: WriteMode) -> Result<(), Self::Error> {
        self.writes.push((mode, byte));
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Fixed-width 5x7 test font covering `'H'..='i'`, every glyph byte 0x55.
pub static FONT_5X7: [u8; 6 + 34 * 5] = fixed_5x7();

const fn fixed_5x7() -> [u8; 6 + 34 * 5] {
    let mut data = [0x55u8; 6 + 34 * 5];
    data[0] = 0x00;
    data[1] = 0x01;
    data[2] = 5;
    data[3] = 7;
    data[4] = b'H';
    data[5] = 34;
    data
}

/// Proportional font with a single 2-column, 12-pixel-tall glyph `'a'`:
/// the final byte-row carries 4 live pixels.
pub static FONT_TALL_PROP: [u8; 11] = [
    0x00, 0x02, 2, 12, b'a', 1, // header
    2,    // width table
    0xF0, 0xF0, // byte-row 0
    0xFF, 0xFF, // byte-row 1
];

/// A 128x64 display attached over a fresh recording transport.
pub fn attached_display() -> TextDisplay<'static, RecordingTransport> {
    static INIT: [u8; 2] = [0xAE, 0xAF];
    let mut display = TextDisplay::new(RecordingTransport::new());
    display
        .begin(&DeviceConfig::new(&INIT, 128, 64, 0))
        .unwrap();
    display
}
