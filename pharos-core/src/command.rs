//! Controller command opcodes
//!
//! The fixed external vocabulary of the SSD1306-class page-addressed
//! controllers. Column and page selects carry their operand in the low
//! bits of the opcode.

/// Low nibble of the column address.
pub const SET_LOW_COLUMN: u8 = 0x00;
/// High nibble of the column address.
pub const SET_HIGH_COLUMN: u8 = 0x10;
/// RAM line mapped to the first display line (operand in bits 0-5).
pub const SET_START_LINE: u8 = 0x40;
/// Contrast level follows as a second command byte.
pub const SET_CONTRAST: u8 = 0x81;
/// Column 0 maps to SEG0.
pub const SET_SEG_REMAP: u8 = 0xA0;
/// Normal pixel polarity.
pub const SET_NORMAL: u8 = 0xA6;
/// Inverted pixel polarity.
pub const SET_INVERSE: u8 = 0xA7;
/// Display off (sleep).
pub const DISPLAY_OFF: u8 = 0xAE;
/// Display on.
pub const DISPLAY_ON: u8 = 0xAF;
/// Page address for page addressing mode (operand in bits 0-2).
pub const SET_PAGE_ADDR: u8 = 0xB0;
/// COM output scan from COM0.
pub const SET_COM_SCAN_INC: u8 = 0xC0;
/// COM output scan toward COM0 (vertical flip).
pub const SET_COM_SCAN_DEC: u8 = 0xC8;
