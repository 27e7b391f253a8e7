//! Display rasterizer and cursor engine
//!
//! Owns the cursor, the active font and the write-path state, and turns
//! character codes into controller RAM bytes through the transport seam.
//! Every byte is transmitted write-through; there is no frame buffer.

use pharos_core::command;
use pharos_core::{DeviceConfig, DisplayTransport, FontTable, WriteMode};

#[cfg(feature = "scroll")]
use crate::scroll::{ScrollMode, Scroller};

/// Nibble-doubling table for 2x magnification: each input bit becomes two
/// adjacent output bits.
const SCALED_NIBBLE: [u8; 16] = [
    0x00, 0x03, 0x0C, 0x0F, 0x30, 0x33, 0x3C, 0x3F, 0xC0, 0xC3, 0xCC, 0xCF, 0xF0, 0xF3, 0xFC, 0xFF,
];

/// Errors that can occur while rendering text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError<E> {
    /// No font is selected.
    NoFont,
    /// The character code is not renderable in the active font.
    UnknownChar,
    /// The underlying bus reported an error.
    Bus(E),
}

impl<E> From<E> for DisplayError<E> {
    fn from(err: E) -> Self {
        DisplayError::Bus(err)
    }
}

/// ASCII text renderer for one page-addressed monochrome display.
///
/// The transport handle is exclusively owned for the lifetime of the
/// display object. All operations are synchronous and blocking; the
/// struct is single-owner and not meant to be shared across threads of
/// control.
///
/// [`TextDisplay::begin`] must be called before any other operation.
pub struct TextDisplay<'a, T> {
    transport: T,
    /// Cursor column in pixels.
    col: u8,
    /// Cursor row in eight-pixel pages.
    row: u8,
    width: u8,
    height: u8,
    /// Column offset RAM to SEG.
    column_offset: u8,
    /// Letter-spacing in pixels before magnification.
    letter_spacing: u8,
    /// Leading columns suppressed on the next glyph.
    skip: u8,
    font: Option<FontTable<'a>>,
    invert_mask: u8,
    mag_factor: u8,
    #[cfg(feature = "scroll")]
    scroll: Scroller,
}

impl<'a, T: DisplayTransport> TextDisplay<'a, T> {
    /// Wrap a transport. The display is unusable until [`Self::begin`].
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            col: 0,
            row: 0,
            width: 0,
            height: 0,
            column_offset: 0,
            letter_spacing: 0,
            skip: 0,
            font: None,
            invert_mask: 0,
            mag_factor: 1,
            #[cfg(feature = "scroll")]
            scroll: Scroller::default(),
        }
    }

    /// Attach to the display described by `config`: writes the variant's
    /// init command sequence, homes the cursor and clears the display.
    pub fn begin(&mut self, config: &DeviceConfig<'_>) -> Result<(), T::Error> {
        self.col = 0;
        self.row = 0;
        self.width = config.width;
        self.height = config.height;
        self.column_offset = config.column_offset;
        for &byte in config.init_sequence {
            self.write_command(byte)?;
        }
        self.clear()
    }

    /// Give the transport back.
    pub fn release(self) -> T {
        self.transport
    }

    /// Shared access to the transport, mainly for test doubles.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The display width in pixels.
    pub fn display_width(&self) -> u8 {
        self.width
    }

    /// The display height in pixels.
    pub fn display_height(&self) -> u8 {
        self.height
    }

    /// The display height in eight-pixel rows.
    pub fn display_rows(&self) -> u8 {
        self.height / 8
    }

    /// The current column in pixels.
    pub fn col(&self) -> u8 {
        self.col
    }

    /// The current row in eight-pixel rows.
    pub fn row(&self) -> u8 {
        self.row
    }

    // ------------------------------------------------------------------
    // Font selection and geometry

    /// Set the current font. `None` disables rendering until a font is
    /// selected again. Restores the default letter-spacing: 0 for
    /// fixed-width fonts, 1 for proportional ones.
    pub fn set_font(&mut self, font: Option<FontTable<'a>>) {
        self.font = font;
        self.letter_spacing = match font {
            Some(f) if !f.is_proportional() => 0,
            _ => 1,
        };
    }

    /// The current font.
    pub fn font(&self) -> Option<FontTable<'a>> {
        self.font
    }

    /// Width of `code` in pixels with magnification, or 0 when the code
    /// is outside the font (or no font is set).
    pub fn char_width(&self, code: u8) -> u8 {
        match self.font {
            Some(f) => self.mag_factor.wrapping_mul(f.glyph_width(code)),
            None => 0,
        }
    }

    /// Spacing of `code`: width plus letter-spacing.
    pub fn char_spacing(&self, code: u8) -> u8 {
        self.char_width(code).wrapping_add(self.letter_spacing())
    }

    /// Maximum glyph width of the current font, with magnification.
    pub fn font_width(&self) -> u8 {
        match self.font {
            Some(f) => self.mag_factor.wrapping_mul(f.width()),
            None => 0,
        }
    }

    /// Height of the current font in pixels, with magnification.
    pub fn font_height(&self) -> u8 {
        match self.font {
            Some(f) => self.mag_factor.wrapping_mul(f.height()),
            None => 0,
        }
    }

    /// Eight-pixel rows needed for one character of the current font,
    /// with magnification.
    pub fn font_rows(&self) -> u8 {
        match self.font {
            Some(f) => self.mag_factor.wrapping_mul(f.row_count()),
            None => 0,
        }
    }

    /// Width in pixels of a field of `n` characters.
    pub fn field_width(&self, n: u8) -> usize {
        n as usize * (self.font_width() as usize + self.letter_spacing() as usize)
    }

    /// Width of `text` in pixels, including letter-spacing after every
    /// character.
    ///
    /// Returns 0 if any character has zero glyph width, which is not
    /// distinguishable from an empty string. Known quirk, kept for
    /// compatibility.
    pub fn str_width(&self, text: &str) -> usize {
        let mut width = 0usize;
        for &code in text.as_bytes() {
            let cw = self.char_width(code);
            if cw == 0 {
                return 0;
            }
            width += cw as usize + self.letter_spacing() as usize;
        }
        width
    }

    // ------------------------------------------------------------------
    // Render attributes

    /// Letter-spacing in pixels with magnification.
    pub fn letter_spacing(&self) -> u8 {
        self.mag_factor.wrapping_mul(self.letter_spacing)
    }

    /// Set letter-spacing in pixels before magnification. `set_font`
    /// restores the default.
    pub fn set_letter_spacing(&mut self, pixels: u8) {
        self.letter_spacing = pixels;
    }

    /// Set the character magnification factor to one.
    pub fn set_1x(&mut self) {
        self.mag_factor = 1;
    }

    /// Set the character magnification factor to two.
    pub fn set_2x(&mut self) {
        self.mag_factor = 2;
    }

    /// The character magnification factor.
    pub fn mag_factor(&self) -> u8 {
        self.mag_factor
    }

    /// Invert pixels of subsequent writes if `enabled`.
    pub fn set_invert_mode(&mut self, enabled: bool) {
        self.invert_mask = if enabled { 0xFF } else { 0x00 };
    }

    /// Current invert mode for writes.
    pub fn invert_mode(&self) -> bool {
        self.invert_mask != 0
    }

    /// Suppress `n` leading pixel columns of the next glyph.
    pub fn skip_columns(&mut self, n: u8) {
        self.skip = n;
    }

    // ------------------------------------------------------------------
    // Direct controller commands

    /// Write a command byte to the controller. Sent immediately; ends any
    /// open buffered RAM transaction.
    pub fn write_command(&mut self, byte: u8) -> Result<(), T::Error> {
        self.transport.write(byte, WriteMode::Command)
    }

    /// Set the display contrast (0 to 255).
    pub fn set_contrast(&mut self, value: u8) -> Result<(), T::Error> {
        self.write_command(command::SET_CONTRAST)?;
        self.write_command(value)
    }

    /// Set pixel polarity for the entire display.
    pub fn invert_display(&mut self, invert: bool) -> Result<(), T::Error> {
        self.write_command(if invert {
            command::SET_INVERSE
        } else {
            command::SET_NORMAL
        })
    }

    /// Set normal or 180 degree remap mode. Many breakout boards ship in
    /// remap mode; normal mode rotates those 180 degrees.
    pub fn display_remap(&mut self, normal: bool) -> Result<(), T::Error> {
        self.write_command(if normal {
            command::SET_SEG_REMAP
        } else {
            command::SET_SEG_REMAP | 1
        })?;
        self.write_command(if normal {
            command::SET_COM_SCAN_INC
        } else {
            command::SET_COM_SCAN_DEC
        })
    }

    /// Turn the display panel on or off.
    pub fn set_display_on(&mut self, on: bool) -> Result<(), T::Error> {
        self.write_command(if on {
            command::DISPLAY_ON
        } else {
            command::DISPLAY_OFF
        })
    }

    // ------------------------------------------------------------------
    // Cursor

    /// Set the cursor column in pixels. Silently ignored when `col` is
    /// off the display.
    pub fn set_col(&mut self, col: u8) -> Result<(), T::Error> {
        if col < self.width {
            self.col = col;
            let seg = col.wrapping_add(self.column_offset);
            self.write_command(command::SET_LOW_COLUMN | (seg & 0xF))?;
            self.write_command(command::SET_HIGH_COLUMN | (seg >> 4))?;
        }
        Ok(())
    }

    /// Set the cursor row in eight-pixel rows. Silently ignored when
    /// `row` is off the display.
    pub fn set_row(&mut self, row: u8) -> Result<(), T::Error> {
        if row < self.display_rows() {
            self.row = row;
            #[cfg(feature = "scroll")]
            let page = self.row.wrapping_add(self.scroll.page_offset) & 7;
            #[cfg(not(feature = "scroll"))]
            let page = self.row & 7;
            self.write_command(command::SET_PAGE_ADDR | page)?;
        }
        Ok(())
    }

    /// Set the cursor position: `col` in pixels, `row` in eight-pixel
    /// rows. Each coordinate is ignored independently when off the
    /// display.
    pub fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), T::Error> {
        self.set_col(col)?;
        self.set_row(row)
    }

    /// Move the cursor to (0, 0).
    pub fn home(&mut self) -> Result<(), T::Error> {
        self.set_cursor(0, 0)
    }

    // ------------------------------------------------------------------
    // Clearing

    /// Clear the display and home the cursor. Also rewinds the RAM
    /// window and the start line when scrolling is enabled.
    pub fn clear(&mut self) -> Result<(), T::Error> {
        #[cfg(feature = "scroll")]
        {
            self.scroll.page_offset = 0;
            self.set_start_line(0)?;
        }
        self.clear_region(
            0,
            self.width.saturating_sub(1),
            0,
            self.display_rows().saturating_sub(1),
        )
    }

    /// Clear a region: columns `c0..=c1`, rows `r0..=r1` (clamped to the
    /// display). Cancels any pending skip. The cursor ends at `(c0, r0)`.
    pub fn clear_region(&mut self, c0: u8, c1: u8, r0: u8, r1: u8) -> Result<(), T::Error> {
        self.skip = 0;
        let r1 = r1.min(self.display_rows().saturating_sub(1));
        for r in r0..=r1 {
            self.set_cursor(c0, r)?;
            for _ in c0..=c1 {
                // The invert mask cancels itself in the write path, so a
                // cleared region is always zero in RAM.
                self.put_ram(self.invert_mask, self.width)?;
            }
        }
        self.set_cursor(c0, r0)
    }

    /// Clear a field of `n` characters of the current font starting at
    /// `(col, row)`.
    pub fn clear_field(&mut self, col: u8, row: u8, n: u8) -> Result<(), T::Error> {
        self.clear_region(
            col,
            col.wrapping_add(self.field_width(n) as u8).wrapping_sub(1),
            row,
            row.wrapping_add(self.font_rows()).wrapping_sub(1),
        )
    }

    /// Clear from the cursor to the end of the line, covering the rows
    /// of the current font. The cursor returns to where it was.
    pub fn clear_to_eol(&mut self) -> Result<(), T::Error> {
        self.clear_region(
            self.col,
            self.width.saturating_sub(1),
            self.row,
            self.row.wrapping_add(self.font_rows()).wrapping_sub(1),
        )
    }

    // ------------------------------------------------------------------
    // Writing

    /// Write one byte to display RAM at the cursor, immediately. The
    /// byte is inverted per the invert mode and the cursor advances;
    /// writes past the right edge are dropped.
    pub fn write_ram(&mut self, byte: u8) -> Result<(), T::Error> {
        if self.col < self.width {
            self.transport.write(byte ^ self.invert_mask, WriteMode::Ram)?;
            self.col += 1;
        }
        Ok(())
    }

    /// Display one character at the cursor.
    ///
    /// `\r` returns the column to 0 and `\n` additionally advances the
    /// row by the font height, applying the scroll policy. Fails with
    /// [`DisplayError::NoFont`] or [`DisplayError::UnknownChar`] without
    /// emitting anything.
    pub fn write_char(&mut self, code: u8) -> Result<(), DisplayError<T::Error>> {
        let limit = self.width;
        self.emit_char(code, limit)
    }

    /// Display each character of `text`, stopping at the first failure.
    pub fn print(&mut self, text: &str) -> Result<(), DisplayError<T::Error>> {
        for &code in text.as_bytes() {
            self.write_char(code)?;
        }
        Ok(())
    }

    /// Buffered RAM write honoring the pending skip and the right limit.
    fn put_ram(&mut self, byte: u8, limit: u8) -> Result<(), T::Error> {
        if self.skip > 0 {
            self.skip -= 1;
        } else if self.col < limit {
            self.transport
                .write(byte ^ self.invert_mask, WriteMode::RamBuffered)?;
            self.col += 1;
        }
        Ok(())
    }

    /// Glyph emission with an explicit right limit, so the ticker can
    /// narrow the render region without touching the display geometry.
    pub(crate) fn emit_char(&mut self, code: u8, limit: u8) -> Result<(), DisplayError<T::Error>> {
        let font = self.font.ok_or(DisplayError::NoFont)?;
        let glyph = match font.glyph(code) {
            Some(glyph) => glyph,
            // Control characters act only when the font does not cover
            // their code.
            None => match code {
                b'\r' => {
                    self.set_col(0)?;
                    return Ok(());
                }
                b'\n' => {
                    self.set_col(0)?;
                    self.line_feed(self.font_rows())?;
                    return Ok(());
                }
                _ => return Err(DisplayError::UnknownChar),
            },
        };

        let spacing = self.letter_spacing();
        let start_col = self.col;
        let start_row = self.row;
        let lead_skip = self.skip;
        for r in 0..glyph.rows() {
            for m in 0..self.mag_factor {
                self.skip = lead_skip;
                if r > 0 || m > 0 {
                    self.set_cursor(start_col, self.row + 1)?;
                }
                for c in 0..glyph.width() {
                    let mut byte = glyph.raster_byte(r, c);
                    if self.mag_factor == 2 {
                        let nibble = if m == 0 { byte & 0x0F } else { byte >> 4 };
                        byte = SCALED_NIBBLE[nibble as usize];
                        self.put_ram(byte, limit)?;
                    }
                    self.put_ram(byte, limit)?;
                }
                for _ in 0..spacing {
                    self.put_ram(0, limit)?;
                }
            }
        }
        self.set_row(start_row)?;
        Ok(())
    }

    /// Advance the cursor row by `rows` eight-pixel rows, applying the
    /// newline scroll policy on overflow.
    fn line_feed(&mut self, rows: u8) -> Result<(), T::Error> {
        #[cfg(feature = "scroll")]
        {
            let display_rows = self.display_rows();
            let next = self.row.wrapping_add(rows);
            let overflow = next as i16 + rows as i16 - display_rows as i16;
            if self.scroll.mode == ScrollMode::Off || overflow <= 0 {
                self.set_row(next)?;
            } else {
                self.scroll.page_offset = self.scroll.page_offset.wrapping_add(overflow as u8) & 7;
                self.row = display_rows.saturating_sub(rows);
                // Cursor is repositioned by the clear.
                self.clear_to_eol()?;
                if self.scroll.mode == ScrollMode::Auto {
                    self.set_start_line(self.scroll.page_offset_line())?;
                }
            }
        }
        #[cfg(not(feature = "scroll"))]
        self.set_row(self.row.wrapping_add(rows))?;
        Ok(())
    }
}

#[cfg(feature = "scroll")]
impl<T: DisplayTransport> TextDisplay<'_, T> {
    /// Set the newline scroll policy.
    pub fn set_scroll_mode(&mut self, mode: ScrollMode) {
        self.scroll.mode = mode;
    }

    /// The newline scroll policy.
    pub fn scroll_mode(&self) -> ScrollMode {
        self.scroll.mode
    }

    /// Set the display start line register (mod 64).
    pub fn set_start_line(&mut self, line: u8) -> Result<(), T::Error> {
        self.scroll.start_line = line & 0x3F;
        self.write_command(command::SET_START_LINE | self.scroll.start_line)
    }

    /// The display start line.
    pub fn start_line(&self) -> u8 {
        self.scroll.start_line
    }

    /// Set the RAM page at the top of the RAM window (mod 8) and
    /// re-issue the page select for the current row.
    pub fn set_page_offset(&mut self, page: u8) -> Result<(), T::Error> {
        self.scroll.page_offset = page & 7;
        self.set_row(self.row)
    }

    /// The RAM page at the top of the RAM window.
    pub fn page_offset(&self) -> u8 {
        self.scroll.page_offset
    }

    /// The display line for the page offset.
    pub fn page_offset_line(&self) -> u8 {
        self.scroll.page_offset_line()
    }

    /// Scroll the display window by `lines`.
    pub fn scroll_display(&mut self, lines: i8) -> Result<(), T::Error> {
        self.set_start_line(self.scroll.start_line.wrapping_add(lines as u8))
    }

    /// Scroll the RAM window by `rows`.
    pub fn scroll_memory(&mut self, rows: i8) -> Result<(), T::Error> {
        self.set_page_offset(self.scroll.page_offset.wrapping_add(rows as u8))
    }

    /// True when the first display line equals the start of the RAM
    /// window.
    pub fn scroll_is_synced(&self) -> bool {
        self.scroll.is_synced()
    }
}

impl<T: DisplayTransport> core::fmt::Write for TextDisplay<'_, T> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.print(s).map_err(|_| core::fmt::Error)
    }
}
