//! Ticker: a multi-string marquee within a fixed display sub-region
//!
//! The ticker multiplexes a bounded queue of strings into one horizontal
//! scroll, advanced exactly one pixel per [`TextDisplay::ticker_tick`]
//! call. Timing policy lives entirely with the caller; the engine only
//! steps state.

use heapless::Vec;
use pharos_core::{DisplayTransport, FontTable};

use crate::display::{DisplayError, TextDisplay};

/// Capacity of the ticker text queue.
pub const TICKER_QUEUE_DIM: usize = 6;

/// State for one ticker region. Caller-allocated; reinitialized by
/// [`TextDisplay::ticker_init`].
#[derive(Debug, Default)]
pub struct TickerState<'a> {
    /// Queued strings, head first. The head shrinks from the front as it
    /// scrolls past the begin column.
    pub(crate) queue: Vec<&'a [u8], TICKER_QUEUE_DIM>,
    pub(crate) font: Option<FontTable<'a>>,
    pub(crate) mag2x: bool,
    pub(crate) row: u8,
    pub(crate) begin_col: u8,
    pub(crate) end_col: u8,
    /// Clear and initialize the display sub-region on the next tick.
    pub(crate) init: bool,
    /// Column of the first displayed pixel.
    pub(crate) col: u8,
    /// Pixels to skip in the first displayed character.
    pub(crate) skip: u8,
}

impl<'a> TickerState<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `text` to the display queue. Returns false when the queue
    /// is at capacity (queue unchanged). Queueing onto an empty queue
    /// arms the region initialization for the next tick.
    pub fn enqueue(&mut self, text: &'a str) -> bool {
        if self.queue.is_full() {
            return false;
        }
        if self.queue.is_empty() {
            self.init = true;
        }
        // Capacity checked above.
        let _ = self.queue.push(text.as_bytes());
        true
    }

    /// Drop every queued string unconditionally.
    pub fn clear_queue(&mut self) {
        self.queue.clear();
    }

    /// Count of free queue slots.
    pub fn queue_free(&self) -> usize {
        TICKER_QUEUE_DIM - self.queue.len()
    }

    /// Count of used queue slots.
    pub fn queue_used(&self) -> usize {
        self.queue.len()
    }
}

impl<'a, T: DisplayTransport> TextDisplay<'a, T> {
    /// Set up `state` for a ticker on `row` spanning `begin_col..=end_col`
    /// (the end column is clamped to the display) and empty its queue.
    pub fn ticker_init(
        &self,
        state: &mut TickerState<'a>,
        font: FontTable<'a>,
        row: u8,
        mag2x: bool,
        begin_col: u8,
        end_col: u8,
    ) {
        state.font = Some(font);
        state.row = row;
        state.mag2x = mag2x;
        state.begin_col = begin_col;
        state.end_col = if end_col < self.display_width() {
            end_col
        } else {
            self.display_width().saturating_sub(1)
        };
        state.queue.clear();
    }

    /// Advance the ticker by one pixel.
    ///
    /// Returns `None` when the ticker is not runnable (no font), else the
    /// number of queued strings; `Some(0)` means finished or idle.
    /// Unrenderable characters in queued text are skipped; bus errors
    /// propagate.
    pub fn ticker_tick(&mut self, state: &mut TickerState<'a>) -> Result<Option<u8>, T::Error> {
        let font = match state.font {
            Some(font) => font,
            None => return Ok(None),
        };
        if state.queue.is_empty() {
            return Ok(Some(0));
        }
        self.set_font(Some(font));
        if state.mag2x {
            self.set_2x();
        } else {
            self.set_1x();
        }
        let glyph_rows = self.font_rows();
        let last_row = state.row.wrapping_add(glyph_rows).wrapping_sub(1);
        if state.init {
            self.clear_region(state.begin_col, state.end_col, state.row, last_row)?;
            state.col = state.end_col;
            state.skip = 0;
            state.init = false;
        }

        // Glyph emission clamps at the ticker's right edge instead of
        // the display edge.
        let limit = state.end_col.saturating_add(1);
        self.skip_columns(state.skip);
        self.set_cursor(state.col, state.row)?;
        for i in 0..state.queue.len() {
            let mut text = state.queue[i];
            while let Some((&code, rest)) = text.split_first() {
                if self.col() > state.end_col {
                    break;
                }
                if let Err(DisplayError::Bus(err)) = self.emit_char(code, limit) {
                    return Err(err);
                }
                text = rest;
            }
            if self.col() > state.end_col {
                break;
            }
        }
        // Erase the scroll artifact column behind the text.
        if self.col() <= state.end_col {
            let col = self.col();
            self.clear_region(col, col, state.row, last_row)?;
        }

        // A single fully-consumed string means the scroll is complete.
        if state.queue.len() == 1 && state.queue[0].is_empty() {
            state.queue.clear();
            return Ok(Some(0));
        }

        if state.col > state.begin_col {
            state.col -= 1;
        } else {
            state.skip = state.skip.saturating_add(1);
            let head = state.queue[0].first().copied().unwrap_or(0);
            if state.skip >= self.char_spacing(head) {
                state.skip = 0;
                if !state.queue[0].is_empty() {
                    state.queue[0] = &state.queue[0][1..];
                }
                if state.queue[0].is_empty() && state.queue.len() > 1 {
                    state.queue.remove(0);
                }
            }
        }
        Ok(Some(state.queue.len() as u8))
    }
}
