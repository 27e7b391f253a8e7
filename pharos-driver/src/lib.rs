//! ASCII text rendering for page-addressed monochrome OLED controllers
//!
//! The driver renders characters from a compact bitmap-font format
//! directly into controller RAM, write-through, with no frame buffer.
//! It is generic over the [`pharos_core::DisplayTransport`] seam, so the
//! same rendering code runs over I2C, SPI or a recording test double.
//!
//! - [`display::TextDisplay`] — cursor engine and glyph rasterizer
//! - [`scroll`] — newline scroll policies (feature `scroll`, default on)
//! - [`ticker`] — multi-string marquee advanced one pixel per tick

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod display;
#[cfg(feature = "scroll")]
pub mod scroll;
pub mod ticker;

#[cfg(test)]
mod testutil;

pub use display::{DisplayError, TextDisplay};
#[cfg(feature = "scroll")]
pub use scroll::ScrollMode;
pub use ticker::{TickerState, TICKER_QUEUE_DIM};
