#![cfg(target_os = "linux")]

//! A driver for the LPH9157 132x176 LCD panel.
//!
//! The panel speaks a MIPI-DBI (type C, 4-wire) flavour of the DCS command set over SPI, with a
//! separate data/command select line, a reset line, and a power-enable line. This crate brings
//! the panel up, programs its registers, and streams whole frames into its RAM.
//!
//! The hardware is reached through [`embedded_hal`] traits, so the same protocol code runs
//! against any SPI bus and GPIO implementation. On Linux, [`open()`] wires everything up with
//! [rppal] on a Raspberry Pi.
//!
//! The panel has one well-known quirk: its column and page address registers take one byte per
//! coordinate, where the DCS standard sends two. [`ByteAddressing`] rewrites those commands on
//! their way to the bus, whichever code issues them.
//!
//! [rppal]: https://docs.rs/rppal
//!
//! # Example
//!
//! ```no_run
//! # use lph9157_driver::{bmp, open, DriverArgs, Result};
//! # fn main() -> Result<()> {
//! let frame = bmp::load("picture.bmp")?;
//!
//! let mut lcd = open(&DriverArgs::default())?;
//! if let Err(err) = lcd.init(frame.depth().pixel_format()) {
//! 	lcd.power_off();
//! 	return Err(err);
//! }
//!
//! lcd.draw(&frame)?;
//! # Ok(()) }
//! ```

#[doc(inline)]
pub use commands::*;

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use geometry::*;

#[doc(inline)]
pub use image::*;

#[doc(inline)]
pub use io::*;

#[doc(inline)]
pub use panel::*;

#[doc(inline)]
pub use power::{PanelState, Sequencer, SettlePolicy, RESET_PULSE, SETTLE_TIME};

#[doc(inline)]
pub use protocol::*;

#[doc(inline)]
pub use transport::*;

pub mod bmp;
mod commands;
mod error;
mod geometry;
mod graphics;
mod image;
mod io;
mod panel;
mod power;
mod protocol;
pub mod transfer;
mod transport;

#[cfg(test)]
mod mock;
