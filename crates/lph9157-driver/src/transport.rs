use std::fmt;

use embedded_hal::{
	digital::{OutputPin, PinState},
	spi::SpiBus,
};
use tracing::{instrument, trace};

use crate::error::{Error, Result};

/// Data/command line level selecting a command byte.
pub const COMMAND: PinState = PinState::Low;

/// Data/command line level selecting data bytes.
pub const DATA: PinState = PinState::High;

/// The control lines wired to the panel, besides the SPI bus itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Line {
	Power,
	Reset,
	DataCommand,
}

impl fmt::Display for Line {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Power => "power",
			Self::Reset => "reset",
			Self::DataCommand => "data/command",
		})
	}
}

/// Command/data framing over an SPI bus and a data/command select line.
///
/// Every call is exactly one bus transaction, issued in call order. Failures are returned as-is;
/// nothing is retried at this level.
#[derive(Debug)]
pub struct Transport<SPI, DC> {
	spi: SPI,
	dc: DC,
}

impl<SPI, DC> Transport<SPI, DC>
where
	SPI: SpiBus,
	DC: OutputPin,
{
	pub fn new(spi: SPI, dc: DC) -> Self {
		Self { spi, dc }
	}

	#[instrument(level = "trace", skip(self))]
	fn set_dc(&mut self, level: PinState) -> Result<()> {
		self.dc
			.set_state(level)
			.map_err(Error::pin(Line::DataCommand))
	}

	/// Send a single command byte.
	#[instrument(level = "trace", skip(self))]
	pub fn send_command(&mut self, byte: u8) -> Result<()> {
		self.set_dc(COMMAND)?;
		trace!(byte=%format!("{byte:02X?}"), "writing command byte to SPI");
		self.write_raw(&[byte])
	}

	/// Send a single data byte.
	#[instrument(level = "trace", skip(self))]
	pub fn send_data(&mut self, byte: u8) -> Result<()> {
		self.set_dc(DATA)?;
		trace!(byte=%format!("{byte:02X?}"), "writing data byte to SPI");
		self.write_raw(&[byte])
	}

	/// Write a block of data in one transaction.
	#[instrument(level = "trace", skip(self, bytes))]
	pub fn write_data(&mut self, bytes: &[u8]) -> Result<()> {
		self.set_dc(DATA)?;
		self.write_raw(bytes)
	}

	/// Latch the data/command line at data level, for a run of [`write_raw`](Self::write_raw).
	pub(crate) fn begin_data(&mut self) -> Result<()> {
		self.set_dc(DATA)
	}

	pub(crate) fn write_raw(&mut self, bytes: &[u8]) -> Result<()> {
		trace!(length = bytes.len(), "writing some bytes to SPI");
		self.spi.write(bytes).map_err(Error::write)?;
		self.spi.flush().map_err(Error::write)
	}

	pub(crate) fn dc_mut(&mut self) -> &mut DC {
		&mut self.dc
	}

	/// Give back the bus and the data/command line.
	pub fn release(self) -> (SPI, DC) {
		(self.spi, self.dc)
	}
}
