use std::time::Duration;

use crate::{power::PanelState, transport::Line, PixelFormat};

/// Error type for driver operations.
#[derive(Debug, thiserror::Error)]
#[cfg_attr(feature = "miette", derive(miette::Diagnostic))]
pub enum Error {
	#[error("GPIO error")]
	#[cfg_attr(
		feature = "miette",
		diagnostic(help("GPIO error, check the pin numbers"))
	)]
	Gpio(#[from] rppal::gpio::Error),

	#[error("SPI error")]
	#[cfg_attr(
		feature = "miette",
		diagnostic(help("SPI error, check the bus and chip select numbers"))
	)]
	Spi(#[from] rppal::spi::Error),

	#[error("no SPI device spidev{bus}.{ce}")]
	#[cfg_attr(
		feature = "miette",
		diagnostic(help("the SPI bus must be 0 to 6, and the chip select 0 to 2"))
	)]
	SpiDevice { bus: u8, ce: u8 },

	#[error("failed to drive the {line} line: {kind:?}")]
	Pin {
		line: Line,
		kind: embedded_hal::digital::ErrorKind,
	},

	#[error("SPI write failed: {kind:?}")]
	Write { kind: embedded_hal::spi::ErrorKind },

	#[error("frame transfer aborted after {written} of {total} bytes: {kind:?}")]
	#[cfg_attr(
		feature = "miette",
		diagnostic(help("the panel now holds a partially drawn frame"))
	)]
	Transfer {
		written: usize,
		total: usize,
		kind: embedded_hal::spi::ErrorKind,
	},

	#[error("BMP header is too short: expected {expected} bytes from offset 0x0A, got {actual}")]
	ShortHeader { expected: usize, actual: usize },

	#[error("image is too short: expected {expected} bytes of pixel data, got {actual}")]
	Truncated { expected: usize, actual: usize },

	#[error("BMP image width must be {expected}, but it was {actual}")]
	Width { expected: u16, actual: i32 },

	#[error("BMP image height must be {expected}, but it was {actual}")]
	Height { expected: u16, actual: i32 },

	#[error("BMP image must be 16 or 8 bits per pixel, but it was {actual}")]
	Depth { actual: i16 },

	#[error("pixel buffer is {actual} bytes, a full frame is {expected}")]
	FrameLength { expected: usize, actual: usize },

	#[error("window ({x1},{y1})-({x2},{y2}) is inverted or exceeds the panel")]
	Window { x1: u8, y1: u8, x2: u8, y2: u8 },

	#[error("panel is {actual}, but this needs it {expected}")]
	#[cfg_attr(
		feature = "miette",
		diagnostic(help(
			"a panel is initialised from powered off, and drawn on once ready"
		))
	)]
	State {
		expected: PanelState,
		actual: PanelState,
	},

	#[error("frame is {frame:?} but the panel was initialised for {panel:?}")]
	Format {
		panel: PixelFormat,
		frame: PixelFormat,
	},

	#[error("panel was powered off too recently, {remaining:?} left to settle")]
	#[cfg_attr(
		feature = "miette",
		diagnostic(help("the panel must stay unpowered for at least 1.5s"))
	)]
	Settling { remaining: Duration },

	#[error("I/O error")]
	#[cfg_attr(feature = "miette", diagnostic(help("local (non-SPI/GPIO) I/O error")))]
	Io(#[from] std::io::Error),
}

impl Error {
	/// Whether this error says the input image itself is unacceptable.
	///
	/// Such errors are final: trying again with the same image can never succeed.
	pub fn is_validation(&self) -> bool {
		matches!(
			self,
			Self::Width { .. } | Self::Height { .. } | Self::Depth { .. }
		)
	}

	pub(crate) fn pin<E: embedded_hal::digital::Error>(line: Line) -> impl FnOnce(E) -> Self {
		move |err| Self::Pin {
			line,
			kind: err.kind(),
		}
	}

	pub(crate) fn write<E: embedded_hal::spi::Error>(err: E) -> Self {
		Self::Write { kind: err.kind() }
	}
}

/// Convenience type for Results in this crate.
pub type Result<T> = std::result::Result<T, Error>;
