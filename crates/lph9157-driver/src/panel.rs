use std::num::NonZeroUsize;

use embedded_hal::{
	delay::DelayNs,
	digital::{OutputPin, StatefulOutputPin},
	spi::SpiBus,
};
use tracing::{info, instrument, warn};

use crate::{
	commands::PixelFormat,
	error::{Error, Result},
	geometry::Window,
	image::PixelBuffer,
	power::{PanelState, Sequencer, SettlePolicy},
	protocol::{self, ByteAddressing},
	transfer::{self, DEFAULT_CHUNK_SIZE},
	transport::Transport,
};

/// Tunables for a panel session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelOptions {
	/// Largest number of bytes to send in one SPI transaction while streaming a frame.
	pub chunk_size: NonZeroUsize,

	/// What to do if the panel is powered up again too soon after being switched off.
	pub settle: SettlePolicy,
}

impl Default for PanelOptions {
	fn default() -> Self {
		Self {
			chunk_size: DEFAULT_CHUNK_SIZE,
			settle: SettlePolicy::default(),
		}
	}
}

/// A session with one LPH9157 panel.
///
/// Owns the SPI bus, the data/command, reset and power lines, and a delay source. The bus and
/// lines are released when this is dropped (or explicitly, with [`release()`](Self::release)).
#[derive(Debug)]
pub struct Panel<SPI, DC, RST, PWR, D> {
	sink: ByteAddressing<Transport<SPI, DC>>,
	sequencer: Sequencer<RST, PWR>,
	delay: D,
	format: PixelFormat,
	chunk_size: NonZeroUsize,
}

impl<SPI, DC, RST, PWR, D> Panel<SPI, DC, RST, PWR, D>
where
	SPI: SpiBus,
	DC: OutputPin,
	RST: OutputPin,
	PWR: StatefulOutputPin,
	D: DelayNs,
{
	/// Take ownership of the panel hardware.
	///
	/// Nothing is sent to the panel until [`init()`](Self::init).
	pub fn new(
		spi: SPI,
		dc: DC,
		reset: RST,
		power: PWR,
		delay: D,
		options: PanelOptions,
	) -> Self {
		Self {
			sink: ByteAddressing::new(Transport::new(spi, dc)),
			sequencer: Sequencer::new(reset, power, options.settle),
			delay,
			format: PixelFormat::default(),
			chunk_size: options.chunk_size,
		}
	}

	pub fn state(&self) -> PanelState {
		self.sequencer.state()
	}

	/// The pixel format the panel was last initialised with.
	pub fn pixel_format(&self) -> PixelFormat {
		self.format
	}

	/// Power the panel up and program it for `format` pixels.
	///
	/// Only valid on a powered-off panel. On failure the panel is left in an indeterminate
	/// state: call [`power_off()`](Self::power_off) before trying again.
	#[instrument(level = "debug", skip(self))]
	pub fn init(&mut self, format: PixelFormat) -> Result<()> {
		self.sequencer.expect(PanelState::PoweredOff)?;

		self.sequencer
			.prepare(self.sink.inner_mut().dc_mut(), &mut self.delay)?;
		self.sequencer.reset(&mut self.sink, &mut self.delay)?;
		protocol::init_registers(&mut self.sink, &mut self.delay, format)?;
		self.sequencer.ready()?;

		self.format = format;
		info!(?format, "LPH9157 initialised");
		Ok(())
	}

	/// Set the addressing window for the next memory write.
	#[instrument(level = "trace", skip(self))]
	pub fn set_window(&mut self, window: Window) -> Result<()> {
		self.sequencer.expect(PanelState::Ready)?;
		protocol::set_window(&mut self.sink, window)
	}

	/// Draw a full frame.
	///
	/// Sets the window to the whole panel, then streams the frame in chunks. A failed chunk
	/// aborts the draw with [`Error::Transfer`]; the panel is not reset or powered off.
	#[instrument(level = "debug", skip(self, frame))]
	pub fn draw(&mut self, frame: &PixelBuffer) -> Result<usize> {
		self.sequencer.expect(PanelState::Ready)?;

		let depth = frame.depth().pixel_format();
		if depth != self.format {
			return Err(Error::Format {
				panel: self.format,
				frame: depth,
			});
		}

		self.set_window(Window::FULL)?;
		let written = transfer::stream(self.sink.inner_mut(), frame.data(), self.chunk_size)?;
		info!(written, "frame drawn");
		Ok(written)
	}

	/// Switch the panel off. Never fails; problems are logged.
	pub fn power_off(&mut self) {
		self.sequencer.power_off(self.sink.inner_mut().dc_mut());
	}

	/// Block until a powered-off panel has been off for the full settle time.
	///
	/// Use before ending a session that switched the panel off, so the next one can power it up
	/// straight away.
	pub fn settle(&mut self) {
		self.sequencer.settle(&mut self.delay);
	}

	/// Give back the hardware: SPI bus, data/command, reset and power lines, delay.
	pub fn release(self) -> (SPI, DC, RST, PWR, D) {
		let (spi, dc) = self.sink.into_inner().release();
		let (reset, power) = self.sequencer.release();
		(spi, dc, reset, power, self.delay)
	}
}

/// Power off a panel session that may not exist.
///
/// Cleanup paths can run before a session was ever opened; this only warns in that case.
pub fn power_off<SPI, DC, RST, PWR, D>(panel: Option<&mut Panel<SPI, DC, RST, PWR, D>>)
where
	SPI: SpiBus,
	DC: OutputPin,
	RST: OutputPin,
	PWR: StatefulOutputPin,
	D: DelayNs,
{
	match panel {
		Some(panel) => panel.power_off(),
		None => warn!("failed to power off LPH9157: no panel session"),
	}
}
