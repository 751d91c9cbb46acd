use std::time::Duration;

use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiBus};
use tracing::{debug, instrument, trace};

use crate::{
	commands::{AddressMode, Command, PixelFormat},
	error::Result,
	geometry::Window,
	transport::Transport,
};

/// How long the panel needs after a soft reset, and after being switched on.
pub const INIT_SETTLE: Duration = Duration::from_millis(20);

/// Something that can send a DCS command with its parameters.
///
/// The [`Transport`] implements this directly; other implementations wrap another sink to
/// rewrite commands on their way out, like [`ByteAddressing`].
pub trait CommandSink {
	fn send(&mut self, command: u8, params: &[u8]) -> Result<()>;
}

impl<T: CommandSink + ?Sized> CommandSink for &mut T {
	fn send(&mut self, command: u8, params: &[u8]) -> Result<()> {
		T::send(self, command, params)
	}
}

impl<SPI, DC> CommandSink for Transport<SPI, DC>
where
	SPI: SpiBus,
	DC: OutputPin,
{
	fn send(&mut self, command: u8, params: &[u8]) -> Result<()> {
		self.send_command(command)?;
		for &byte in params {
			self.send_data(byte)?;
		}
		Ok(())
	}
}

/// Standard DCS commands, available on every [`CommandSink`].
///
/// These encode parameters the way the DCS standard does, notably 16-bit big-endian address
/// coordinates. Put a [`ByteAddressing`] in front of the sink to talk to an LPH9157.
pub trait Dcs: CommandSink {
	fn soft_reset(&mut self) -> Result<()> {
		self.send(Command::SoftReset.into(), &[])
	}

	fn exit_sleep(&mut self) -> Result<()> {
		self.send(Command::ExitSleep.into(), &[])
	}

	fn display_on(&mut self) -> Result<()> {
		self.send(Command::DisplayOn.into(), &[])
	}

	fn set_address_mode(&mut self, mode: AddressMode) -> Result<()> {
		self.send(Command::AddressMode.into(), &[mode.into()])
	}

	fn set_pixel_format(&mut self, format: PixelFormat) -> Result<()> {
		self.send(Command::PixelFormat.into(), &[format.into()])
	}

	fn set_column_address(&mut self, start: u16, end: u16) -> Result<()> {
		self.send(Command::ColumnAddressSet.into(), &be_range(start, end))
	}

	fn set_page_address(&mut self, start: u16, end: u16) -> Result<()> {
		self.send(Command::PageAddressSet.into(), &be_range(start, end))
	}

	fn write_memory_start(&mut self) -> Result<()> {
		self.send(Command::MemoryWrite.into(), &[])
	}
}

impl<T: CommandSink + ?Sized> Dcs for T {}

fn be_range(start: u16, end: u16) -> [u8; 4] {
	let [start_hi, start_lo] = start.to_be_bytes();
	let [end_hi, end_lo] = end.to_be_bytes();
	[start_hi, start_lo, end_hi, end_lo]
}

/// Narrows DCS address commands to the LPH9157's one-byte coordinates.
///
/// Column and page address commands carrying the standard 4-byte payload
/// (start_hi, start_lo, end_hi, end_lo) go out as (start_lo, end_lo). Everything else is
/// forwarded untouched.
#[derive(Debug)]
pub struct ByteAddressing<S> {
	inner: S,
}

impl<S> ByteAddressing<S> {
	pub fn new(inner: S) -> Self {
		Self { inner }
	}

	pub fn inner(&self) -> &S {
		&self.inner
	}

	pub fn inner_mut(&mut self) -> &mut S {
		&mut self.inner
	}

	pub fn into_inner(self) -> S {
		self.inner
	}
}

impl<S: CommandSink> CommandSink for ByteAddressing<S> {
	fn send(&mut self, command: u8, params: &[u8]) -> Result<()> {
		let is_address = command == u8::from(Command::ColumnAddressSet)
			|| command == u8::from(Command::PageAddressSet);

		match params {
			&[_, start, _, end] if is_address => {
				trace!(command=%format!("{command:02X?}"), start, end, "narrowing address to single bytes");
				self.inner.send(command, &[start, end])
			}
			_ => self.inner.send(command, params),
		}
	}
}

/// Program the panel registers, following a soft reset.
///
/// Sends address mode, sleep exit, pixel format, and display on, with the mandated settle
/// delays before and after. Stops at the first failure.
#[instrument(level = "debug", skip(sink, delay))]
pub fn init_registers<S, D>(sink: &mut S, delay: &mut D, format: PixelFormat) -> Result<()>
where
	S: CommandSink + ?Sized,
	D: DelayNs,
{
	pause(delay, INIT_SETTLE);
	sink.set_address_mode(AddressMode::default())?;
	sink.exit_sleep()?;
	sink.set_pixel_format(format)?;
	sink.display_on()?;
	pause(delay, INIT_SETTLE);
	debug!("panel registers programmed");
	Ok(())
}

/// Set the addressing window for the next memory write.
#[instrument(level = "trace", skip(sink))]
pub fn set_window<S>(sink: &mut S, window: Window) -> Result<()>
where
	S: CommandSink + ?Sized,
{
	sink.set_column_address(window.x1().into(), window.x2().into())?;
	sink.set_page_address(window.y1().into(), window.y2().into())
}

/// Sleep for at least `duration`.
pub(crate) fn pause<D: DelayNs + ?Sized>(delay: &mut D, duration: Duration) {
	let micros = duration.as_micros() + u128::from(duration.subsec_nanos() % 1000 != 0);
	delay.delay_us(u32::try_from(micros).unwrap_or(u32::MAX));
}
