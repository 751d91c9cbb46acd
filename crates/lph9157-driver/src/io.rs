use std::num::NonZeroUsize;

use rppal::{
	gpio::{Gpio, OutputPin},
	hal::Delay,
	spi::{Bus, Mode, SlaveSelect, Spi},
};
use tracing::{debug, info, instrument};

use crate::{
	error::{Error, Result},
	panel::{Panel, PanelOptions},
	power::SettlePolicy,
	transfer::DEFAULT_CHUNK_SIZE,
};

/// A panel session on Raspberry Pi hardware.
pub type RppalPanel = Panel<Spi, OutputPin, OutputPin, OutputPin, Delay>;

/// Arguments to open an LCD panel session.
///
/// This is a struct to hold the arguments for the LCD driver: SPI port and frequency, GPIO pins,
/// transfer and power behaviour.
///
/// It implements [`Default`] with the default wiring.
#[derive(Debug, Clone)]
pub struct DriverArgs {
	/// SPI port to use.
	///
	/// Defaults to 0.
	pub spi: u8,

	/// SPI CE number for the panel's chip select pin.
	///
	/// Defaults to 0.
	pub ce: u8,

	/// SPI frequency in Hz.
	///
	/// Defaults to 12 MHz.
	pub frequency: u32,

	/// GPIO pin number for the panel's power enable pin.
	///
	/// Defaults to 23.
	pub power: u8,

	/// GPIO pin number for the panel's reset pin.
	///
	/// Defaults to 27.
	pub reset: u8,

	/// GPIO pin number for the panel's data/command pin.
	///
	/// Defaults to 25.
	pub dc: u8,

	/// Largest SPI write while streaming a frame.
	///
	/// Defaults to 63 bytes.
	pub chunk_size: NonZeroUsize,

	/// What to do when re-powering the panel too soon.
	///
	/// Defaults to waiting.
	pub settle: SettlePolicy,

	/// Leave the power, reset and data/command lines as driven after the session ends, so the
	/// panel stays lit and showing its image.
	///
	/// When false, rppal restores each line to what it was before [`open()`] claimed it.
	///
	/// Defaults to true.
	pub persist_power: bool,
}

impl Default for DriverArgs {
	fn default() -> Self {
		Self {
			spi: 0,
			ce: 0,
			frequency: 12_000_000,
			power: 23,
			reset: 27,
			dc: 25,
			chunk_size: DEFAULT_CHUNK_SIZE,
			settle: SettlePolicy::default(),
			persist_power: true,
		}
	}
}

/// Connect to the LCD panel I/O.
///
/// This performs the necessary setup for the GPIO and SPI pins, but doesn't touch the panel
/// otherwise. Usually you'll want to call [`Panel::init()`] right after.
///
/// The power pin keeps its current level when claimed, so a panel left on by a previous session
/// is noticed (and properly cycled) by `init()`.
///
/// With [`DriverArgs::persist_power`], all three lines stay as driven when the session ends:
/// restoring just one of them (reset, say) would blank or hang a panel that is still powered.
#[instrument(level = "debug")]
pub fn open(args: &DriverArgs) -> Result<RppalPanel> {
	let bus = spi_bus(args.spi, args.ce)?;
	let ce = slave_select(args.spi, args.ce)?;

	let gpio = Gpio::new()?;
	let mut power = gpio.get(args.power)?.into_output();
	let mut reset = gpio.get(args.reset)?.into_output_high();
	let mut dc = gpio.get(args.dc)?.into_output_low();
	for pin in [&mut power, &mut reset, &mut dc] {
		pin.set_reset_on_drop(!args.persist_power);
	}

	let mut spi = Spi::new(bus, ce, args.frequency, Mode::Mode0)?;
	spi.set_bits_per_word(8)?;
	debug!(clock = spi.clock_speed()?, "SPI configured");

	info!(
		"opened LPH9157 on spidev{}.{} @{}MHz",
		args.spi,
		args.ce,
		args.frequency / 1_000_000
	);

	Ok(Panel::new(
		spi,
		dc,
		reset,
		power,
		Delay::new(),
		PanelOptions {
			chunk_size: args.chunk_size,
			settle: args.settle,
		},
	))
}

fn spi_bus(bus: u8, ce: u8) -> Result<Bus> {
	Ok(match bus {
		0 => Bus::Spi0,
		1 => Bus::Spi1,
		2 => Bus::Spi2,
		3 => Bus::Spi3,
		4 => Bus::Spi4,
		5 => Bus::Spi5,
		6 => Bus::Spi6,
		_ => return Err(Error::SpiDevice { bus, ce }),
	})
}

fn slave_select(bus: u8, ce: u8) -> Result<SlaveSelect> {
	Ok(match ce {
		0 => SlaveSelect::Ss0,
		1 => SlaveSelect::Ss1,
		2 => SlaveSelect::Ss2,
		_ => return Err(Error::SpiDevice { bus, ce }),
	})
}
