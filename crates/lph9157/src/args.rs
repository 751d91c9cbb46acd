use std::{num::NonZeroUsize, path::PathBuf};

use clap::{error::ErrorKind, CommandFactory, Parser};
use lloggs::{LoggingArgs, PreArgs, WorkerGuard};
use lph9157_driver::{DriverArgs, SettlePolicy};
use tracing::debug;

use crate::error::CliError;

/// Draw a BMP image on an LPH9157 LCD panel.
///
/// The panel is a 132x176 pixel display driven over SPI from a Raspberry Pi, with separate GPIO
/// lines for data/command select, reset, and power.
///
/// The image must be exactly 132x176 pixels, at 8 or 16 bits per pixel. It is read and checked
/// before the panel is touched.
#[derive(Debug, Clone, Parser)]
#[command(
	author,
	version,
	after_help = "Want more detail? Try the long '--help' flag!",
	after_long_help = "Didn't expect this much output? Use the short '-h' flag to get short help."
)]
pub struct Args {
	#[command(flatten)]
	pub logging: LoggingArgs,

	/// BMP image to draw.
	pub image: PathBuf,

	#[command(flatten)]
	pub panel: PanelArgs,
}

#[derive(Debug, Clone, clap::Args)]
#[command(next_help_heading = "Panel options")]
pub struct PanelArgs {
	/// SPI port to use.
	#[arg(
		long,
		default_value = "0",
		env = "LPH9157_SPI",
		value_parser = clap::value_parser!(u8).range(..=6),
	)]
	pub spi: u8,

	/// SPI CE number for the panel's chip select pin.
	#[arg(
		long,
		default_value = "0",
		env = "LPH9157_CE",
		value_parser = clap::value_parser!(u8).range(..=2),
	)]
	pub ce: u8,

	/// SPI frequency in Hz.
	#[arg(long, default_value = "12000000", env = "LPH9157_FREQUENCY")]
	pub frequency: u32,

	/// GPIO pin number for the panel's power enable pin.
	#[arg(long, default_value = "23", env = "LPH9157_POWER")]
	pub power: u8,

	/// GPIO pin number for the panel's reset pin.
	#[arg(long, default_value = "27", env = "LPH9157_RESET")]
	pub reset: u8,

	/// GPIO pin number for the panel's data/command pin.
	#[arg(long, default_value = "25", env = "LPH9157_DC")]
	pub dc: u8,

	/// Largest SPI write, in bytes, while streaming the image.
	///
	/// Raise this if your SPI controller accepts longer transfers, to draw faster.
	#[arg(long, default_value = "63", env = "LPH9157_CHUNK_SIZE")]
	pub chunk_size: NonZeroUsize,

	/// Fail instead of waiting when the panel was switched off too recently.
	///
	/// The panel must stay unpowered for at least 1.5 seconds before it is powered up again.
	#[arg(long, env = "LPH9157_NO_WAIT")]
	pub no_wait: bool,

	/// Switch the panel off when done.
	///
	/// By default the power line is left driven, so the image stays on screen after exit.
	#[arg(long, env = "LPH9157_RELEASE_POWER")]
	pub release_power: bool,
}

impl From<&PanelArgs> for DriverArgs {
	fn from(args: &PanelArgs) -> Self {
		Self {
			spi: args.spi,
			ce: args.ce,
			frequency: args.frequency,
			power: args.power,
			reset: args.reset,
			dc: args.dc,
			chunk_size: args.chunk_size,
			settle: if args.no_wait {
				SettlePolicy::Refuse
			} else {
				SettlePolicy::Wait
			},
			persist_power: !args.release_power,
		}
	}
}

pub fn get_args() -> Result<(Args, WorkerGuard), CliError> {
	let log_guard = PreArgs::parse()
		.setup()
		.map_err(|err| CliError::Logging(err.to_string()))?;

	debug!("parsing arguments");
	let args = match Args::try_parse() {
		Ok(args) => args,
		Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
			err.exit()
		}
		Err(err) => {
			return Err(CliError::Usage {
				usage: Args::command().render_usage().to_string(),
				reason: err.kind().as_str().unwrap_or("invalid arguments").to_owned(),
			})
		}
	};

	let log_guard = match log_guard {
		Some(g) => g,
		None => args
			.logging
			.setup(|v| match v {
				0 => "info",
				1 => "info,lph9157=debug",
				2 => "debug",
				3 => "debug,lph9157=trace",
				_ => "trace",
			})
			.map_err(|err| CliError::Logging(err.to_string()))?,
	};

	debug!(?args, "got arguments");
	Ok((args, log_guard))
}

#[test]
fn verify_cli() {
	Args::command().debug_assert()
}

#[test]
fn panel_args_map_onto_the_driver() {
	let args = Args::parse_from(["lph9157", "image.bmp", "--no-wait", "--chunk-size", "4096"]);
	let driver = DriverArgs::from(&args.panel);
	assert_eq!(driver.settle, SettlePolicy::Refuse);
	assert_eq!(driver.chunk_size.get(), 4096);
	assert!(driver.persist_power);
	assert_eq!(driver.frequency, DriverArgs::default().frequency);
}

#[test]
fn chunk_size_cannot_be_zero() {
	let err = Args::try_parse_from(["lph9157", "image.bmp", "--chunk-size", "0"]).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::ValueValidation);
}
