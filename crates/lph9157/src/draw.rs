use lph9157_driver::{bmp, open, DriverArgs};
use tracing::{debug, info, instrument};

use crate::{args::Args, error::CliError};

/// Draw the image on the panel.
///
/// The image is read and checked in full before any panel hardware is claimed. If bringing the
/// panel up fails, it is switched off again; a failure while drawing leaves it as it is.
///
/// Whenever the panel is switched off, this waits out the settle time before returning.
#[instrument(level = "debug", skip(args), fields(image = %args.image.display()))]
pub fn run(args: Args) -> Result<(), CliError> {
	let frame = bmp::load(&args.image).map_err(CliError::image)?;
	debug!(depth = frame.depth().bits(), "image loaded");

	let mut lcd = open(&DriverArgs::from(&args.panel)).map_err(CliError::Panel)?;
	if let Err(err) = lcd.init(frame.depth().pixel_format()) {
		lcd.power_off();
		lcd.settle();
		return Err(CliError::Panel(err));
	}

	let written = lcd.draw(&frame).map_err(CliError::Panel)?;
	info!(written, "drew {}", args.image.display());

	if args.panel.release_power {
		lcd.power_off();
		lcd.settle();
	} else {
		debug!("leaving the panel powered");
	}

	Ok(())
}
