use std::process::ExitCode;

use lph9157_driver::Error;
use miette::Report;

/// Everything that can stop the tool, by how it exits.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum CliError {
	#[error("wrong arguments: {reason}")]
	#[diagnostic(help("pass exactly one argument: the BMP image to draw"))]
	Usage { usage: String, reason: String },

	#[error(transparent)]
	#[diagnostic(transparent)]
	Input(Error),

	#[error(transparent)]
	#[diagnostic(transparent)]
	Validation(Error),

	#[error(transparent)]
	#[diagnostic(transparent)]
	Panel(Error),

	#[error("failed to set up logging: {0}")]
	Logging(String),
}

impl CliError {
	/// Sort an error from reading the image into bad input or an unacceptable image.
	pub fn image(err: Error) -> Self {
		if err.is_validation() {
			Self::Validation(err)
		} else {
			Self::Input(err)
		}
	}

	pub fn exit_code(&self) -> u8 {
		match self {
			Self::Usage { .. } => 1,
			Self::Input(_) | Self::Logging(_) => 2,
			Self::Validation(_) => 3,
			Self::Panel(_) => 4,
		}
	}

	/// Report the error and give the process exit code.
	///
	/// Usage goes to stdout, everything else to stderr.
	pub fn exit(self) -> ExitCode {
		let code = self.exit_code();
		if let Self::Usage { usage, .. } = &self {
			println!("{usage}");
		}

		eprintln!("{:?}", Report::new(self));
		ExitCode::from(code)
	}
}
