//! Streaming frames into panel RAM.

use std::num::NonZeroUsize;

use embedded_hal::{digital::OutputPin, spi::SpiBus};
use tracing::{debug, error, instrument};

use crate::{
	commands::Command,
	error::{Error, Result},
	transport::Transport,
};

/// The largest write the reference hardware accepts in one SPI transaction.
pub const DEFAULT_CHUNK_SIZE: NonZeroUsize = match NonZeroUsize::new(63) {
	Some(n) => n,
	None => unreachable!(),
};

/// Start a memory write and stream `data` to the panel in `chunk`-sized writes.
///
/// The data/command line stays at data level for the whole stream. The last write may be
/// shorter than `chunk`. If a write fails, the rest is abandoned and [`Error::Transfer`]
/// reports how many bytes made it; nothing is retried.
///
/// Returns the number of bytes written, which is always `data.len()`.
#[instrument(level = "debug", skip(transport, data), fields(length = data.len()))]
pub fn stream<SPI, DC>(
	transport: &mut Transport<SPI, DC>,
	data: &[u8],
	chunk: NonZeroUsize,
) -> Result<usize>
where
	SPI: SpiBus,
	DC: OutputPin,
{
	transport.send_command(Command::MemoryWrite.into())?;
	transport.begin_data()?;

	let total = data.len();
	let mut written = 0;
	for piece in data.chunks(chunk.get()) {
		match transport.write_raw(piece) {
			Ok(()) => written += piece.len(),
			Err(Error::Write { kind }) => {
				error!(written, total, ?kind, "failed to write image data into SPI");
				return Err(Error::Transfer {
					written,
					total,
					kind,
				});
			}
			Err(err) => return Err(err),
		}
	}

	debug!(written, chunks = total.div_ceil(chunk.get()), "frame streamed");
	Ok(written)
}
