//! Just enough BMP reading to get a full frame out of a file.
//!
//! Only the data offset, dimensions and bit depth are read from the headers. Palettes,
//! compression, and row order are ignored: pixel bytes are sent to the panel as stored, apart
//! from the 16-bit byte swap.

use std::{
	fs::File,
	io::{BufReader, ErrorKind, Read, Seek, SeekFrom},
	path::Path,
};

use tracing::{debug, instrument};

use crate::{
	error::{Error, Result},
	geometry::{HEIGHT, WIDTH},
	image::{swap_pairs, Depth, PixelBuffer},
};

/// Position of the pixel data offset in the file header.
const DATA_OFFSET_POSITION: u64 = 0x0A;

/// Bytes read from [`DATA_OFFSET_POSITION`]: the data offset, then the info header up to the
/// bit depth.
const HEADER_LEN: usize = 20;

/// The fields read from the BMP headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
	pub data_offset: u32,
	pub header_size: i32,
	pub width: i32,
	pub height: i32,
	pub planes: i16,
	pub bits_per_pixel: i16,
}

impl Header {
	/// Read the header fields, leaving the reader somewhere inside the info header.
	pub fn read<R: Read + Seek>(reader: &mut R) -> Result<Self> {
		reader.seek(SeekFrom::Start(DATA_OFFSET_POSITION))?;

		let mut buf = Vec::with_capacity(HEADER_LEN);
		reader
			.by_ref()
			.take(HEADER_LEN as u64)
			.read_to_end(&mut buf)?;
		if buf.len() < HEADER_LEN {
			return Err(Error::ShortHeader {
				expected: HEADER_LEN,
				actual: buf.len(),
			});
		}

		let u32_at = |i: usize| [buf[i], buf[i + 1], buf[i + 2], buf[i + 3]];
		Ok(Self {
			data_offset: u32::from_le_bytes(u32_at(0)),
			header_size: i32::from_le_bytes(u32_at(4)),
			width: i32::from_le_bytes(u32_at(8)),
			height: i32::from_le_bytes(u32_at(12)),
			planes: i16::from_le_bytes([buf[16], buf[17]]),
			bits_per_pixel: i16::from_le_bytes([buf[18], buf[19]]),
		})
	}

	/// Check the image fits the panel exactly, and return its depth.
	pub fn validate(&self) -> Result<Depth> {
		if self.width != i32::from(WIDTH) {
			return Err(Error::Width {
				expected: WIDTH,
				actual: self.width,
			});
		}

		if self.height != i32::from(HEIGHT) {
			return Err(Error::Height {
				expected: HEIGHT,
				actual: self.height,
			});
		}

		Depth::from_bits(self.bits_per_pixel).ok_or(Error::Depth {
			actual: self.bits_per_pixel,
		})
	}
}

/// Read a full frame out of a BMP stream.
///
/// 16-bit pixels are byte-swapped into the panel's big-endian order.
#[instrument(level = "debug", skip(reader))]
pub fn read<R: Read + Seek>(reader: &mut R) -> Result<PixelBuffer> {
	let header = Header::read(reader)?;
	debug!(?header, "read BMP header");
	let depth = header.validate()?;

	reader.seek(SeekFrom::Start(header.data_offset.into()))?;
	let mut frame = PixelBuffer::blank(depth);
	let expected = frame.data().len();

	let mut actual = 0;
	let data = frame.data_mut();
	while actual < expected {
		match reader.read(&mut data[actual..]) {
			Ok(0) => return Err(Error::Truncated { expected, actual }),
			Ok(n) => actual += n,
			Err(err) if err.kind() == ErrorKind::Interrupted => {}
			Err(err) => return Err(Error::Io(err)),
		}
	}

	if depth == Depth::Sixteen {
		swap_pairs(data);
	}

	Ok(frame)
}

/// Open and read a BMP file.
#[instrument(level = "debug", skip(path), fields(path = %path.as_ref().display()))]
pub fn load(path: impl AsRef<Path>) -> Result<PixelBuffer> {
	let file = File::open(path.as_ref())?;
	read(&mut BufReader::new(file))
}

/// Build a BMP file in memory, for tests.
#[cfg(test)]
pub(crate) fn encode(width: i32, height: i32, bits: i16, pixels: &[u8]) -> Vec<u8> {
	let mut file = Vec::with_capacity(54 + pixels.len());
	file.extend_from_slice(b"BM");
	file.extend_from_slice(&(54 + pixels.len() as u32).to_le_bytes());
	file.extend_from_slice(&[0; 4]);
	file.extend_from_slice(&54u32.to_le_bytes());
	file.extend_from_slice(&40i32.to_le_bytes());
	file.extend_from_slice(&width.to_le_bytes());
	file.extend_from_slice(&height.to_le_bytes());
	file.extend_from_slice(&1i16.to_le_bytes());
	file.extend_from_slice(&bits.to_le_bytes());
	file.resize(54, 0);
	file.extend_from_slice(pixels);
	file
}

#[cfg(test)]
mod tests {
	use std::io::Cursor;

	use super::*;

	#[test]
	fn reads_the_header_fields() {
		let file = encode(132, 176, 16, &[]);
		let header = Header::read(&mut Cursor::new(file)).unwrap();
		assert_eq!(
			header,
			Header {
				data_offset: 54,
				header_size: 40,
				width: 132,
				height: 176,
				planes: 1,
				bits_per_pixel: 16,
			}
		);
	}

	#[test]
	fn sixteen_bit_pixels_are_swapped() {
		let pixels = [0xFF, 0x00].repeat(132 * 176);
		let frame = read(&mut Cursor::new(encode(132, 176, 16, &pixels))).unwrap();

		assert_eq!(frame.depth(), Depth::Sixteen);
		assert_eq!(frame.data().len(), 46464);
		assert!(frame.data().chunks(2).all(|p| p == [0x00, 0xFF]));
	}

	#[test]
	fn eight_bit_pixels_are_untouched() {
		let pixels: Vec<u8> = (0..132 * 176).map(|i| (i % 251) as u8).collect();
		let frame = read(&mut Cursor::new(encode(132, 176, 8, &pixels))).unwrap();

		assert_eq!(frame.depth(), Depth::Eight);
		assert_eq!(frame.data(), &pixels[..]);
	}

	#[test]
	fn honours_the_data_offset() {
		let mut file = encode(132, 176, 8, &[]);
		file[0x0A..0x0E].copy_from_slice(&60u32.to_le_bytes());
		file.extend_from_slice(&[0xEE; 6]);
		file.extend_from_slice(&[0x11; 132 * 176]);

		let frame = read(&mut Cursor::new(file)).unwrap();
		assert!(frame.data().iter().all(|&b| b == 0x11));
	}

	#[test]
	fn rejects_wrong_dimensions_and_depths() {
		let cases = [
			(100, 176, 16),
			(132, 175, 16),
			(176, 132, 16),
			(132, -176, 8),
			(132, 176, 24),
			(132, 176, 1),
		];
		for (width, height, bits) in cases {
			let err = read(&mut Cursor::new(encode(width, height, bits, &[]))).unwrap_err();
			assert!(err.is_validation(), "{width}x{height}@{bits}: {err:?}");
		}

		let err = read(&mut Cursor::new(encode(100, 176, 16, &[]))).unwrap_err();
		assert!(matches!(
			err,
			Error::Width {
				expected: 132,
				actual: 100
			}
		));
	}

	#[test]
	fn short_pixel_data_is_an_input_error() {
		let file = encode(132, 176, 16, &[0; 1000]);
		let err = read(&mut Cursor::new(file)).unwrap_err();
		assert!(matches!(
			err,
			Error::Truncated {
				expected: 46464,
				actual: 1000
			}
		));
		assert!(!err.is_validation());
	}

	#[test]
	fn short_header_is_an_input_error() {
		let err = read(&mut Cursor::new(b"BM\0\0".to_vec())).unwrap_err();
		assert!(matches!(
			err,
			Error::ShortHeader {
				expected: 20,
				actual: 0
			}
		));
		assert!(!err.is_validation());

		let mut file = encode(132, 176, 16, &[]);
		file.truncate(0x0A + 12);
		let err = read(&mut Cursor::new(file)).unwrap_err();
		assert!(matches!(
			err,
			Error::ShortHeader {
				expected: 20,
				actual: 12
			}
		));
		assert!(err.to_string().contains("header"), "{err}");
	}
}
