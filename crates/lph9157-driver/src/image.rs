use crate::{
	commands::PixelFormat,
	error::{Error, Result},
	geometry::{HEIGHT, WIDTH},
};

/// Bit depth of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Depth {
	/// One byte per pixel.
	Eight,

	/// Two bytes per pixel.
	Sixteen,
}

impl Depth {
	/// Depth from a bits-per-pixel count; only 8 and 16 are supported.
	pub fn from_bits(bits: i16) -> Option<Self> {
		match bits {
			8 => Some(Self::Eight),
			16 => Some(Self::Sixteen),
			_ => None,
		}
	}

	pub fn bits(self) -> u16 {
		match self {
			Self::Eight => 8,
			Self::Sixteen => 16,
		}
	}

	pub fn bytes_per_pixel(self) -> usize {
		self.pixel_format().bytes_per_pixel()
	}

	/// The panel pixel format for data of this depth.
	pub fn pixel_format(self) -> PixelFormat {
		match self {
			Self::Eight => PixelFormat::Rgb332,
			Self::Sixteen => PixelFormat::Rgb565,
		}
	}
}

/// One full frame of pixel data, in the byte order the panel expects on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
	depth: Depth,
	data: Vec<u8>,
}

impl PixelBuffer {
	/// Byte length of a full frame at this depth.
	pub fn frame_len(depth: Depth) -> usize {
		usize::from(WIDTH) * usize::from(HEIGHT) * depth.bytes_per_pixel()
	}

	/// Wrap wire-order pixel data, which must be exactly one full frame.
	pub fn new(depth: Depth, data: Vec<u8>) -> Result<Self> {
		let expected = Self::frame_len(depth);
		if data.len() != expected {
			return Err(Error::FrameLength {
				expected,
				actual: data.len(),
			});
		}

		Ok(Self { depth, data })
	}

	/// An all-zero (black) frame.
	pub fn blank(depth: Depth) -> Self {
		Self {
			depth,
			data: vec![0; Self::frame_len(depth)],
		}
	}

	pub fn width(&self) -> u16 {
		WIDTH
	}

	pub fn height(&self) -> u16 {
		HEIGHT
	}

	pub fn depth(&self) -> Depth {
		self.depth
	}

	pub fn data(&self) -> &[u8] {
		&self.data
	}

	pub(crate) fn data_mut(&mut self) -> &mut [u8] {
		&mut self.data
	}

	pub fn into_inner(self) -> Vec<u8> {
		self.data
	}
}

/// Swap the bytes of every 2-byte pixel, in place.
///
/// Converts little-endian 16-bit pixels to big-endian and back. A trailing odd byte is left
/// alone.
pub fn swap_pairs(data: &mut [u8]) {
	for pair in data.chunks_exact_mut(2) {
		pair.swap(0, 1);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn frame_lengths() {
		assert_eq!(PixelBuffer::frame_len(Depth::Sixteen), 46464);
		assert_eq!(PixelBuffer::frame_len(Depth::Eight), 23232);
	}

	#[test]
	fn partial_frames_are_rejected() {
		assert!(matches!(
			PixelBuffer::new(Depth::Sixteen, vec![0; 23232]),
			Err(Error::FrameLength {
				expected: 46464,
				actual: 23232
			})
		));
		assert!(PixelBuffer::new(Depth::Eight, vec![0; 23233]).is_err());
		assert!(PixelBuffer::new(Depth::Eight, vec![0; 23232]).is_ok());
	}

	#[test]
	fn depth_from_bits() {
		assert_eq!(Depth::from_bits(8), Some(Depth::Eight));
		assert_eq!(Depth::from_bits(16), Some(Depth::Sixteen));
		for bits in [0, 1, 4, 12, 15, 24, 32, -16] {
			assert_eq!(Depth::from_bits(bits), None);
		}
	}

	#[test]
	fn swap_is_an_involution() {
		let original: Vec<u8> = (0..=255).chain(0..=100).collect();
		let mut data = original.clone();

		swap_pairs(&mut data);
		assert_ne!(data, original);
		assert_eq!(&data[..4], &[1, 0, 3, 2]);

		swap_pairs(&mut data);
		assert_eq!(data, original);
	}
}
