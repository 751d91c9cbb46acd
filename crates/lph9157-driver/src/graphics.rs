use std::convert::Infallible;

use embedded_graphics::{
	draw_target::DrawTarget,
	geometry::{OriginDimensions, Size},
	pixelcolor::{
		raw::{RawData, RawU16},
		Rgb565, RgbColor,
	},
	Pixel,
};

use crate::{
	geometry::{HEIGHT, WIDTH},
	image::{Depth, PixelBuffer},
};

impl PixelBuffer {
	/// Store one pixel in wire order, converting down to 3-3-2 RGB for 8-bit frames.
	fn put(&mut self, index: usize, colour: Rgb565) {
		match self.depth() {
			Depth::Sixteen => {
				let bytes = RawU16::from(colour).into_inner().to_be_bytes();
				self.data_mut()[index * 2..index * 2 + 2].copy_from_slice(&bytes);
			}
			Depth::Eight => {
				self.data_mut()[index] = rgb332(colour);
			}
		}
	}
}

fn rgb332(colour: Rgb565) -> u8 {
	((colour.r() >> 2) << 5) | ((colour.g() >> 3) << 2) | (colour.b() >> 3)
}

impl OriginDimensions for PixelBuffer {
	fn size(&self) -> Size {
		Size::new(WIDTH.into(), HEIGHT.into())
	}
}

impl DrawTarget for PixelBuffer {
	type Color = Rgb565;
	type Error = Infallible;

	fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
	where
		I: IntoIterator<Item = Pixel<Self::Color>>,
	{
		for Pixel(coord, colour) in pixels.into_iter() {
			let Ok(x) = u16::try_from(coord.x) else {
				continue;
			};
			let Ok(y) = u16::try_from(coord.y) else {
				continue;
			};

			if x >= WIDTH || y >= HEIGHT {
				continue;
			}

			self.put(usize::from(y) * usize::from(WIDTH) + usize::from(x), colour);
		}

		Ok(())
	}

	fn clear(&mut self, colour: Self::Color) -> Result<(), Self::Error> {
		for index in 0..usize::from(WIDTH) * usize::from(HEIGHT) {
			self.put(index, colour);
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use embedded_graphics::{
		prelude::*,
		primitives::{PrimitiveStyle, Rectangle},
	};

	use super::*;

	#[test]
	fn draws_big_endian_rgb565() {
		let mut frame = PixelBuffer::blank(Depth::Sixteen);
		frame.clear(Rgb565::new(31, 0, 0)).unwrap();
		assert!(frame.data().chunks(2).all(|p| p == [0xF8, 0x00]));
	}

	#[test]
	fn draws_rgb332_on_eight_bit_frames() {
		let mut frame = PixelBuffer::blank(Depth::Eight);
		frame.clear(Rgb565::WHITE).unwrap();
		assert!(frame.data().iter().all(|&b| b == 0xFF));

		frame.clear(Rgb565::new(0, 63, 0)).unwrap();
		assert!(frame.data().iter().all(|&b| b == 0b000_111_00));
	}

	#[test]
	fn clips_to_the_panel() {
		let mut frame = PixelBuffer::blank(Depth::Eight);
		Rectangle::new(Point::new(130, 174), Size::new(10, 10))
			.into_styled(PrimitiveStyle::with_fill(Rgb565::WHITE))
			.draw(&mut frame)
			.unwrap();

		let lit: Vec<usize> = frame
			.data()
			.iter()
			.enumerate()
			.filter(|&(_, &b)| b != 0)
			.map(|(i, _)| i)
			.collect();
		assert_eq!(lit, vec![174 * 132 + 130, 174 * 132 + 131, 175 * 132 + 130, 175 * 132 + 131]);
	}
}
