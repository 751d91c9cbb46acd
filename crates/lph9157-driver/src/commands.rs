use bitvec::{order::Msb0, BitArr};

/// LCD panel commands
///
/// This is the subset of the MIPI DCS command set the LPH9157 needs to draw full frames.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
	/// Software reset (SWRESET).
	///
	/// Registers go back to their defaults. This must be followed by a delay of at least 20ms
	/// before the next command.
	SoftReset = 0x01,

	/// Exit sleep mode (SLPOUT).
	ExitSleep = 0x11,

	/// Turn display on (DISPON).
	DisplayOn = 0x29,

	/// Set column addresses (CASET).
	///
	/// The DCS standard takes 2 u16s (start and end column), but the LPH9157 takes 2 u8s. See
	/// [`ByteAddressing`](crate::ByteAddressing).
	ColumnAddressSet = 0x2A,

	/// Set page (row) addresses (PASET).
	///
	/// Same quirk as [`Command::ColumnAddressSet`].
	PageAddressSet = 0x2B,

	/// Memory write (RAMWR).
	///
	/// This will consider the next bytes as pixel data to write to the addressing window.
	MemoryWrite = 0x2C,

	/// Memory addressing control (MADCTL).
	///
	/// 1 byte, see [`AddressMode`].
	AddressMode = 0x36,

	/// Interface pixel format (COLMOD).
	///
	/// 1 byte, see [`PixelFormat`].
	PixelFormat = 0x3A,
}

impl From<Command> for u8 {
	fn from(command: Command) -> u8 {
		command as u8
	}
}

/// Pixel format of the data sent after [`Command::MemoryWrite`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PixelFormat {
	/// 8 bits per pixel, 3-3-2 RGB.
	Rgb332 = 0x02,

	/// 16 bits per pixel, 5-6-5 RGB, big-endian on the wire.
	#[default]
	Rgb565 = 0x05,
}

impl PixelFormat {
	/// How many bytes a single pixel takes on the wire.
	pub const fn bytes_per_pixel(self) -> usize {
		match self {
			Self::Rgb332 => 1,
			Self::Rgb565 => 2,
		}
	}
}

impl From<PixelFormat> for u8 {
	fn from(format: PixelFormat) -> u8 {
		format as u8
	}
}

/// Memory addressing control value (MADCTL).
///
/// 6 bits, from the most significant: MY, MX, MV, ML, BGR, MH. The LPH9157 is used with all of
/// them cleared, which is the [`Default`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AddressMode(BitArr!(for 8, in u8, Msb0));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Vertical {
	TopToBottom,
	BottomToTop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Horizontal {
	LeftToRight,
	RightToLeft,
}

impl AddressMode {
	pub fn row_order(mut self, direction: Vertical) -> Self {
		self.0.set(0, direction == Vertical::BottomToTop);
		self
	}

	pub fn col_order(mut self, direction: Horizontal) -> Self {
		self.0.set(1, direction == Horizontal::RightToLeft);
		self
	}

	/// Swap rows and columns.
	pub fn exchanged(mut self, exchange: bool) -> Self {
		self.0.set(2, exchange);
		self
	}

	/// Vertical refresh order (aka Line Address Order).
	pub fn v_refresh(mut self, direction: Vertical) -> Self {
		self.0.set(3, direction == Vertical::BottomToTop);
		self
	}

	pub fn rgb(mut self) -> Self {
		self.0.set(4, false);
		self
	}

	pub fn bgr(mut self) -> Self {
		self.0.set(4, true);
		self
	}

	/// Horizontal refresh order (aka Data Latch Order).
	pub fn h_refresh(mut self, direction: Horizontal) -> Self {
		self.0.set(5, direction == Horizontal::RightToLeft);
		self
	}
}

impl From<AddressMode> for u8 {
	fn from(mode: AddressMode) -> u8 {
		let arr: [u8; 1] = mode.0.into_inner();
		arr[0]
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_address_mode_is_zero() {
		assert_eq!(u8::from(AddressMode::default()), 0x00);
	}

	#[test]
	fn address_mode_bits_follow_madctl_layout() {
		let mode = AddressMode::default()
			.row_order(Vertical::BottomToTop)
			.col_order(Horizontal::RightToLeft);
		assert_eq!(u8::from(mode), 0b1100_0000);

		let mode = AddressMode::default().exchanged(true).bgr();
		assert_eq!(u8::from(mode), 0b0010_1000);

		let mode = AddressMode::default()
			.v_refresh(Vertical::BottomToTop)
			.h_refresh(Horizontal::RightToLeft);
		assert_eq!(u8::from(mode), 0b0001_0100);

		assert_eq!(u8::from(mode.bgr().rgb()), 0b0001_0100);
	}

	#[test]
	fn pixel_format_codes() {
		assert_eq!(u8::from(PixelFormat::Rgb565), 0x05);
		assert_eq!(u8::from(PixelFormat::Rgb332), 0x02);
		assert_eq!(PixelFormat::Rgb565.bytes_per_pixel(), 2);
		assert_eq!(PixelFormat::Rgb332.bytes_per_pixel(), 1);
	}
}
