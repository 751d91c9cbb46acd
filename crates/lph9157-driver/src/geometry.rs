use crate::error::{Error, Result};

/// Panel width in pixels.
pub const WIDTH: u16 = 132;

/// Panel height in pixels.
pub const HEIGHT: u16 = 176;

/// The addressing window: the rectangle of panel RAM the next memory write fills.
///
/// Coordinates are inclusive, and each fits in a single byte, which is all the panel accepts.
/// Windows only come from [`Window::new`] (or [`Window::FULL`]), so they are always ordered and
/// inside the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
	x1: u8,
	y1: u8,
	x2: u8,
	y2: u8,
}

impl Window {
	/// The whole panel: (0, 0) to (131, 175).
	pub const FULL: Self = Self {
		x1: 0,
		y1: 0,
		x2: (WIDTH - 1) as u8,
		y2: (HEIGHT - 1) as u8,
	};

	pub fn new(x1: u8, y1: u8, x2: u8, y2: u8) -> Result<Self> {
		if x1 > x2 || y1 > y2 || u16::from(x2) >= WIDTH || u16::from(y2) >= HEIGHT {
			return Err(Error::Window { x1, y1, x2, y2 });
		}

		Ok(Self { x1, y1, x2, y2 })
	}

	pub fn x1(&self) -> u8 {
		self.x1
	}

	pub fn y1(&self) -> u8 {
		self.y1
	}

	pub fn x2(&self) -> u8 {
		self.x2
	}

	pub fn y2(&self) -> u8 {
		self.y2
	}

	/// Number of pixels covered by the window.
	pub fn area(&self) -> usize {
		(usize::from(self.x2 - self.x1) + 1) * (usize::from(self.y2 - self.y1) + 1)
	}
}
