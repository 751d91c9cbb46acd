//! Recording stand-ins for the panel hardware.

use std::{cell::RefCell, rc::Rc, time::Duration};

use embedded_hal::{
	delay::DelayNs,
	digital::{self, OutputPin, PinState, StatefulOutputPin},
	spi::{self, ErrorKind, SpiBus},
};

use crate::{panel::Panel, transport::Line, PanelOptions};

pub type MockPanel = Panel<MockSpi, MockPin, MockPin, MockPin, MockDelay>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
	Pin(Line, PinState),
	Write(Vec<u8>),
	Delay(Duration),
}

#[derive(Debug, Default)]
struct Inner {
	events: Vec<Event>,
	attempts: usize,
}

/// Shared record of everything the hardware was asked to do, in order.
#[derive(Debug, Clone, Default)]
pub struct Log(Rc<RefCell<Inner>>);

impl Log {
	fn push(&self, event: Event) {
		self.0.borrow_mut().events.push(event);
	}

	pub fn events(&self) -> Vec<Event> {
		self.0.borrow().events.clone()
	}

	pub fn clear(&self) {
		self.0.borrow_mut().events.clear();
	}

	pub fn writes(&self) -> Vec<Vec<u8>> {
		self.events()
			.into_iter()
			.filter_map(|e| match e {
				Event::Write(bytes) => Some(bytes),
				_ => None,
			})
			.collect()
	}

	pub fn delays(&self) -> Vec<Duration> {
		self.events()
			.into_iter()
			.filter_map(|e| match e {
				Event::Delay(d) => Some(d),
				_ => None,
			})
			.collect()
	}

	pub fn levels(&self, line: Line) -> Vec<PinState> {
		self.events()
			.into_iter()
			.filter_map(|e| match e {
				Event::Pin(l, level) if l == line => Some(level),
				_ => None,
			})
			.collect()
	}

	/// Number of SPI writes attempted, including failed ones.
	pub fn attempts(&self) -> usize {
		self.0.borrow().attempts
	}

	pub fn spi(&self) -> MockSpi {
		MockSpi {
			log: self.clone(),
			fail_at: None,
		}
	}

	/// An SPI bus whose write number `index` (from zero) fails.
	pub fn failing_spi(&self, index: usize) -> MockSpi {
		MockSpi {
			log: self.clone(),
			fail_at: Some(index),
		}
	}

	pub fn pin(&self, line: Line) -> MockPin {
		self.pin_at(line, PinState::Low)
	}

	pub fn pin_at(&self, line: Line, level: PinState) -> MockPin {
		MockPin {
			log: self.clone(),
			line,
			level,
			broken: false,
		}
	}

	/// A line that can be read but refuses to be driven.
	pub fn failing_pin(&self, line: Line) -> MockPin {
		MockPin {
			broken: true,
			..self.pin(line)
		}
	}

	pub fn delay(&self) -> MockDelay {
		MockDelay { log: self.clone() }
	}

	pub fn panel(&self, options: PanelOptions) -> MockPanel {
		self.panel_with(self.spi(), options)
	}

	pub fn failing_panel(&self, index: usize, options: PanelOptions) -> MockPanel {
		self.panel_with(self.failing_spi(index), options)
	}

	fn panel_with(&self, spi: MockSpi, options: PanelOptions) -> MockPanel {
		Panel::new(
			spi,
			self.pin(Line::DataCommand),
			self.pin(Line::Reset),
			self.pin(Line::Power),
			self.delay(),
			options,
		)
	}
}

#[derive(Debug)]
pub struct MockSpi {
	log: Log,
	fail_at: Option<usize>,
}

impl spi::ErrorType for MockSpi {
	type Error = ErrorKind;
}

impl SpiBus<u8> for MockSpi {
	fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
		words.fill(0);
		Ok(())
	}

	fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
		let attempt = {
			let mut inner = self.log.0.borrow_mut();
			inner.attempts += 1;
			inner.attempts - 1
		};

		if self.fail_at == Some(attempt) {
			return Err(ErrorKind::Other);
		}

		self.log.push(Event::Write(words.to_vec()));
		Ok(())
	}

	fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
		self.write(write)?;
		self.read(read)
	}

	fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
		self.write(&words.to_vec())?;
		self.read(words)
	}

	fn flush(&mut self) -> Result<(), Self::Error> {
		Ok(())
	}
}

#[derive(Debug)]
pub struct MockPin {
	log: Log,
	line: Line,
	level: PinState,
	broken: bool,
}

impl MockPin {
	fn drive(&mut self, level: PinState) -> Result<(), digital::ErrorKind> {
		if self.broken {
			return Err(digital::ErrorKind::Other);
		}

		self.level = level;
		self.log.push(Event::Pin(self.line, level));
		Ok(())
	}
}

impl digital::ErrorType for MockPin {
	type Error = digital::ErrorKind;
}

impl OutputPin for MockPin {
	fn set_low(&mut self) -> Result<(), Self::Error> {
		self.drive(PinState::Low)
	}

	fn set_high(&mut self) -> Result<(), Self::Error> {
		self.drive(PinState::High)
	}
}

impl StatefulOutputPin for MockPin {
	fn is_set_high(&mut self) -> Result<bool, Self::Error> {
		Ok(self.level == PinState::High)
	}

	fn is_set_low(&mut self) -> Result<bool, Self::Error> {
		Ok(self.level == PinState::Low)
	}
}

#[derive(Debug)]
pub struct MockDelay {
	log: Log,
}

impl DelayNs for MockDelay {
	fn delay_ns(&mut self, ns: u32) {
		self.log.push(Event::Delay(Duration::from_nanos(ns.into())));
	}

	fn delay_us(&mut self, us: u32) {
		self.log.push(Event::Delay(Duration::from_micros(us.into())));
	}

	fn delay_ms(&mut self, ms: u32) {
		self.log.push(Event::Delay(Duration::from_millis(ms.into())));
	}
}
