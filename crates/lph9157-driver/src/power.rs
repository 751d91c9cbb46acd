use std::{
	fmt,
	time::{Duration, Instant},
};

use embedded_hal::{
	delay::DelayNs,
	digital::{OutputPin, StatefulOutputPin},
};
use tracing::{debug, info, instrument, warn};

use crate::{
	error::{Error, Result},
	protocol::{pause, CommandSink, Dcs},
	transport::Line,
};

/// Minimum time the panel must stay unpowered before it is powered on again.
///
/// Less than this and the panel comes up in a corrupted state.
pub const SETTLE_TIME: Duration = Duration::from_millis(1500);

/// Minimum length of the reset pulse.
pub const RESET_PULSE: Duration = Duration::from_millis(2);

/// Where the panel is in its power-up sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelState {
	PoweredOff,
	Resetting,
	Initializing,
	Ready,
}

impl fmt::Display for PanelState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::PoweredOff => "powered off",
			Self::Resetting => "resetting",
			Self::Initializing => "initializing",
			Self::Ready => "ready",
		})
	}
}

/// What to do when asked to power up a panel that was switched off too recently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SettlePolicy {
	/// Block until the settle time has passed.
	#[default]
	Wait,

	/// Fail with [`Error::Settling`].
	Refuse,
}

/// Drives the power and reset lines through the power-up and power-off sequences.
#[derive(Debug)]
pub struct Sequencer<RST, PWR> {
	reset: RST,
	power: PWR,
	state: PanelState,
	policy: SettlePolicy,
	powered_off_at: Option<Instant>,
}

impl<RST, PWR> Sequencer<RST, PWR>
where
	RST: OutputPin,
	PWR: StatefulOutputPin,
{
	pub fn new(reset: RST, power: PWR, policy: SettlePolicy) -> Self {
		Self {
			reset,
			power,
			state: PanelState::PoweredOff,
			policy,
			powered_off_at: None,
		}
	}

	pub fn state(&self) -> PanelState {
		self.state
	}

	pub(crate) fn expect(&self, expected: PanelState) -> Result<()> {
		if self.state == expected {
			Ok(())
		} else {
			Err(Error::State {
				expected,
				actual: self.state,
			})
		}
	}

	/// Make sure the panel has been unpowered long enough, then start resetting it.
	///
	/// The power line itself is checked: if a previous session left the panel on, it is forced
	/// off and held there for the full [`SETTLE_TIME`].
	#[instrument(level = "debug", skip(self, dc, delay))]
	pub fn prepare<DC, D>(&mut self, dc: &mut DC, delay: &mut D) -> Result<()>
	where
		DC: OutputPin,
		D: DelayNs,
	{
		self.expect(PanelState::PoweredOff)?;

		let left_on = self.power.is_set_high().map_err(Error::pin(Line::Power))?;
		if left_on {
			warn!("panel was left powered on, holding it off to settle");
			self.drive_off(dc)?;
			pause(delay, SETTLE_TIME);
		} else if let Some(remaining) = self.unsettled() {
			match self.policy {
				SettlePolicy::Refuse => return Err(Error::Settling { remaining }),
				SettlePolicy::Wait => {
					debug!(?remaining, "panel powered off recently, waiting for it to settle");
					pause(delay, remaining);
				}
			}
		}

		self.state = PanelState::Resetting;
		Ok(())
	}

	/// How much longer the panel must stay off, if it was switched off less than
	/// [`SETTLE_TIME`] ago.
	fn unsettled(&self) -> Option<Duration> {
		let off = self.powered_off_at?;
		SETTLE_TIME
			.checked_sub(off.elapsed())
			.filter(|remaining| !remaining.is_zero())
	}

	/// Block until the panel has been off for the full [`SETTLE_TIME`].
	///
	/// A later session cannot know when this one switched the panel off, so call this before
	/// giving the lines up. Does nothing if the panel is on, or has already settled.
	#[instrument(level = "debug", skip(self, delay))]
	pub fn settle<D: DelayNs>(&mut self, delay: &mut D) {
		if let Some(remaining) = self.unsettled() {
			debug!(?remaining, "holding the panel off until it settles");
			pause(delay, remaining);
		}
	}

	/// Power the panel on, pulse reset, and issue a soft reset.
	#[instrument(level = "debug", skip(self, sink, delay))]
	pub fn reset<S, D>(&mut self, sink: &mut S, delay: &mut D) -> Result<()>
	where
		S: CommandSink + ?Sized,
		D: DelayNs,
	{
		self.expect(PanelState::Resetting)?;

		self.power.set_high().map_err(Error::pin(Line::Power))?;
		self.powered_off_at = None;

		self.reset.set_low().map_err(Error::pin(Line::Reset))?;
		pause(delay, RESET_PULSE);
		self.reset.set_high().map_err(Error::pin(Line::Reset))?;

		sink.soft_reset()?;
		self.state = PanelState::Initializing;
		Ok(())
	}

	/// Mark the register programming as done.
	pub fn ready(&mut self) -> Result<()> {
		self.expect(PanelState::Initializing)?;
		self.state = PanelState::Ready;
		Ok(())
	}

	fn drive_off<DC: OutputPin>(&mut self, dc: &mut DC) -> Result<()> {
		self.power.set_low().map_err(Error::pin(Line::Power))?;
		self.reset.set_low().map_err(Error::pin(Line::Reset))?;
		dc.set_low().map_err(Error::pin(Line::DataCommand))?;
		self.powered_off_at = Some(Instant::now());
		Ok(())
	}

	/// Switch the panel off: power, reset, then data/command line go low.
	///
	/// Valid from any state, including halfway through a failed power-up. Line failures are
	/// logged and skipped rather than returned.
	#[instrument(level = "debug", skip(self, dc))]
	pub fn power_off<DC: OutputPin>(&mut self, dc: &mut DC) {
		if let Err(err) = self.power.set_low() {
			warn!(kind=?embedded_hal::digital::Error::kind(&err), "failed to drive the power line low");
		}
		if let Err(err) = self.reset.set_low() {
			warn!(kind=?embedded_hal::digital::Error::kind(&err), "failed to drive the reset line low");
		}
		if let Err(err) = dc.set_low() {
			warn!(kind=?embedded_hal::digital::Error::kind(&err), "failed to drive the data/command line low");
		}

		self.state = PanelState::PoweredOff;
		self.powered_off_at = Some(Instant::now());
		info!(
			settle = ?SETTLE_TIME,
			"LPH9157 powered off, wait for the settle time before powering it on again"
		);
	}

	/// Give back the reset and power lines.
	pub fn release(self) -> (RST, PWR) {
		(self.reset, self.power)
	}
}
