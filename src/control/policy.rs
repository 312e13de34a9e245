//! Threshold policy
//!
//! Maps an aggregate fill ratio to one of two actuator commands. The
//! threshold is inclusive: a store exactly at the threshold suspends.

use core::fmt;
use core::str::FromStr;

use crate::sensors::FillRatio;

/// The two commands an actuator understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Resume work (`CONT`).
    Activate,
    /// Stop work (`STOP`).
    Suspend,
}

impl Command {
    /// Token passed to the actuator's run call.
    pub const fn wire_token(self) -> &'static str {
        match self {
            Self::Activate => "CONT",
            Self::Suspend => "STOP",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_token())
    }
}

/// Unrecognised command token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownCommand;

impl fmt::Display for UnknownCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown command token")
    }
}

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            t if t.eq_ignore_ascii_case("CONT") => Ok(Self::Activate),
            t if t.eq_ignore_ascii_case("STOP") => Ok(Self::Suspend),
            _ => Err(UnknownCommand),
        }
    }
}

/// What to do with a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Dispatch(Command),
    /// No data: command nothing and report success.
    Skip,
}

impl Decision {
    pub fn from_fill(ratio: FillRatio, threshold_percent: f64) -> Self {
        match ratio {
            FillRatio::Measured(r) => Self::Dispatch(decide(r, threshold_percent)),
            FillRatio::NoData => Self::Skip,
        }
    }
}

/// `Suspend` iff the fill percentage is at or above `threshold_percent`.
pub fn decide(ratio: f64, threshold_percent: f64) -> Command {
    if ratio * 100.0 >= threshold_percent {
        Command::Suspend
    } else {
        Command::Activate
    }
}
