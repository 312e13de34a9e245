//! Inbound triggers to the application service.
//!
//! The host invokes the controller on one of two cadences, optionally with
//! a free-text argument. [`Trigger::from_invocation`] turns that pair into
//! the tagged variant the [`MonitorService`](super::service::MonitorService)
//! matches on.

use log::warn;

/// Argument that forces an immediate resample.
pub const REFRESH_ARGUMENT: &str = "refresh";

/// Which host cadence fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// Slow, regular cadence that begins fresh decision cycles.
    Management,
    /// High-frequency cadence that drives the retry countdown.
    Fast,
}

/// Why the controller is being invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Management,
    Fast,
    /// Resample now, bypassing any countdown.
    ForcedRefresh,
}

impl Trigger {
    /// Classify a host invocation.
    ///
    /// `refresh` (trimmed, any case) forces a resample regardless of the
    /// cadence. Any other non-empty argument is logged and the cadence
    /// decides.
    pub fn from_invocation(cadence: Cadence, argument: &str) -> Self {
        let arg = argument.trim();
        if arg.eq_ignore_ascii_case(REFRESH_ARGUMENT) {
            return Self::ForcedRefresh;
        }
        if !arg.is_empty() {
            warn!("Ignoring unknown argument '{}'", arg);
        }
        match cadence {
            Cadence::Management => Self::Management,
            Cadence::Fast => Self::Fast,
        }
    }
}
