//! Tick-driven retry state machine.
//!
//! ```text
//!            management tick, attempt ok
//!          ┌─────────┐
//!          ▼         │
//!       ┌──────┐  attempt failed   ┌───────────────┐
//!       │ Idle │ ────────────────▶ │ RetryPending  │ ◀─┐ fast tick, delay > 0
//!       └──────┘                   └───────────────┘ ──┘ or retry failed with
//!          ▲   retry ok / budget exhausted   │           budget left
//!          └─────────────────────────────────┘
//! ```
//!
//! [`RetryController`] owns the retry budget and countdown only. It never
//! runs an attempt itself: the service runs the attempt and reports the
//! outcome through [`RetryController::record_initial`] or
//! [`RetryController::record_retry`], then acts on the returned
//! [`Transition`].

use log::debug;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Controller phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    RetryPending,
}

/// Snapshot of the retry bookkeeping.
///
/// `pending` is true exactly when `0 < attempts_used <= attempts_max` and
/// the last attempt left at least one actuator unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    pub attempts_used: u8,
    pub attempts_max: u8,
    /// Fast ticks left before the next retry.
    pub delay_remaining: u32,
    pub pending: bool,
}

impl RetryState {
    fn idle(attempts_max: u8) -> Self {
        Self {
            attempts_used: 0,
            attempts_max,
            delay_remaining: 0,
            pending: false,
        }
    }
}

/// Result of advancing the countdown by one fast tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    /// No retry is pending; the tick is stale.
    NotPending,
    /// Still waiting; ticks remaining.
    Waiting(u32),
    /// The delay elapsed; run the retry attempt now.
    Expired,
}

/// What the caller must do after reporting an attempt outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The initial attempt succeeded. Stay idle.
    Settled,
    /// A retry succeeded. Back to idle; stop fast ticks.
    Recovered { retry: u8 },
    /// The attempt failed and another retry is armed. Ensure fast ticks.
    RetryScheduled { attempt: u8, max: u8 },
    /// The attempt failed with no budget left. Back to idle; stop fast ticks.
    Exhausted { retries: u8 },
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

pub struct RetryController {
    state: RetryState,
    /// Countdown reload value, in fast ticks.
    delay_ticks: u32,
}

impl RetryController {
    pub fn new(attempts_max: u8, delay_ticks: u32) -> Self {
        Self {
            state: RetryState::idle(attempts_max),
            delay_ticks,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.state.pending {
            Phase::RetryPending
        } else {
            Phase::Idle
        }
    }

    pub fn state(&self) -> RetryState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state.pending
    }

    /// Start a fresh decision cycle.
    ///
    /// Returns `false` and changes nothing while a retry is pending: a stray
    /// management tick must not restart the attempt count mid-retry.
    pub fn begin_cycle(&mut self) -> bool {
        if self.state.pending {
            return false;
        }
        self.state.attempts_used = 0;
        true
    }

    /// Advance the retry countdown by one fast tick.
    pub fn countdown(&mut self) -> Countdown {
        if !self.state.pending {
            return Countdown::NotPending;
        }
        self.state.delay_remaining = self.state.delay_remaining.saturating_sub(1);
        if self.state.delay_remaining > 0 {
            debug!("Retry countdown: {} ticks left", self.state.delay_remaining);
            Countdown::Waiting(self.state.delay_remaining)
        } else {
            Countdown::Expired
        }
    }

    /// Cut the pending delay short. Returns `false` if nothing is pending.
    pub fn expedite(&mut self) -> bool {
        if !self.state.pending {
            return false;
        }
        self.state.delay_remaining = 0;
        true
    }

    /// Report the outcome of the first attempt of a cycle.
    pub fn record_initial(&mut self, ok: bool) -> Transition {
        if ok {
            self.reset();
            return Transition::Settled;
        }
        if self.state.attempts_max == 0 {
            self.reset();
            return Transition::Exhausted { retries: 0 };
        }
        self.arm(1)
    }

    /// Report the outcome of a retry attempt.
    pub fn record_retry(&mut self, ok: bool) -> Transition {
        let used = self.state.attempts_used;
        if ok {
            self.reset();
            return Transition::Recovered { retry: used };
        }
        if used < self.state.attempts_max {
            return self.arm(used + 1);
        }
        self.reset();
        Transition::Exhausted { retries: used }
    }

    /// Drop any pending retry and return to idle.
    pub fn reset(&mut self) {
        self.state = RetryState::idle(self.state.attempts_max);
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn arm(&mut self, attempt: u8) -> Transition {
        self.state.attempts_used = attempt;
        self.state.delay_remaining = self.delay_ticks;
        self.state.pending = true;
        Transition::RetryScheduled {
            attempt,
            max: self.state.attempts_max,
        }
    }
}
