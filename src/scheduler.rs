//! Host cadence driver.
//!
//! Runs on a fixed base clock of `fast_ticks_per_sec` and reports which
//! cadences are due on each base tick. The management cadence fires every
//! `management_interval_secs`; the fast cadence fires on every base tick,
//! but only while armed through [`CadencePort`].
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  base clock (60 Hz)                                          │
//! │        │                                                     │
//! │        ▼                                                     │
//! │  ┌───────────┐  fast armed?      ┌──────────────────────┐    │
//! │  │ Scheduler │ ────────────────▶ │ Cadence::Fast        │    │
//! │  │  .tick()  │  interval hit?    │ Cadence::Management  │    │
//! │  └───────────┘ ────────────────▶ └──────────┬───────────┘    │
//! │        ▲                                    │                │
//! │        │ request_fast / cancel_fast         ▼                │
//! │        └──────────────────────── MonitorService.handle()     │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use core::time::Duration;

use log::info;

use crate::app::commands::Cadence;
use crate::app::ports::CadencePort;
use crate::config::MonitorConfig;

/// Cadences due on one base tick, fast first.
pub type Due = heapless::Vec<Cadence, 2>;

/// The cadence driver.
pub struct Scheduler {
    fast_ticks_per_sec: u32,
    /// Base ticks between management fires.
    management_interval_ticks: u64,
    /// Base ticks since the last management fire.
    elapsed_ticks: u64,
    fast_armed: bool,
}

impl Scheduler {
    pub fn new(fast_ticks_per_sec: u32, management_interval_secs: u32) -> Self {
        let fast_ticks_per_sec = fast_ticks_per_sec.max(1);
        Self {
            fast_ticks_per_sec,
            management_interval_ticks: (u64::from(management_interval_secs)
                * u64::from(fast_ticks_per_sec))
            .max(1),
            elapsed_ticks: 0,
            fast_armed: false,
        }
    }

    pub fn from_config(config: &MonitorConfig) -> Self {
        Self::new(config.fast_ticks_per_sec, config.management_interval_secs)
    }

    /// Wall-clock length of one base tick.
    pub fn base_period(&self) -> Duration {
        Duration::from_secs(1) / self.fast_ticks_per_sec
    }

    pub fn is_fast_armed(&self) -> bool {
        self.fast_armed
    }

    /// Advance the base clock by one tick.
    pub fn tick(&mut self) -> Due {
        let mut due = Due::new();
        let mut pushed = true;
        if self.fast_armed {
            pushed &= due.push(Cadence::Fast).is_ok();
        }

        self.elapsed_ticks += 1;
        if self.elapsed_ticks >= self.management_interval_ticks {
            self.elapsed_ticks = 0;
            pushed &= due.push(Cadence::Management).is_ok();
        }
        debug_assert!(pushed, "at most two cadences are due per tick");

        due
    }
}

impl CadencePort for Scheduler {
    fn request_fast(&mut self) {
        if !self.fast_armed {
            info!("Scheduler: fast cadence armed ({} Hz)", self.fast_ticks_per_sec);
        }
        self.fast_armed = true;
    }

    fn cancel_fast(&mut self) {
        if self.fast_armed {
            info!("Scheduler: fast cadence cancelled");
        }
        self.fast_armed = false;
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
