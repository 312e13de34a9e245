//! Application service — the hexagonal core.
//!
//! [`MonitorService`] owns the sensor aggregator, the actuator dispatcher
//! and the retry state machine. It exposes a host-agnostic API: every
//! invocation is a [`Trigger`], and all I/O flows through port traits
//! injected at call sites.
//!
//! ```text
//!   SensorPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                  │        MonitorService        │
//! ActuatorPort ◀── │ aggregate · decide · dispatch│ ──▶ CadencePort
//!                  │        RetryController       │
//!                  └──────────────────────────────┘
//! ```
//!
//! Within one attempt, aggregation completes before the decision and the
//! decision completes before any actuator is contacted.

use log::debug;

use crate::config::MonitorConfig;
use crate::control::dispatch::ActuatorDispatcher;
use crate::control::policy::Decision;
use crate::fsm::{Countdown, Phase, RetryController, RetryState, Transition};
use crate::sensors::{NameFilter, Sample, SensorAggregator};

use super::commands::Trigger;
use super::events::AppEvent;
use super::ports::{ActuatorPort, CadencePort, EventSink, SensorPort};

/// What a single invocation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The trigger is not honoured in the current phase.
    Ignored,
    /// A retry is pending and its delay has not elapsed.
    Waiting { remaining: u32 },
    /// An attempt ran; the retry machine moved as described.
    Attempted(Transition),
}

// ───────────────────────────────────────────────────────────────
// MonitorService
// ───────────────────────────────────────────────────────────────

/// Samples, decides, dispatches and retries.
pub struct MonitorService {
    config: MonitorConfig,
    aggregator: SensorAggregator,
    dispatcher: ActuatorDispatcher,
    retry: RetryController,
    attempts_total: u64,
    last_sample: Option<Sample>,
    last_decision: Option<Decision>,
}

impl MonitorService {
    /// Construct the service from a validated configuration.
    pub fn new(config: MonitorConfig) -> Self {
        let aggregator = SensorAggregator::new(NameFilter::from_config(&config));
        let dispatcher = ActuatorDispatcher::new(config.actuators.clone());
        let retry = RetryController::new(config.retry_count, config.retry_delay_ticks);

        Self {
            config,
            aggregator,
            dispatcher,
            retry,
            attempts_total: 0,
            last_sample: None,
            last_decision: None,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started {
            actuators: self.dispatcher.actuators().len(),
            threshold_percent: self.config.threshold_percent,
        });
    }

    /// Drop any pending retry and stop fast ticks.
    pub fn reset(&mut self, cadence: &mut impl CadencePort, sink: &mut impl EventSink) {
        self.retry.reset();
        cadence.cancel_fast();
        sink.emit(&AppEvent::Reset);
    }

    // ── Per-invocation orchestration ──────────────────────────

    /// Handle one host invocation.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`], which avoids a double mutable borrow while keeping
    /// the port boundary explicit.
    pub fn handle(
        &mut self,
        trigger: Trigger,
        hw: &mut (impl SensorPort + ActuatorPort),
        cadence: &mut impl CadencePort,
        sink: &mut impl EventSink,
    ) -> TickOutcome {
        match trigger {
            Trigger::Management => self.begin_cycle(trigger, hw, cadence, sink),
            Trigger::ForcedRefresh => {
                if self.retry.expedite() {
                    debug!("Forced refresh: running pending retry now");
                    self.fast_tick(trigger, hw, cadence, sink)
                } else {
                    self.begin_cycle(trigger, hw, cadence, sink)
                }
            }
            Trigger::Fast => self.fast_tick(trigger, hw, cadence, sink),
        }
    }

    /// Run one attempt: aggregate, decide, dispatch.
    ///
    /// Returns `true` when every actuator was reached or there was nothing
    /// to command. Does not touch retry state.
    pub fn run_once(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
    ) -> bool {
        self.attempts_total += 1;

        // 1. Aggregate
        let sample = self.aggregator.sample(hw);
        self.last_sample = Some(sample);
        match sample.ratio.percent() {
            Some(percent) => sink.emit(&AppEvent::Sampled {
                percent,
                sensors: sample.sensors,
            }),
            None => sink.emit(&AppEvent::NoSensorData {
                tag: self.config.sensor_tag.clone(),
            }),
        }

        // 2. Decide
        let decision = Decision::from_fill(sample.ratio, self.config.threshold_percent);
        self.last_decision = Some(decision);

        // 3. Dispatch
        match decision {
            Decision::Skip => true,
            Decision::Dispatch(command) => self.dispatcher.dispatch(command, hw, sink).ok(),
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.retry.phase()
    }

    pub fn retry_state(&self) -> RetryState {
        self.retry.state()
    }

    /// Attempts run since construction, retries included.
    pub fn attempts_total(&self) -> u64 {
        self.attempts_total
    }

    pub fn last_sample(&self) -> Option<Sample> {
        self.last_sample
    }

    pub fn last_decision(&self) -> Option<Decision> {
        self.last_decision
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    // ── Internal ──────────────────────────────────────────────

    fn begin_cycle(
        &mut self,
        trigger: Trigger,
        hw: &mut (impl SensorPort + ActuatorPort),
        cadence: &mut impl CadencePort,
        sink: &mut impl EventSink,
    ) -> TickOutcome {
        if !self.retry.begin_cycle() {
            sink.emit(&AppEvent::TriggerIgnored(trigger));
            return TickOutcome::Ignored;
        }
        let ok = self.run_once(hw, sink);
        let transition = self.retry.record_initial(ok);
        self.apply(transition, cadence, sink);
        TickOutcome::Attempted(transition)
    }

    fn fast_tick(
        &mut self,
        trigger: Trigger,
        hw: &mut (impl SensorPort + ActuatorPort),
        cadence: &mut impl CadencePort,
        sink: &mut impl EventSink,
    ) -> TickOutcome {
        match self.retry.countdown() {
            Countdown::NotPending => {
                sink.emit(&AppEvent::TriggerIgnored(trigger));
                TickOutcome::Ignored
            }
            Countdown::Waiting(remaining) => TickOutcome::Waiting { remaining },
            Countdown::Expired => {
                let ok = self.run_once(hw, sink);
                let transition = self.retry.record_retry(ok);
                self.apply(transition, cadence, sink);
                TickOutcome::Attempted(transition)
            }
        }
    }

    /// Translate a retry transition into cadence requests and events.
    fn apply(
        &self,
        transition: Transition,
        cadence: &mut impl CadencePort,
        sink: &mut impl EventSink,
    ) {
        match transition {
            Transition::Settled => {}
            Transition::Recovered { retry } => {
                cadence.cancel_fast();
                sink.emit(&AppEvent::RetryRecovered { attempt: retry });
            }
            Transition::RetryScheduled { attempt, max } => {
                cadence.request_fast();
                sink.emit(&AppEvent::RetryScheduled {
                    attempt,
                    max,
                    delay_secs: self.config.retry_delay_secs(),
                });
            }
            Transition::Exhausted { retries } => {
                cadence.cancel_fast();
                sink.emit(&AppEvent::RetryExhausted { retries });
            }
        }
    }
}
