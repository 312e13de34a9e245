//! Mock grid for integration tests.
//!
//! Records every actuator run and every emitted event so tests can assert
//! on the full command history. Actuators can be scripted to become
//! reachable only from a given attempt onward.

use std::collections::HashMap;

use fillgate::app::events::AppEvent;
use fillgate::app::ports::{Actuator, ActuatorPort, CadencePort, EventSink, SensorPort};
use fillgate::sensors::{NameFilter, SensorReading};

// ── Run record ────────────────────────────────────────────────

#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub struct RunCall {
    pub actuator: String,
    pub argument: String,
}

// ── MockActuator ──────────────────────────────────────────────

pub struct MockActuator {
    name: String,
    accepts: bool,
    log: Vec<String>,
}

impl Actuator for MockActuator {
    fn try_run(&mut self, argument: &str) -> bool {
        self.log.push(argument.to_string());
        self.accepts
    }
}

/// When an actuator can be resolved by name.
#[derive(Debug, Clone, Copy)]
pub enum Availability {
    Always,
    /// Resolvable from the n-th lookup onward (1-based).
    FromLookup(u32),
    Never,
}

// ── MockGrid ──────────────────────────────────────────────────

pub struct MockGrid {
    pub sensors: Vec<SensorReading>,
    actuators: HashMap<String, (Availability, MockActuator)>,
    lookups: HashMap<String, u32>,
    pub discovery_calls: u32,
}

#[allow(dead_code)]
impl MockGrid {
    pub fn new() -> Self {
        Self {
            sensors: Vec::new(),
            actuators: HashMap::new(),
            lookups: HashMap::new(),
            discovery_calls: 0,
        }
    }

    /// Single tagged sensor at the given fill ratio.
    pub fn at_ratio(ratio: f64) -> Self {
        let mut grid = Self::new();
        grid.sensors
            .push(SensorReading::new("[QG] Cargo", 1000.0, 1000.0 * ratio));
        grid
    }

    pub fn actuator(mut self, name: &str, availability: Availability, accepts: bool) -> Self {
        self.actuators.insert(
            name.to_string(),
            (
                availability,
                MockActuator {
                    name: name.to_string(),
                    accepts,
                    log: Vec::new(),
                },
            ),
        );
        self
    }

    /// Arguments delivered to `name`, in order.
    pub fn runs(&self, name: &str) -> Vec<String> {
        self.actuators
            .get(name)
            .map(|(_, a)| a.log.clone())
            .unwrap_or_default()
    }

    /// How many times `name` was looked up.
    pub fn lookups(&self, name: &str) -> u32 {
        self.lookups.get(name).copied().unwrap_or(0)
    }

    pub fn all_runs(&self) -> Vec<RunCall> {
        let mut calls: Vec<RunCall> = self
            .actuators
            .values()
            .flat_map(|(_, a)| {
                a.log.iter().map(|arg| RunCall {
                    actuator: a.name.clone(),
                    argument: arg.clone(),
                })
            })
            .collect();
        calls.sort_by(|a, b| a.actuator.cmp(&b.actuator));
        calls
    }
}

impl Default for MockGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockGrid {
    fn find_sensors(&mut self, _filter: &NameFilter) -> Vec<SensorReading> {
        // Deliberately unfiltered: the aggregator must apply the filter.
        self.discovery_calls += 1;
        self.sensors.clone()
    }
}

impl ActuatorPort for MockGrid {
    fn find_actuator(&mut self, name: &str) -> Option<&mut dyn Actuator> {
        let seen = self.lookups.entry(name.to_string()).or_insert(0);
        *seen += 1;
        let seen = *seen;

        let (availability, actuator) = self.actuators.get_mut(name)?;
        let reachable = match *availability {
            Availability::Always => true,
            Availability::FromLookup(n) => seen >= n,
            Availability::Never => false,
        };
        if reachable {
            Some(actuator as &mut dyn Actuator)
        } else {
            None
        }
    }
}

// ── Recording sink ────────────────────────────────────────────

pub struct LogSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(*e)).count()
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Recording cadence ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CadenceCall {
    Request,
    Cancel,
}

pub struct MockCadence {
    pub fast: bool,
    pub calls: Vec<CadenceCall>,
}

#[allow(dead_code)]
impl MockCadence {
    pub fn new() -> Self {
        Self {
            fast: false,
            calls: Vec::new(),
        }
    }
}

impl CadencePort for MockCadence {
    fn request_fast(&mut self) {
        self.fast = true;
        self.calls.push(CadenceCall::Request);
    }

    fn cancel_fast(&mut self) {
        self.fast = false;
        self.calls.push(CadenceCall::Cancel);
    }
}
