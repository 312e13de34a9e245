//! Simulated grid adapter.
//!
//! Implements [`SensorPort`] and [`ActuatorPort`] over an in-memory set of
//! named sensors and actuators, optionally decoded from a JSON description:
//!
//! ```json
//! {
//!   "sensors":   [{ "name": "[QG] Cargo 1", "capacity": 100.0, "used": 80.0 }],
//!   "actuators": [{ "name": "[HMiner-1] Programmable Block", "accepts": true }]
//! }
//! ```
//!
//! Actuators accept only the known command tokens; anything else is
//! refused, as is every run on an actuator with `accepts: false`.

use std::collections::BTreeMap;

use log::info;
use serde::{Deserialize, Serialize};

use crate::app::ports::{Actuator, ActuatorPort, SensorPort};
use crate::control::policy::Command;
use crate::error::{Error, Result};
use crate::sensors::{NameFilter, SensorReading};

/// On-disk shape of a grid description.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSpec {
    pub sensors: Vec<SensorReading>,
    pub actuators: Vec<ActuatorSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActuatorSpec {
    pub name: String,
    #[serde(default = "default_accepts")]
    pub accepts: bool,
}

impl GridSpec {
    /// Decode a JSON grid description.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|_| Error::Environment("malformed grid JSON"))
    }
}

fn default_accepts() -> bool {
    true
}

/// A simulated programmable actuator that records every run request.
#[derive(Debug, Clone, Default)]
pub struct SimActuator {
    accepts: bool,
    runs: Vec<String>,
    last_command: Option<Command>,
}

impl SimActuator {
    /// Last command accepted.
    pub fn last_command(&self) -> Option<Command> {
        self.last_command
    }
}

impl Actuator for SimActuator {
    fn try_run(&mut self, argument: &str) -> bool {
        self.runs.push(argument.to_string());
        if !self.accepts {
            return false;
        }
        match argument.parse::<Command>() {
            Ok(cmd) => {
                self.last_command = Some(cmd);
                true
            }
            Err(_) => false,
        }
    }
}

/// In-memory environment holding sensors and actuators.
#[derive(Debug, Clone, Default)]
pub struct SimulatedGrid {
    sensors: Vec<SensorReading>,
    actuators: BTreeMap<String, SimActuator>,
}

impl SimulatedGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a JSON grid description.
    pub fn from_json(json: &str) -> Result<Self> {
        GridSpec::from_json(json).map(Self::from_spec)
    }

    pub fn from_spec(spec: GridSpec) -> Self {
        let mut grid = Self {
            sensors: spec.sensors,
            actuators: BTreeMap::new(),
        };
        for a in spec.actuators {
            grid = grid.with_actuator(&a.name, a.accepts);
        }
        grid
    }

    /// Replace sensors and actuator availability from a new description,
    /// keeping the run history of actuators that are still present.
    pub fn reload(&mut self, spec: GridSpec) {
        self.sensors = spec.sensors;
        let mut next = BTreeMap::new();
        for a in spec.actuators {
            let mut act = self.actuators.remove(&a.name).unwrap_or_default();
            act.accepts = a.accepts;
            next.insert(a.name, act);
        }
        for gone in self.actuators.keys() {
            info!("Grid: actuator '{}' no longer present", gone);
        }
        self.actuators = next;
    }

    pub fn with_sensor(mut self, name: &str, capacity: f64, used: f64) -> Self {
        self.sensors.push(SensorReading::new(name, capacity, used));
        self
    }

    pub fn with_actuator(mut self, name: &str, accepts: bool) -> Self {
        self.actuators.insert(
            name.to_string(),
            SimActuator {
                accepts,
                ..SimActuator::default()
            },
        );
        self
    }

    pub fn actuator(&self, name: &str) -> Option<&SimActuator> {
        self.actuators.get(name)
    }

    /// Every run argument this actuator received, oldest first.
    pub fn runs(&self, name: &str) -> &[String] {
        self.actuators
            .get(name)
            .map(|a| a.runs.as_slice())
            .unwrap_or(&[])
    }
}

impl SensorPort for SimulatedGrid {
    fn find_sensors(&mut self, filter: &NameFilter) -> Vec<SensorReading> {
        self.sensors
            .iter()
            .filter(|s| filter.matches(&s.name))
            .cloned()
            .collect()
    }
}

impl ActuatorPort for SimulatedGrid {
    fn find_actuator(&mut self, name: &str) -> Option<&mut dyn Actuator> {
        self.actuators
            .get_mut(name)
            .map(|a| a as &mut dyn Actuator)
    }
}
