//! Sensor subsystem — name filtering and the aggregating [`SensorAggregator`].
//!
//! The aggregator asks the discovery port for the matching sensor set at
//! the start of every attempt and reduces it to a single [`FillRatio`].
//! Sums are taken over the whole set before dividing, so sensors with
//! unequal capacities weigh in proportion to their size.

pub mod filter;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::app::ports::SensorPort;
pub use filter::NameFilter;

/// One capacity-bearing sensor as reported by the environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub name: String,
    /// Total capacity (same unit as `used`).
    pub capacity: f64,
    /// Currently occupied amount.
    pub used: f64,
}

impl SensorReading {
    pub fn new(name: impl Into<String>, capacity: f64, used: f64) -> Self {
        Self {
            name: name.into(),
            capacity,
            used,
        }
    }

    fn is_plausible(&self) -> bool {
        self.capacity.is_finite() && self.used.is_finite() && self.capacity >= 0.0 && self.used >= 0.0
    }
}

/// Aggregate fill across a sensor set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FillRatio {
    /// Σused / Σcapacity, clamped to [0, 1].
    Measured(f64),
    /// Total capacity was zero; there is nothing to decide on.
    NoData,
}

impl FillRatio {
    /// Fill as a percentage, or `None` without data.
    pub fn percent(self) -> Option<f64> {
        match self {
            Self::Measured(r) => Some(r * 100.0),
            Self::NoData => None,
        }
    }
}

/// Reduce a sensor set to a single fill ratio.
///
/// Readings with negative or non-finite values are skipped. If the plain
/// sums overflow, they are recomputed scaled by the largest reading.
pub fn aggregate(sensors: &[SensorReading]) -> FillRatio {
    let plausible: Vec<&SensorReading> = sensors
        .iter()
        .filter(|s| {
            let ok = s.is_plausible();
            if !ok {
                warn!(
                    "Skipping sensor '{}' with implausible reading (capacity={}, used={})",
                    s.name, s.capacity, s.used
                );
            }
            ok
        })
        .collect();

    let (mut total_capacity, mut total_used) = totals(&plausible, 1.0);
    if !(total_capacity.is_finite() && total_used.is_finite()) {
        let scale = plausible
            .iter()
            .map(|s| s.capacity.max(s.used))
            .fold(0.0_f64, f64::max);
        (total_capacity, total_used) = totals(&plausible, scale);
    }

    if total_capacity <= 0.0 {
        return FillRatio::NoData;
    }
    FillRatio::Measured((total_used / total_capacity).clamp(0.0, 1.0))
}

/// `(Σcapacity, Σused)`, each term divided by `scale`.
fn totals(sensors: &[&SensorReading], scale: f64) -> (f64, f64) {
    sensors.iter().fold((0.0, 0.0), |(capacity, used), s| {
        (capacity + s.capacity / scale, used + s.used / scale)
    })
}

/// Result of one sampling pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub ratio: FillRatio,
    /// Number of sensors that matched the filter.
    pub sensors: usize,
}

/// Holds the name filter and the most recently discovered sensor set.
pub struct SensorAggregator {
    filter: NameFilter,
    /// Transient; replaced on every refresh.
    sensors: Vec<SensorReading>,
}

impl SensorAggregator {
    pub fn new(filter: NameFilter) -> Self {
        Self {
            filter,
            sensors: Vec::new(),
        }
    }

    /// Re-run the discovery query. Returns the number of matching sensors.
    ///
    /// The filter is re-applied to whatever the port returns.
    pub fn refresh(&mut self, port: &mut impl SensorPort) -> usize {
        let filter = &self.filter;
        let mut found = port.find_sensors(filter);
        found.retain(|s| filter.matches(&s.name));
        self.sensors = found;
        self.sensors.len()
    }

    /// Refresh the sensor set and aggregate it.
    pub fn sample(&mut self, port: &mut impl SensorPort) -> Sample {
        let count = self.refresh(port);
        Sample {
            ratio: aggregate(&self.sensors),
            sensors: count,
        }
    }

    /// The sensor set found by the last refresh.
    pub fn sensors(&self) -> &[SensorReading] {
        &self.sensors
    }
}
