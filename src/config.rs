//! Controller configuration parameters
//!
//! All tunable parameters for the Fillgate controller.
//! Values can be overridden from a JSON file via [`ConfigPort`](crate::app::ports::ConfigPort).

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Maximum number of actuators a controller commands.
pub const MAX_ACTUATORS: usize = 8;

/// Maximum byte length of an actuator name.
pub const MAX_ACTUATOR_NAME: usize = 64;

/// Stable external name of an actuator.
pub type ActuatorName = heapless::String<MAX_ACTUATOR_NAME>;

/// The fixed set of actuators a controller commands.
pub type ActuatorList = heapless::Vec<ActuatorName, MAX_ACTUATORS>;

/// Build an [`ActuatorName`], rejecting names that do not fit.
pub fn actuator_name(name: &str) -> Result<ActuatorName, ConfigError> {
    let mut out = ActuatorName::new();
    out.push_str(name)
        .map_err(|()| ConfigError::ValidationFailed("actuator name longer than 64 bytes"))?;
    Ok(out)
}

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    // --- Sensor discovery ---
    /// Sensors whose name contains this tag (case-insensitive) are sampled
    pub sensor_tag: String,
    /// Sensors whose name contains any of these (case-insensitive) are skipped
    pub excluded_keywords: Vec<String>,

    // --- Decision ---
    /// Fill percentage at or above which actuators are suspended
    pub threshold_percent: f64,

    // --- Dispatch ---
    /// Actuators that receive the command, in dispatch order
    pub actuators: ActuatorList,

    // --- Retry ---
    /// Retries allowed after the initial failed attempt
    pub retry_count: u8,
    /// Fast ticks between retries
    pub retry_delay_ticks: u32,

    // --- Timing ---
    /// Fast cadence rate (ticks per second)
    pub fast_ticks_per_sec: u32,
    /// Management cadence interval (seconds)
    pub management_interval_secs: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        let mut actuators = ActuatorList::new();
        for name in ["[HMiner-1] Programmable Block", "[HMiner-2] Programmable Block"] {
            if let Ok(n) = actuator_name(name) {
                let pushed = actuators.push(n).is_ok();
                debug_assert!(pushed, "default actuators exceed MAX_ACTUATORS");
            }
        }

        Self {
            // Discovery
            sensor_tag: "[QG]".into(),
            excluded_keywords: ["Special", "Locked", "Seat", "Control Station"]
                .into_iter()
                .map(String::from)
                .collect(),

            // Decision
            threshold_percent: 75.0,

            // Dispatch
            actuators,

            // Retry
            retry_count: 3,
            retry_delay_ticks: 60, // ~1s at 60 ticks/s

            // Timing
            fast_ticks_per_sec: 60,
            management_interval_secs: 10,
        }
    }
}

impl MonitorConfig {
    /// Replace the actuator list.
    pub fn with_actuators(mut self, names: &[&str]) -> Result<Self, ConfigError> {
        let mut list = ActuatorList::new();
        for name in names {
            list.push(actuator_name(name)?)
                .map_err(|_| ConfigError::ValidationFailed("more than 8 actuators"))?;
        }
        self.actuators = list;
        Ok(self)
    }

    /// Seconds between retries, as shown in the operator log.
    pub fn retry_delay_secs(&self) -> f32 {
        self.retry_delay_ticks as f32 / self.fast_ticks_per_sec.max(1) as f32
    }

    /// Check every field against its allowed range.
    ///
    /// Out-of-range values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sensor_tag.trim().is_empty() {
            return Err(ConfigError::ValidationFailed("sensor_tag must not be empty"));
        }
        if !(self.threshold_percent > 0.0 && self.threshold_percent <= 100.0) {
            return Err(ConfigError::ValidationFailed(
                "threshold_percent must be in (0, 100]",
            ));
        }
        if self.actuators.is_empty() {
            return Err(ConfigError::ValidationFailed("actuators must not be empty"));
        }
        for (i, name) in self.actuators.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(ConfigError::ValidationFailed("actuator name must not be empty"));
            }
            if self.actuators[..i].contains(name) {
                return Err(ConfigError::ValidationFailed("duplicate actuator name"));
            }
        }
        if self.retry_delay_ticks == 0 {
            return Err(ConfigError::ValidationFailed("retry_delay_ticks must be > 0"));
        }
        if self.fast_ticks_per_sec == 0 {
            return Err(ConfigError::ValidationFailed("fast_ticks_per_sec must be > 0"));
        }
        if self.management_interval_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "management_interval_secs must be > 0",
            ));
        }
        Ok(())
    }
}
