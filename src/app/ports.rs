//! Port traits — the hexagonal boundary between domain logic and the host environment.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ MonitorService (domain)
//! ```
//!
//! Driven adapters (discovery, actuators, cadence, event sinks, config
//! storage) implement these traits. The
//! [`MonitorService`](super::service::MonitorService) consumes them via
//! generics, so the domain core never touches the host directly.

use crate::config::MonitorConfig;
use crate::sensors::{NameFilter, SensorReading};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: environment → domain)
// ───────────────────────────────────────────────────────────────

/// Discovery query over capacity-bearing sensors.
pub trait SensorPort {
    /// Return a fresh reading for every sensor whose name passes `filter`.
    ///
    /// Called once per attempt; the environment may add or remove sensors
    /// between calls.
    fn find_sensors(&mut self, filter: &NameFilter) -> Vec<SensorReading>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → environment)
// ───────────────────────────────────────────────────────────────

/// A live, resolved actuator handle.
pub trait Actuator {
    /// Ask the actuator to run with a free-text argument.
    /// Returns `false` if the actuator refused.
    fn try_run(&mut self, argument: &str) -> bool;
}

/// Resolves actuator names to live handles.
pub trait ActuatorPort {
    /// Look up an actuator by its exact name. `None` if it is not
    /// reachable right now.
    fn find_actuator(&mut self, name: &str) -> Option<&mut dyn Actuator>;
}

// ───────────────────────────────────────────────────────────────
// Cadence port (driven adapter: domain → host scheduler)
// ───────────────────────────────────────────────────────────────

/// Controls the fast cadence used only while a retry is pending.
/// The management cadence is owned by the host and never changed here.
pub trait CadencePort {
    /// Start delivering fast ticks.
    fn request_fast(&mut self);

    /// Stop delivering fast ticks. Idempotent.
    fn cancel_fast(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists controller configuration.
///
/// Implementations MUST validate config values before persisting.
/// Invalid ranges are rejected with [`ConfigError::ValidationFailed`],
/// not silently clamped.
pub trait ConfigPort {
    /// Load configuration. [`ConfigError::NotFound`] if none is stored.
    fn load(&self) -> Result<MonitorConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &MonitorConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No config found in storage.
    NotFound,
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}
