//! Unified error types for the Fillgate controller.
//!
//! Domain outcomes (no sensor data, unreachable actuators, an exhausted
//! retry budget) are reported as values and never surface here as errors.
//! This module covers the two places where something genuinely fails:
//! per-actuator delivery, and loading the configuration or the environment
//! description at startup.

use core::fmt;

use crate::app::ports::ConfigError;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible startup or adapter operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An actuator could not be commanded.
    Actuator(ActuatorError),
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
    /// The environment description could not be read or decoded.
    Environment(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Environment(msg) => write!(f, "environment: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

/// Why a single actuator did not receive a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// The configured name did not resolve to a live actuator.
    Missing,
    /// The actuator resolved but refused the run request.
    Rejected,
}

impl ActuatorError {
    /// Only a missing actuator can become reachable by waiting; a rejecting
    /// one will keep rejecting.
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "not found"),
            Self::Rejected => write!(f, "run request rejected"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
