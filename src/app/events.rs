//! Outbound application events.
//!
//! The [`MonitorService`](super::service::MonitorService) emits these through
//! the [`EventSink`](super::ports::EventSink) port, one per significant
//! occurrence. Adapters on the other side decide what to do with them.

use crate::config::ActuatorName;
use crate::control::policy::Command;

use super::commands::Trigger;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started.
    Started { actuators: usize, threshold_percent: f64 },

    /// A sample was taken.
    Sampled { percent: f64, sensors: usize },

    /// No matching sensor had any capacity; nothing was commanded.
    NoSensorData { tag: String },

    /// A command is about to be sent to every configured actuator.
    Dispatching(Command),

    /// The actuator accepted the command.
    CommandSent { actuator: ActuatorName, command: Command },

    /// The actuator name did not resolve.
    ActuatorMissing { actuator: ActuatorName },

    /// The actuator resolved but refused the command.
    ActuatorRejected { actuator: ActuatorName, command: Command },

    /// A failed attempt will be repeated after `delay_secs`.
    RetryScheduled { attempt: u8, max: u8, delay_secs: f32 },

    /// A retry reached every actuator.
    RetryRecovered { attempt: u8 },

    /// The retry budget ran out; the cycle is abandoned.
    RetryExhausted { retries: u8 },

    /// A trigger arrived in a state that does not honour it.
    TriggerIgnored(Trigger),

    /// Retry state was cleared from outside.
    Reset,
}
