//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events through the
//! `log` facade, one line per event. The installed subscriber adds the
//! timestamp prefix.

use log::Level;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] as an operator-readable line.
pub struct LogEventSink {
    /// Short label used in sample lines, e.g. `QG`.
    label: String,
}

impl LogEventSink {
    /// `tag` is the sensor tag; brackets are stripped for the label.
    pub fn new(tag: &str) -> Self {
        Self {
            label: tag.trim_matches(|c| c == '[' || c == ']').to_string(),
        }
    }

    /// Level and wording of the line logged for `event`.
    fn line(&self, event: &AppEvent) -> (Level, String) {
        match event {
            AppEvent::Started {
                actuators,
                threshold_percent,
            } => (
                Level::Info,
                format!(
                    "Started: {} actuators, threshold {:.1}%",
                    actuators, threshold_percent
                ),
            ),
            AppEvent::Sampled { percent, sensors } => (
                Level::Info,
                format!(
                    "{} Storage: {:.1}% full ({} sensors)",
                    self.label, percent, sensors
                ),
            ),
            AppEvent::NoSensorData { tag } => {
                (Level::Info, format!("No valid {} sensors found.", tag))
            }
            AppEvent::Dispatching(cmd) => (
                Level::Info,
                format!("Sending {} command to actuators...", cmd),
            ),
            AppEvent::CommandSent { actuator, command } => {
                (Level::Info, format!("Sent {} to {}", command, actuator))
            }
            AppEvent::ActuatorMissing { actuator } => {
                (Level::Warn, format!("Not found: {}", actuator))
            }
            AppEvent::ActuatorRejected { actuator, .. } => (
                Level::Error,
                format!("ERROR: TryRun failed on {}", actuator),
            ),
            AppEvent::RetryScheduled {
                attempt,
                max,
                delay_secs,
            } => (
                Level::Info,
                format!("Retry {}/{} in {:.1}s", attempt, max, delay_secs),
            ),
            AppEvent::RetryRecovered { attempt } => (
                Level::Info,
                format!("All actuators reached on retry {}", attempt),
            ),
            AppEvent::RetryExhausted { retries } => {
                (Level::Warn, format!("Gave up after {} retries.", retries))
            }
            AppEvent::TriggerIgnored(trigger) => {
                (Level::Warn, format!("Ignored {:?} trigger", trigger))
            }
            AppEvent::Reset => (Level::Info, "Retry state reset".to_string()),
        }
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new("")
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        let (level, line) = self.line(event);
        log::log!(level, "{}", line);
    }
}
