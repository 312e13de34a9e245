//! Actuator dispatch.
//!
//! Resolves every configured actuator name afresh on each attempt and
//! delivers the command to the ones that resolve. Handles are never cached:
//! an actuator that was absent a moment ago may be reachable now.
//!
//! Only `missing` actuators make an attempt unsuccessful. A `failed`
//! (rejecting) actuator is reported but does not trigger a retry.

use crate::app::events::AppEvent;
use crate::app::ports::{ActuatorPort, EventSink};
use crate::config::{ActuatorList, ActuatorName};
use crate::error::ActuatorError;

use super::policy::Command;

/// Partition of the configured actuators after one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub command: Command,
    pub sent: ActuatorList,
    pub missing: ActuatorList,
    pub failed: ActuatorList,
}

impl DispatchReport {
    fn new(command: Command) -> Self {
        Self {
            command,
            sent: ActuatorList::new(),
            missing: ActuatorList::new(),
            failed: ActuatorList::new(),
        }
    }

    /// `true` when every actuator resolved.
    pub fn ok(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Sends a [`Command`] to a fixed list of actuators.
pub struct ActuatorDispatcher {
    actuators: ActuatorList,
}

impl ActuatorDispatcher {
    pub fn new(actuators: ActuatorList) -> Self {
        Self { actuators }
    }

    pub fn actuators(&self) -> &[ActuatorName] {
        &self.actuators
    }

    /// Deliver `command` to every configured actuator, in order.
    ///
    /// Emits one event per actuator outcome.
    pub fn dispatch(
        &self,
        command: Command,
        port: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> DispatchReport {
        sink.emit(&AppEvent::Dispatching(command));
        let mut report = DispatchReport::new(command);

        for name in &self.actuators {
            match deliver(port, name, command) {
                Ok(()) => {
                    sink.emit(&AppEvent::CommandSent {
                        actuator: name.clone(),
                        command,
                    });
                    record(&mut report.sent, name);
                }
                Err(e) if e.is_retryable() => {
                    sink.emit(&AppEvent::ActuatorMissing {
                        actuator: name.clone(),
                    });
                    record(&mut report.missing, name);
                }
                Err(_) => {
                    sink.emit(&AppEvent::ActuatorRejected {
                        actuator: name.clone(),
                        command,
                    });
                    record(&mut report.failed, name);
                }
            }
        }

        report
    }
}

/// Append `name` to a report list. Every list has the same capacity as the
/// configured actuator list, so the push cannot fail.
fn record(list: &mut ActuatorList, name: &ActuatorName) {
    let pushed = list.push(name.clone()).is_ok();
    debug_assert!(pushed, "report list outgrew the actuator list");
}

fn deliver(port: &mut impl ActuatorPort, name: &str, command: Command) -> Result<(), ActuatorError> {
    let actuator = port.find_actuator(name).ok_or(ActuatorError::Missing)?;
    if actuator.try_run(command.wire_token()) {
        Ok(())
    } else {
        Err(ActuatorError::Rejected)
    }
}
