//! Decision and dispatch: fill ratio → [`Command`](policy::Command) → actuators.

pub mod dispatch;
pub mod policy;
