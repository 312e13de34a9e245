//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to                  |
//! |----------------|--------------------|------------------------------|
//! | `grid`         | SensorPort         | JSON-described sensor set    |
//! |                | ActuatorPort       | JSON-described actuators     |
//! | `log_sink`     | EventSink          | `log` facade                 |
//! | `logger`       | `log::Log`         | stderr, timestamped lines    |
//! | `config_file`  | ConfigPort         | JSON file on disk            |
//!
//! The host cadence (`CadencePort`) lives in [`crate::scheduler`].

pub mod config_file;
pub mod grid;
pub mod log_sink;
pub mod logger;
