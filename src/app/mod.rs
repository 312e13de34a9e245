//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules for the controller: trigger
//! classification, retry orchestration, and the events it reports.
//! All interaction with the host happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without a real host.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
