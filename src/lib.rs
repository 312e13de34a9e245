//! Fillgate controller library.
//!
//! Samples aggregate fill across a set of storage sensors, decides between
//! resuming and suspending a fixed set of remote actuators, and dispatches
//! that command with a bounded, tick-driven retry when actuators are not
//! yet reachable. All host interaction goes through the port traits in
//! [`app::ports`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod fsm;
pub mod scheduler;
pub mod sensors;
