//! Integration tests for the MonitorService → dispatch → retry pipeline.
//!
//! Each scenario drives the service through host triggers against the
//! recording mock grid and asserts on actuator runs, events and the
//! fast-cadence requests.

use crate::mock_grid::{Availability, CadenceCall, LogSink, MockCadence, MockGrid};

use fillgate::app::commands::{Cadence, Trigger};
use fillgate::app::events::AppEvent;
use fillgate::app::service::{MonitorService, TickOutcome};
use fillgate::config::MonitorConfig;
use fillgate::control::policy::{Command, Decision};
use fillgate::fsm::{Phase, Transition};
use fillgate::scheduler::Scheduler;
use fillgate::sensors::SensorReading;

const PB1: &str = "[HMiner-1] Programmable Block";
const PB2: &str = "[HMiner-2] Programmable Block";

fn make_app() -> (MonitorService, MockCadence, LogSink) {
    let mut app = MonitorService::new(MonitorConfig::default());
    let mut sink = LogSink::new();
    app.start(&mut sink);
    (app, MockCadence::new(), sink)
}

/// Deliver fast ticks while the cadence is armed. Returns ticks delivered.
fn drive_fast(
    app: &mut MonitorService,
    grid: &mut MockGrid,
    cadence: &mut MockCadence,
    sink: &mut LogSink,
    limit: u32,
) -> u32 {
    let mut ticks = 0;
    while cadence.fast && ticks < limit {
        app.handle(Trigger::Fast, grid, cadence, sink);
        ticks += 1;
    }
    ticks
}

/// Two tagged sensors with the given used amounts out of 100 each.
fn two_bins(used_a: f64, used_b: f64) -> MockGrid {
    let mut grid = MockGrid::new();
    grid.sensors.push(SensorReading::new("[QG] Bin A", 100.0, used_a));
    grid.sensors.push(SensorReading::new("[QG] Bin B", 100.0, used_b));
    grid
}

fn dispatching(sink: &LogSink) -> usize {
    sink.count(|e| matches!(e, AppEvent::Dispatching(_)))
}

// ── Scenario A: below threshold → CONT ───────────────────────

#[test]
fn below_threshold_sends_activate_to_all() {
    let (mut app, mut cadence, mut sink) = make_app();
    let mut grid = two_bins(80.0, 60.0)
        .actuator(PB1, Availability::Always, true)
        .actuator(PB2, Availability::Always, true);

    let out = app.handle(Trigger::Management, &mut grid, &mut cadence, &mut sink);

    assert_eq!(out, TickOutcome::Attempted(Transition::Settled));
    assert_eq!(grid.runs(PB1), vec!["CONT"]);
    assert_eq!(grid.runs(PB2), vec!["CONT"]);
    assert_eq!(app.last_decision(), Some(Decision::Dispatch(Command::Activate)));
}

// ── Scenario B: at threshold → STOP ──────────────────────────

#[test]
fn at_threshold_sends_suspend() {
    let (mut app, mut cadence, mut sink) = make_app();
    let mut grid = two_bins(80.0, 70.0)
        .actuator(PB1, Availability::Always, true)
        .actuator(PB2, Availability::Always, true);

    app.handle(Trigger::Management, &mut grid, &mut cadence, &mut sink);

    assert_eq!(grid.runs(PB1), vec!["STOP"]);
    assert_eq!(grid.runs(PB2), vec!["STOP"]);
    let percent = sink.events.iter().find_map(|e| match e {
        AppEvent::Sampled { percent, .. } => Some(*percent),
        _ => None,
    });
    assert!(percent.is_some_and(|p| (p - 75.0).abs() < 1e-9));
}

// ── Scenario C: all reachable → no retry ─────────────────────

#[test]
fn all_reachable_never_requests_fast_ticks() {
    let (mut app, mut cadence, mut sink) = make_app();
    let mut grid = MockGrid::at_ratio(0.10)
        .actuator(PB1, Availability::Always, true)
        .actuator(PB2, Availability::Always, true);

    app.handle(Trigger::Management, &mut grid, &mut cadence, &mut sink);

    assert_eq!(app.phase(), Phase::Idle);
    assert!(!cadence.calls.contains(&CadenceCall::Request));
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::RetryScheduled { .. })),
        0
    );
}

// ── Scenario D: missing twice, then reachable ────────────────

#[test]
fn late_actuator_recovers_on_second_retry() {
    let (mut app, mut cadence, mut sink) = make_app();
    let mut grid = MockGrid::at_ratio(0.10)
        .actuator(PB1, Availability::FromLookup(3), true)
        .actuator(PB2, Availability::Always, true);

    let out = app.handle(Trigger::Management, &mut grid, &mut cadence, &mut sink);
    assert_eq!(
        out,
        TickOutcome::Attempted(Transition::RetryScheduled { attempt: 1, max: 3 })
    );
    assert!(cadence.fast);

    let ticks = drive_fast(&mut app, &mut grid, &mut cadence, &mut sink, 1_000);

    // Two retries, each after the full delay.
    assert_eq!(ticks, 120);
    assert_eq!(dispatching(&sink), 3);
    assert_eq!(grid.lookups(PB1), 3);
    assert_eq!(grid.runs(PB1), vec!["CONT"]);
    assert_eq!(grid.runs(PB2), vec!["CONT", "CONT", "CONT"]);
    assert!(sink.events.contains(&AppEvent::RetryRecovered { attempt: 2 }));
    assert_eq!(sink.count(|e| matches!(e, AppEvent::RetryExhausted { .. })), 0);
    assert_eq!(app.phase(), Phase::Idle);
    assert_eq!(cadence.calls.last(), Some(&CadenceCall::Cancel));
}

// ── Scenario E: permanently missing → exhaustion ─────────────

#[test]
fn permanently_missing_actuators_exhaust_budget() {
    let (mut app, mut cadence, mut sink) = make_app();
    let mut grid = MockGrid::at_ratio(0.10)
        .actuator(PB1, Availability::Never, true)
        .actuator(PB2, Availability::Never, true);

    app.handle(Trigger::Management, &mut grid, &mut cadence, &mut sink);
    drive_fast(&mut app, &mut grid, &mut cadence, &mut sink, 1_000);

    let scheduled: Vec<(u8, u8)> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::RetryScheduled { attempt, max, .. } => Some((*attempt, *max)),
            _ => None,
        })
        .collect();
    assert_eq!(scheduled, vec![(1, 3), (2, 3), (3, 3)]);
    assert!(sink.events.contains(&AppEvent::RetryExhausted { retries: 3 }));

    // Initial attempt plus three retries.
    assert_eq!(dispatching(&sink), 4);
    assert_eq!(app.attempts_total(), 4);
    assert!(grid.all_runs().is_empty());

    let state = app.retry_state();
    assert_eq!(app.phase(), Phase::Idle);
    assert_eq!(state.delay_remaining, 0);
    assert!(!cadence.fast);
}

#[test]
fn retry_delay_is_reported_in_seconds() {
    let (mut app, mut cadence, mut sink) = make_app();
    let mut grid = MockGrid::at_ratio(0.10).actuator(PB2, Availability::Always, true);

    app.handle(Trigger::Management, &mut grid, &mut cadence, &mut sink);

    let delay = sink.events.iter().find_map(|e| match e {
        AppEvent::RetryScheduled { delay_secs, .. } => Some(*delay_secs),
        _ => None,
    });
    assert_eq!(delay, Some(1.0));
}

// ── Re-entrancy hardening ────────────────────────────────────

#[test]
fn management_tick_while_pending_is_ignored() {
    let (mut app, mut cadence, mut sink) = make_app();
    let mut grid = MockGrid::at_ratio(0.10)
        .actuator(PB1, Availability::Never, true)
        .actuator(PB2, Availability::Always, true);

    app.handle(Trigger::Management, &mut grid, &mut cadence, &mut sink);
    let before = app.retry_state();

    let out = app.handle(Trigger::Management, &mut grid, &mut cadence, &mut sink);

    assert_eq!(out, TickOutcome::Ignored);
    assert_eq!(app.retry_state(), before);
    assert_eq!(dispatching(&sink), 1);
    assert!(sink.events.contains(&AppEvent::TriggerIgnored(Trigger::Management)));
}

#[test]
fn stale_fast_tick_while_idle_is_ignored() {
    let (mut app, mut cadence, mut sink) = make_app();
    let mut grid = MockGrid::at_ratio(0.10);

    let out = app.handle(Trigger::Fast, &mut grid, &mut cadence, &mut sink);

    assert_eq!(out, TickOutcome::Ignored);
    assert_eq!(grid.discovery_calls, 0);
    assert_eq!(app.attempts_total(), 0);
}

#[test]
fn fresh_cycle_after_exhaustion_starts_from_zero() {
    let (mut app, mut cadence, mut sink) = make_app();
    let mut grid = MockGrid::at_ratio(0.10)
        .actuator(PB1, Availability::Never, true)
        .actuator(PB2, Availability::Always, true);

    app.handle(Trigger::Management, &mut grid, &mut cadence, &mut sink);
    drive_fast(&mut app, &mut grid, &mut cadence, &mut sink, 1_000);

    let out = app.handle(Trigger::Management, &mut grid, &mut cadence, &mut sink);
    assert_eq!(
        out,
        TickOutcome::Attempted(Transition::RetryScheduled { attempt: 1, max: 3 })
    );
}

// ── Rejection and data edge cases ────────────────────────────

#[test]
fn rejecting_actuator_is_reported_but_not_retried() {
    let (mut app, mut cadence, mut sink) = make_app();
    let mut grid = MockGrid::at_ratio(0.90)
        .actuator(PB1, Availability::Always, false)
        .actuator(PB2, Availability::Always, true);

    let out = app.handle(Trigger::Management, &mut grid, &mut cadence, &mut sink);

    assert_eq!(out, TickOutcome::Attempted(Transition::Settled));
    assert_eq!(sink.count(|e| matches!(e, AppEvent::ActuatorRejected { .. })), 1);
    assert!(!cadence.fast);
    assert_eq!(grid.runs(PB1), vec!["STOP"]);
}

#[test]
fn no_sensors_skips_dispatch() {
    let (mut app, mut cadence, mut sink) = make_app();
    let mut grid = MockGrid::new().actuator(PB1, Availability::Always, true);

    let out = app.handle(Trigger::Management, &mut grid, &mut cadence, &mut sink);

    assert_eq!(out, TickOutcome::Attempted(Transition::Settled));
    assert!(grid.all_runs().is_empty());
    assert_eq!(app.last_decision(), Some(Decision::Skip));
    assert_eq!(sink.count(|e| matches!(e, AppEvent::NoSensorData { .. })), 1);
}

#[test]
fn excluded_sensors_do_not_count() {
    let (mut app, mut cadence, mut sink) = make_app();
    let mut grid = MockGrid::at_ratio(0.10)
        .actuator(PB1, Availability::Always, true)
        .actuator(PB2, Availability::Always, true);
    grid.sensors
        .push(SensorReading::new("[QG] Locked Bin", 100_000.0, 100_000.0));
    grid.sensors
        .push(SensorReading::new("Untagged Crate", 100_000.0, 100_000.0));

    app.handle(Trigger::Management, &mut grid, &mut cadence, &mut sink);

    assert_eq!(grid.runs(PB1), vec!["CONT"]);
}

// ── Forced refresh ───────────────────────────────────────────

#[test]
fn refresh_argument_cuts_retry_delay_short() {
    let (mut app, mut cadence, mut sink) = make_app();
    let mut grid = MockGrid::at_ratio(0.10)
        .actuator(PB1, Availability::FromLookup(2), true)
        .actuator(PB2, Availability::Always, true);

    app.handle(Trigger::Management, &mut grid, &mut cadence, &mut sink);
    assert!(cadence.fast);

    let trigger = Trigger::from_invocation(Cadence::Fast, " Refresh ");
    let out = app.handle(trigger, &mut grid, &mut cadence, &mut sink);

    assert_eq!(out, TickOutcome::Attempted(Transition::Recovered { retry: 1 }));
    assert!(!cadence.fast);
    assert_eq!(grid.runs(PB1), vec!["CONT"]);
}

// ── Scheduler as the cadence port ────────────────────────────

#[test]
fn scheduler_drives_retries_to_exhaustion() {
    let mut app = MonitorService::new(MonitorConfig::default());
    let mut sink = LogSink::new();
    let mut sched = Scheduler::from_config(app.config());
    let mut grid = MockGrid::at_ratio(0.10)
        .actuator(PB1, Availability::Never, true)
        .actuator(PB2, Availability::Always, true);

    app.handle(Trigger::Management, &mut grid, &mut sched, &mut sink);
    assert!(sched.is_fast_armed());

    // Three retries at 60 ticks each, well inside one management interval.
    for _ in 0..180 {
        for cadence in sched.tick() {
            let trigger = Trigger::from_invocation(cadence, "");
            app.handle(trigger, &mut grid, &mut sched, &mut sink);
        }
    }

    assert!(!sched.is_fast_armed());
    assert!(sink.events.contains(&AppEvent::RetryExhausted { retries: 3 }));
    assert_eq!(app.attempts_total(), 4);
}
