//! Fuzz target: configuration and grid JSON decoding
//!
//! Feeds arbitrary bytes to both JSON decoders and verifies:
//! - No panics under arbitrary input
//! - A config that decodes either validates or fails with `ValidationFailed`
//! - A validated config yields a service that samples a decoded grid
//!   without panicking
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use libfuzzer_sys::fuzz_target;

use fillgate::adapters::grid::{GridSpec, SimulatedGrid};
use fillgate::app::commands::Trigger;
use fillgate::app::events::AppEvent;
use fillgate::app::ports::{CadencePort, ConfigError, EventSink};
use fillgate::app::service::MonitorService;
use fillgate::config::MonitorConfig;

struct Quiet;

impl EventSink for Quiet {
    fn emit(&mut self, _event: &AppEvent) {}
}

impl CadencePort for Quiet {
    fn request_fast(&mut self) {}
    fn cancel_fast(&mut self) {}
}

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Config before the first '\n---\n' separator, grid after.
    let (cfg_text, grid_text) = text.split_once("\n---\n").unwrap_or((text, text));

    let config = match serde_json::from_str::<MonitorConfig>(cfg_text) {
        Ok(cfg) => match cfg.validate() {
            Ok(()) => cfg,
            Err(ConfigError::ValidationFailed(_)) => return,
            Err(e) => panic!("validate returned unexpected error: {e}"),
        },
        Err(_) => MonitorConfig::default(),
    };

    let Ok(spec) = serde_json::from_str::<GridSpec>(grid_text) else {
        return;
    };
    let mut grid = SimulatedGrid::from_spec(spec);

    let mut app = MonitorService::new(config);
    let mut quiet = Quiet;
    let mut cadence = Quiet;
    app.handle(Trigger::Management, &mut grid, &mut cadence, &mut quiet);
    for _ in 0..4 {
        app.handle(Trigger::ForcedRefresh, &mut grid, &mut cadence, &mut quiet);
    }
    assert!(app.retry_state().attempts_used <= app.retry_state().attempts_max);
});
