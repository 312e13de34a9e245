//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises the controller against
//! mock adapters. No host environment is required.

mod controller_tests;
mod mock_grid;
