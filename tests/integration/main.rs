//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises the robot orchestrator
//! against mock or simulated hardware.  All tests run on the host with no
//! real hardware required.

mod autonomous_tests;
mod mock_hw;
mod robot_tests;
