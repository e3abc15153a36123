//! Fuzz target: JSON robot configuration
//!
//! Feeds arbitrary bytes through the same path the simulator uses to load
//! a configuration file and verifies:
//! - No panics while parsing, validating or building a `Robot`
//! - Every configuration that validates also builds
//!
//! cargo fuzz run fuzz_config

#![no_main]

use hotshot::Robot;
use hotshot::config::RobotConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(config) = serde_json::from_slice::<RobotConfig>(data) else {
        return;
    };
    if config.validate().is_ok() {
        assert!(Robot::new(&config).is_ok());
    }
});
