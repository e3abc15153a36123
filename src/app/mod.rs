//! Application core: the robot orchestrator.
//!
//! [`service::Robot`] owns the drive, shooter, line follower and
//! autonomous sequencer, relays component notifications into the
//! sequencer and gates operator commands while a routine runs.  All
//! hardware access goes through the traits in [`ports`].

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
