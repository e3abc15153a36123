//! Event sources as seen by the autonomous sequencer.
//!
//! The orchestrator relays component notifications into
//! [`StateMachine::dispatch_event`](crate::fsm::StateMachine::dispatch_event)
//! with one of these tags as the event kind.  The id is source specific:
//! the finished [`DriveMode`](crate::control::drive::DriveMode) for the
//! drive, the [`ShooterEvent`](crate::control::shooter::ShooterEvent) for
//! the shooter.

/// Event kind tags.  Zero is reserved for "no event".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum EventSource {
    Button = 1,
    Sensor = 2,
    Drive = 3,
    Shooter = 4,
}

impl EventSource {
    pub const fn tag(self) -> i32 {
        self as i32
    }
}
