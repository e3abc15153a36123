//! Autonomous routines as data.
//!
//! A [`Routine`] is an ordered list of [`Step`]s.  Step *k* runs in
//! sequencer state `STARTED + k`: the orchestrator issues the step's
//! [`Action`], registers its [`Await`] as a wait slot and arms the
//! sequencer for state `STARTED + k + 1`.  When the state runs past the
//! last step the routine is over and the sequencer is stopped.
//!
//! ```text
//!   state 1          state 2          state 3
//!   Drive(-24) ──▶   Turn(90)   ──▶   Shoot(2s) ──▶ … ──▶ stop
//!      └ DriveDone      └ DriveDone      └ ShootStopped
//! ```

pub mod routes;

use crate::app::events::EventSource;
use crate::control::drive::DriveMode;
use crate::control::shooter::ShooterEvent;
use crate::fsm::{STARTED, State};

/// What a step commands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Straight PID move (inches, negative is reverse).
    Drive { distance: f32, power: i32 },
    /// In-place PID turn (degrees, positive is clockwise).
    Turn { angle: f32, power: i32 },
    /// Spin up the shooter and feeder, stopping after `duration_ms`.
    Shoot { power: i32, feeder: i32, duration_ms: u32 },
    /// Run roller and elevator, stopping after `duration_ms`.
    Pickup { roller: i32, elevator: i32, duration_ms: u32 },
}

/// The completion a step waits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Await {
    Drive(DriveMode),
    Shooter(ShooterEvent),
}

impl Await {
    /// Sequencer (kind, id) this completion is relayed as.
    pub const fn key(self) -> (i32, i32) {
        match self {
            Self::Drive(mode) => (EventSource::Drive.tag(), mode.event_id()),
            Self::Shooter(event) => (EventSource::Shooter.tag(), event.event_id()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub action: Action,
    pub until: Await,
}

impl Step {
    pub const fn drive(distance: f32, power: i32) -> Self {
        Self {
            action: Action::Drive { distance, power },
            until: Await::Drive(DriveMode::PidDistance),
        }
    }

    pub const fn turn(angle: f32, power: i32) -> Self {
        Self {
            action: Action::Turn { angle, power },
            until: Await::Drive(DriveMode::PidAngle),
        }
    }

    pub const fn shoot(power: i32, feeder: i32, duration_ms: u32) -> Self {
        Self {
            action: Action::Shoot {
                power,
                feeder,
                duration_ms,
            },
            until: Await::Shooter(ShooterEvent::ShootStopped),
        }
    }

    pub const fn pickup(roller: i32, elevator: i32, duration_ms: u32) -> Self {
        Self {
            action: Action::Pickup {
                roller,
                elevator,
                duration_ms,
            },
            until: Await::Shooter(ShooterEvent::PickupStopped),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Routine {
    pub name: &'static str,
    pub steps: &'static [Step],
}

impl Routine {
    /// The step to run in sequencer `state`, or `None` once the routine
    /// is finished (or for the disabled state).
    pub fn step(&self, state: State) -> Option<&Step> {
        let index = state.checked_sub(STARTED)?;
        self.steps.get(usize::try_from(index).ok()?)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
