//! Inbound commands to the robot orchestrator.
//!
//! These come from the operator interface (joystick decoding lives outside
//! the core) or from a host tool such as the simulator.  Operator commands
//! are ignored while an autonomous routine is running.

use crate::auton::Routine;

/// Shooter presets selectable by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotPreset {
    High,
    Low,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RobotCommand {
    /// Open-loop power per side.
    Tank { left: i32, right: i32 },
    /// Open-loop drive/turn mix.
    Arcade { drive: i32, turn: i32 },
    /// Halt the drive.
    StopDrive,

    /// Run `routine` from its first step.  Ignored if one is running.
    StartAutonomous(&'static Routine),
    /// Abort the running routine and stop the drive.
    StopAutonomous,

    /// Start or end a light-sensor calibration session.
    ToggleLightCalibration,
    /// Drive the distance-calibration move, or cancel it.
    CalibrateDistance,
    /// Drive the full-turn calibration move, or cancel it.
    CalibrateAngle,

    /// Shooter on at a preset (feeder follows) or off.
    Shoot(ShotPreset),
    /// Pickup on (reverse runs the motors backwards) or off if running.
    TogglePickup { reverse: bool },

    /// Steer from the line follower instead of operator power.
    FollowLine(bool),
}
