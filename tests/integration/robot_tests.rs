//! Integration tests for the Robot → sequencer → drive/shooter pipeline.
//!
//! The mock hardware never moves on its own: tests finish a drive move by
//! putting the encoders on their targets.

use hotshot::Robot;
use hotshot::app::commands::{RobotCommand, ShotPreset};
use hotshot::app::ports::MotorId;
use hotshot::auton::{Routine, Step, routes};
use hotshot::config::RobotConfig;
use hotshot::control::drive::DriveMode;
use hotshot::control::shooter::ShooterEvent;
use hotshot::fsm::{DISABLED, STARTED};

use super::mock_hw::{MockHardware, Recorded, RecordingSink};

const LEFT: MotorId = MotorId(6);
const RIGHT: MotorId = MotorId(5);
const UPPER: MotorId = MotorId(4);
const FEEDER: MotorId = MotorId(2);

static SHOOT_THEN_DRIVE: Routine = Routine {
    name: "shoot-then-drive",
    steps: &[Step::shoot(100, 100, 50), Step::drive(10.0, 50)],
};

fn make_robot() -> (Robot, MockHardware, RecordingSink) {
    let mut hw = MockHardware::new();
    let mut robot = Robot::new(&RobotConfig::default()).unwrap();
    robot.reset(0, &mut hw);
    (robot, hw, RecordingSink::new())
}

fn finish_move(robot: &Robot, hw: &mut MockHardware) {
    let (l, r) = robot.drive().motors();
    let (tl, tr) = robot.drive().targets();
    hw.set_encoder(l, tl);
    hw.set_encoder(r, tr);
}

// ── Autonomous sequencing ─────────────────────────────────────

#[test]
fn routine_advances_only_on_drive_completion() {
    let (mut robot, mut hw, mut sink) = make_robot();
    robot.handle_command(RobotCommand::StartAutonomous(&routes::BLUE_LEFT), 0, &mut hw);
    assert!(robot.is_autonomous());

    robot.tick(0, &mut hw, &mut sink);
    assert_eq!(robot.sequencer().current_state(), STARTED);
    assert!(!robot.sequencer().is_ready());
    assert_eq!(robot.drive().mode(), DriveMode::PidDistance);
    assert_eq!(hw.power(LEFT), -50, "reverse move starts at full step power");

    // Still far from target: nothing changes.
    robot.tick(10, &mut hw, &mut sink);
    assert_eq!(robot.sequencer().current_state(), STARTED);
    assert_eq!(sink.drive_events(), 0);

    finish_move(&robot, &mut hw);
    robot.tick(20, &mut hw, &mut sink);
    assert_eq!(sink.events, vec![Recorded::Drive(DriveMode::PidDistance)]);
    assert_eq!(robot.sequencer().current_state(), STARTED + 1);
    assert!(robot.sequencer().is_ready());
    assert_eq!(robot.drive().mode(), DriveMode::Stopped);

    robot.tick(30, &mut hw, &mut sink);
    assert_eq!(robot.drive().mode(), DriveMode::PidAngle);
    assert!(!robot.sequencer().is_ready());
}

#[test]
fn shooter_deadline_advances_routine() {
    let (mut robot, mut hw, mut sink) = make_robot();
    robot.handle_command(RobotCommand::StartAutonomous(&SHOOT_THEN_DRIVE), 0, &mut hw);

    robot.tick(0, &mut hw, &mut sink);
    assert_eq!(robot.shooter().goal_power(), 100);
    assert_eq!(robot.shooter().deadlines().0, Some(50));

    for now in (10..50).step_by(10) {
        robot.tick(now, &mut hw, &mut sink);
        assert_eq!(robot.sequencer().current_state(), STARTED);
    }
    assert_eq!(hw.power(UPPER), 40);
    assert_eq!(hw.power(FEEDER), 100);

    robot.tick(50, &mut hw, &mut sink);
    assert_eq!(sink.events, vec![Recorded::Shooter(ShooterEvent::ShootStopped)]);
    assert_eq!(robot.sequencer().current_state(), STARTED + 1);
    assert_eq!(hw.power(FEEDER), 0);

    robot.tick(60, &mut hw, &mut sink);
    assert_eq!(robot.drive().mode(), DriveMode::PidDistance);
}

#[test]
fn routine_stops_sequencer_after_last_step() {
    let (mut robot, mut hw, mut sink) = make_robot();
    robot.handle_command(RobotCommand::StartAutonomous(&routes::RED_RIGHT), 0, &mut hw);

    let mut now = 0;
    for _ in 0..routes::RED_RIGHT.len() {
        // Issue the step, then satisfy it.
        robot.tick(now, &mut hw, &mut sink);
        now += 10;
        if robot.drive().is_busy() {
            finish_move(&robot, &mut hw);
            robot.tick(now, &mut hw, &mut sink);
        } else {
            let (stop, _) = robot.shooter().deadlines();
            now = stop.unwrap();
            robot.tick(now, &mut hw, &mut sink);
        }
        now += 10;
    }
    assert!(robot.is_autonomous());

    robot.tick(now, &mut hw, &mut sink);
    assert!(!robot.is_autonomous());
    assert_eq!(robot.sequencer().current_state(), DISABLED);
    assert_eq!(robot.routine(), None);
    assert_eq!(sink.shooter_events(), 1);
    assert_eq!(sink.drive_events(), routes::RED_RIGHT.len() - 1);
}

#[test]
fn stop_autonomous_halts_drive() {
    let (mut robot, mut hw, mut sink) = make_robot();
    robot.handle_command(RobotCommand::StartAutonomous(&routes::BLUE_LEFT), 0, &mut hw);
    robot.tick(0, &mut hw, &mut sink);
    assert_ne!(hw.power(LEFT), 0);

    robot.handle_command(RobotCommand::StopAutonomous, 10, &mut hw);
    assert!(!robot.is_autonomous());
    assert_eq!(robot.drive().mode(), DriveMode::Stopped);
    assert_eq!(hw.power(LEFT), 0);
    assert_eq!(hw.power(RIGHT), 0);

    // Operator control is back.
    robot.handle_command(RobotCommand::Tank { left: 30, right: -30 }, 20, &mut hw);
    robot.tick(20, &mut hw, &mut sink);
    assert_eq!((hw.power(LEFT), hw.power(RIGHT)), (30, -30));
}

// ── Teleop ────────────────────────────────────────────────────

#[test]
fn calibration_move_clears_when_done() {
    let (mut robot, mut hw, mut sink) = make_robot();
    robot.handle_command(RobotCommand::CalibrateDistance, 0, &mut hw);
    assert!(robot.is_cal_drive());
    assert!(!robot.is_teleop());

    // Operator power is locked out while the move runs.
    robot.handle_command(RobotCommand::Arcade { drive: 50, turn: 0 }, 0, &mut hw);
    assert_eq!(robot.drive().mode(), DriveMode::PidDistance);

    robot.tick(0, &mut hw, &mut sink);
    finish_move(&robot, &mut hw);
    robot.tick(10, &mut hw, &mut sink);
    assert!(!robot.is_cal_drive());
    assert_eq!(sink.events, vec![Recorded::Drive(DriveMode::PidDistance)]);
}

#[test]
fn shot_preset_ramps_shooter() {
    let (mut robot, mut hw, mut sink) = make_robot();
    robot.handle_command(RobotCommand::Shoot(ShotPreset::Low), 0, &mut hw);
    for now in [10, 20, 30] {
        robot.tick(now, &mut hw, &mut sink);
    }
    assert_eq!(hw.power(UPPER), 20);
    assert_eq!(hw.power(FEEDER), 100);
    assert_eq!(robot.shooter().deadlines(), (None, None));

    robot.handle_command(RobotCommand::Shoot(ShotPreset::Off), 30, &mut hw);
    robot.tick(40, &mut hw, &mut sink);
    assert_eq!(hw.power(UPPER), 10);
    assert_eq!(hw.power(FEEDER), 0);
    assert!(sink.events.is_empty());
}

#[test]
fn line_following_steers_drive() {
    let (mut robot, mut hw, mut sink) = make_robot();
    robot.handle_command(RobotCommand::FollowLine(true), 0, &mut hw);
    assert!(robot.is_following_line());

    // Inverse sensors: a dark reading lands in the high zone.
    hw.raw = [0, 0, 0, 0];
    robot.tick(0, &mut hw, &mut sink);
    assert_eq!(robot.line_follower().weighted_value(), 26);
    assert_eq!((hw.power(LEFT), hw.power(RIGHT)), (65, 65));

    // Only the left sensor on the line: steer left.
    hw.raw = [0, 1000, 1000, 0];
    robot.tick(10, &mut hw, &mut sink);
    assert_eq!(robot.line_follower().weighted_value(), 18);
    assert_eq!((hw.power(LEFT), hw.power(RIGHT)), (45, 85));

    // Line lost: overshoot values of the last good action.
    hw.raw = [1000, 1000, 1000, 0];
    robot.tick(20, &mut hw, &mut sink);
    assert!(robot.line_follower().overshoot_active());
    assert_eq!(robot.line_follower().commanded(), (50, -30));

    robot.handle_command(RobotCommand::Tank { left: 0, right: 0 }, 30, &mut hw);
    assert!(!robot.is_following_line());
}

#[test]
fn light_calibration_toggles_every_sensor() {
    let (mut robot, mut hw, mut sink) = make_robot();
    robot.handle_command(RobotCommand::ToggleLightCalibration, 0, &mut hw);
    assert!(robot.line_follower().is_calibrating());

    for raw in [300, 700] {
        hw.raw = [raw; 4];
        robot.tick(0, &mut hw, &mut sink);
    }

    robot.handle_command(RobotCommand::ToggleLightCalibration, 0, &mut hw);
    assert!(!robot.line_follower().is_calibrating());
    for sensor in robot.line_follower().sensors() {
        assert_eq!(sensor.raw_range(), (300, 700));
    }
}
