//! Full autonomous routes on the simulated robot.
//!
//! The simulator turns motor power into encoder motion, so every PID move
//! has to converge on its own for a route to finish.

use hotshot::Robot;
use hotshot::adapters::sim::SimHardware;
use hotshot::app::commands::RobotCommand;
use hotshot::app::ports::MotorId;
use hotshot::auton::{Action, Routine, routes};
use hotshot::config::RobotConfig;
use hotshot::control::drive::DriveMode;
use hotshot::control::shooter::ShooterEvent;

use super::mock_hw::{Recorded, RecordingSink};

const MAX_TICKS: u32 = 20_000;

struct Run {
    robot: Robot,
    hw: SimHardware,
    sink: RecordingSink,
    now_ms: u32,
}

fn start(routine: &'static Routine) -> Run {
    let config = RobotConfig::default();
    let mut hw = SimHardware::default();
    let mut robot = Robot::new(&config).unwrap();
    robot.reset(0, &mut hw);
    robot.handle_command(RobotCommand::StartAutonomous(routine), 0, &mut hw);
    Run {
        robot,
        hw,
        sink: RecordingSink::new(),
        now_ms: 0,
    }
}

impl Run {
    fn step(&mut self) {
        let period = 10;
        self.robot.tick(self.now_ms, &mut self.hw, &mut self.sink);
        self.hw.advance(period);
        self.now_ms += period;
    }

    fn run_to_end(&mut self) {
        for _ in 0..MAX_TICKS {
            if !self.robot.is_autonomous() {
                return;
            }
            self.step();
        }
        panic!(
            "route did not finish; stuck in state {}",
            self.robot.sequencer().current_state()
        );
    }
}

fn expected_completions(routine: &Routine) -> Vec<Recorded> {
    routine
        .steps
        .iter()
        .map(|s| match s.action {
            Action::Drive { .. } => Recorded::Drive(DriveMode::PidDistance),
            Action::Turn { .. } => Recorded::Drive(DriveMode::PidAngle),
            Action::Shoot { .. } => Recorded::Shooter(ShooterEvent::ShootStopped),
            Action::Pickup { .. } => Recorded::Shooter(ShooterEvent::PickupStopped),
        })
        .collect()
}

#[test]
fn every_route_runs_to_completion() {
    for routine in routes::ALL {
        let mut run = start(routine);
        run.run_to_end();

        assert_eq!(
            run.sink.events,
            expected_completions(routine),
            "{}",
            routine.name
        );
        assert_eq!(run.robot.routine(), None);
        assert_eq!(run.robot.drive().mode(), DriveMode::Stopped);
    }
}

#[test]
fn shot_holds_for_its_duration() {
    let mut run = start(&routes::RED_RIGHT);

    // Run until the shot step has been issued.
    while run.robot.shooter().goal_power() == 0 {
        run.step();
    }
    let issued = run.now_ms;
    let (stop, _) = run.robot.shooter().deadlines();
    assert_eq!(stop, Some(issued - 10 + 2000));

    while run.sink.shooter_events() == 0 {
        assert_eq!(run.robot.drive().mode(), DriveMode::Stopped);
        run.step();
    }
    assert!(run.now_ms - issued >= 2000 - 10);

    // The next drive starts right after.
    run.step();
    assert_eq!(run.robot.drive().mode(), DriveMode::PidDistance);
}

#[test]
fn shooter_spins_down_after_route() {
    let mut run = start(&routes::BLUE_RIGHT);
    run.run_to_end();
    for _ in 0..20 {
        run.step();
    }
    assert_eq!(run.hw.power(MotorId(4)), 0);
    assert_eq!(run.hw.power(MotorId(3)), 0);
    assert_eq!(run.hw.power(MotorId(2)), 0);
}

#[test]
fn stop_mid_route_leaves_robot_still() {
    let mut run = start(&routes::BLUE_LEFT);
    for _ in 0..50 {
        run.step();
    }
    run.robot
        .handle_command(RobotCommand::StopAutonomous, run.now_ms, &mut run.hw);
    assert!(!run.robot.is_autonomous());

    let before = (run.hw.power(MotorId(6)), run.hw.power(MotorId(5)));
    assert_eq!(before, (0, 0));
    for _ in 0..10 {
        run.step();
    }
    assert_eq!(run.robot.drive().mode(), DriveMode::Stopped);
    assert!(run.sink.events.is_empty());
}
