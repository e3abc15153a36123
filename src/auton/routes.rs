//! Competition routes, one per starting position.

use super::{Routine, Step};

const POWER: i32 = 50;
const SHOT_MS: u32 = 2000;
const SHOT: Step = Step::shoot(100, 100, SHOT_MS);

pub const BLUE_LEFT: Routine = Routine {
    name: "blue-left",
    steps: &[
        Step::drive(-96.0, POWER),
        Step::turn(-90.0, POWER),
        Step::drive(-24.0, POWER),
        Step::drive(24.0, POWER),
        Step::turn(90.0, POWER),
        Step::drive(72.0, POWER),
        Step::turn(-90.0, POWER),
        Step::drive(24.0, POWER),
        SHOT,
        Step::turn(180.0, POWER),
        Step::drive(-72.0, POWER),
    ],
};

pub const BLUE_RIGHT: Routine = Routine {
    name: "blue-right",
    steps: &[
        Step::drive(-24.0, POWER),
        Step::turn(90.0, POWER),
        Step::drive(-24.0, POWER),
        Step::drive(24.0, POWER),
        Step::turn(180.0, POWER),
        Step::drive(-24.0, POWER),
        SHOT,
        Step::drive(-48.0, POWER),
        Step::turn(90.0, POWER),
        Step::drive(-72.0, POWER),
        Step::turn(-90.0, POWER),
        Step::drive(-24.0, POWER),
    ],
};

pub const RED_LEFT: Routine = Routine {
    name: "red-left",
    steps: &[
        Step::drive(-24.0, POWER),
        Step::turn(-90.0, POWER),
        Step::drive(-24.0, POWER),
        Step::drive(48.0, POWER),
        SHOT,
        Step::drive(48.0, POWER),
        Step::turn(-90.0, POWER),
        Step::drive(72.0, POWER),
        Step::turn(-90.0, POWER),
        Step::drive(-24.0, POWER),
    ],
};

pub const RED_RIGHT: Routine = Routine {
    name: "red-right",
    steps: &[
        Step::drive(-24.0, POWER),
        Step::turn(-90.0, POWER),
        Step::drive(-48.0, POWER),
        SHOT,
        Step::drive(-48.0, POWER),
        Step::drive(96.0, POWER),
        Step::turn(-90.0, POWER),
        Step::drive(72.0, POWER),
        Step::turn(-90.0, POWER),
        Step::drive(-24.0, POWER),
    ],
};

pub const ALL: [&Routine; 4] = [&BLUE_LEFT, &BLUE_RIGHT, &RED_LEFT, &RED_RIGHT];

/// Look a route up by name.
pub fn by_name(name: &str) -> Option<&'static Routine> {
    ALL.into_iter().find(|r| r.name == name)
}
