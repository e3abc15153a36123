//! Line follower: fuses up to three light-sensor zones into a drive/turn
//! decision through a lookup table.
//!
//! ```text
//!   zones (left→right)   weighted value        action table
//!   [Lo, Mid, Hi]   ──▶  0·9 + 1·3 + 2 = 5 ──▶ table[5] ──▶ (drive, turn)
//! ```
//!
//! Index 0 (every sensor in `Lo`) means the line is lost.  The follower
//! then reuses the previous index and switches to that entry's overshoot
//! powers.  A table entry with zero drive and zero turn marks a zone
//! combination that should not occur; it also falls back to the previous
//! index, but with normal powers.
//!
//! The previous index is overwritten with the resolved one every tick, so
//! a run of lost-line ticks keeps steering with the last valid entry.

use heapless::Vec;
use log::{debug, trace};

use crate::app::ports::{AnalogPort, EventSink};
use crate::config::LightSensorConfig;
use crate::error::{Error, Result};
use crate::sensors::light::Sensor;

pub const MAX_LIGHT_SENSORS: usize = 3;
/// 3^MAX_LIGHT_SENSORS
pub const MAX_ACTIONS: usize = 27;

// --- Drive speeds ---
pub const SPEED_STOP: i32 = 0;
pub const SPEED_VERYSLOW: i32 = 10;
pub const SPEED_SLOW: i32 = 20;
pub const SPEED_MEDSLOW: i32 = 35;
pub const SPEED_MEDIUM: i32 = 50;
pub const SPEED_MEDFAST: i32 = 65;
pub const SPEED_FAST: i32 = 80;
pub const SPEED_VERYFAST: i32 = 90;
pub const SPEED_FULL: i32 = 100;

// --- Turn rates (positive steers right) ---
pub const TURN_CENTER: i32 = 0;
pub const TURN_SMALL: i32 = 10;
pub const TURN_MEDIUM: i32 = 20;
pub const TURN_LARGE: i32 = 30;
pub const TURN_HARD: i32 = 40;

/// One entry of the action table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Action {
    pub drive: i32,
    pub turn: i32,
    pub drive_overshoot: i32,
    pub turn_overshoot: i32,
    pub label: &'static str,
}

impl Action {
    pub const INVALID: Self = Self::new(0, 0, 0, 0, "NA");

    pub const RIGHT3: Self = Self::new(SPEED_MEDSLOW, TURN_LARGE, SPEED_SLOW, TURN_HARD, "R3");
    pub const RIGHT2: Self = Self::new(SPEED_MEDFAST, TURN_MEDIUM, SPEED_MEDIUM, TURN_LARGE, "R2");
    pub const RIGHT1: Self = Self::new(SPEED_MEDFAST, TURN_SMALL, SPEED_MEDFAST, TURN_SMALL, "R1");
    pub const CENTER: Self = Self::new(SPEED_MEDFAST, TURN_CENTER, SPEED_MEDFAST, TURN_CENTER, "C");
    pub const LEFT1: Self = Self::new(SPEED_MEDFAST, -TURN_SMALL, SPEED_MEDFAST, -TURN_SMALL, "L1");
    pub const LEFT2: Self = Self::new(SPEED_MEDFAST, -TURN_MEDIUM, SPEED_MEDIUM, -TURN_LARGE, "L2");
    pub const LEFT3: Self = Self::new(SPEED_MEDSLOW, -TURN_LARGE, SPEED_SLOW, -TURN_HARD, "L3");

    pub const fn new(drive: i32, turn: i32, drive_overshoot: i32, turn_overshoot: i32, label: &'static str) -> Self {
        Self {
            drive,
            turn,
            drive_overshoot,
            turn_overshoot,
            label,
        }
    }

    /// Zero drive and zero turn marks a combination that should not occur.
    pub const fn is_invalid(&self) -> bool {
        self.drive == 0 && self.turn == 0
    }
}

/// Action table for three sensors, indexed by weighted value.
pub fn default_actions() -> [Action; MAX_ACTIONS] {
    use Action as A;
    [
        // left = Lo
        A::INVALID, A::RIGHT3, A::RIGHT2,
        A::CENTER, A::RIGHT1, A::RIGHT2,
        A::CENTER, A::CENTER, A::RIGHT1,
        // left = Mid
        A::LEFT3, A::INVALID, A::RIGHT2,
        A::LEFT1, A::CENTER, A::RIGHT1,
        A::CENTER, A::CENTER, A::RIGHT1,
        // left = Hi
        A::LEFT2, A::LEFT2, A::INVALID,
        A::LEFT2, A::LEFT1, A::INVALID,
        A::LEFT1, A::LEFT1, A::CENTER,
    ]
}

pub struct LineFollower {
    sensors: Vec<Sensor, MAX_LIGHT_SENSORS>,
    actions: Vec<Action, MAX_ACTIONS>,
    calibrating: bool,

    weighted_value: usize,
    previous_value: usize,
    overshoot: bool,
    drive: i32,
    turn: i32,
}

impl LineFollower {
    /// Build a follower over `sensors` (most significant first).
    ///
    /// `actions` must hold exactly 3^n entries for n sensors.
    pub fn new(sensors: &[LightSensorConfig], actions: &[Action]) -> Result<Self> {
        if sensors.is_empty() || sensors.len() > MAX_LIGHT_SENSORS {
            return Err(Error::Config("line follower needs 1 to 3 light sensors"));
        }
        if actions.len() != 3usize.pow(sensors.len() as u32) {
            return Err(Error::Config("action table size must be 3^sensors"));
        }

        let mut owned = Vec::new();
        for cfg in sensors {
            owned
                .push(Sensor::new(cfg))
                .map_err(|_| Error::Config("line follower needs 1 to 3 light sensors"))?;
        }
        let actions = Vec::from_slice(actions)
            .map_err(|()| Error::Config("action table size must be 3^sensors"))?;

        debug!("Line follower: {} sensors, {} actions", owned.len(), actions.len());

        Ok(Self {
            sensors: owned,
            actions,
            calibrating: false,
            weighted_value: 0,
            previous_value: 0,
            overshoot: false,
            drive: 0,
            turn: 0,
        })
    }

    /// Start or stop calibration on every sensor.
    pub fn set_calibration(&mut self, start: bool) {
        self.calibrating = start;
        for sensor in &mut self.sensors {
            if start {
                sensor.start_calibration();
            } else {
                sensor.stop_calibration();
            }
        }
    }

    /// Sample every sensor, then resolve the action for this tick.
    pub fn tick(&mut self, hw: &mut impl AnalogPort, sink: &mut impl EventSink) {
        let mut weighted = 0;
        for sensor in &mut self.sensors {
            sensor.tick(hw, sink);
            weighted = weighted * 3 + sensor.zone().digit();
        }
        self.weighted_value = weighted;

        let resolved = if weighted == 0 {
            self.overshoot = true;
            self.previous_value
        } else {
            self.overshoot = false;
            if self.actions[weighted].is_invalid() {
                self.previous_value
            } else {
                weighted
            }
        };

        let action = &self.actions[resolved];
        (self.drive, self.turn) = if self.overshoot {
            (action.drive_overshoot, action.turn_overshoot)
        } else {
            (action.drive, action.turn)
        };
        trace!(
            "Line follower: value={} resolved={} ({}) overshoot={} drive={} turn={}",
            weighted, resolved, action.label, self.overshoot, self.drive, self.turn
        );

        self.previous_value = resolved;
    }

    pub fn is_calibrating(&self) -> bool {
        self.calibrating
    }

    /// Base-3 fused zones from the last tick.
    pub fn weighted_value(&self) -> usize {
        self.weighted_value
    }

    /// Table index the last tick resolved to.
    pub fn previous_value(&self) -> usize {
        self.previous_value
    }

    pub fn overshoot_active(&self) -> bool {
        self.overshoot
    }

    /// (drive, turn) for the drive's arcade input.
    pub fn commanded(&self) -> (i32, i32) {
        (self.drive, self.turn)
    }

    pub fn current_action(&self) -> &Action {
        &self.actions[self.previous_value]
    }

    pub fn sensors(&self) -> &[Sensor] {
        &self.sensors
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::app::ports::{NullSink, SensorId};
    use proptest::prelude::*;

    struct Strip([u16; MAX_LIGHT_SENSORS]);

    impl AnalogPort for Strip {
        fn read_raw(&mut self, sensor: SensorId) -> u16 {
            self.0[sensor.0 as usize]
        }
    }

    fn follower() -> LineFollower {
        let configs: std::vec::Vec<_> = (0..3)
            .map(|id| LightSensorConfig {
                id: SensorId(id),
                threshold_lo: 400,
                threshold_hi: 500,
                inverse: false,
                events_enabled: false,
            })
            .collect();
        LineFollower::new(&configs, &default_actions()).unwrap()
    }

    proptest! {
        /// Consecutive lost-line ticks keep steering with the same stale
        /// entry; the follower never drifts toward slot zero.
        #[test]
        fn lost_line_reuses_last_valid_entry(
            seen in proptest::array::uniform3(0u16..=1023),
            lost_ticks in 1usize..20,
        ) {
            let mut lf = follower();
            lf.tick(&mut Strip(seen), &mut NullSink);
            let anchor = lf.previous_value();
            let expected = default_actions()[anchor];

            for _ in 0..lost_ticks {
                lf.tick(&mut Strip([0, 0, 0]), &mut NullSink);
                prop_assert!(lf.overshoot_active());
                prop_assert_eq!(lf.previous_value(), anchor);
                prop_assert_eq!(lf.commanded(), (expected.drive_overshoot, expected.turn_overshoot));
            }
        }

        #[test]
        fn resolved_entry_is_never_invalid_once_valid(
            frames in proptest::collection::vec(proptest::array::uniform3(0u16..=1023), 1..40),
        ) {
            let mut lf = follower();
            // Prime with the all-Hi center entry.
            lf.tick(&mut Strip([900, 900, 900]), &mut NullSink);
            for f in frames {
                lf.tick(&mut Strip(f), &mut NullSink);
                prop_assert!(!lf.current_action().is_invalid());
            }
        }
    }
}
