//! In-memory robot model for host runs and tests.
//!
//! Every motor output feeds an encoder that advances in proportion to the
//! applied power: at ±100 it moves `clicks_per_ms_full` clicks per
//! millisecond.  Fractions accumulate, so slow PID approaches still
//! converge.  Light-sensor readings are whatever the caller sets.

use log::warn;

use crate::app::ports::{AnalogPort, EncoderPort, MotorId, MotorPort, SensorId};

pub const SIM_MOTORS: usize = 10;
pub const SIM_SENSORS: usize = 8;

/// Default encoder speed at full power (clicks per millisecond).
pub const DEFAULT_CLICKS_PER_MS: f32 = 1.5;

#[derive(Debug, Clone)]
pub struct SimHardware {
    power: [i32; SIM_MOTORS],
    encoder: [f32; SIM_MOTORS],
    raw: [u16; SIM_SENSORS],
    clicks_per_ms_full: f32,
}

impl Default for SimHardware {
    fn default() -> Self {
        Self::new(DEFAULT_CLICKS_PER_MS)
    }
}

impl SimHardware {
    pub fn new(clicks_per_ms_full: f32) -> Self {
        Self {
            power: [0; SIM_MOTORS],
            encoder: [0.0; SIM_MOTORS],
            raw: [0; SIM_SENSORS],
            clicks_per_ms_full,
        }
    }

    /// Let `dt_ms` of simulated time pass.
    pub fn advance(&mut self, dt_ms: u32) {
        let clicks = self.clicks_per_ms_full * dt_ms as f32;
        for (enc, &power) in self.encoder.iter_mut().zip(&self.power) {
            *enc += power as f32 * clicks / 100.0;
        }
    }

    pub fn set_raw(&mut self, sensor: SensorId, raw: u16) {
        match self.raw.get_mut(usize::from(sensor.0)) {
            Some(slot) => *slot = raw,
            None => warn!("Sim: no sensor {:?}", sensor),
        }
    }

    /// Last power written to `motor`.
    pub fn power(&self, motor: MotorId) -> i32 {
        self.power.get(usize::from(motor.0)).copied().unwrap_or(0)
    }
}

impl MotorPort for SimHardware {
    fn set_power(&mut self, motor: MotorId, power: i32) {
        match self.power.get_mut(usize::from(motor.0)) {
            Some(slot) => *slot = power,
            None => warn!("Sim: no motor {:?}", motor),
        }
    }
}

impl EncoderPort for SimHardware {
    fn encoder(&self, motor: MotorId) -> i32 {
        self.encoder
            .get(usize::from(motor.0))
            .map_or(0, |&clicks| clicks as i32)
    }

    fn reset_encoder(&mut self, motor: MotorId) {
        if let Some(enc) = self.encoder.get_mut(usize::from(motor.0)) {
            *enc = 0.0;
        }
    }
}

impl AnalogPort for SimHardware {
    fn read_raw(&mut self, sensor: SensorId) -> u16 {
        self.raw.get(usize::from(sensor.0)).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoders_follow_power() {
        let mut hw = SimHardware::new(1.0);
        hw.set_power(MotorId(0), 50);
        hw.set_power(MotorId(1), -100);
        hw.advance(10);
        assert_eq!(hw.encoder(MotorId(0)), 5);
        assert_eq!(hw.encoder(MotorId(1)), -10);
        assert_eq!(hw.encoder(MotorId(2)), 0);
    }

    #[test]
    fn fractions_accumulate() {
        let mut hw = SimHardware::new(1.0);
        hw.set_power(MotorId(0), 5);
        hw.advance(10);
        assert_eq!(hw.encoder(MotorId(0)), 0);
        hw.advance(10);
        assert_eq!(hw.encoder(MotorId(0)), 1);
    }

    #[test]
    fn reset_zeroes_one_encoder() {
        let mut hw = SimHardware::new(1.0);
        hw.set_power(MotorId(0), 100);
        hw.set_power(MotorId(1), 100);
        hw.advance(10);
        hw.reset_encoder(MotorId(0));
        assert_eq!(hw.encoder(MotorId(0)), 0);
        assert_eq!(hw.encoder(MotorId(1)), 10);
    }

    #[test]
    fn out_of_range_ids_are_ignored() {
        let mut hw = SimHardware::default();
        hw.set_power(MotorId(200), 100);
        hw.set_raw(SensorId(200), 5);
        assert_eq!(hw.encoder(MotorId(200)), 0);
        assert_eq!(hw.read_raw(SensorId(200)), 0);
    }

    #[test]
    fn analog_reads_back() {
        let mut hw = SimHardware::default();
        hw.set_raw(SensorId(2), 612);
        assert_eq!(hw.read_raw(SensorId(2)), 612);
    }
}
