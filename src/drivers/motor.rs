//! H-bridge DC motor driver over embedded-hal 1.0.
//!
//! One PWM channel sets the magnitude, one digital pin sets the direction.
//! Power is the signed −100…100 scale the control core works in; the sign
//! picks the direction (optionally reversed for mirrored mounting) and the
//! magnitude maps onto the PWM duty cycle as a percentage.
//!
//! [`MotorBank`] collects motors behind the [`MotorPort`] trait so the
//! control components address them by [`MotorId`].

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::app::ports::{MotorId, MotorPort};
use crate::error::ActuatorError;

pub const MAX_POWER: i32 = 100;

/// A motor that can be commanded to a signed power.
pub trait Motor {
    fn set(&mut self, power: i32) -> Result<(), ActuatorError>;

    /// Last power successfully applied.
    fn power(&self) -> i32;
}

pub struct HBridgeMotor<P, D> {
    pwm: P,
    dir: D,
    reversed: bool,
    power: i32,
}

impl<P: SetDutyCycle, D: OutputPin> HBridgeMotor<P, D> {
    pub fn new(pwm: P, dir: D, reversed: bool) -> Self {
        Self {
            pwm,
            dir,
            reversed,
            power: 0,
        }
    }

    /// Give the pins back.
    pub fn release(self) -> (P, D) {
        (self.pwm, self.dir)
    }
}

impl<P: SetDutyCycle, D: OutputPin> Motor for HBridgeMotor<P, D> {
    fn set(&mut self, power: i32) -> Result<(), ActuatorError> {
        let power = power.clamp(-MAX_POWER, MAX_POWER);
        let forward = (power >= 0) != self.reversed;

        let dir = if forward {
            self.dir.set_high()
        } else {
            self.dir.set_low()
        };
        dir.map_err(|_| ActuatorError::GpioWriteFailed)?;

        // |power| ≤ 100 after the clamp.
        let percent = power.unsigned_abs() as u8;
        self.pwm
            .set_duty_cycle_percent(percent)
            .map_err(|_| ActuatorError::PwmWriteFailed)?;

        self.power = power;
        Ok(())
    }

    fn power(&self) -> i32 {
        self.power
    }
}

/// Fixed set of motors indexed by [`MotorId`].
pub struct MotorBank<M, const N: usize> {
    motors: [M; N],
    failures: u32,
}

impl<M: Motor, const N: usize> MotorBank<M, N> {
    pub fn new(motors: [M; N]) -> Self {
        Self {
            motors,
            failures: 0,
        }
    }

    pub fn get(&self, motor: MotorId) -> Option<&M> {
        self.motors.get(usize::from(motor.0))
    }

    /// Writes that failed since construction.
    pub fn failures(&self) -> u32 {
        self.failures
    }
}

impl<M: Motor, const N: usize> MotorPort for MotorBank<M, N> {
    fn set_power(&mut self, motor: MotorId, power: i32) {
        let Some(m) = self.motors.get_mut(usize::from(motor.0)) else {
            warn!("Motor {:?} not in bank of {}", motor, N);
            self.failures = self.failures.saturating_add(1);
            return;
        };
        if let Err(e) = m.set(power) {
            warn!("Motor {:?} power {} failed: {}", motor, power, e);
            self.failures = self.failures.saturating_add(1);
        }
    }
}
