//! Two-arm gesture controller
//!
//! Moves are interpolated one degree at a time over the configured
//! transition time. Without a servo board the controller runs simulated:
//! positions are tracked and moves are logged, nothing is driven.

use ash_core::config::ServoConfig;
use ash_core::traits::ArmGestures;
use ash_core::{Gesture, GestureError};
use ash_hal::Backend;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use tracing::{debug, info, warn};

use super::pca9685::Pca9685;
use super::ServoError;

/// Largest commanded angle
pub const MAX_ANGLE: u8 = 180;

/// Which arm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arm {
    Left,
    Right,
}

impl Arm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Arm::Left => "left",
            Arm::Right => "right",
        }
    }
}

/// Arm controller over an optional PCA9685
pub struct ArmController<I2C, D> {
    board: Option<Pca9685<I2C>>,
    delay: D,
    config: ServoConfig,
    left: u8,
    right: u8,
    closed: bool,
}

impl<I2C: I2c, D: DelayNs> ArmController<I2C, D> {
    /// Create a controller, initializing the board if one is given
    ///
    /// A board that fails to initialize is dropped and the controller runs
    /// simulated.
    pub fn new(board: Option<Pca9685<I2C>>, mut delay: D, config: ServoConfig) -> Self {
        let board = board.and_then(|mut board| match board.init(config.pwm_frequency, &mut delay) {
            Ok(()) => {
                info!(
                    address = board.address(),
                    left = config.channels.left_arm,
                    right = config.channels.right_arm,
                    "Servo board initialized"
                );
                Some(board)
            }
            Err(e) => {
                warn!("Servo board init failed, simulating: {}", e);
                None
            }
        });
        if board.is_none() {
            info!("Servo controller running in simulation");
        }

        let neutral = config.angles.neutral.min(MAX_ANGLE);
        Self {
            board,
            delay,
            config,
            left: neutral,
            right: neutral,
            closed: false,
        }
    }

    /// Hardware or simulated
    pub fn backend(&self) -> Backend {
        Backend::of(&self.board)
    }

    /// Current (left, right) angles
    pub fn positions(&self) -> (u8, u8) {
        (self.left, self.right)
    }

    /// Pulse width for an angle, linear over the pulse range
    pub fn pulse_for(&self, angle: f32) -> u16 {
        let range = self.config.pulse_range;
        let span = f32::from(range.max) - f32::from(range.min);
        let angle = angle.clamp(0.0, f32::from(MAX_ANGLE));
        (f32::from(range.min) + span * angle / f32::from(MAX_ANGLE)) as u16
    }

    /// Move one arm smoothly to `target` degrees (clamped to 0..=180)
    pub fn move_arm(&mut self, arm: Arm, target: u8) -> Result<(), ServoError> {
        let target = target.min(MAX_ANGLE);
        let current = self.position(arm);

        let channel = match arm {
            Arm::Left => self.config.channels.left_arm,
            Arm::Right => self.config.channels.right_arm,
        };
        let steps = u32::from(current.abs_diff(target)).max(1);
        let step_us = (self.config.transition_speed.max(0.0) * 1_000_000.0 / steps as f32) as u32;
        let pulses: Vec<u16> = (0..=steps)
            .map(|i| {
                let t = i as f32 / steps as f32;
                let angle = f32::from(current) + (f32::from(target) - f32::from(current)) * t;
                self.pulse_for(angle)
            })
            .collect();

        match self.board.as_mut() {
            Some(board) => {
                for pulse in pulses {
                    board.set_pulse(channel, pulse)?;
                    self.delay.delay_us(step_us);
                }
            }
            None => debug!(arm = arm.as_str(), from = current, to = target, "Simulated move"),
        }

        self.set_position(arm, target);
        Ok(())
    }

    /// Move left then right
    pub fn move_both(&mut self, left: u8, right: u8) -> Result<(), ServoError> {
        self.move_arm(Arm::Left, left)?;
        self.move_arm(Arm::Right, right)
    }

    fn run(&mut self, gesture: Gesture) -> Result<(), ServoError> {
        let angles = self.config.angles;
        debug!(%gesture, "Gesture");
        match gesture {
            Gesture::Neutral => self.move_both(angles.neutral, angles.neutral),
            Gesture::ArmsUp => self.move_both(angles.arms_up, angles.arms_up),
            Gesture::ArmsDown => self.move_both(angles.arms_down, angles.arms_down),
            Gesture::Wave { repetitions } => {
                self.move_arm(Arm::Right, angles.neutral)?;
                for _ in 0..repetitions {
                    self.move_arm(Arm::Left, angles.wave_start)?;
                    self.move_arm(Arm::Left, angles.wave_end)?;
                }
                self.move_arm(Arm::Left, angles.neutral)
            }
            Gesture::Point => {
                self.move_arm(Arm::Left, angles.arms_down)?;
                self.move_arm(Arm::Right, angles.point_up)
            }
        }
    }

    fn position(&self, arm: Arm) -> u8 {
        match arm {
            Arm::Left => self.left,
            Arm::Right => self.right,
        }
    }

    fn set_position(&mut self, arm: Arm, angle: u8) {
        match arm {
            Arm::Left => self.left = angle,
            Arm::Right => self.right = angle,
        }
    }
}

impl<I2C: I2c, D: DelayNs> ArmGestures for ArmController<I2C, D> {
    fn perform(&mut self, gesture: Gesture) -> Result<(), GestureError> {
        self.run(gesture).map_err(GestureError::from)
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if let Err(e) = self.run(Gesture::Neutral) {
            warn!("Arm reset on close failed: {}", e);
        }
        if let Some(mut board) = self.board.take() {
            if let Err(e) = board.sleep() {
                warn!("Servo board sleep failed: {}", e);
            }
        }
        info!("Servo controller closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::servo::pca9685::tests::{CountingDelay, FakeI2c};
    use crate::servo::pca9685::DEFAULT_ADDRESS;

    type Controller = ArmController<FakeI2c, CountingDelay>;

    fn hardware() -> (Controller, FakeI2c, CountingDelay) {
        let i2c = FakeI2c::default();
        let delay = CountingDelay::default();
        let board = Pca9685::new(i2c.clone(), DEFAULT_ADDRESS);
        let arms = ArmController::new(Some(board), delay.clone(), ServoConfig::default());
        i2c.writes.borrow_mut().clear();
        delay.calls.set(0);
        (arms, i2c, delay)
    }

    fn simulated() -> Controller {
        ArmController::new(None, CountingDelay::default(), ServoConfig::default())
    }

    #[test]
    fn test_pulse_for_angles() {
        let arms = simulated();
        assert_eq!(arms.pulse_for(0.0), 500);
        assert_eq!(arms.pulse_for(90.0), 1500);
        assert_eq!(arms.pulse_for(180.0), 2500);
        assert_eq!(arms.pulse_for(270.0), 2500);
    }

    #[test]
    fn test_smooth_move_steps() {
        let (mut arms, i2c, delay) = hardware();
        arms.move_arm(Arm::Left, 80).unwrap();

        // 10 degrees: 10 steps, 11 positions including both ends
        let writes = i2c.writes.borrow();
        assert_eq!(writes.len(), 11);
        assert!(writes.iter().all(|(_, b)| b[0] == 0x06));
        assert_eq!(delay.calls.get(), 11);
        assert_eq!(arms.positions(), (80, 90));
    }

    #[test]
    fn test_zero_distance_move_still_settles() {
        let (mut arms, i2c, _) = hardware();
        arms.move_arm(Arm::Right, 90).unwrap();
        assert_eq!(i2c.writes.borrow().len(), 2);
        assert!(i2c.writes.borrow().iter().all(|(_, b)| b[0] == 0x0A));
    }

    #[test]
    fn test_angle_clamped() {
        let mut arms = simulated();
        arms.move_arm(Arm::Left, 250).unwrap();
        assert_eq!(arms.positions().0, 180);
    }

    #[test]
    fn test_simulated_gestures_track_positions() {
        let mut arms = simulated();
        assert_eq!(arms.backend(), Backend::Simulated);

        arms.perform(Gesture::Point).unwrap();
        assert_eq!(arms.positions(), (135, 45));

        arms.perform(Gesture::wave()).unwrap();
        assert_eq!(arms.positions(), (90, 90));

        arms.perform(Gesture::ArmsUp).unwrap();
        assert_eq!(arms.positions(), (45, 45));
    }

    #[test]
    fn test_failed_init_falls_back_to_simulation() {
        let i2c = FakeI2c::default();
        i2c.fail.set(true);
        let board = Pca9685::new(i2c, DEFAULT_ADDRESS);
        let arms = ArmController::new(Some(board), CountingDelay::default(), ServoConfig::default());
        assert_eq!(arms.backend(), Backend::Simulated);
    }

    #[test]
    fn test_bus_failure_surfaces_as_gesture_error() {
        let (mut arms, i2c, _) = hardware();
        assert_eq!(arms.backend(), Backend::Hardware);
        i2c.fail.set(true);
        assert!(matches!(
            arms.perform(Gesture::ArmsDown),
            Err(GestureError::Bus(_))
        ));
    }

    #[test]
    fn test_close_sleeps_board_once() {
        let (mut arms, i2c, _) = hardware();
        arms.perform(Gesture::ArmsUp).unwrap();
        arms.close();

        let last = i2c.writes.borrow().last().cloned();
        assert_eq!(last, Some((0x40, vec![0x00, 0x10])));
        assert_eq!(arms.positions(), (90, 90));

        let count = i2c.writes.borrow().len();
        arms.close();
        assert_eq!(i2c.writes.borrow().len(), count);
        assert_eq!(arms.backend(), Backend::Simulated);
    }
}
