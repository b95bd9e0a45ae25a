// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Actuator Control
//!
//! This module provides the actuator state machines and the shared-tick PWM engine.
//!
//! ## Modules
//!
//! - [`motor`] - Direction/speed state machine for the H-bridge drive motor.
//! - [`servo`] - Discrete-position steering servo.
//! - [`pwm`] - Software PWM multiplexer shaping both output waveforms off one tick.
//! - [`dispatch`] - Maps decoded commands onto exactly one actuator operation.

pub mod dispatch;
pub mod motor;
pub mod pwm;
pub mod servo;

pub use dispatch::dispatch;
pub use motor::{Direction, DriveMotor, MAX_LEVEL};
pub use pwm::{PwmChannel, PwmMultiplexer, MOTOR_PERIOD_TICKS, SERVO_PERIOD_TICKS};
pub use servo::{SteeringServo, NEUTRAL_INDEX, STEER_POSITIONS};
