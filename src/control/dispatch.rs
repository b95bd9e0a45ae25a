// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Command dispatch: one decoded keypress, exactly one actuator operation.
//!
//! After the actuator mutates, both duty values are pushed into the multiplexer. The channels
//! ignore unchanged values, so a command that only touches the motor cannot disturb the servo's
//! pulse phase (and vice versa).

use embedded_hal::digital::OutputPin;

use crate::control::motor::DriveMotor;
use crate::control::pwm::PwmMultiplexer;
use crate::control::servo::SteeringServo;
use crate::hw::led::Led;
use crate::protocol::codes::Command;

pub fn dispatch<IN1, IN2, STBY, MPIN, SPIN, LPIN>(
    command: Command,
    motor: &mut DriveMotor<IN1, IN2, STBY>,
    servo: &mut SteeringServo,
    pwm: &mut PwmMultiplexer<MPIN, SPIN>,
    lamp: &mut Led<LPIN>,
) where
    IN1: OutputPin,
    IN2: OutputPin,
    STBY: OutputPin,
    MPIN: OutputPin,
    SPIN: OutputPin,
    LPIN: OutputPin,
{
    match command {
        Command::SpeedUp => motor.increase_speed(),
        Command::SpeedDown => motor.decrease_speed(),
        Command::Stop => motor.stop(),
        Command::Resume => motor.resume(),
        Command::Standby => motor.standby(),
        Command::SteerRight => servo.advance(),
        Command::SteerLeft => servo.retreat(),
        Command::SteerCenter => servo.center(),
        Command::LampToggle => lamp.toggle(),
    }

    // Direction pins were written above (if at all), before any nonzero duty reaches the bridge.
    pwm.set_motor_duty(motor.duty_ticks());
    pwm.set_servo_duty(servo.duty_ticks());
}
