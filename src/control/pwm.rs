// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Software PWM multiplexer.
//!
//! Both actuator waveforms are shaped off the one shared 500 µs tick: each [`PwmChannel`] owns its
//! output line, a private elapsed counter, and its own period, so reconfiguring one channel can
//! never perturb the other's timing. The tick handler calls [`PwmMultiplexer::on_tick`]; the
//! dispatcher pushes duty values in between ticks.

use embedded_hal::digital::OutputPin;

/// Motor PWM period in ticks (2 ms). The duty threshold is the motor's speed level, so the
/// level range 0..=4 maps directly onto 0–100 % drive.
pub const MOTOR_PERIOD_TICKS: u16 = 4;

/// Servo frame period in ticks (20 ms), the standard hobby-servo refresh.
pub const SERVO_PERIOD_TICKS: u16 = 40;

/// One independently-periodic software PWM output.
///
/// The line is asserted at the start of each period and deasserted after `duty` ticks, giving a
/// high time of `duty / period`. Duty 0 pins the line low; duty == period pins it high.
pub struct PwmChannel<PIN: OutputPin> {
    pin: PIN,
    period: u16,
    duty: u16,
    elapsed: u16,
    line_high: bool,
}

impl<PIN: OutputPin> PwmChannel<PIN> {
    /// Wrap an output line, starting at duty 0 (line low).
    pub fn new(mut pin: PIN, period: u16) -> Self {
        pin.set_low().ok();
        Self {
            pin,
            period,
            duty: 0,
            elapsed: 0,
            line_high: false,
        }
    }

    /// Advance the channel by one tick.
    pub fn on_tick(&mut self) {
        self.elapsed += 1;
        if self.elapsed >= self.period {
            self.elapsed = 0;
            self.drive(self.duty > 0);
        } else if self.elapsed == self.duty {
            self.drive(false);
        }
    }

    /// Install a new duty threshold, clamped to the period.
    ///
    /// An unchanged value is a no-op. A changed value restarts the period so the new width takes
    /// effect on a frame boundary instead of producing a glitch pulse mid-cycle.
    pub fn set_duty(&mut self, duty: u16) {
        let duty = duty.min(self.period);
        if duty == self.duty {
            return;
        }
        self.duty = duty;
        self.elapsed = 0;
        self.drive(duty > 0);
    }

    #[inline]
    pub fn duty(&self) -> u16 {
        self.duty
    }

    #[inline]
    pub fn is_high(&self) -> bool {
        self.line_high
    }

    fn drive(&mut self, high: bool) {
        if high {
            self.pin.set_high().ok();
        } else {
            self.pin.set_low().ok();
        }
        self.line_high = high;
    }
}

/// The two actuator channels, advanced together off the shared tick.
pub struct PwmMultiplexer<MPIN: OutputPin, SPIN: OutputPin> {
    motor: PwmChannel<MPIN>,
    servo: PwmChannel<SPIN>,
}

impl<MPIN: OutputPin, SPIN: OutputPin> PwmMultiplexer<MPIN, SPIN> {
    pub fn new(motor_pin: MPIN, servo_pin: SPIN) -> Self {
        Self {
            motor: PwmChannel::new(motor_pin, MOTOR_PERIOD_TICKS),
            servo: PwmChannel::new(servo_pin, SERVO_PERIOD_TICKS),
        }
    }

    /// Called once per shared tick, from the timer interrupt.
    pub fn on_tick(&mut self) {
        self.motor.on_tick();
        self.servo.on_tick();
    }

    pub fn set_motor_duty(&mut self, duty: u16) {
        self.motor.set_duty(duty);
    }

    pub fn set_servo_duty(&mut self, duty: u16) {
        self.servo.set_duty(duty);
    }

    pub fn motor(&self) -> &PwmChannel<MPIN> {
        &self.motor
    }

    pub fn servo(&self) -> &PwmChannel<SPIN> {
        &self.servo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    struct NullPin;

    impl embedded_hal::digital::ErrorType for NullPin {
        type Error = Infallible;
    }

    impl OutputPin for NullPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    /// Record the line state over `n` ticks, sampling after each tick.
    fn waveform(ch: &mut PwmChannel<NullPin>, n: usize) -> [bool; 8] {
        let mut out = [false; 8];
        for slot in out.iter_mut().take(n) {
            ch.on_tick();
            *slot = ch.is_high();
        }
        out
    }

    #[test]
    fn duty_two_of_four_is_high_half_the_time() {
        let mut ch = PwmChannel::new(NullPin, 4);
        ch.set_duty(2);
        assert!(ch.is_high());
        // Ticks 1..=8: high, low, low, high(wrap), high, low, low, high.
        assert_eq!(
            waveform(&mut ch, 8),
            [true, false, false, true, true, false, false, true]
        );
    }

    #[test]
    fn duty_zero_pins_the_line_low() {
        let mut ch = PwmChannel::new(NullPin, 4);
        assert!(!ch.is_high());
        assert_eq!(waveform(&mut ch, 8), [false; 8]);
    }

    #[test]
    fn duty_equal_to_period_pins_the_line_high() {
        let mut ch = PwmChannel::new(NullPin, 4);
        ch.set_duty(4);
        assert!(ch.is_high());
        assert_eq!(waveform(&mut ch, 8), [true; 8]);
    }

    #[test]
    fn duty_is_clamped_to_the_period() {
        let mut ch = PwmChannel::new(NullPin, 4);
        ch.set_duty(9);
        assert_eq!(ch.duty(), 4);
    }

    #[test]
    fn changed_duty_restarts_the_period() {
        let mut ch = PwmChannel::new(NullPin, 4);
        ch.set_duty(1);
        ch.on_tick();
        ch.on_tick();
        assert!(!ch.is_high());

        // Mid-cycle duty change: line re-asserts and a full high window follows.
        ch.set_duty(2);
        assert!(ch.is_high());
        ch.on_tick();
        assert!(ch.is_high());
        ch.on_tick();
        assert!(!ch.is_high());
    }

    #[test]
    fn unchanged_duty_keeps_phase() {
        let mut ch = PwmChannel::new(NullPin, 4);
        ch.set_duty(2);
        ch.on_tick();
        assert!(ch.is_high());

        // Re-installing the same value must not re-align the period.
        ch.set_duty(2);
        ch.on_tick();
        assert!(!ch.is_high());
        ch.on_tick();
        assert!(!ch.is_high());
    }

    #[test]
    fn channels_advance_independently() {
        let mut pwm = PwmMultiplexer::new(NullPin, NullPin);
        pwm.set_motor_duty(2);
        pwm.set_servo_duty(3);

        // Run one full servo frame; the motor wraps ten times, the servo once.
        for _ in 0..40 {
            pwm.on_tick();
        }
        assert_eq!(pwm.motor().duty(), 2);
        assert_eq!(pwm.servo().duty(), 3);
        // After 40 ticks both counters are back at a period boundary: lines asserted.
        assert!(pwm.motor().is_high());
        assert!(pwm.servo().is_high());
    }
}
