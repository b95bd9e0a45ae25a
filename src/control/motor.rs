//! Drive motor state machine.
//!
//! Speed is a signed level in `[-MAX_LEVEL, MAX_LEVEL]`: the sign picks the H-bridge direction
//! pair, the magnitude is the PWM duty threshold in ticks. Speed commands walk the level one step
//! at a time, so a direction flip always passes through the stopped state and the bridge is never
//! asked to reverse under load.

use embedded_hal::digital::OutputPin;

/// Top speed level; also the motor PWM period, so level MAX is 100 % drive.
pub const MAX_LEVEL: i8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
    Stopped,
}

/// H-bridge drive motor bound to its direction pair and standby line.
///
/// The PWM line itself belongs to the multiplexer; this type only decides direction, enable, and
/// the duty value the multiplexer should shape. Direction pins are always written before a
/// nonzero duty is handed out, so both bridge legs can never fight, even transiently.
pub struct DriveMotor<IN1: OutputPin, IN2: OutputPin, STBY: OutputPin> {
    in1: IN1,
    in2: IN2,
    stby: STBY,
    level: i8,
    standby: bool,
}

impl<IN1: OutputPin, IN2: OutputPin, STBY: OutputPin> DriveMotor<IN1, IN2, STBY> {
    /// Power-up state: stopped, forward direction preset, driver enabled.
    pub fn new(mut in1: IN1, mut in2: IN2, mut stby: STBY) -> Self {
        in1.set_high().ok();
        in2.set_low().ok();
        stby.set_high().ok();
        Self {
            in1,
            in2,
            stby,
            level: 0,
            standby: false,
        }
    }

    /// Step the level toward forward. From reverse this shrinks the magnitude toward stop; the
    /// direction pair only flips while the motor is stopped.
    pub fn increase_speed(&mut self) {
        if self.level == 0 {
            self.set_forward();
        }
        if self.level < MAX_LEVEL {
            self.level += 1;
        }
    }

    /// Step the level toward reverse; the mirror of [`increase_speed`](Self::increase_speed).
    pub fn decrease_speed(&mut self) {
        if self.level == 0 {
            self.set_reverse();
        }
        if self.level > -MAX_LEVEL {
            self.level -= 1;
        }
    }

    /// Zero drive with the bridge still powered: both direction pins low, standby asserted.
    pub fn stop(&mut self) {
        self.level = 0;
        self.in1.set_low().ok();
        self.in2.set_low().ok();
        self.stby.set_high().ok();
        self.standby = false;
    }

    /// Full power-down: stop, then deassert the driver-enable line.
    pub fn standby(&mut self) {
        self.stop();
        self.stby.set_low().ok();
        self.standby = true;
    }

    /// Standby-exit: re-enable the driver, remain stopped until a speed command arrives.
    pub fn resume(&mut self) {
        self.stby.set_high().ok();
        self.standby = false;
    }

    /// Duty threshold for the PWM multiplexer.
    #[inline]
    pub fn duty_ticks(&self) -> u16 {
        u16::from(self.level.unsigned_abs())
    }

    pub fn direction(&self) -> Direction {
        if self.level > 0 {
            Direction::Forward
        } else if self.level < 0 {
            Direction::Reverse
        } else {
            Direction::Stopped
        }
    }

    #[inline]
    pub fn level(&self) -> i8 {
        self.level
    }

    #[inline]
    pub fn in_standby(&self) -> bool {
        self.standby
    }

    fn set_forward(&mut self) {
        self.in1.set_high().ok();
        self.in2.set_low().ok();
        self.stby.set_high().ok();
        self.standby = false;
    }

    fn set_reverse(&mut self) {
        self.in1.set_low().ok();
        self.in2.set_high().ok();
        self.stby.set_high().ok();
        self.standby = false;
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

    fn motor() -> DriveMotor<NullPin, NullPin, NullPin> {
        DriveMotor::new(NullPin, NullPin, NullPin)
    }

    #[test]
    fn speed_ladder_is_monotonic_and_saturates() {
        let mut m = motor();
        for expected in 1..=MAX_LEVEL {
            m.increase_speed();
            assert_eq!(m.level(), expected);
        }
        m.increase_speed();
        assert_eq!(m.level(), MAX_LEVEL);
        assert_eq!(m.duty_ticks(), 4);
        assert_eq!(m.direction(), Direction::Forward);
    }

    #[test]
    fn decrease_from_forward_walks_toward_stop() {
        let mut m = motor();
        m.increase_speed();
        m.increase_speed();
        assert_eq!(m.level(), 2);

        m.decrease_speed();
        assert_eq!(m.level(), 1);
        assert_eq!(m.direction(), Direction::Forward);

        m.decrease_speed();
        assert_eq!(m.level(), 0);
        assert_eq!(m.direction(), Direction::Stopped);

        // Only now does the direction flip.
        m.decrease_speed();
        assert_eq!(m.level(), -1);
        assert_eq!(m.direction(), Direction::Reverse);
    }

    #[test]
    fn reverse_saturates_at_its_own_max() {
        let mut m = motor();
        for _ in 0..10 {
            m.decrease_speed();
        }
        assert_eq!(m.level(), -MAX_LEVEL);
        assert_eq!(m.duty_ticks(), 4);
        assert_eq!(m.direction(), Direction::Reverse);
    }

    #[test]
    fn increase_from_reverse_never_skips_to_forward() {
        let mut m = motor();
        m.decrease_speed();
        m.decrease_speed();
        assert_eq!(m.level(), -2);

        m.increase_speed();
        assert_eq!(m.level(), -1);
        assert_eq!(m.direction(), Direction::Reverse);

        m.increase_speed();
        assert_eq!(m.direction(), Direction::Stopped);

        m.increase_speed();
        assert_eq!(m.level(), 1);
        assert_eq!(m.direction(), Direction::Forward);
    }

    #[test]
    fn stop_zeroes_the_duty_but_keeps_the_driver_enabled() {
        let mut m = motor();
        m.increase_speed();
        m.increase_speed();
        m.stop();
        assert_eq!(m.level(), 0);
        assert_eq!(m.duty_ticks(), 0);
        assert!(!m.in_standby());
    }

    #[test]
    fn standby_and_resume_round_trip() {
        let mut m = motor();
        m.increase_speed();
        m.standby();
        assert!(m.in_standby());
        assert_eq!(m.duty_ticks(), 0);

        m.resume();
        assert!(!m.in_standby());
        assert_eq!(m.level(), 0);

        // A speed command also wakes the driver, matching the bridge's enable-on-drive wiring.
        m.standby();
        m.increase_speed();
        assert!(!m.in_standby());
        assert_eq!(m.level(), 1);
    }
}
