// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for STM32F777 MCU for IRover.

use stm32f7xx_hal::{
    gpio::{gpioa, gpiob, gpiod, Alternate, Floating, Input, Output, PushPull},
    pac,
    prelude::*,
};

/// Demodulated IR receiver output, EXTI0 on both edges.
pub type IrPin = gpioa::PA0<Input<Floating>>;

/// Status/diagnostic LED, active-low on the board wiring.
pub type LampPin = gpiod::PD9<Output<PushPull>>;

pub type MotorIn1Pin = gpiob::PB0<Output<PushPull>>;
pub type MotorIn2Pin = gpiob::PB1<Output<PushPull>>;
pub type MotorPwmPin = gpiob::PB2<Output<PushPull>>;
pub type MotorStandbyPin = gpiob::PB3<Output<PushPull>>;

/// Steering servo control pulse.
pub type ServoPwmPin = gpioa::PA5<Output<PushPull>>;

/// All board pins. Construct this once at startup using:
///
/// ```ignore
/// let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOD);
/// ```
pub struct BoardPins {
    pub ir: IrPin,
    pub lamp: LampPin,
    pub usart1: Usart1Pins,
    pub motor: MotorPins,
    pub servo_pwm: ServoPwmPin,
}

pub struct Usart1Pins {
    pub tx: gpioa::PA9<Alternate<7>>,
    pub rx: gpioa::PA10<Alternate<7>>,
}

/// TB6612-style H-bridge control block, kept together on one port.
///
/// | IN1 | IN2 | Drive |
/// | --- | --- | ----- |
/// | 1   | 0   | forward |
/// | 0   | 1   | reverse |
/// | 0   | 0   | no drive (coast) |
///
/// `standby` is active-high driver enable; `pwm` is the chopped speed line.
pub struct MotorPins {
    pub in1: MotorIn1Pin,
    pub in2: MotorIn2Pin,
    pub pwm: MotorPwmPin,
    pub standby: MotorStandbyPin,
}

impl BoardPins {
    /// Create all named pins from raw GPIO peripherals.
    pub fn new(gpioa: pac::GPIOA, gpiob: pac::GPIOB, gpiod: pac::GPIOD) -> Self {
        let gpioa = gpioa.split();
        let gpiob = gpiob.split();
        let gpiod = gpiod.split();

        Self {
            ir: gpioa.pa0.into_floating_input(),

            lamp: gpiod.pd9.into_push_pull_output(),

            usart1: Usart1Pins {
                tx: gpioa.pa9.into_alternate::<7>(),
                rx: gpioa.pa10.into_alternate::<7>(),
            },

            motor: MotorPins {
                in1: gpiob.pb0.into_push_pull_output(),
                in2: gpiob.pb1.into_push_pull_output(),
                pwm: gpiob.pb2.into_push_pull_output(),
                standby: gpiob.pb3.into_push_pull_output(),
            },

            servo_pwm: gpioa.pa5.into_push_pull_output(),
        }
    }
}
