#![no_main]
#![no_std]

use core::cell::RefCell;

use cortex_m::interrupt::{free, Mutex};
use cortex_m_rt::entry;
use panic_halt as _;

use hal::{
    gpio::{Edge, ExtiPin},
    pac::{self, interrupt},
    prelude::*,
    serial::{Config, Serial},
};
use stm32f7xx_hal as hal;

use irrover::control::{dispatch, DriveMotor, PwmMultiplexer, SteeringServo};
use irrover::hw::pins::{BoardPins, IrPin, LampPin, MotorPwmPin, ServoPwmPin};
use irrover::hw::{Led, TickTimer, Usart};
use irrover::protocol::{Command, EdgeKind, EdgeTracker, NecDecoder};

/// VREFINT factory calibration word (STM32F76x/77x). Erased flash reads 0xFFFF.
const VREFINT_CAL: *const u16 = 0x1FF0_F44A as *const u16;

type Pwm = PwmMultiplexer<MotorPwmPin, ServoPwmPin>;

// Shared between the two interrupt handlers and the main loop; every access goes through a
// critical section. Decoder and edge tracker have const constructors, the rest arrives once
// bring-up is done.
static DECODER: Mutex<RefCell<NecDecoder>> = Mutex::new(RefCell::new(NecDecoder::new()));
static EDGES: Mutex<RefCell<EdgeTracker>> = Mutex::new(RefCell::new(EdgeTracker::new()));
static IR_PIN: Mutex<RefCell<Option<IrPin>>> = Mutex::new(RefCell::new(None));
static LAMP: Mutex<RefCell<Option<Led<LampPin>>>> = Mutex::new(RefCell::new(None));
static PWM: Mutex<RefCell<Option<Pwm>>> = Mutex::new(RefCell::new(None));
static TICK: Mutex<RefCell<Option<TickTimer>>> = Mutex::new(RefCell::new(None));

#[entry]
fn main() -> ! {
    // Factory calibration guard: erased calibration flash means there are no trusted operating
    // parameters for this part. Halt before any actuator line is configured; panic-halt parks
    // the core permanently.
    let cal = unsafe { core::ptr::read_volatile(VREFINT_CAL) };
    if cal == 0x0000 || cal == 0xFFFF {
        panic!("factory calibration erased");
    }

    // Peripherals
    let mut dp = pac::Peripherals::take().unwrap();

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();
    let mut apb2 = rcc.apb2;

    // GPIO
    let mut pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOD);

    // IR input: EXTI0, both edges, so the handler sees every transition of the receiver output.
    let mut syscfg = dp.SYSCFG;
    pins.ir.make_interrupt_source(&mut syscfg, &mut apb2);
    pins.ir.trigger_on_edge(&mut dp.EXTI, Edge::RisingFalling);
    pins.ir.enable_interrupt(&mut dp.EXTI);

    // USART1 (DBG)
    let usart_cfg = Config {
        baud_rate: 115_200.bps(),
        ..Default::default()
    };
    let serial = Serial::new(dp.USART1, (pins.usart1.tx, pins.usart1.rx), &clocks, usart_cfg);
    let mut usart = Usart::new(serial);

    // Shared 500 µs tick
    let tick = TickTimer::new(dp.TIM2, &clocks);

    // Actuators, in their power-up defaults: motor stopped but forward-ready, servo centered.
    let mut motor = DriveMotor::new(pins.motor.in1, pins.motor.in2, pins.motor.standby);
    let mut servo = SteeringServo::new();
    let mut pwm = PwmMultiplexer::new(pins.motor.pwm, pins.servo_pwm);
    // The servo pulses from power-up; the motor channel stays at zero until a speed command.
    pwm.set_servo_duty(servo.duty_ticks());

    free(|cs| {
        IR_PIN.borrow(cs).replace(Some(pins.ir));
        LAMP.borrow(cs).replace(Some(Led::active_low(pins.lamp)));
        PWM.borrow(cs).replace(Some(pwm));
        TICK.borrow(cs).replace(Some(tick));
    });

    // Handlers own their state now; let the interrupts in.
    unsafe {
        pac::NVIC::unmask(pac::Interrupt::TIM2);
        pac::NVIC::unmask(pac::Interrupt::EXTI0);
    }

    usart.println("irrover: decoder armed");

    loop {
        // Completion is polled: the decoder never pushes. Drain the word inside the critical
        // section, act on it outside.
        let word = free(|cs| {
            let mut decoder = DECODER.borrow(cs).borrow_mut();
            if decoder.is_complete() {
                Some(decoder.take_word())
            } else {
                None
            }
        });

        if let Some(word) = word {
            usart.write_str("rx ");
            usart.print_hex_u32(word);

            match Command::from_code(word) {
                Some(command) => {
                    usart.println("");
                    free(|cs| {
                        let mut pwm = PWM.borrow(cs).borrow_mut();
                        let mut lamp = LAMP.borrow(cs).borrow_mut();
                        if let (Some(pwm), Some(lamp)) = (pwm.as_mut(), lamp.as_mut()) {
                            dispatch(command, &mut motor, &mut servo, pwm, lamp);
                        }
                    });
                }
                None => {
                    // Not ours; drop it and realign the decoder so the next header reads clean.
                    usart.println(" (unknown, dropped)");
                    free(|cs| DECODER.borrow(cs).borrow_mut().force_reset());
                }
            }
        } else {
            // Nothing pending; park until the next interrupt advances the decoder.
            cortex_m::asm::wfi();
        }
    }
}

/// Shared tick: advance both PWM channels and the decoder's time base / watchdog.
#[interrupt]
fn TIM2() {
    free(|cs| {
        if let Some(tick) = TICK.borrow(cs).borrow_mut().as_mut() {
            tick.clear_tick();
        }
        if let Some(pwm) = PWM.borrow(cs).borrow_mut().as_mut() {
            pwm.on_tick();
        }
        DECODER.borrow(cs).borrow_mut().on_tick();
    });
}

/// IR line edge: classify the trigger and feed the decoder. Kept short; the lamp toggle is the
/// only side effect beyond decoder state.
#[interrupt]
fn EXTI0() {
    free(|cs| {
        let mut ir = IR_PIN.borrow(cs).borrow_mut();
        let pin = match ir.as_mut() {
            Some(pin) => pin,
            None => return,
        };
        pin.clear_interrupt_pending_bit();
        let level = pin.is_high();

        let faulted = {
            let kind = EDGES.borrow(cs).borrow_mut().observe(level);
            let mut decoder = DECODER.borrow(cs).borrow_mut();
            match kind {
                EdgeKind::Rising => {
                    decoder.on_rising();
                    false
                }
                EdgeKind::Falling => decoder.on_falling().is_some(),
                // A collapsed pulse never reaches the decoder.
                EdgeKind::Glitch => true,
            }
        };

        if faulted {
            if let Some(lamp) = LAMP.borrow(cs).borrow_mut().as_mut() {
                lamp.toggle();
            }
        }
    });
}
