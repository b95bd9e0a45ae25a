// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Shared periodic tick source.
//!
//! One hardware timer (TIM2) provides the time base for the whole firmware: the NEC decoder
//! measures pulse widths in ticks, and the software PWM multiplexer advances its channel counters
//! once per tick. Everything that needs time counts these interrupts; nothing else touches TIM2.

use stm32f7xx_hal::{
    pac::TIM2,
    prelude::*,
    rcc::Clocks,
    timer::{CounterUs, Event},
};

/// Tick period in microseconds.
///
/// 500 µs puts every quantity this firmware times on a clean tick boundary: the NEC space widths
/// (562.5 µs / 1687.5 µs / 4500 µs) straddle ticks 1, 3 and 9, the motor PWM period is 4 ticks
/// (2 ms) and the servo frame is 40 ticks (20 ms).
pub const TICK_PERIOD_US: u32 = 500;

/// TIM2 wrapper, armed as a free-running [`TICK_PERIOD_US`] update interrupt.
pub struct TickTimer {
    counter: CounterUs<TIM2>,
}

impl TickTimer {
    /// Claim TIM2 and start the shared tick. The update interrupt is listening from here on;
    /// unmask `TIM2` in the NVIC once the handler's shared state is in place.
    pub fn new(tim: TIM2, clocks: &Clocks) -> Self {
        let mut counter = tim.counter_us(clocks);
        counter.start(TICK_PERIOD_US.micros()).ok();
        counter.listen(Event::Update);
        Self { counter }
    }

    /// Acknowledge the update flag. Exactly one call per TIM2 interrupt; a missed acknowledge
    /// re-enters the handler immediately and starves the main loop.
    #[inline]
    pub fn clear_tick(&mut self) {
        self.counter.clear_interrupt(Event::Update);
    }
}
