// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! NEC pulse-width decoder.
//!
//! The IR receiver hands us nothing but edges on one line; every data bit is encoded in the
//! number of ticks between a rising edge and the falling edge that follows it. [`NecDecoder`]
//! classifies each interval and assembles a 32-bit command word, MSB first. Completion is polled,
//! not pushed: the decoder only advances state, and the consumer watches [`NecDecoder::is_complete`]
//! before draining the word with [`NecDecoder::take_word`].
//!
//! [`EdgeTracker`] sits in front of the decoder and turns raw EXTI triggers into
//! rising/falling/glitch classifications, since the EXTI hardware reports "an edge happened" but
//! not which one.

/// Bits per NEC frame.
pub const FRAME_BITS: u8 = 32;

// Band boundaries for classifying the ticks elapsed between a rising edge and the next falling
// edge, in units of the 500 µs shared tick (`hw::tick::TICK_PERIOD_US`).
//
// NEC nominal widths: logical 0 = 562.5 µs (~1.1 ticks), logical 1 = 1687.5 µs (~3.4 ticks),
// header = 4500 µs (9 ticks). Each boundary sits in the dead zone between two nominal widths so
// that the ±1 tick of jitter from interrupt latency can never flip a classification.

/// Upper bound of the logical-0 band (≤ 1 ms).
pub const ZERO_MAX_TICKS: u32 = 2;
/// Upper bound of the logical-1 band (≤ 2.5 ms).
pub const ONE_MAX_TICKS: u32 = 5;
/// Upper bound of the header band (≤ 5 ms); anything longer is noise.
pub const HEADER_MAX_TICKS: u32 = 10;

/// Ticks without a completed frame before the decoder force-resets (3 s at 500 µs/tick).
/// Recovers a decoder stuck mid-word after a missed or spurious edge.
pub const WATCHDOG_TICKS: u16 = 6000;

/// What an EXTI trigger on the IR line turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    Rising,
    Falling,
    /// The sampled level matches the last recorded level: the pulse was shorter than handler
    /// entry, so both edges collapsed into one event. Decode state must not be touched.
    Glitch,
}

/// Recoverable decode anomalies, surfaced on the diagnostic lamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeFault {
    /// A header pulse arrived while word/bit-count were nonzero; the stream lost sync somewhere.
    HeaderMidFrame,
    /// Pulse width beyond every band; treated as stream desynchronization.
    PulseOutOfBand,
}

/// Classifies raw "an edge fired" events by watching the line level.
///
/// The IR line idles low; a rising edge opens every NEC interval.
pub struct EdgeTracker {
    last_level: bool,
}

impl EdgeTracker {
    pub const fn new() -> Self {
        Self { last_level: false }
    }

    /// Feed the line level sampled at interrupt entry.
    pub fn observe(&mut self, level: bool) -> EdgeKind {
        if level == self.last_level {
            return EdgeKind::Glitch;
        }
        self.last_level = level;
        if level {
            EdgeKind::Rising
        } else {
            EdgeKind::Falling
        }
    }
}

/// NEC command-frame decoder.
///
/// Written from the two interrupt handlers (tick and edge), drained by the main loop; every
/// access happens inside a critical section.
pub struct NecDecoder {
    word: u32,
    bit_count: u8,
    /// Set on the first rising edge after a drained frame; falling edges are ignored until then.
    receiving: bool,
    ticks_since_rise: u32,
    watchdog: u16,
}

impl NecDecoder {
    pub const fn new() -> Self {
        Self {
            word: 0,
            bit_count: 0,
            receiving: false,
            ticks_since_rise: 0,
            watchdog: 0,
        }
    }

    /// Advance the time base by one shared tick.
    ///
    /// Also runs the watchdog countdown: [`WATCHDOG_TICKS`] without a completed frame force-resets
    /// a decoder stuck mid-word. A completed-but-undrained frame is left alone.
    pub fn on_tick(&mut self) {
        self.ticks_since_rise = self.ticks_since_rise.saturating_add(1);
        self.watchdog += 1;
        if self.watchdog >= WATCHDOG_TICKS {
            self.watchdog = 0;
            if self.bit_count < FRAME_BITS {
                self.reset_frame();
            }
        }
    }

    /// A rising edge: restart the interval measurement and treat edges from here as data.
    pub fn on_rising(&mut self) {
        self.ticks_since_rise = 0;
        self.receiving = true;
    }

    /// A falling edge closes the interval opened by the last rising edge; classify its width.
    pub fn on_falling(&mut self) -> Option<DecodeFault> {
        if !self.receiving {
            return None;
        }
        let diff = self.ticks_since_rise;
        if diff <= ZERO_MAX_TICKS {
            self.push_bit(0);
            None
        } else if diff <= ONE_MAX_TICKS {
            self.push_bit(1);
            None
        } else if diff <= HEADER_MAX_TICKS {
            // A header is only legal against an idle frame; either way the frame restarts clean.
            let fault = if self.word != 0 || self.bit_count != 0 {
                Some(DecodeFault::HeaderMidFrame)
            } else {
                None
            };
            self.reset_frame();
            fault
        } else {
            self.reset_frame();
            Some(DecodeFault::PulseOutOfBand)
        }
    }

    /// A full frame is sitting in the buffer, ready to take.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.bit_count == FRAME_BITS
    }

    #[inline]
    pub fn bit_count(&self) -> u8 {
        self.bit_count
    }

    /// Drain the completed word and re-arm for the next frame. Successful completion is the one
    /// thing that pushes the watchdog back.
    pub fn take_word(&mut self) -> u32 {
        let word = self.word;
        self.reset_frame();
        self.receiving = false;
        self.watchdog = 0;
        word
    }

    /// Consumer-forced reset, used after an unrecognized command word so the next header is not
    /// misread as mid-frame data.
    pub fn force_reset(&mut self) {
        self.reset_frame();
        self.receiving = false;
    }

    fn push_bit(&mut self, bit: u32) {
        // Hold a completed frame until the consumer drains it.
        if self.bit_count >= FRAME_BITS {
            return;
        }
        self.word = (self.word << 1) | bit;
        self.bit_count += 1;
    }

    /// The only place word and bit-count reset, so the header-validity check can never observe
    /// one without the other.
    fn reset_frame(&mut self) {
        self.word = 0;
        self.bit_count = 0;
    }
}
