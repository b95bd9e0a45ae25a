// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # IRover Firmware
//!
//! This crate contains the firmware for the IRover remote-controlled rover platform, written in
//! Rust, targeting an STM32F777 MCU. An infrared remote (NEC pulse-width encoding) drives a
//! brushed DC rear motor through an H-bridge and a steering servo, with both PWM waveforms
//! multiplexed off one shared 500 µs timer tick.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`hw`] | MCU-level wrappers around GPIO lines, the shared tick timer, and the debug USART |
//! | [`protocol`] | NEC pulse-width decoder and the remote's command vocabulary |
//! | [`control`] | Actuator state machines and the software PWM multiplexer |
//!
//! ## Getting Started
//!
//! Build docs:
//!
//! ```bash
//! cargo doc --no-deps --open
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release
//! ```
//!
//! Run the host-side unit tests for the decode/actuate core:
//!
//! ```bash
//! cargo test --lib
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![no_std]

pub mod control;
pub mod hw;
pub mod protocol;
