// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

pub mod codes;
pub mod nec;

pub use codes::Command;
pub use nec::{DecodeFault, EdgeKind, EdgeTracker, NecDecoder};
