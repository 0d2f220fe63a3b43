// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Control Mapping
//!
//! Turns fused input state into MIDI.
//!
//! ## Modules
//!
//! - [`scaling`] - Raw readings to 7-bit values.
//! - [`mapper`] - Edge-triggered notes and change-only CCs.

pub mod mapper;
pub mod scaling;

pub use mapper::{ControlInputs, ControlMapper};
pub use scaling::{distance_to_cc, scale_to_cc};
