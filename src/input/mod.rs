// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Input Acquisition
//!
//! Non-blocking state machines that turn raw hardware readings into stable values. Each one is
//! polled from the main loop with the current time and returns immediately.
//!
//! ## Modules
//!
//! - [`debounce`] - Per-button debouncing and the slave's 8-button bank.
//! - [`converter`] - Round-robin scheduling of a single multiplexed ADC.
//! - [`ultrasonic`] - Trigger/echo ranging for HC-SR04 style sensors.

pub mod converter;
pub mod debounce;
pub mod ultrasonic;

pub use converter::{ConversionDevice, MultiplexedConverter};
pub use debounce::{ButtonBank, Debouncer};
pub use ultrasonic::UltrasonicRanger;
