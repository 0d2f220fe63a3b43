// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # DistritCtrl Firmware
//!
//! This crate contains the firmware components for the DistritCtrl two-board MIDI controller,
//! written in Rust. The slave board samples buttons and potentiometers and streams them to the
//! master board, which fuses them with its own faders, ultrasonic sensors and an external MIDI
//! clock.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`input`] | Non-blocking acquisition: debounce, multiplexed ADC, ultrasonic ranging |
//! | [`drivers`] | Device-level drivers (e.g., ADS1115) |
//! | [`protocol`] | Inter-board frame codec, link sender/receiver, MIDI messages |
//! | [`timing`] | Tempo estimation and step sequencer driven by MIDI clock |
//! | [`control`] | Mapping of fused inputs to note / CC events |
//! | [`node`] | Composed per-board loop entry points |
//! | [`hw`] | MCU-level wrappers (USART, ADC, timers) and LEDs |
//!
//! Everything outside `hw` is hardware-independent and runs on the host:
//!
//! ```bash
//! cargo test
//! ```
//!
//! Flash a board:
//!
//! ```bash
//! cargo run --release --features board --target thumbv7em-none-eabihf --bin slave
//! cargo run --release --features board --target thumbv7em-none-eabihf --bin master
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod control;
pub mod drivers;
pub mod hw;
pub mod input;
pub mod node;
pub mod protocol;
pub mod time;
pub mod timing;

#[cfg(test)]
pub(crate) mod testing;
