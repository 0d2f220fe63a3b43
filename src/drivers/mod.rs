// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Device-Specific Drivers
//!
//! This module contains device-specific drivers that sit above the raw `hw/` layer and below the
//! acquisition state machines. Drivers are written against `embedded-hal` traits so they can be
//! exercised on the host with mock buses.
//!
//! ## Existing drivers
//!
//! - [`ads1115`] – TI ADS1115 4-channel 16-bit I2C ADC

pub mod ads1115;

pub use ads1115::Ads1115;
