// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Hardware Layer
//!
//! [`led`] only needs `embedded-hal` and builds everywhere. The rest wraps STM32F7 peripherals
//! and is only compiled with the `board` feature.

pub mod led;

#[cfg(feature = "board")]
pub mod adc;
#[cfg(feature = "board")]
pub mod logger;
#[cfg(feature = "board")]
pub mod pins;
#[cfg(feature = "board")]
pub mod timer;
#[cfg(feature = "board")]
pub mod usart;

pub use led::Led;

#[cfg(feature = "board")]
pub use adc::Adc;
#[cfg(feature = "board")]
pub use timer::MonoTimer;
#[cfg(feature = "board")]
pub use usart::Usart;
