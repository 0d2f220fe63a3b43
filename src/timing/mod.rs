// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # MIDI Clock Consumers
//!
//! Both consumers are fed the same clock events by the master loop and never talk to each other.
//!
//! ## Modules
//!
//! - [`tempo`] - Smoothed BPM estimate and clock presence.
//! - [`sequencer`] - 16-step position driven by clock ticks, with a pluggable step indicator.

pub mod sequencer;
pub mod tempo;

pub use sequencer::{PixelRing, StepIndicator, StepRing, StepSequencer};
pub use tempo::TempoEstimator;
