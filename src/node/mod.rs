// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Board Loops
//!
//! Each board's main loop is a single `tick(now)` call on its node. The node fixes the order in
//! which sub-components are updated, so the binaries only own hardware setup.
//!
//! ## Modules
//!
//! - [`slave`] - Buttons and pots to link frames.
//! - [`master`] - Link, clock, sensors and mapping to MIDI.

pub mod master;
pub mod slave;

pub use master::{ControllerStatus, MasterNode};
pub use slave::{ActivityMonitor, SlaveNode};
