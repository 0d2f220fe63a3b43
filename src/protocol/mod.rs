// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

pub mod frame;
pub mod midi;
pub mod receiver;
pub mod sender;

pub use frame::{FrameError, Payload};
pub use midi::{MidiEvent, MidiSink, TransportEvent};
pub use receiver::{LinkReceiver, SlaveSnapshot};
pub use sender::LinkSender;
