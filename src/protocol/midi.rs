// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! MIDI channel-voice output and realtime transport input.

// Channel-voice status nibbles
pub const STATUS_NOTE_OFF: u8 = 0x80;
pub const STATUS_NOTE_ON: u8 = 0x90;
pub const STATUS_CONTROL_CHANGE: u8 = 0xB0;

// System realtime bytes
pub const RT_TIMING_CLOCK: u8 = 0xF8;
pub const RT_START: u8 = 0xFA;
pub const RT_CONTINUE: u8 = 0xFB;
pub const RT_STOP: u8 = 0xFC;

/// Incoming MIDI clock and transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportEvent {
    /// One of 24 pulses per quarter note.
    Tick,
    Start,
    Continue,
    Stop,
}

impl TransportEvent {
    /// Decode a realtime status byte. Anything else is `None`.
    pub fn from_status(byte: u8) -> Option<Self> {
        match byte {
            RT_TIMING_CLOCK => Some(Self::Tick),
            RT_START => Some(Self::Start),
            RT_CONTINUE => Some(Self::Continue),
            RT_STOP => Some(Self::Stop),
            _ => None,
        }
    }
}

/// Outgoing channel-voice message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, note: u8, velocity: u8 },
    NoteOff { channel: u8, note: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
}

impl MidiEvent {
    /// Wire bytes. Channel is masked to 4 bits and data bytes to 7.
    pub fn to_bytes(&self) -> [u8; 3] {
        let (status, channel, d1, d2) = match *self {
            Self::NoteOn {
                channel,
                note,
                velocity,
            } => (STATUS_NOTE_ON, channel, note, velocity),
            Self::NoteOff {
                channel,
                note,
                velocity,
            } => (STATUS_NOTE_OFF, channel, note, velocity),
            Self::ControlChange {
                channel,
                controller,
                value,
            } => (STATUS_CONTROL_CHANGE, channel, controller, value),
        };
        [status | (channel & 0x0F), d1 & 0x7F, d2 & 0x7F]
    }
}

/// Destination for generated MIDI events.
///
/// Delivery is best effort. A sink that cannot transmit (cable unplugged, host not enumerated)
/// drops the event.
pub trait MidiSink {
    fn send(&mut self, event: MidiEvent);
}

impl<S: MidiSink + ?Sized> MidiSink for &mut S {
    fn send(&mut self, event: MidiEvent) {
        (**self).send(event)
    }
}
