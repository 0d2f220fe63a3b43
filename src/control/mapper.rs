// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Fused controller state to MIDI events.
//!
//! Buttons are edge triggered: a press sends NoteOn, a release NoteOff. Continuous controls send
//! a CC only when their scaled value changes. The first value seen for a control only seeds the
//! tracker, so nothing jumps when the board powers up.
//!
//! If the slave link drops, held button notes are released once and the slave-side state is
//! forgotten until frames arrive again.

use crate::config::{
    ARCADE_NOTES, FADER_CCS, FADER_MAX_RAW, MIDI_CHANNEL, NORMAL_NOTES, NOTE_VELOCITY, NUM_FADERS,
    NUM_POTS, NUM_ULTRASONIC, POT_CCS, POT_MAX_RAW, ULTRA_CCS,
};
use crate::control::scaling::{distance_to_cc, scale_to_cc};
use crate::protocol::{MidiEvent, MidiSink, Payload};

/// One pass worth of inputs.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ControlInputs {
    /// Latest slave payload, `None` while the link is down.
    pub slave: Option<Payload>,
    /// 12-bit fader readings.
    pub faders: [u16; NUM_FADERS],
    /// Ultrasonic distances in cm, `None` when the last measurement failed.
    pub ultrasonic: [Option<f32>; NUM_ULTRASONIC],
}

/// Last value sent on one CC.
#[derive(Copy, Clone, Debug, Default)]
struct CcTracker {
    last: Option<u8>,
}

impl CcTracker {
    /// Returns the value to send, if any.
    fn observe(&mut self, value: u8) -> Option<u8> {
        match self.last.replace(value) {
            None => None,
            Some(prev) if prev == value => None,
            Some(_) => Some(value),
        }
    }

    fn forget(&mut self) {
        self.last = None;
    }
}

pub struct ControlMapper {
    channel: u8,
    arcade_held: u8,
    normal_held: u8,
    pots: [CcTracker; NUM_POTS],
    faders: [CcTracker; NUM_FADERS],
    ultrasonic: [CcTracker; NUM_ULTRASONIC],
}

impl ControlMapper {
    pub fn new() -> Self {
        Self {
            channel: MIDI_CHANNEL,
            arcade_held: 0,
            normal_held: 0,
            pots: Default::default(),
            faders: Default::default(),
            ultrasonic: Default::default(),
        }
    }

    /// Override the output channel (0-based).
    pub fn with_channel(mut self, channel: u8) -> Self {
        self.channel = channel & 0x0F;
        self
    }

    /// Compare against the previous pass and emit whatever changed.
    pub fn update<S: MidiSink>(&mut self, inputs: &ControlInputs, sink: &mut S) {
        match inputs.slave {
            Some(p) => {
                self.buttons(p.arcade_mask, p.normal_mask, sink);
                for (i, &raw) in p.pots.iter().enumerate() {
                    let cc = scale_to_cc(raw, POT_MAX_RAW);
                    if let Some(v) = self.pots[i].observe(cc) {
                        self.cc(POT_CCS[i], v, sink);
                    }
                }
            }
            None => self.link_lost(sink),
        }

        for (i, &raw) in inputs.faders.iter().enumerate() {
            let cc = scale_to_cc(raw, FADER_MAX_RAW);
            if let Some(v) = self.faders[i].observe(cc) {
                self.cc(FADER_CCS[i], v, sink);
            }
        }

        for (i, reading) in inputs.ultrasonic.iter().enumerate() {
            // Invalid measurements hold the last value
            if let Some(cm) = reading {
                if let Some(v) = self.ultrasonic[i].observe(distance_to_cc(*cm)) {
                    self.cc(ULTRA_CCS[i], v, sink);
                }
            }
        }
    }

    /// Release anything still sounding and forget slave-side state.
    fn link_lost<S: MidiSink>(&mut self, sink: &mut S) {
        if self.arcade_held != 0 || self.normal_held != 0 {
            log::debug!("mapper: releasing held notes");
        }
        self.buttons(0, 0, sink);
        for t in self.pots.iter_mut() {
            t.forget();
        }
    }

    fn buttons<S: MidiSink>(&mut self, arcade: u8, normal: u8, sink: &mut S) {
        let changed = arcade ^ self.arcade_held;
        for (i, &note) in ARCADE_NOTES.iter().enumerate() {
            if changed & (1 << i) != 0 {
                self.note(note, arcade & (1 << i) != 0, sink);
            }
        }

        let changed = normal ^ self.normal_held;
        for (i, &note) in NORMAL_NOTES.iter().enumerate() {
            if changed & (1 << i) != 0 {
                self.note(note, normal & (1 << i) != 0, sink);
            }
        }

        self.arcade_held = arcade;
        self.normal_held = normal;
    }

    fn note<S: MidiSink>(&self, note: u8, on: bool, sink: &mut S) {
        let channel = self.channel;
        sink.send(if on {
            MidiEvent::NoteOn {
                channel,
                note,
                velocity: NOTE_VELOCITY,
            }
        } else {
            MidiEvent::NoteOff {
                channel,
                note,
                velocity: 0,
            }
        });
    }

    fn cc<S: MidiSink>(&self, controller: u8, value: u8, sink: &mut S) {
        sink.send(MidiEvent::ControlChange {
            channel: self.channel,
            controller,
            value,
        });
    }
}

impl Default for ControlMapper {
    fn default() -> Self {
        Self::new()
    }
}
