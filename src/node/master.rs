// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Master board: fuse the slave link, local sensors and the MIDI clock.
//!
//! Clock handling and the sensor/mapping loop are independent. Realtime bytes can be fed from
//! the MIDI input as they arrive, while [`MasterNode::tick`] runs from the main loop.

use embedded_hal::digital::v2::{InputPin, OutputPin};
use embedded_hal::serial;

use crate::config::{LINK_TIMEOUT_MS, NUM_FADERS, NUM_ULTRASONIC};
use crate::control::{ControlInputs, ControlMapper};
use crate::input::UltrasonicRanger;
use crate::protocol::{LinkReceiver, MidiSink, TransportEvent};
use crate::time::Micros;
use crate::timing::{StepIndicator, StepSequencer, TempoEstimator};

/// What the display shows.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ControllerStatus {
    /// Rounded tempo, 0 without a clock.
    pub bpm: u16,
    pub has_clock: bool,
    pub playing: bool,
    /// Current step, 1-based for display.
    pub step: u8,
    pub total_steps: u8,
    pub link_up: bool,
}

pub struct MasterNode<TRIG, ECHO, I> {
    link: LinkReceiver,
    link_timeout_ms: u32,
    link_up: bool,
    tempo: TempoEstimator,
    sequencer: StepSequencer<I>,
    rangers: UltrasonicRanger<TRIG, ECHO, NUM_ULTRASONIC>,
    mapper: ControlMapper,
}

impl<TRIG, ECHO, I> MasterNode<TRIG, ECHO, I>
where
    TRIG: OutputPin,
    ECHO: InputPin,
    I: StepIndicator,
{
    pub fn new(rangers: UltrasonicRanger<TRIG, ECHO, NUM_ULTRASONIC>, indicator: I) -> Self {
        Self {
            link: LinkReceiver::new(),
            link_timeout_ms: LINK_TIMEOUT_MS,
            link_up: false,
            tempo: TempoEstimator::new(),
            sequencer: StepSequencer::new(indicator),
            rangers,
            mapper: ControlMapper::new(),
        }
    }

    pub fn with_link_timeout(mut self, timeout_ms: u32) -> Self {
        self.link_timeout_ms = timeout_ms;
        self
    }

    pub fn with_mapper(mut self, mapper: ControlMapper) -> Self {
        self.mapper = mapper;
        self
    }

    /// Route one clock or transport event.
    pub fn on_transport(&mut self, event: TransportEvent, now: Micros) {
        match event {
            TransportEvent::Tick => {
                self.tempo.on_tick(now);
                self.sequencer.on_tick();
            }
            // No song position handling: Continue restarts like Start
            TransportEvent::Start | TransportEvent::Continue => {
                self.tempo.reset();
                self.sequencer.on_start();
            }
            TransportEvent::Stop => self.sequencer.on_stop(),
        }
    }

    /// Feed one byte from the MIDI input. Returns true if it was a transport byte.
    ///
    /// Realtime bytes may appear in the middle of other messages, so every byte is checked on
    /// its own and anything else is ignored.
    pub fn on_midi_byte(&mut self, byte: u8, now: Micros) -> bool {
        match TransportEvent::from_status(byte) {
            Some(event) => {
                self.on_transport(event, now);
                true
            }
            None => false,
        }
    }

    /// One loop pass: drain the link, advance the rangers, emit MIDI for whatever changed.
    pub fn tick<R, S>(
        &mut self,
        now: Micros,
        rx: &mut R,
        faders: [u16; NUM_FADERS],
        sink: &mut S,
    ) where
        R: serial::Read<u8>,
        S: MidiSink,
    {
        self.link.poll(rx, now);

        let alive = self.link.is_alive(self.link_timeout_ms, now);
        if alive != self.link_up {
            if alive {
                log::info!("link: slave up");
            } else {
                log::warn!(
                    "link: slave lost ({} ok, {} bad)",
                    self.link.accepted_frames(),
                    self.link.rejected_frames()
                );
            }
            self.link_up = alive;
        }

        self.rangers.update(now);

        let inputs = ControlInputs {
            slave: alive.then(|| self.link.snapshot().payload),
            faders,
            ultrasonic: self.rangers.readings(),
        };
        self.mapper.update(&inputs, sink);
    }

    pub fn status(&self, now: Micros) -> ControllerStatus {
        ControllerStatus {
            bpm: self.tempo.tempo(now),
            has_clock: self.tempo.has_clock(now),
            playing: self.sequencer.is_running(),
            step: self.sequencer.current_step() + 1,
            total_steps: self.sequencer.total_steps(),
            link_up: self.link_up,
        }
    }

    pub fn link(&self) -> &LinkReceiver {
        &self.link
    }

    pub fn tempo(&self) -> &TempoEstimator {
        &self.tempo
    }

    pub fn sequencer(&self) -> &StepSequencer<I> {
        &self.sequencer
    }

    pub fn rangers(&self) -> &UltrasonicRanger<TRIG, ECHO, NUM_ULTRASONIC> {
        &self.rangers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::frame::encode_frame;
    use crate::protocol::{MidiEvent, Payload};
    use crate::testing::{FakePin, FakeSerial, RecordingSink};

    type Node = MasterNode<FakePin, FakePin, ()>;

    fn node() -> Node {
        let pins = core::array::from_fn(|_| (FakePin::new(false), FakePin::new(false)));
        MasterNode::new(UltrasonicRanger::new(pins, 0), ())
    }

    fn frame(arcade_mask: u8) -> FakeSerial {
        FakeSerial::with_rx(&encode_frame(&Payload {
            arcade_mask,
            ..Default::default()
        }))
    }

    #[test]
    fn clock_bytes_drive_tempo_and_steps() {
        let mut node = node();
        let mut now = 0;

        assert!(node.on_midi_byte(0xFA, now));
        // Note data interleaved with clock is ignored
        assert!(!node.on_midi_byte(0x90, now));
        for _ in 0..48 {
            now += 20_833;
            assert!(node.on_midi_byte(0xF8, now));
        }

        assert_eq!(
            node.status(now),
            ControllerStatus {
                bpm: 120,
                has_clock: true,
                playing: true,
                step: 9,
                total_steps: 16,
                link_up: false,
            }
        );

        node.on_transport(TransportEvent::Stop, now);
        let s = node.status(now + 2_000_000);
        assert!(!s.playing);
        assert!(!s.has_clock);
        assert_eq!(s.bpm, 0);
        assert_eq!(s.step, 9);
    }

    #[test]
    fn continue_restarts_from_first_step() {
        let mut node = node();
        node.on_transport(TransportEvent::Start, 0);
        for i in 1..=20 {
            node.on_transport(TransportEvent::Tick, i * 20_000);
        }
        node.on_transport(TransportEvent::Stop, 400_000);
        node.on_transport(TransportEvent::Continue, 500_000);
        assert!(node.sequencer().is_running());
        assert_eq!(node.status(500_000).step, 1);
    }

    #[test]
    fn link_frames_become_notes() {
        let mut node = node();
        let mut sink = RecordingSink::default();

        node.tick(0, &mut frame(0b0010), [0; 3], &mut sink);
        assert!(node.status(0).link_up);
        assert_eq!(
            sink.events,
            vec![MidiEvent::NoteOn {
                channel: 0,
                note: 37,
                velocity: 100
            }]
        );
    }

    #[test]
    fn silent_link_releases_notes() {
        let mut node = node();
        let mut sink = RecordingSink::default();

        node.tick(0, &mut frame(0b0001), [0; 3], &mut sink);
        node.tick(50_000, &mut FakeSerial::default(), [0; 3], &mut sink);
        assert_eq!(sink.events.len(), 1);

        node.tick(100_001, &mut FakeSerial::default(), [0; 3], &mut sink);
        assert!(!node.status(100_001).link_up);
        assert_eq!(
            sink.events.last(),
            Some(&MidiEvent::NoteOff {
                channel: 0,
                note: 36,
                velocity: 0
            })
        );
    }

    #[test]
    fn faders_emit_cc_without_link() {
        let mut node = node();
        let mut sink = RecordingSink::default();
        let mut idle = FakeSerial::default();

        node.tick(0, &mut idle, [0, 0, 0], &mut sink);
        node.tick(1_000, &mut idle, [0, 4095, 0], &mut sink);
        assert_eq!(
            sink.events,
            vec![MidiEvent::ControlChange {
                channel: 0,
                controller: 10,
                value: 127
            }]
        );
    }
}
