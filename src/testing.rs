// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Hand-written fakes shared by unit tests.

use core::cell::Cell;
use core::convert::Infallible;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::digital::v2::{InputPin, OutputPin};
use embedded_hal::serial;

use crate::input::converter::ConversionDevice;
use crate::protocol::midi::{MidiEvent, MidiSink};

/// Pin whose level is controlled from the test through a shared handle.
#[derive(Clone, Default)]
pub struct FakePin {
    high: Rc<Cell<bool>>,
}

impl FakePin {
    pub fn new(high: bool) -> Self {
        Self {
            high: Rc::new(Cell::new(high)),
        }
    }

    pub fn set_level(&self, high: bool) {
        self.high.set(high);
    }
}

impl InputPin for FakePin {
    type Error = Infallible;

    fn is_high(&self) -> Result<bool, Infallible> {
        Ok(self.high.get())
    }

    fn is_low(&self) -> Result<bool, Infallible> {
        Ok(!self.high.get())
    }
}

impl OutputPin for FakePin {
    type Error = Infallible;

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.high.set(true);
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.high.set(false);
        Ok(())
    }
}

/// Serial port that records writes and hands out queued bytes on read.
#[derive(Default)]
pub struct FakeSerial {
    pub written: Vec<u8>,
    pub rx: Vec<u8>,
    /// Report one receive error just before handing out `rx[i]`.
    pub rx_error_at: Option<usize>,
    rx_pos: usize,
}

impl FakeSerial {
    pub fn with_rx(bytes: &[u8]) -> Self {
        Self {
            rx: bytes.to_vec(),
            ..Default::default()
        }
    }
}

impl serial::Write<u8> for FakeSerial {
    type Error = Infallible;

    fn write(&mut self, word: u8) -> nb::Result<(), Infallible> {
        self.written.push(word);
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Infallible> {
        Ok(())
    }
}

impl serial::Read<u8> for FakeSerial {
    type Error = ();

    fn read(&mut self) -> nb::Result<u8, ()> {
        if self.rx_error_at == Some(self.rx_pos) {
            self.rx_error_at = None;
            return Err(nb::Error::Other(()));
        }
        match self.rx.get(self.rx_pos) {
            Some(&b) => {
                self.rx_pos += 1;
                Ok(b)
            }
            None => Err(nb::Error::WouldBlock),
        }
    }
}

/// Converter front-end that logs every request and answers from a value table.
///
/// Like the ADS1115, the result register keeps the last conversion until a new one completes.
pub struct FakeConverter {
    pub values: [i16; 4],
    pub started: Vec<usize>,
    pub reads: usize,
    pub fail_read: bool,
    /// Refuse the next start request for this channel.
    pub fail_start: Option<usize>,
    register: i16,
    in_flight: Option<usize>,
}

impl FakeConverter {
    pub fn new(values: [i16; 4]) -> Self {
        Self {
            values,
            started: Vec::new(),
            reads: 0,
            fail_read: false,
            fail_start: None,
            register: 0,
            in_flight: None,
        }
    }
}

impl ConversionDevice for FakeConverter {
    type Error = ();

    fn start_conversion(&mut self, channel: usize) -> Result<(), ()> {
        assert!(self.in_flight.is_none(), "two conversions in flight");
        if self.fail_start == Some(channel) {
            self.fail_start = None;
            return Err(());
        }
        self.in_flight = Some(channel);
        self.started.push(channel);
        Ok(())
    }

    fn read_conversion(&mut self) -> Result<i16, ()> {
        self.reads += 1;
        if let Some(ch) = self.in_flight.take() {
            self.register = self.values[ch];
        }
        if self.fail_read {
            return Err(());
        }
        Ok(self.register)
    }
}

/// MIDI sink that just collects events.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<MidiEvent>,
}

impl MidiSink for RecordingSink {
    fn send(&mut self, event: MidiEvent) {
        self.events.push(event);
    }
}
