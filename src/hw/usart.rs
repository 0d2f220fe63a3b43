// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! USART abstraction layer.
//!
//! The same wrapper serves three ports: the debug terminal, the transmit side of the inter-board
//! link, and MIDI out. Only the transmit half is wrapped. Use [`Usart::split`] when the receive
//! half is needed as well.
//!
//! Note: When using `writeln!`, be sure to include `\r` (CR) in the format string to ensure correct
//! line endings on the terminal.
//!
//! To access the terminal on the host machine, connect to the debug USB port and use
//! ```text
//! $ screen /dev/tty.usbmodem* <baud_rate>
//! ```
//!
//! To close the debug terminal, press `Ctrl+A` then `Ctrl+\` then `y`.

use core::fmt;

use embedded_hal::serial;
use nb::block;
use stm32f7xx_hal::serial::{Instance, Pins, Rx, Serial, Tx};

use crate::protocol::{MidiEvent, MidiSink};

pub struct Usart<U: Instance> {
    tx: Tx<U>,
}

impl<U: Instance> Usart<U> {
    /// Wrap the transmit half and drop the receiver.
    pub fn new<PINS: Pins<U>>(serial: Serial<U, PINS>) -> Self {
        Self::split(serial).0
    }

    /// Wrap the transmit half and hand back the receiver.
    pub fn split<PINS: Pins<U>>(serial: Serial<U, PINS>) -> (Self, Rx<U>) {
        let (tx, rx) = serial.split();
        (Self { tx }, rx)
    }

    #[inline]
    pub fn write_byte(&mut self, b: u8) {
        let _ = block!(serial::Write::write(&mut self.tx, b));
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.write_byte(b);
        }
    }

    pub fn write_str(&mut self, s: &str) {
        self.write_bytes(s.as_bytes());
    }

    /// Write string and CRLF terminator.
    #[inline]
    pub fn println(&mut self, s: &str) {
        self.write_str(s);
        self.write_str("\r\n");
    }

    /// Block until the hardware TX FIFO/drain is flushed.
    #[inline]
    pub fn flush(&mut self) {
        let _ = block!(serial::Write::flush(&mut self.tx));
    }
}

impl<U: Instance> serial::Write<u8> for Usart<U> {
    type Error = <Tx<U> as serial::Write<u8>>::Error;

    fn write(&mut self, word: u8) -> nb::Result<(), Self::Error> {
        serial::Write::write(&mut self.tx, word)
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        serial::Write::flush(&mut self.tx)
    }
}

/// MIDI out. Running status is not used; every message carries its status byte.
impl<U: Instance> MidiSink for Usart<U> {
    fn send(&mut self, event: MidiEvent) {
        self.write_bytes(&event.to_bytes());
    }
}

// Implement `core::fmt::Write` so we can use `write!` / `writeln!` on `Usart`.
impl<U: Instance> fmt::Write for Usart<U> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        Usart::write_str(self, s);
        Ok(())
    }
}
