// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Master-side parser for the slave link.
//!
//! Bytes are fed one at a time. A frame with a bad checksum is dropped and the parser goes back
//! to hunting for the header pair, so the stream resynchronizes on its own after noise or a
//! dropped byte. The link is fire-and-forget: nothing is ever requested from the slave.

use embedded_hal::serial;

use crate::protocol::frame::{checksum, Payload, HEADER_1, HEADER_2, PAYLOAD_LEN};
use crate::time::{elapsed, ms, Micros};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum State {
    AwaitHeader1,
    AwaitHeader2,
    Payload,
    Checksum,
}

/// Last good data received from the slave.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SlaveSnapshot {
    pub payload: Payload,
    /// At least one good frame has been received.
    pub valid: bool,
    pub last_update: Micros,
}

pub struct LinkReceiver {
    state: State,
    buf: [u8; PAYLOAD_LEN],
    pos: usize,
    snapshot: SlaveSnapshot,
    accepted: u32,
    rejected: u32,
}

impl LinkReceiver {
    pub fn new() -> Self {
        Self {
            state: State::AwaitHeader1,
            buf: [0; PAYLOAD_LEN],
            pos: 0,
            snapshot: SlaveSnapshot::default(),
            accepted: 0,
            rejected: 0,
        }
    }

    /// Process a single incoming byte. Returns the payload if this byte completed a valid frame.
    pub fn push(&mut self, byte: u8, now: Micros) -> Option<Payload> {
        match self.state {
            State::AwaitHeader1 => {
                if byte == HEADER_1 {
                    self.state = State::AwaitHeader2;
                }
            }
            State::AwaitHeader2 => {
                if byte == HEADER_2 {
                    self.pos = 0;
                    self.state = State::Payload;
                } else {
                    // No backtracking: this byte is not reconsidered as a header 1
                    self.state = State::AwaitHeader1;
                }
            }
            State::Payload => {
                self.buf[self.pos] = byte;
                self.pos += 1;
                if self.pos >= PAYLOAD_LEN {
                    self.state = State::Checksum;
                }
            }
            State::Checksum => {
                self.reset();

                let expected = checksum(&self.buf);
                if byte == expected {
                    let payload = Payload::decode(&self.buf);
                    self.snapshot = SlaveSnapshot {
                        payload,
                        valid: true,
                        last_update: now,
                    };
                    self.accepted = self.accepted.wrapping_add(1);
                    return Some(payload);
                }

                self.rejected = self.rejected.wrapping_add(1);
                log::debug!(
                    "link: checksum mismatch (expected {:#04x}, got {:#04x}), {} rejected",
                    expected,
                    byte,
                    self.rejected
                );
            }
        }
        None
    }

    /// Drain every byte the UART has ready without blocking.
    ///
    /// A receive error (overrun, framing, noise) means bytes were lost, so the partial frame is
    /// discarded. Returns the last payload completed during this call.
    pub fn poll<R: serial::Read<u8>>(&mut self, rx: &mut R, now: Micros) -> Option<Payload> {
        let mut latest = None;
        loop {
            match rx.read() {
                Ok(byte) => {
                    if let Some(p) = self.push(byte, now) {
                        latest = Some(p);
                    }
                }
                Err(nb::Error::WouldBlock) => break,
                Err(nb::Error::Other(_)) => {
                    log::debug!("link: uart error, resync");
                    self.reset();
                }
            }
        }
        latest
    }

    fn reset(&mut self) {
        self.state = State::AwaitHeader1;
        self.pos = 0;
    }

    /// True if a good frame arrived within `timeout_ms`.
    pub fn is_alive(&self, timeout_ms: u32, now: Micros) -> bool {
        self.snapshot.valid && elapsed(self.snapshot.last_update, now) <= ms(timeout_ms as u64)
    }

    #[inline]
    pub fn snapshot(&self) -> SlaveSnapshot {
        self.snapshot
    }

    /// Frames that passed the checksum.
    #[inline]
    pub fn accepted_frames(&self) -> u32 {
        self.accepted
    }

    /// Frames dropped on checksum mismatch.
    #[inline]
    pub fn rejected_frames(&self) -> u32 {
        self.rejected
    }
}

impl Default for LinkReceiver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::frame::encode_frame;
    use crate::testing::FakeSerial;

    const REFERENCE_BYTES: [u8; 13] = [
        0xAA, 0x55, 0x01, 0x00, 0x00, 0x64, 0x00, 0xC8, 0x01, 0x2C, 0x01, 0x90, 0xEB,
    ];

    fn feed(rx: &mut LinkReceiver, bytes: &[u8], now: Micros) -> Option<Payload> {
        let mut out = None;
        for &b in bytes {
            if let Some(p) = rx.push(b, now) {
                out = Some(p);
            }
        }
        out
    }

    #[test]
    fn decodes_reference_frame() {
        let mut rx = LinkReceiver::new();
        assert!(!rx.snapshot().valid);

        let p = feed(&mut rx, &REFERENCE_BYTES, 42).unwrap();
        assert_eq!(p.arcade_mask, 0x01);
        assert_eq!(p.normal_mask, 0x00);
        assert_eq!(p.pots, [100, 200, 300, 400]);

        let snap = rx.snapshot();
        assert!(snap.valid);
        assert_eq!(snap.last_update, 42);
        assert_eq!(snap.payload, p);
        assert_eq!(rx.accepted_frames(), 1);
    }

    #[test]
    fn corrupt_frame_then_good_frame_resyncs() {
        let mut rx = LinkReceiver::new();
        let mut bad = REFERENCE_BYTES;
        bad[6] ^= 0x10;

        assert_eq!(feed(&mut rx, &bad, 0), None);
        assert_eq!(rx.rejected_frames(), 1);
        assert!(!rx.snapshot().valid);

        assert!(feed(&mut rx, &REFERENCE_BYTES, 10).is_some());
        assert_eq!(rx.snapshot().payload.pots[1], 200);
    }

    #[test]
    fn truncated_frame_costs_only_the_next_frame() {
        let mut rx = LinkReceiver::new();
        // Slave reset mid-frame: the next frame's bytes complete the stale payload
        feed(&mut rx, &REFERENCE_BYTES[..6], 0);
        assert_eq!(feed(&mut rx, &REFERENCE_BYTES, 0), None);
        assert_eq!(rx.rejected_frames(), 1);

        let mut stream = [0u8; 13 * 4];
        for chunk in stream.chunks_mut(13) {
            chunk.copy_from_slice(&REFERENCE_BYTES);
        }
        feed(&mut rx, &stream, 0);
        assert_eq!(rx.accepted_frames(), 4);
    }

    #[test]
    fn garbage_before_header_is_skipped() {
        let mut rx = LinkReceiver::new();
        feed(&mut rx, &[0x00, 0x13, 0x55, 0xFE], 0);
        assert!(feed(&mut rx, &REFERENCE_BYTES, 0).is_some());
    }

    #[test]
    fn no_backtracking_on_second_header() {
        let mut rx = LinkReceiver::new();
        // AA AA 55 ...: the second AA fails as header 2 and is not reconsidered
        let mut bytes = [0u8; 14];
        bytes[0] = 0xAA;
        bytes[1..].copy_from_slice(&REFERENCE_BYTES);
        assert_eq!(feed(&mut rx, &bytes, 0), None);
        assert_eq!(rx.accepted_frames(), 0);

        // Parser is not locked up
        assert!(feed(&mut rx, &REFERENCE_BYTES, 0).is_some());
    }

    #[test]
    fn liveness_follows_last_good_frame() {
        let mut rx = LinkReceiver::new();
        assert!(!rx.is_alive(100, 0));

        feed(&mut rx, &REFERENCE_BYTES, 1_000_000);
        assert!(rx.is_alive(100, 1_000_000));
        assert!(rx.is_alive(100, 1_100_000));
        assert!(!rx.is_alive(100, 1_100_001));

        // Bad frames do not refresh liveness
        let mut bad = REFERENCE_BYTES;
        bad[12] = 0;
        feed(&mut rx, &bad, 1_050_000);
        assert!(!rx.is_alive(100, 1_100_001));
    }

    #[test]
    fn polls_serial_until_empty() {
        let p = Payload {
            arcade_mask: 0x0F,
            normal_mask: 0x03,
            pots: [1, 2, 3, 4],
        };
        let mut bytes = std::vec::Vec::new();
        bytes.extend_from_slice(&REFERENCE_BYTES);
        bytes.extend_from_slice(&encode_frame(&p));
        bytes.extend_from_slice(&[0xAA, 0x55, 0x01]);

        let mut uart = FakeSerial::with_rx(&bytes);
        let mut rx = LinkReceiver::new();
        assert_eq!(rx.poll(&mut uart, 7), Some(p));
        assert_eq!(rx.accepted_frames(), 2);
        assert_eq!(rx.poll(&mut uart, 8), None);
    }

    #[test]
    fn uart_error_drops_partial_frame() {
        let p = Payload {
            arcade_mask: 0x02,
            normal_mask: 0x00,
            pots: [10, 20, 30, 40],
        };
        // Half a frame, then an overrun, then a complete frame
        let mut bytes = std::vec::Vec::new();
        bytes.extend_from_slice(&REFERENCE_BYTES[..7]);
        bytes.extend_from_slice(&encode_frame(&p));

        let mut uart = FakeSerial::with_rx(&bytes);
        uart.rx_error_at = Some(7);
        let mut rx = LinkReceiver::new();

        assert_eq!(rx.poll(&mut uart, 3), Some(p));
        assert_eq!(rx.accepted_frames(), 1);
        // The stale partial payload was not completed by the next frame's bytes
        assert_eq!(rx.rejected_frames(), 0);
        assert_eq!(rx.snapshot().payload, p);
    }
}
