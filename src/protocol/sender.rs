// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Slave-side periodic frame transmitter.
//!
//! The sender runs on its own 5 ms cadence, independent of the pot sweep. A frame may therefore
//! carry pot values from the previous sweep; the master only ever needs the latest value.

use embedded_hal::serial;
use nb::block;

use crate::config::LINK_SEND_PERIOD;
use crate::protocol::frame::{encode_frame, Payload};
use crate::time::{elapsed, Micros};

pub struct LinkSender {
    period: Micros,
    last_send: Option<Micros>,
    last_payload: Payload,
    sent: u32,
}

impl LinkSender {
    pub fn new() -> Self {
        Self {
            period: LINK_SEND_PERIOD,
            last_send: None,
            last_payload: Payload::default(),
            sent: 0,
        }
    }

    /// Override the transmit period.
    pub fn with_period(mut self, period: Micros) -> Self {
        self.period = period;
        self
    }

    /// True if a frame is due at `now`.
    pub fn is_due(&self, now: Micros) -> bool {
        match self.last_send {
            None => true,
            Some(t) => elapsed(t, now) >= self.period,
        }
    }

    /// Send `payload` if the period has elapsed.
    ///
    /// `snapshot` is only called when a frame is actually due. Returns `Ok(true)` if a frame went
    /// out.
    pub fn task<W, F>(&mut self, now: Micros, tx: &mut W, snapshot: F) -> Result<bool, W::Error>
    where
        W: serial::Write<u8>,
        F: FnOnce() -> Payload,
    {
        if !self.is_due(now) {
            return Ok(false);
        }
        self.last_send = Some(now);
        self.send(tx, snapshot())?;
        Ok(true)
    }

    /// Encode and write one frame immediately, ignoring the cadence.
    pub fn send<W>(&mut self, tx: &mut W, payload: Payload) -> Result<(), W::Error>
    where
        W: serial::Write<u8>,
    {
        // 13 bytes at 115200 baud is ~1.1 ms; the FIFO absorbs most of it
        for b in encode_frame(&payload) {
            block!(tx.write(b))?;
        }
        self.last_payload = payload;
        self.sent = self.sent.wrapping_add(1);
        Ok(())
    }

    /// Payload of the most recent frame.
    #[inline]
    pub fn last_payload(&self) -> Payload {
        self.last_payload
    }

    #[inline]
    pub fn frames_sent(&self) -> u32 {
        self.sent
    }
}

impl Default for LinkSender {
    fn default() -> Self {
        Self::new()
    }
}
