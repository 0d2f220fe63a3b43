// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Slave board: sample, debounce, convert, transmit.

use embedded_hal::digital::v2::InputPin;
use embedded_hal::serial;

use crate::config::{ACTIVITY_PERIOD, NUM_POTS, POT_MOVE_THRESHOLD};
use crate::input::{ButtonBank, ConversionDevice, MultiplexedConverter};
use crate::protocol::{LinkSender, Payload};
use crate::time::{elapsed, Micros};

/// Periodic check that drives the status LED: lit while any button is held or a pot moved since
/// the previous check.
pub struct ActivityMonitor {
    period: Micros,
    last_check: Micros,
    last_pots: [u16; NUM_POTS],
}

impl ActivityMonitor {
    pub fn new(now: Micros) -> Self {
        Self {
            period: ACTIVITY_PERIOD,
            last_check: now,
            last_pots: [0; NUM_POTS],
        }
    }

    pub fn with_period(mut self, period: Micros) -> Self {
        self.period = period;
        self
    }

    /// Returns the new LED state once per period, `None` in between.
    pub fn check(&mut self, now: Micros, payload: &Payload) -> Option<bool> {
        if elapsed(self.last_check, now) < self.period {
            return None;
        }
        self.last_check = now;

        let moved = payload
            .pots
            .iter()
            .zip(self.last_pots.iter())
            .any(|(&a, &b)| a.abs_diff(b) > POT_MOVE_THRESHOLD);
        self.last_pots = payload.pots;

        log::debug!(
            "slave: arcade={:#04x} normal={:#04x} pots={:?}",
            payload.arcade_mask,
            payload.normal_mask,
            payload.pots
        );

        Some(moved || payload.arcade_mask | payload.normal_mask != 0)
    }
}

pub struct SlaveNode<P, D> {
    buttons: ButtonBank<P>,
    pots: MultiplexedConverter<D, NUM_POTS>,
    sender: LinkSender,
    activity: ActivityMonitor,
}

impl<P: InputPin, D: ConversionDevice> SlaveNode<P, D> {
    pub fn new(
        buttons: ButtonBank<P>,
        pots: MultiplexedConverter<D, NUM_POTS>,
        now: Micros,
    ) -> Self {
        Self {
            buttons,
            pots,
            sender: LinkSender::new(),
            activity: ActivityMonitor::new(now),
        }
    }

    pub fn with_sender(mut self, sender: LinkSender) -> Self {
        self.sender = sender;
        self
    }

    /// One loop pass. Inputs are always refreshed before a frame is built.
    ///
    /// Returns `Ok(true)` when a frame was sent.
    pub fn tick<W>(&mut self, now: Micros, tx: &mut W) -> Result<bool, W::Error>
    where
        W: serial::Write<u8>,
    {
        self.buttons.update(now);
        self.pots.poll(now);

        let (buttons, pots) = (&self.buttons, &self.pots);
        self.sender.task(now, tx, || snapshot(buttons, pots))
    }

    /// Status LED state, once per activity period.
    pub fn poll_activity(&mut self, now: Micros) -> Option<bool> {
        let payload = self.payload();
        self.activity.check(now, &payload)
    }

    /// What a frame built now would carry.
    pub fn payload(&self) -> Payload {
        snapshot(&self.buttons, &self.pots)
    }

    pub fn buttons(&self) -> &ButtonBank<P> {
        &self.buttons
    }

    pub fn pots(&self) -> &MultiplexedConverter<D, NUM_POTS> {
        &self.pots
    }

    pub fn sender(&self) -> &LinkSender {
        &self.sender
    }
}

fn snapshot<P, D>(buttons: &ButtonBank<P>, pots: &MultiplexedConverter<D, NUM_POTS>) -> Payload
where
    P: InputPin,
    D: ConversionDevice,
{
    Payload {
        arcade_mask: buttons.arcade_mask(),
        normal_mask: buttons.normal_mask(),
        pots: pots.values_12bit(),
    }
}
