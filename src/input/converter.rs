// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Non-blocking round-robin over a single multiplexed ADC.
//!
//! External converters like the ADS1115 have one conversion engine behind an input multiplexer.
//! [`MultiplexedConverter`] starts a conversion, returns, and only reads the result once the
//! settle time has passed on a later poll. Channels are serviced in order `0, 1, .., N-1`, then
//! the converter goes idle and the next poll begins a new sweep.
//!
//! Typical usage pattern:
//!
//! ```ignore
//! loop {
//!     let now = timer.now_us();
//!     pots.poll(now);
//!     let p0 = pots.get_12bit(0);
//! }
//! ```

use core::fmt::Debug;

use crate::config::CONVERSION_SETTLE;
use crate::time::{elapsed, Micros};

/// Hardware seam for a converter with a selectable input.
pub trait ConversionDevice {
    type Error: Debug;

    /// Select `channel` and start a single-shot conversion.
    fn start_conversion(&mut self, channel: usize) -> Result<(), Self::Error>;

    /// Read the most recent conversion result (16-bit two's complement).
    fn read_conversion(&mut self) -> Result<i16, Self::Error>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum State {
    Idle,
    /// `ok` is false when the start request never reached the device.
    Converting {
        channel: usize,
        started: Micros,
        ok: bool,
    },
}

/// Scheduler that keeps exactly one conversion in flight on `N` channels.
pub struct MultiplexedConverter<D, const N: usize> {
    device: D,
    state: State,
    raw: [i16; N],
    settle: Micros,
    sweeps: u32,
}

impl<D: ConversionDevice, const N: usize> MultiplexedConverter<D, N> {
    pub fn new(device: D) -> Self {
        Self {
            device,
            state: State::Idle,
            raw: [0; N],
            settle: CONVERSION_SETTLE,
            sweeps: 0,
        }
    }

    /// Override the settle time between starting and reading a conversion.
    pub fn with_settle_time(mut self, settle: Micros) -> Self {
        self.settle = settle;
        self
    }

    /// Advance the state machine. Never waits on the converter.
    pub fn poll(&mut self, now: Micros) {
        match self.state {
            State::Idle => self.start(0, now),

            State::Converting {
                channel,
                started,
                ok,
            } => {
                if elapsed(started, now) < self.settle {
                    return;
                }

                // A failed start leaves the previous channel's result in the device
                if ok {
                    match self.device.read_conversion() {
                        Ok(value) => self.raw[channel] = value,
                        // Keep last good value, try again next sweep
                        Err(e) => log::warn!("adc ch{} read failed: {:?}", channel, e),
                    }
                }

                if channel + 1 < N {
                    self.start(channel + 1, now);
                } else {
                    self.state = State::Idle;
                    self.sweeps = self.sweeps.wrapping_add(1);
                }
            }
        }
    }

    fn start(&mut self, channel: usize, now: Micros) {
        let ok = match self.device.start_conversion(channel) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("adc ch{} start failed: {:?}", channel, e);
                false
            }
        };
        self.state = State::Converting {
            channel,
            started: now,
            ok,
        };
    }

    /// Channel whose conversion is currently running, if any.
    pub fn in_flight(&self) -> Option<usize> {
        match self.state {
            State::Idle => None,
            State::Converting { channel, .. } => Some(channel),
        }
    }

    /// Last raw signed reading for `ch`, or 0 for an unknown channel.
    pub fn get_raw(&self, ch: usize) -> i16 {
        self.raw.get(ch).copied().unwrap_or(0)
    }

    /// Reading reduced to roughly 12 bits (0..4095). Negative readings clamp to 0.
    pub fn get_12bit(&self, ch: usize) -> u16 {
        (self.get_raw(ch).max(0) as u16) >> 4
    }

    /// All channels at 12-bit resolution.
    pub fn values_12bit(&self) -> [u16; N] {
        core::array::from_fn(|ch| self.get_12bit(ch))
    }

    /// Number of completed full sweeps.
    pub fn sweeps(&self) -> u32 {
        self.sweeps
    }

    pub fn device(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn free(self) -> D {
        self.device
    }
}
