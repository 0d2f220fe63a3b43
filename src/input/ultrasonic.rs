// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! HC-SR04 style ultrasonic ranging without blocking.
//!
//! Each sensor runs its own trigger/echo state machine:
//!
//! ```text
//! Idle --60ms--> TrigLow --2us--> TrigHigh --10us--> WaitEchoHigh --echo↑--> WaitEchoLow --echo↓--> Idle
//!                                                         |                       |
//!                                                         +------ 30ms timeout ---+--> Idle (invalid)
//! ```
//!
//! Durations are minimums, checked against the clock on every [`UltrasonicRanger::update`]. A
//! sensor moves at most one state per update, so the 10 us trigger pulse is only as accurate as
//! the loop period. The sensor tolerates a longer pulse.

use embedded_hal::digital::v2::{InputPin, OutputPin};

use crate::config::{
    ULTRA_ECHO_TIMEOUT, ULTRA_MEASUREMENT_PERIOD, ULTRA_TRIG_HIGH, ULTRA_TRIG_LOW,
};
use crate::time::{elapsed, Micros};

/// Round trip at ~343 m/s: cm per microsecond of echo, halved.
const CM_PER_US: f32 = 0.01715;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RangingState {
    Idle,
    TrigLow,
    TrigHigh,
    WaitEchoHigh,
    WaitEchoLow,
}

/// One trigger/echo pair.
pub struct Sensor<TRIG, ECHO> {
    trig: TRIG,
    echo: ECHO,
    state: RangingState,
    state_since: Micros,
    echo_start: Micros,
    distance_cm: f32,
    valid: bool,
}

impl<TRIG: OutputPin, ECHO: InputPin> Sensor<TRIG, ECHO> {
    /// Take the pins and drive the trigger low.
    pub fn new(mut trig: TRIG, echo: ECHO, now: Micros) -> Self {
        trig.set_low().ok();
        Self {
            trig,
            echo,
            state: RangingState::Idle,
            state_since: now,
            echo_start: now,
            distance_cm: 0.0,
            valid: false,
        }
    }

    fn enter(&mut self, state: RangingState, now: Micros) {
        self.state = state;
        self.state_since = now;
    }

    fn echo_high(&self) -> bool {
        matches!(self.echo.is_high(), Ok(true))
    }

    fn timeout(&mut self, now: Micros) {
        log::trace!("ultrasonic echo timeout in {:?}", self.state);
        self.valid = false;
        self.enter(RangingState::Idle, now);
    }

    /// Advance by at most one transition.
    pub fn update(&mut self, now: Micros) {
        let dt = elapsed(self.state_since, now);

        match self.state {
            RangingState::Idle => {
                if dt >= ULTRA_MEASUREMENT_PERIOD {
                    self.trig.set_low().ok();
                    self.enter(RangingState::TrigLow, now);
                }
            }

            RangingState::TrigLow => {
                if dt >= ULTRA_TRIG_LOW {
                    self.trig.set_high().ok();
                    self.enter(RangingState::TrigHigh, now);
                }
            }

            RangingState::TrigHigh => {
                if dt >= ULTRA_TRIG_HIGH {
                    self.trig.set_low().ok();
                    self.enter(RangingState::WaitEchoHigh, now);
                }
            }

            RangingState::WaitEchoHigh => {
                if self.echo_high() {
                    self.echo_start = now;
                    self.enter(RangingState::WaitEchoLow, now);
                } else if dt >= ULTRA_ECHO_TIMEOUT {
                    self.timeout(now);
                }
            }

            RangingState::WaitEchoLow => {
                if !self.echo_high() {
                    let pulse = elapsed(self.echo_start, now);
                    if pulse > 0 && pulse < ULTRA_ECHO_TIMEOUT {
                        self.distance_cm = pulse as f32 * CM_PER_US;
                        self.valid = true;
                    } else {
                        self.valid = false;
                    }
                    self.enter(RangingState::Idle, now);
                } else if dt >= ULTRA_ECHO_TIMEOUT {
                    self.timeout(now);
                }
            }
        }
    }

    #[inline]
    pub fn state(&self) -> RangingState {
        self.state
    }

    /// Last measured distance. Only meaningful while [`Sensor::is_valid`] holds.
    #[inline]
    pub fn distance_cm(&self) -> f32 {
        self.distance_cm
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Distance if the last cycle produced a good echo.
    pub fn reading(&self) -> Option<f32> {
        self.valid.then_some(self.distance_cm)
    }

    pub fn free(self) -> (TRIG, ECHO) {
        (self.trig, self.echo)
    }
}

/// A fixed set of independent sensors updated together.
pub struct UltrasonicRanger<TRIG, ECHO, const N: usize> {
    sensors: [Sensor<TRIG, ECHO>; N],
}

impl<TRIG: OutputPin, ECHO: InputPin, const N: usize> UltrasonicRanger<TRIG, ECHO, N> {
    pub fn new(pins: [(TRIG, ECHO); N], now: Micros) -> Self {
        Self {
            sensors: pins.map(|(trig, echo)| Sensor::new(trig, echo, now)),
        }
    }

    pub fn update(&mut self, now: Micros) {
        for s in self.sensors.iter_mut() {
            s.update(now);
        }
    }

    /// Distance for sensor `idx`, or `None` if invalid or out of range.
    pub fn reading(&self, idx: usize) -> Option<f32> {
        self.sensors.get(idx).and_then(Sensor::reading)
    }

    pub fn readings(&self) -> [Option<f32>; N] {
        core::array::from_fn(|i| self.sensors[i].reading())
    }

    pub fn sensor(&self, idx: usize) -> Option<&Sensor<TRIG, ECHO>> {
        self.sensors.get(idx)
    }
}
