// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Tempo estimation from MIDI timing clock.
//!
//! Ticks are grouped into windows of one quarter note (24 ticks). Each completed window yields an
//! instantaneous BPM which is folded into an exponentially smoothed value. Windows that are too
//! short or too long to be a real quarter note (jitter bursts, a paused clock) are dropped but
//! still restart the window.

use crate::config::{
    CLOCK_PRESENT, TEMPO_MAX_BPM, TEMPO_MAX_WINDOW, TEMPO_MIN_BPM, TEMPO_MIN_WINDOW, TEMPO_STALE,
    TICKS_PER_QUARTER,
};
use crate::time::{elapsed, Micros};

const US_PER_MINUTE: f32 = 60_000_000.0;

/// Weight of the previous estimate in the exponential average.
const SMOOTHING: f32 = 0.7;

pub struct TempoEstimator {
    /// Smoothed BPM, `None` until the first plausible window.
    smoothed: Option<f32>,
    ticks_in_window: u8,
    window_start: Option<Micros>,
    last_tick: Option<Micros>,
}

impl TempoEstimator {
    pub fn new() -> Self {
        Self {
            smoothed: None,
            ticks_in_window: 0,
            window_start: None,
            last_tick: None,
        }
    }

    /// Drop the partial window. The smoothed tempo is kept so the display does not blank.
    pub fn reset(&mut self) {
        self.ticks_in_window = 0;
        self.window_start = None;
    }

    /// Feed one timing clock tick.
    pub fn on_tick(&mut self, now: Micros) {
        self.last_tick = Some(now);

        let Some(start) = self.window_start else {
            self.window_start = Some(now);
            self.ticks_in_window = 0;
            return;
        };

        self.ticks_in_window += 1;
        if self.ticks_in_window < TICKS_PER_QUARTER {
            return;
        }

        let window = elapsed(start, now);
        if (TEMPO_MIN_WINDOW..=TEMPO_MAX_WINDOW).contains(&window) {
            let instant = US_PER_MINUTE / window as f32;
            let next = match self.smoothed {
                Some(prev) => SMOOTHING * prev + (1.0 - SMOOTHING) * instant,
                None => instant,
            };
            self.smoothed = Some(next.clamp(TEMPO_MIN_BPM, TEMPO_MAX_BPM));
        } else {
            log::debug!("tempo: dropped {} us window", window);
        }

        self.window_start = Some(now);
        self.ticks_in_window = 0;
    }

    fn since_last_tick(&self, now: Micros) -> Option<Micros> {
        self.last_tick.map(|t| elapsed(t, now))
    }

    /// Rounded BPM, or 0 when no estimate exists or the clock went quiet.
    pub fn tempo(&self, now: Micros) -> u16 {
        match (self.since_last_tick(now), self.smoothed) {
            (Some(dt), Some(bpm)) if dt <= TEMPO_STALE => (bpm + 0.5) as u16,
            _ => 0,
        }
    }

    /// Unrounded smoothed estimate, ignoring staleness.
    #[inline]
    pub fn smoothed(&self) -> Option<f32> {
        self.smoothed
    }

    /// True if a tick arrived recently.
    pub fn has_clock(&self, now: Micros) -> bool {
        matches!(self.since_last_tick(now), Some(dt) if dt <= CLOCK_PRESENT)
    }
}

impl Default for TempoEstimator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tick interval for a given BPM, in microseconds.
    fn interval(bpm: u64) -> u64 {
        60_000_000 / (bpm * 24)
    }

    /// Feed `quarters` full windows starting at `t`, returns the time of the last tick.
    fn run(est: &mut TempoEstimator, t: u64, bpm: u64, quarters: usize) -> u64 {
        let dt = interval(bpm);
        let mut now = t;
        for _ in 0..quarters * 24 {
            now += dt;
            est.on_tick(now);
        }
        now
    }

    #[test]
    fn first_tick_only_opens_a_window() {
        let mut est = TempoEstimator::new();
        est.on_tick(0);
        assert!(est.has_clock(0));
        assert_eq!(est.tempo(0), 0);
        assert_eq!(est.smoothed(), None);
    }

    #[test]
    fn steady_120() {
        let mut est = TempoEstimator::new();
        est.on_tick(0);
        let t = run(&mut est, 0, 120, 1);
        assert_eq!(est.tempo(t), 120);

        let t = run(&mut est, t, 120, 8);
        assert_eq!(est.tempo(t), 120);
    }

    #[test]
    fn converges_after_tempo_change() {
        let mut est = TempoEstimator::new();
        est.on_tick(0);
        let t = run(&mut est, 0, 120, 4);

        // One window in, the estimate only moves 30% of the way
        let t = run(&mut est, t, 60, 1);
        assert_eq!(est.tempo(t), 102);

        let t = run(&mut est, t, 60, 20);
        assert_eq!(est.tempo(t), 60);
    }

    #[test]
    fn implausible_windows_are_ignored() {
        let mut est = TempoEstimator::new();
        est.on_tick(0);
        // 24 ticks in 24 ms is 2500 BPM
        for i in 1..=48 {
            est.on_tick(i * 1_000);
        }
        assert!(est.has_clock(48_000));
        assert_eq!(est.tempo(48_000), 0);

        // A good window right after still counts
        let t = run(&mut est, 48_000, 100, 1);
        assert_eq!(est.tempo(t), 100);
    }

    #[test]
    fn clamps_to_range() {
        let mut est = TempoEstimator::new();
        est.on_tick(0);
        // 30 BPM: 2 s windows are still plausible but below the floor
        let t = run(&mut est, 0, 30, 1);
        assert_eq!(est.tempo(t), 40);
    }

    #[test]
    fn goes_stale() {
        let mut est = TempoEstimator::new();
        est.on_tick(0);
        let t = run(&mut est, 0, 120, 2);

        assert!(est.has_clock(t + 500_000));
        assert!(!est.has_clock(t + 500_001));
        assert_eq!(est.tempo(t + 1_000_000), 120);
        assert_eq!(est.tempo(t + 1_000_001), 0);
    }

    #[test]
    fn reset_discards_partial_window() {
        let mut est = TempoEstimator::new();
        est.on_tick(0);
        let t = run(&mut est, 0, 120, 1);

        // Half a window, then the clock restarts after a long pause
        let mut now = t;
        for _ in 0..12 {
            now += interval(120);
            est.on_tick(now);
        }
        est.reset();

        let restart = now + 5_000_000;
        est.on_tick(restart);
        let t = run(&mut est, restart, 120, 1);
        assert_eq!(est.tempo(t), 120);
    }
}
