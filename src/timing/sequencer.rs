// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Clock-driven step sequencer.
//!
//! The sequencer only tracks position. What the position looks like (an LED ring, an OLED, or
//! nothing at all) is up to the [`StepIndicator`] it is given.

use crate::config::{SEQ_TICKS_PER_STEP, SEQ_TOTAL_STEPS};

/// Visual feedback for the sequencer position.
pub trait StepIndicator {
    /// `step` is now the current step (0-based).
    fn step_changed(&mut self, step: u8);

    /// Transport stopped.
    fn stopped(&mut self);
}

/// No indicator.
impl StepIndicator for () {
    fn step_changed(&mut self, _step: u8) {}
    fn stopped(&mut self) {}
}

/// Addressable RGB LED strip or ring. Pixel writes are buffered until [`PixelRing::show`].
pub trait PixelRing {
    fn len(&self) -> usize;
    fn set_pixel(&mut self, index: usize, r: u8, g: u8, b: u8);
    fn show(&mut self);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn fill(&mut self, r: u8, g: u8, b: u8) {
        for i in 0..self.len() {
            self.set_pixel(i, r, g, b);
        }
    }
}

/// Step colour on the ring.
pub const STEP_COLOR: (u8, u8, u8) = (0, 60, 0);

/// Lights exactly one pixel of a ring: the current step.
pub struct StepRing<R> {
    ring: R,
}

impl<R: PixelRing> StepRing<R> {
    pub fn new(mut ring: R) -> Self {
        ring.fill(0, 0, 0);
        ring.show();
        Self { ring }
    }

    pub fn ring(&self) -> &R {
        &self.ring
    }

    pub fn free(self) -> R {
        self.ring
    }
}

impl<R: PixelRing> StepIndicator for StepRing<R> {
    fn step_changed(&mut self, step: u8) {
        let (r, g, b) = STEP_COLOR;
        self.ring.fill(0, 0, 0);
        if (step as usize) < self.ring.len() {
            self.ring.set_pixel(step as usize, r, g, b);
        }
        self.ring.show();
    }

    fn stopped(&mut self) {
        self.ring.fill(0, 0, 0);
        self.ring.show();
    }
}

pub struct StepSequencer<I> {
    indicator: I,
    running: bool,
    step: u8,
    ticks: u8,
}

impl<I: StepIndicator> StepSequencer<I> {
    pub fn new(indicator: I) -> Self {
        Self {
            indicator,
            running: false,
            step: 0,
            ticks: 0,
        }
    }

    /// Transport start. Also used for Continue: the position always rewinds to step 0.
    pub fn on_start(&mut self) {
        self.running = true;
        self.step = 0;
        self.ticks = 0;
        self.indicator.step_changed(0);
        log::info!("sequencer: start");
    }

    /// Transport stop. The position is kept so it can still be displayed.
    pub fn on_stop(&mut self) {
        self.running = false;
        self.indicator.stopped();
        log::info!("sequencer: stop at step {}", self.step + 1);
    }

    /// Timing clock tick. Ignored while stopped.
    pub fn on_tick(&mut self) {
        if !self.running {
            return;
        }

        self.ticks += 1;
        if self.ticks >= SEQ_TICKS_PER_STEP {
            self.ticks = 0;
            self.step = (self.step + 1) % SEQ_TOTAL_STEPS;
            self.indicator.step_changed(self.step);
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current step, 0-based.
    #[inline]
    pub fn current_step(&self) -> u8 {
        self.step
    }

    #[inline]
    pub fn total_steps(&self) -> u8 {
        SEQ_TOTAL_STEPS
    }

    pub fn indicator(&self) -> &I {
        &self.indicator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 16-pixel ring that remembers what was last shown.
    #[derive(Default)]
    struct TestRing {
        pixels: [(u8, u8, u8); 16],
        shown: [(u8, u8, u8); 16],
        shows: usize,
    }

    impl PixelRing for TestRing {
        fn len(&self) -> usize {
            self.pixels.len()
        }

        fn set_pixel(&mut self, index: usize, r: u8, g: u8, b: u8) {
            self.pixels[index] = (r, g, b);
        }

        fn show(&mut self) {
            self.shown = self.pixels;
            self.shows += 1;
        }
    }

    impl TestRing {
        fn lit(&self) -> Vec<usize> {
            (0..16).filter(|&i| self.shown[i] != (0, 0, 0)).collect()
        }
    }

    #[test]
    fn six_ticks_per_step() {
        let mut seq = StepSequencer::new(());
        seq.on_start();
        assert!(seq.is_running());
        assert_eq!(seq.current_step(), 0);

        for _ in 0..5 {
            seq.on_tick();
        }
        assert_eq!(seq.current_step(), 0);
        seq.on_tick();
        assert_eq!(seq.current_step(), 1);
    }

    #[test]
    fn wraps_after_one_bar() {
        let mut seq = StepSequencer::new(());
        seq.on_start();
        for _ in 0..95 {
            seq.on_tick();
        }
        assert_eq!(seq.current_step(), 15);
        seq.on_tick();
        assert_eq!(seq.current_step(), 0);
    }

    #[test]
    fn ticks_while_stopped_do_nothing() {
        let mut seq = StepSequencer::new(());
        for _ in 0..12 {
            seq.on_tick();
        }
        assert_eq!(seq.current_step(), 0);

        seq.on_start();
        for _ in 0..18 {
            seq.on_tick();
        }
        seq.on_stop();
        assert!(!seq.is_running());
        for _ in 0..30 {
            seq.on_tick();
        }
        assert_eq!(seq.current_step(), 3);

        // Start rewinds
        seq.on_start();
        assert_eq!(seq.current_step(), 0);
    }

    #[test]
    fn ring_lights_current_step_only() {
        let mut seq = StepSequencer::new(StepRing::new(TestRing::default()));
        assert!(seq.indicator().ring().lit().is_empty());

        seq.on_start();
        assert_eq!(seq.indicator().ring().lit(), vec![0]);
        assert_eq!(seq.indicator().ring().shown[0], STEP_COLOR);

        for _ in 0..6 * 5 {
            seq.on_tick();
        }
        assert_eq!(seq.indicator().ring().lit(), vec![5]);

        seq.on_stop();
        assert!(seq.indicator().ring().lit().is_empty());
    }

    #[test]
    fn ring_is_only_refreshed_on_step_changes() {
        let mut seq = StepSequencer::new(StepRing::new(TestRing::default()));
        seq.on_start();
        let before = seq.indicator().ring().shows;
        for _ in 0..5 {
            seq.on_tick();
        }
        assert_eq!(seq.indicator().ring().shows, before);
        seq.on_tick();
        assert_eq!(seq.indicator().ring().shows, before + 1);
    }
}
