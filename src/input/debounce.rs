// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Time-based button debouncing.
//!
//! A raw reading is only trusted once it has held the same level for the debounce window. Unlike
//! a counter-based debouncer this does not depend on how often the main loop runs.

use embedded_hal::digital::v2::InputPin;

use crate::config::{DEBOUNCE_WINDOW, NUM_ARCADE_BUTTONS, NUM_BUTTONS, NUM_NORMAL_BUTTONS};
use crate::time::{elapsed, Micros};

/// Debounce filter for a single boolean input.
#[derive(Copy, Clone, Debug)]
pub struct Debouncer {
    stable: bool,
    last_raw: bool,
    last_change: Micros,
    window: Micros,
}

impl Debouncer {
    /// Create a debouncer seeded with `initial` as both the raw and stable level.
    pub fn new(initial: bool, now: Micros) -> Self {
        Self {
            stable: initial,
            last_raw: initial,
            last_change: now,
            window: DEBOUNCE_WINDOW,
        }
    }

    /// Override the debounce window.
    pub fn with_window(mut self, window: Micros) -> Self {
        self.window = window;
        self
    }

    /// Feed one raw sample.
    pub fn update(&mut self, raw: bool, now: Micros) {
        if raw != self.last_raw {
            // Raw edge restarts the window
            self.last_raw = raw;
            self.last_change = now;
        } else if elapsed(self.last_change, now) >= self.window && self.stable != raw {
            self.stable = raw;
        }
    }

    /// Debounced level.
    #[inline]
    pub fn stable(&self) -> bool {
        self.stable
    }
}

/// Logical button on the slave. Arcade buttons come first, then the normal ones.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ButtonId {
    Arcade(u8),
    Normal(u8),
}

impl ButtonId {
    /// Index into the bank, or `None` if the button number is out of range.
    pub fn index(self) -> Option<usize> {
        match self {
            ButtonId::Arcade(n) if (n as usize) < NUM_ARCADE_BUTTONS => Some(n as usize),
            ButtonId::Normal(n) if (n as usize) < NUM_NORMAL_BUTTONS => {
                Some(NUM_ARCADE_BUTTONS + n as usize)
            }
            _ => None,
        }
    }
}

/// The slave's button array: active-low inputs with pull-ups, one debouncer each.
pub struct ButtonBank<P> {
    pins: [P; NUM_BUTTONS],
    buttons: [Debouncer; NUM_BUTTONS],
}

impl<P: InputPin> ButtonBank<P> {
    /// Take ownership of the pins and seed every debouncer from the current level, so a button
    /// held during reset reads as pressed straight away.
    pub fn new(pins: [P; NUM_BUTTONS], now: Micros) -> Self {
        let mut buttons = [Debouncer::new(false, now); NUM_BUTTONS];
        for (button, pin) in buttons.iter_mut().zip(pins.iter()) {
            *button = Debouncer::new(Self::sample(pin), now);
        }
        Self { pins, buttons }
    }

    /// Override the debounce window for every button.
    pub fn with_window(mut self, window: Micros) -> Self {
        for b in self.buttons.iter_mut() {
            *b = b.with_window(window);
        }
        self
    }

    // Buttons short to ground; a pin error reads as released.
    fn sample(pin: &P) -> bool {
        matches!(pin.is_low(), Ok(true))
    }

    /// Sample every pin once.
    pub fn update(&mut self, now: Micros) {
        for (button, pin) in self.buttons.iter_mut().zip(self.pins.iter()) {
            button.update(Self::sample(pin), now);
        }
    }

    /// Bits 0..3 = arcade buttons.
    pub fn arcade_mask(&self) -> u8 {
        mask(&self.buttons[..NUM_ARCADE_BUTTONS])
    }

    /// Bits 0..3 = normal buttons.
    pub fn normal_mask(&self) -> u8 {
        mask(&self.buttons[NUM_ARCADE_BUTTONS..])
    }

    /// Arcade buttons in the low nibble, normal buttons in the high nibble.
    pub fn all_mask(&self) -> u8 {
        self.arcade_mask() | (self.normal_mask() << 4)
    }

    pub fn is_pressed(&self, id: ButtonId) -> bool {
        id.index()
            .map(|i| self.buttons[i].stable())
            .unwrap_or(false)
    }

    pub fn free(self) -> [P; NUM_BUTTONS] {
        self.pins
    }
}

fn mask(buttons: &[Debouncer]) -> u8 {
    buttons
        .iter()
        .enumerate()
        .filter(|(_, b)| b.stable())
        .fold(0, |m, (i, _)| m | (1 << i))
}
