// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Compile-time configuration shared by both boards.
//!
//! Timing values are defaults; components that use them also expose `with_*` builders for
//! overriding in tests or on other hardware.

use crate::time::{ms, Micros};

// ----- Channel counts -----

pub const NUM_ARCADE_BUTTONS: usize = 4;
pub const NUM_NORMAL_BUTTONS: usize = 4;
pub const NUM_BUTTONS: usize = NUM_ARCADE_BUTTONS + NUM_NORMAL_BUTTONS;

/// Potentiometers on the slave (ADS1115 AIN0..AIN3).
pub const NUM_POTS: usize = 4;

/// Faders on the master (MCU ADC).
pub const NUM_FADERS: usize = 3;

/// HC-SR04 style ultrasonic sensors on the master.
pub const NUM_ULTRASONIC: usize = 2;

// ----- Acquisition timing -----

/// A raw button reading must hold this long before it is trusted.
pub const DEBOUNCE_WINDOW: Micros = ms(5);

/// ADS1115 conversion takes ~1.16 ms at 860 SPS; wait with margin.
pub const CONVERSION_SETTLE: Micros = ms(3);

pub const ULTRA_MEASUREMENT_PERIOD: Micros = ms(60);
pub const ULTRA_TRIG_LOW: Micros = 2;
pub const ULTRA_TRIG_HIGH: Micros = 10;
/// Roughly 5 m of round trip.
pub const ULTRA_ECHO_TIMEOUT: Micros = ms(30);

// ----- Inter-board link -----

pub const LINK_BAUD: u32 = 115_200;
pub const LINK_SEND_PERIOD: Micros = ms(5);
/// Master considers the slave gone after this long without a good frame.
pub const LINK_TIMEOUT_MS: u32 = 100;

// ----- MIDI clock -----

pub const MIDI_BAUD: u32 = 31_250;
pub const TICKS_PER_QUARTER: u8 = 24;
pub const SEQ_TOTAL_STEPS: u8 = 16;
/// 24 ticks per quarter, 4 quarters per bar, 16 steps per bar.
pub const SEQ_TICKS_PER_STEP: u8 = 6;

pub const TEMPO_MIN_WINDOW: Micros = ms(200);
pub const TEMPO_MAX_WINDOW: Micros = ms(2000);
pub const TEMPO_STALE: Micros = ms(1000);
pub const CLOCK_PRESENT: Micros = ms(500);
pub const TEMPO_MIN_BPM: f32 = 40.0;
pub const TEMPO_MAX_BPM: f32 = 300.0;

// ----- MIDI mapping -----

/// Channel 1.
pub const MIDI_CHANNEL: u8 = 0;
pub const NOTE_VELOCITY: u8 = 100;

pub const ARCADE_NOTES: [u8; NUM_ARCADE_BUTTONS] = [36, 37, 38, 39];
pub const NORMAL_NOTES: [u8; NUM_NORMAL_BUTTONS] = [60, 61, 62, 63];

pub const POT_CCS: [u8; NUM_POTS] = [20, 21, 22, 23];
pub const FADER_CCS: [u8; NUM_FADERS] = [7, 10, 74];
pub const ULTRA_CCS: [u8; NUM_ULTRASONIC] = [16, 17];

/// Pots read through the ADS1115 at ±4.096 V FS top out near 1650 with a 3.3 V reference.
pub const POT_MAX_RAW: u16 = 1600;
pub const FADER_MAX_RAW: u16 = 4095;

/// Hand distance (cm) mapped onto the full CC range, nearest = 127.
pub const ULTRA_NEAR_CM: f32 = 2.0;
pub const ULTRA_FAR_CM: f32 = 60.0;

// ----- Slave diagnostics -----

/// Cadence of the activity check that drives the slave's status LED.
pub const ACTIVITY_PERIOD: Micros = ms(100);
/// Minimum 12-bit pot movement that counts as activity.
pub const POT_MOVE_THRESHOLD: u16 = 10;
