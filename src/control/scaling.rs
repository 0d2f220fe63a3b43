// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Raw sensor values to 7-bit MIDI data.

use crate::config::{ULTRA_FAR_CM, ULTRA_NEAR_CM};

/// Largest 7-bit data value.
pub const CC_MAX: u8 = 127;

/// Scale `value` from `0..=max_raw` onto `0..=127`, saturating above `max_raw`.
///
/// Integer math truncates, so the top value is only reached at `max_raw` itself.
pub fn scale_to_cc(value: u16, max_raw: u16) -> u8 {
    if max_raw == 0 {
        return 0;
    }
    let v = value.min(max_raw) as u32;
    (v * CC_MAX as u32 / max_raw as u32) as u8
}

/// Map a hand distance onto `0..=127`, closest = 127.
pub fn distance_to_cc(cm: f32) -> u8 {
    let cm = cm.clamp(ULTRA_NEAR_CM, ULTRA_FAR_CM);
    let x = (ULTRA_FAR_CM - cm) / (ULTRA_FAR_CM - ULTRA_NEAR_CM);
    (x * CC_MAX as f32 + 0.5) as u8
}
