// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Monotonic time source.
//!
//! All state machines in this crate take the current time as an explicit argument, in
//! microseconds since boot. On hardware the value comes from `hw::timer::MonoTimer`; in
//! tests it is simply a number.

/// Microseconds since an arbitrary epoch (boot).
pub type Micros = u64;

/// A free-running microsecond clock.
pub trait Monotonic {
    fn now_us(&mut self) -> Micros;
}

/// Convert milliseconds to [`Micros`].
#[inline]
pub const fn ms(v: u64) -> Micros {
    v * 1_000
}

/// Time elapsed from `start` to `now`, saturating at zero if the clock went backwards.
#[inline]
pub fn elapsed(start: Micros, now: Micros) -> Micros {
    now.saturating_sub(start)
}
