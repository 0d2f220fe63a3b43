// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Free-running microsecond clock on TIM2.
//!
//! TIM2 is 32 bits wide, so at 1 MHz it wraps every ~71 minutes. [`MonoTimer::now_us`] extends
//! it to 64 bits in software, which only requires being called at least once per wrap. The main
//! loops call it every pass.

use stm32f7xx_hal::pac;

use crate::time::{Micros, Monotonic};

/// TIM2 input clock with the reset clock tree (16 MHz HSI, APB1 prescaler 1).
pub const TIM2_CLOCK_HZ: u32 = 16_000_000;

pub struct MonoTimer {
    tim: pac::TIM2,
    last: u32,
    wraps: u32,
}

impl MonoTimer {
    /// Start TIM2 counting up at 1 MHz from zero.
    pub fn tim2(tim2: pac::TIM2) -> Self {
        Self::tim2_with_clock(tim2, TIM2_CLOCK_HZ)
    }

    /// As [`MonoTimer::tim2`], for a non-default timer clock.
    pub fn tim2_with_clock(tim2: pac::TIM2, clock_hz: u32) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim2en().set_bit());

        let tim = tim2;

        // Disable counter while configuring
        tim.cr1.modify(|_, w| w.cen().clear_bit());

        // 1 tick per microsecond
        let psc = (clock_hz / 1_000_000).saturating_sub(1);
        tim.psc.write(|w| unsafe { w.bits(psc) });

        // Auto-reload: max 32-bit
        tim.arr.write(|w| unsafe { w.bits(0xFFFF_FFFF) });

        // Load the prescaler now instead of at the first overflow
        tim.egr.write(|w| w.ug().set_bit());

        // Reset the counter
        tim.cnt.write(|w| unsafe { w.bits(0) });

        // Enable the counter
        tim.cr1.modify(|_, w| w.cen().set_bit());

        Self {
            tim,
            last: 0,
            wraps: 0,
        }
    }

    /// Read the raw 32-bit counter value.
    #[inline]
    pub fn raw(&self) -> u32 {
        self.tim.cnt.read().bits()
    }

    /// Consume the wrapper and return the underlying timer peripheral.
    #[inline]
    pub fn free(self) -> pac::TIM2 {
        self.tim
    }
}

impl Monotonic for MonoTimer {
    fn now_us(&mut self) -> Micros {
        let raw = self.raw();
        if raw < self.last {
            self.wraps = self.wraps.wrapping_add(1);
        }
        self.last = raw;
        ((self.wraps as u64) << 32) | raw as u64
    }
}
