// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Basic ADC support for STM32F7 using direct PAC register access.
//!
//! Blocking single-channel reads on ADC1, used for the master's faders. A conversion with the
//! long sample time takes a few microseconds, well inside one loop pass.
//!
//! Example:
//! ```ignore
//! let adc = Adc::adc1(dp.ADC1);
//! let value = adc.read(3);
//! ```

use stm32f7xx_hal::pac;

use crate::config::NUM_FADERS;

/// ADC1 channels wired to the faders: PA3 (IN3), PC0 (IN10), PC3 (IN13).
pub const FADER_CHANNELS: [u8; NUM_FADERS] = [3, 10, 13];

/// ADC wrapper over a PAC ADCx peripheral.
pub struct Adc<ADC> {
    adc: ADC,
}

impl<ADC> Adc<ADC> {
    #[inline]
    pub fn free(self) -> ADC {
        self.adc
    }
}

fn configure_common() {
    let common = unsafe { &*pac::ADC_COMMON::ptr() };

    // ADC prescaler: PCLK2 / 4
    common.ccr.modify(|_, w| w.adcpre().div4());
}

fn init_basic_adc(adc: &pac::adc1::RegisterBlock) {
    // Power off to configure
    adc.cr2.modify(|_, w| w.adon().clear_bit());

    // 12-bit, right-aligned, software trigger
    adc.cr1.modify(|_, w| w.res().bits(0b00));
    adc.cr2.modify(|_, w| {
        w.cont().clear_bit();
        w.align().right();
        w.exten().disabled();
        w
    });

    // Longest sample time on every channel; fader wipers are high impedance
    adc.smpr1.write(|w| unsafe { w.bits(0x07FF_FFFF) });
    adc.smpr2.write(|w| unsafe { w.bits(0x3FFF_FFFF) });

    // Sequence length = 1 conversion
    adc.sqr1.modify(|_, w| w.l().bits(0));

    // Power on
    adc.cr2.modify(|_, w| w.adon().set_bit());
}

impl Adc<pac::ADC1> {
    /// Create and initialize ADC1.
    pub fn adc1(adc1: pac::ADC1) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb2enr.modify(|_, w| w.adc1en().set_bit());

        configure_common();
        init_basic_adc(&adc1);

        Self { adc: adc1 }
    }

    /// Read a single channel, 0..4095.
    pub fn read(&self, channel: u8) -> u16 {
        let adc = &self.adc;

        adc.sqr3
            .modify(|_, w| unsafe { w.sq1().bits(channel & 0x1F) });

        // Start
        adc.cr2.modify(|_, w| w.swstart().set_bit());

        // Wait for completion
        while adc.sr.read().eoc().bit_is_clear() {}

        adc.dr.read().data().bits() as u16
    }

    /// One reading per fader, in fader order.
    pub fn read_faders(&self) -> [u16; NUM_FADERS] {
        FADER_CHANNELS.map(|ch| self.read(ch))
    }
}
