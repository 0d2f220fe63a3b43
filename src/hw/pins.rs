// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the two STM32F767ZI boards.
//!
//! Both boards share the debug port and the link UART so the same cable and terminal setup works
//! on either.

use stm32f7xx_hal::{
    gpio::{
        gpioa, gpiob, gpioc, gpiod, Alternate, Analog, ErasedPin, Floating, Input, OpenDrain,
        Output, PullUp, PushPull,
    },
    pac,
    prelude::*,
};

use crate::config::{NUM_BUTTONS, NUM_ULTRASONIC};

/// USART3 on the ST-LINK virtual COM port.
pub struct Usart3Pins {
    pub tx: gpiod::PD8<Alternate<7>>,
    pub rx: gpiod::PD9<Alternate<7>>,
}

/// USART6, slave TX to master RX.
pub struct Usart6Pins {
    pub tx: gpioc::PC6<Alternate<8>>,
    pub rx: gpioc::PC7<Alternate<8>>,
}

/// USART2, MIDI DIN in and out.
pub struct Usart2Pins {
    pub tx: gpiod::PD5<Alternate<7>>,
    pub rx: gpiod::PD6<Alternate<7>>,
}

/// I2C1 to the ADS1115.
pub struct I2c1Pins {
    pub scl: gpiob::PB8<Alternate<4, OpenDrain>>,
    pub sda: gpiob::PB9<Alternate<4, OpenDrain>>,
}

/// Fader wipers on ADC1 (see `hw::adc::FADER_CHANNELS`).
pub struct FaderPins {
    pub f0: gpioa::PA3<Analog>,
    pub f1: gpioc::PC0<Analog>,
    pub f2: gpioc::PC3<Analog>,
}

pub type ButtonPin = ErasedPin<Input<PullUp>>;
pub type TrigPin = ErasedPin<Output<PushPull>>;
pub type EchoPin = ErasedPin<Input<Floating>>;

pub struct SlavePins {
    /// LD1
    pub led: gpiob::PB0<Output<PushPull>>,
    pub usart3: Usart3Pins,
    pub usart6: Usart6Pins,
    pub i2c1: I2c1Pins,
    /// PE2..PE5 arcade, PE6..PE9 normal. Active low.
    pub buttons: [ButtonPin; NUM_BUTTONS],
}

pub struct MasterPins {
    /// LD2, lit while the slave link is up.
    pub led: gpiob::PB7<Output<PushPull>>,
    pub usart3: Usart3Pins,
    pub usart6: Usart6Pins,
    pub usart2: Usart2Pins,
    pub faders: FaderPins,
    /// (trigger, echo): PF12/PF14 and PF13/PF15.
    pub ultrasonic: [(TrigPin, EchoPin); NUM_ULTRASONIC],
}

impl SlavePins {
    pub fn new(gpiob: pac::GPIOB, gpioc: pac::GPIOC, gpiod: pac::GPIOD, gpioe: pac::GPIOE) -> Self {
        let gpiob = gpiob.split();
        let gpioc = gpioc.split();
        let gpiod = gpiod.split();
        let gpioe = gpioe.split();

        Self {
            led: gpiob.pb0.into_push_pull_output(),

            usart3: Usart3Pins {
                tx: gpiod.pd8.into_alternate::<7>(),
                rx: gpiod.pd9.into_alternate::<7>(),
            },

            usart6: Usart6Pins {
                tx: gpioc.pc6.into_alternate::<8>(),
                rx: gpioc.pc7.into_alternate::<8>(),
            },

            i2c1: I2c1Pins {
                scl: gpiob.pb8.into_alternate_open_drain::<4>(),
                sda: gpiob.pb9.into_alternate_open_drain::<4>(),
            },

            buttons: [
                gpioe.pe2.into_pull_up_input().erase(),
                gpioe.pe3.into_pull_up_input().erase(),
                gpioe.pe4.into_pull_up_input().erase(),
                gpioe.pe5.into_pull_up_input().erase(),
                gpioe.pe6.into_pull_up_input().erase(),
                gpioe.pe7.into_pull_up_input().erase(),
                gpioe.pe8.into_pull_up_input().erase(),
                gpioe.pe9.into_pull_up_input().erase(),
            ],
        }
    }
}

impl MasterPins {
    pub fn new(
        gpioa: pac::GPIOA,
        gpiob: pac::GPIOB,
        gpioc: pac::GPIOC,
        gpiod: pac::GPIOD,
        gpiof: pac::GPIOF,
    ) -> Self {
        let gpioa = gpioa.split();
        let gpiob = gpiob.split();
        let gpioc = gpioc.split();
        let gpiod = gpiod.split();
        let gpiof = gpiof.split();

        Self {
            led: gpiob.pb7.into_push_pull_output(),

            usart3: Usart3Pins {
                tx: gpiod.pd8.into_alternate::<7>(),
                rx: gpiod.pd9.into_alternate::<7>(),
            },

            usart6: Usart6Pins {
                tx: gpioc.pc6.into_alternate::<8>(),
                rx: gpioc.pc7.into_alternate::<8>(),
            },

            usart2: Usart2Pins {
                tx: gpiod.pd5.into_alternate::<7>(),
                rx: gpiod.pd6.into_alternate::<7>(),
            },

            faders: FaderPins {
                f0: gpioa.pa3.into_analog(),
                f1: gpioc.pc0.into_analog(),
                f2: gpioc.pc3.into_analog(),
            },

            ultrasonic: [
                (
                    gpiof.pf12.into_push_pull_output().erase(),
                    gpiof.pf14.into_floating_input().erase(),
                ),
                (
                    gpiof.pf13.into_push_pull_output().erase(),
                    gpiof.pf15.into_floating_input().erase(),
                ),
            ],
        }
    }
}
