// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Master board firmware: slave link, faders, ultrasonic sensors and MIDI clock in, MIDI out.

#![no_main]
#![no_std]

use cortex_m_rt::entry;
use embedded_hal::serial::Read;
use panic_halt as _;

use hal::{
    pac,
    prelude::*,
    serial::{Config, Serial},
};
use stm32f7xx_hal as hal;

use distrit_ctrl::config::{LINK_BAUD, MIDI_BAUD};
use distrit_ctrl::hw::{logger, pins::MasterPins, Adc, Led, MonoTimer, Usart};
use distrit_ctrl::input::UltrasonicRanger;
use distrit_ctrl::node::MasterNode;
use distrit_ctrl::time::{elapsed, ms, Monotonic};

#[entry]
fn main() -> ! {
    // Peripherals
    let dp = pac::Peripherals::take().unwrap();

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();

    let pins = MasterPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOC, dp.GPIOD, dp.GPIOF);

    // USART3 (DBG)
    let dbg_cfg = Config {
        baud_rate: 115_200.bps(),
        ..Default::default()
    };
    let dbg = Serial::new(dp.USART3, (pins.usart3.tx, pins.usart3.rx), &clocks, dbg_cfg);
    logger::init(Usart::new(dbg), log::LevelFilter::Info);

    // USART6 (link, receive only)
    let link_cfg = Config {
        baud_rate: LINK_BAUD.bps(),
        ..Default::default()
    };
    let link = Serial::new(dp.USART6, (pins.usart6.tx, pins.usart6.rx), &clocks, link_cfg);
    let (_, mut link_rx) = Usart::split(link);

    // USART2 (MIDI DIN)
    let midi_cfg = Config {
        baud_rate: MIDI_BAUD.bps(),
        ..Default::default()
    };
    let midi = Serial::new(dp.USART2, (pins.usart2.tx, pins.usart2.rx), &clocks, midi_cfg);
    let (mut midi_out, mut midi_in) = Usart::split(midi);

    // ADC1 (faders)
    let _fader_pins = pins.faders;
    let adc = Adc::adc1(dp.ADC1);

    let mut timer = MonoTimer::tim2(dp.TIM2);
    let mut led = Led::active_high(pins.led);

    let now = timer.now_us();
    let rangers = UltrasonicRanger::new(pins.ultrasonic, now);
    let mut node = MasterNode::new(rangers, ());

    let mut last_status = now;

    log::info!("master: running");

    loop {
        let now = timer.now_us();

        // Clock first so ticks are timestamped as close to arrival as possible
        while let Ok(byte) = midi_in.read() {
            node.on_midi_byte(byte, now);
        }

        let faders = adc.read_faders();
        node.tick(now, &mut link_rx, faders, &mut midi_out);

        let status = node.status(now);
        led.set(status.link_up);

        if elapsed(last_status, now) >= ms(1000) {
            last_status = now;
            log::debug!("master: {:?}", status);
        }
    }
}
