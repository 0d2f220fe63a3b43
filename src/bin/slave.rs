// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Slave board firmware: buttons and pots to the master over USART6.

#![no_main]
#![no_std]

use cortex_m_rt::entry;
use panic_halt as _;

use hal::{
    i2c::{BlockingI2c, Mode},
    pac,
    prelude::*,
    serial::{Config, Serial},
};
use stm32f7xx_hal as hal;

use distrit_ctrl::config::{LINK_BAUD, NUM_POTS};
use distrit_ctrl::drivers::Ads1115;
use distrit_ctrl::hw::{logger, pins::SlavePins, Led, MonoTimer, Usart};
use distrit_ctrl::input::{ButtonBank, MultiplexedConverter};
use distrit_ctrl::node::SlaveNode;
use distrit_ctrl::time::Monotonic;

#[entry]
fn main() -> ! {
    // Peripherals
    let dp = pac::Peripherals::take().unwrap();

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();
    let mut apb1 = rcc.apb1;

    let pins = SlavePins::new(dp.GPIOB, dp.GPIOC, dp.GPIOD, dp.GPIOE);

    // USART3 (DBG)
    let dbg_cfg = Config {
        baud_rate: 115_200.bps(),
        ..Default::default()
    };
    let dbg = Serial::new(dp.USART3, (pins.usart3.tx, pins.usart3.rx), &clocks, dbg_cfg);
    logger::init(Usart::new(dbg), log::LevelFilter::Info);

    // USART6 (link)
    let link_cfg = Config {
        baud_rate: LINK_BAUD.bps(),
        ..Default::default()
    };
    let link = Serial::new(dp.USART6, (pins.usart6.tx, pins.usart6.rx), &clocks, link_cfg);
    let mut link = Usart::new(link);

    // I2C1 (ADS1115)
    let i2c = BlockingI2c::i2c1(
        dp.I2C1,
        (pins.i2c1.scl, pins.i2c1.sda),
        Mode::fast(400.kHz()),
        &clocks,
        &mut apb1,
        50_000,
    );

    let mut timer = MonoTimer::tim2(dp.TIM2);
    let mut led = Led::active_high(pins.led);

    let now = timer.now_us();
    let buttons = ButtonBank::new(pins.buttons, now);
    let pots: MultiplexedConverter<_, NUM_POTS> = MultiplexedConverter::new(Ads1115::new(i2c));
    let mut node = SlaveNode::new(buttons, pots, now);

    log::info!("slave: running");

    loop {
        let now = timer.now_us();

        // Blocking writes to the link cannot fail on this UART
        node.tick(now, &mut link).ok();

        if let Some(active) = node.poll_activity(now) {
            led.set(active);
        }
    }
}
