// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! `log` backend on the debug USART.
//!
//! Records are written synchronously inside a critical section, one line each:
//!
//! ```text
//! [WARN distrit_ctrl::node::master] link: slave lost (812 ok, 3 bad)
//! ```

use core::cell::RefCell;
use core::fmt::Write;

use cortex_m::interrupt::{self, Mutex};
use log::{LevelFilter, Log, Metadata, Record};
use stm32f7xx_hal::pac::USART3;

use crate::hw::Usart;

static LOGGER: UsartLogger = UsartLogger {
    port: Mutex::new(RefCell::new(None)),
};

pub struct UsartLogger {
    port: Mutex<RefCell<Option<Usart<USART3>>>>,
}

impl Log for UsartLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        interrupt::free(|cs| {
            if let Some(port) = self.port.borrow(cs).borrow_mut().as_mut() {
                let _ = write!(
                    port,
                    "[{} {}] {}\r\n",
                    record.level(),
                    record.target(),
                    record.args()
                );
            }
        });
    }

    fn flush(&self) {
        interrupt::free(|cs| {
            if let Some(port) = self.port.borrow(cs).borrow_mut().as_mut() {
                port.flush();
            }
        });
    }
}

/// Install the debug port as the global logger. Only the first call has any effect.
pub fn init(port: Usart<USART3>, level: LevelFilter) {
    interrupt::free(|cs| {
        LOGGER.port.borrow(cs).replace(Some(port));
    });
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
