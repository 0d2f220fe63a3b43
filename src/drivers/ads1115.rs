// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! TI ADS1115 16-bit I2C ADC.
//!
//! This module handles register access and single-shot conversion for the four single-ended
//! inputs (AINx vs GND). Scheduling across channels lives in
//! [`crate::input::MultiplexedConverter`], which drives this driver through
//! [`ConversionDevice`].
//!
//! Wiring on the slave board:
//! - ADDR to GND (address 0x48)
//! - AIN0..AIN3: potentiometer wipers, pots referenced to 3.3 V

use embedded_hal::blocking::i2c::{Write, WriteRead};

use crate::input::ConversionDevice;

/// Default address with ADDR tied to GND.
pub const DEFAULT_ADDRESS: u8 = 0x48;

// Register addresses
pub mod reg {
    pub const CONVERSION: u8 = 0x00;
    pub const CONFIG: u8 = 0x01;
}

/// CONFIG bits without OS or MUX:
/// - PGA = ±4.096 V (001)
/// - MODE = single-shot
/// - DR = 860 SPS (111)
/// - COMP_QUE = 11 (comparator disabled)
pub const CONFIG_BASE: u16 = 0x03E3;

/// OS bit: start a single conversion.
pub const CONFIG_OS_START: u16 = 0x8000;

/// MUX[14:12] for AIN0..AIN3 against GND.
pub const MUX_SINGLE_ENDED: [u16; 4] = [0x4000, 0x5000, 0x6000, 0x7000];

/// Error type for `Ads1115` operations.
#[derive(Debug, PartialEq, Eq)]
pub enum Error<E> {
    /// Underlying I2C bus error.
    I2c(E),
    /// Requested input does not exist on this part.
    InvalidChannel(usize),
}

/// ADS1115 on a blocking I2C bus.
pub struct Ads1115<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C, E> Ads1115<I2C>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
{
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, DEFAULT_ADDRESS)
    }

    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Write a 16-bit register, MSB first.
    pub fn write_reg(&mut self, reg: u8, value: u16) -> Result<(), Error<E>> {
        let [msb, lsb] = value.to_be_bytes();
        self.i2c
            .write(self.address, &[reg, msb, lsb])
            .map_err(Error::I2c)
    }

    /// Read a 16-bit register, MSB first.
    pub fn read_reg(&mut self, reg: u8) -> Result<u16, Error<E>> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.address, &[reg], &mut buf)
            .map_err(Error::I2c)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Config word that starts a single-shot conversion on `channel`.
    pub fn single_shot_config(channel: usize) -> Option<u16> {
        MUX_SINGLE_ENDED
            .get(channel)
            .map(|mux| CONFIG_OS_START | mux | CONFIG_BASE)
    }

    pub fn free(self) -> I2C {
        self.i2c
    }
}

impl<I2C, E> ConversionDevice for Ads1115<I2C>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
    E: core::fmt::Debug,
{
    type Error = Error<E>;

    fn start_conversion(&mut self, channel: usize) -> Result<(), Self::Error> {
        let config = Self::single_shot_config(channel).ok_or(Error::InvalidChannel(channel))?;
        self.write_reg(reg::CONFIG, config)
    }

    fn read_conversion(&mut self) -> Result<i16, Self::Error> {
        self.read_reg(reg::CONVERSION).map(|raw| raw as i16)
    }
}
