//! Register map definitions for the LIS3DHTR accelerometer.
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use crate::params::{DataRate, FullScale, SpiMode};

/// Register address of `WHO_AM_I`.
pub const REG_WHO_AM_I: u8 = 0x0F;
/// Register address of `CTRL_REG1` (data rate, low-power enable, axis enables).
pub const REG_CTRL_REG1: u8 = 0x20;
/// Register address of `CTRL_REG4` (full scale, resolution, SPI mode).
pub const REG_CTRL_REG4: u8 = 0x23;
/// Register address of `FIFO_CTRL_REG`.
pub const REG_FIFO_CTRL: u8 = 0x2E;
/// Register address of `OUT_X_L`.
pub const REG_OUT_X_L: u8 = 0x28;
/// Register address of `OUT_X_H`.
pub const REG_OUT_X_H: u8 = 0x29;
/// Register address of `OUT_Y_L`.
pub const REG_OUT_Y_L: u8 = 0x2A;
/// Register address of `OUT_Y_H`.
pub const REG_OUT_Y_H: u8 = 0x2B;
/// Register address of `OUT_Z_L`.
pub const REG_OUT_Z_L: u8 = 0x2C;
/// Register address of `OUT_Z_H`.
pub const REG_OUT_Z_H: u8 = 0x2D;

/// Identity byte reported by `WHO_AM_I`.
pub const EXPECTED_WHO_AM_I: u8 = 0x33;

/// I²C sub-address flag enabling register auto-increment on multi-byte reads.
pub const I2C_AUTO_INCREMENT: u8 = 1 << 7;

/// A contiguous group of bits inside a register byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BitField {
    /// Position of the least significant bit of the field.
    pub shift: u8,
    /// Number of bits spanned by the field.
    pub width: u8,
}

impl BitField {
    /// Describes the field occupying bits `shift..shift + width`.
    pub const fn new(shift: u8, width: u8) -> Self {
        Self { shift, width }
    }

    /// Mask selecting the field bits in their register position.
    pub const fn mask(self) -> u8 {
        (((1u16 << self.width) - 1) << self.shift) as u8
    }

    /// Replaces the field bits of `current` with `value`, leaving every other bit intact.
    ///
    /// Bits of `value` wider than the field are discarded.
    pub const fn insert(self, current: u8, value: u8) -> u8 {
        let mask = self.mask();
        (current & !mask) | ((value << self.shift) & mask)
    }

    /// Extracts the field value from a register byte.
    pub const fn extract(self, register: u8) -> u8 {
        (register & self.mask()) >> self.shift
    }
}

/// `CTRL_REG1[7:4]` output data rate.
pub const DATA_RATE_FIELD: BitField = BitField::new(4, 4);
/// `CTRL_REG4[5:4]` full-scale selection.
pub const FULL_SCALE_FIELD: BitField = BitField::new(4, 2);
/// `CTRL_REG4[0]` SPI serial interface mode.
pub const SPI_MODE_FIELD: BitField = BitField::new(0, 1);

/// Minimal metadata exposed by every register value type.
pub trait Register {
    /// Register address as documented in the datasheet.
    const ADDRESS: u8;
    /// Reset value defined by the datasheet.
    const RESET_VALUE: u8;
}

/// Bitfield representation of the `CTRL_REG1` register (address `0x20`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CtrlReg1 {
    // X-axis enable (bit 0).
    pub x_enable: bool,
    // Y-axis enable (bit 1).
    pub y_enable: bool,
    // Z-axis enable (bit 2).
    pub z_enable: bool,
    // Low-power mode enable (bit 3).
    pub low_power: bool,
    // Output data rate selection (bits 7:4).
    pub data_rate: DataRate,
}

impl From<u8> for CtrlReg1 {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<CtrlReg1> for u8 {
    fn from(value: CtrlReg1) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `CTRL_REG4` register (address `0x23`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CtrlReg4 {
    // SPI serial interface mode (bit 0).
    pub spi_mode: SpiMode,
    // Self-test selection (bits 2:1).
    pub self_test: B2,
    // High-resolution output enable (bit 3).
    pub high_resolution: bool,
    // Full-scale selection (bits 5:4).
    pub full_scale: FullScale,
    // Big-endian data selection (bit 6).
    pub big_endian: bool,
    // Block data update (bit 7).
    pub block_data_update: bool,
}

impl From<u8> for CtrlReg4 {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<CtrlReg4> for u8 {
    fn from(value: CtrlReg4) -> Self {
        value.into_bytes()[0]
    }
}

impl Register for CtrlReg1 {
    const ADDRESS: u8 = REG_CTRL_REG1;
    const RESET_VALUE: u8 = 0x07;
}

impl Register for CtrlReg4 {
    const ADDRESS: u8 = REG_CTRL_REG4;
    const RESET_VALUE: u8 = 0x00;
}
