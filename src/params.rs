//! Strongly typed parameter enumerations for the LIS3DHTR driver.
//!
//! These enums map directly to datasheet field encodings and are used across
//! [`Config`](crate::config::Config) and the high-level driver APIs. Prefer these
//! types over raw integers to keep configuration values valid and explicit.
//!
//! # Examples
//!
//! ```rust
//! use lis3dhtr::params::{DataRate, FullScale};
//!
//! let rate = DataRate::Hz400;
//! let scale = FullScale::G8;
//! assert_eq!(scale.output_limit(), 8.0);
//! let _ = rate;
//! ```

use modular_bitfield::prelude::Specifier;

/// Full-scale selection (`CTRL_REG4.FS`).
///
/// The higher the range, the lower the resolution of each sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum FullScale {
    /// ±2 g.
    #[default]
    G2 = 0b00,
    /// ±4 g.
    G4 = 0b01,
    /// ±8 g.
    G8 = 0b10,
    /// ±16 g.
    G16 = 0b11,
}

impl FullScale {
    /// Returns the two-bit register code.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns the magnitude of the measurable range in g, `2^(code + 1)`.
    pub const fn output_limit(self) -> f32 {
        (1u16 << (self.code() + 1)) as f32
    }
}

/// Output data rate selection (`CTRL_REG1.ODR`).
///
/// Rates apply to normal, high-resolution and low-power modes alike unless
/// noted otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 4]
pub enum DataRate {
    /// Power-down mode, no samples are produced.
    PowerDown = 0b0000,
    /// 1 Hz.
    Hz1 = 0b0001,
    /// 10 Hz.
    Hz10 = 0b0010,
    /// 25 Hz.
    Hz25 = 0b0011,
    /// 50 Hz.
    Hz50 = 0b0100,
    /// 100 Hz.
    Hz100 = 0b0101,
    /// 200 Hz.
    Hz200 = 0b0110,
    /// 400 Hz, the rate selected by power-on.
    Hz400 = 0b0111,
    /// 1.6 kHz, low-power mode only.
    LowPower1600Hz = 0b1000,
    /// 1.344 kHz in normal/high-resolution mode, 5.376 kHz in low-power mode.
    Hz1344LowPower5376Hz = 0b1001,
}

impl DataRate {
    /// Returns the four-bit register code.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns the normal-mode output rate in hertz; power-down reports zero.
    pub const fn hz(self) -> u32 {
        match self {
            Self::PowerDown => 0,
            Self::Hz1 => 1,
            Self::Hz10 => 10,
            Self::Hz25 => 25,
            Self::Hz50 => 50,
            Self::Hz100 => 100,
            Self::Hz200 => 200,
            Self::Hz400 => 400,
            Self::LowPower1600Hz => 1_600,
            Self::Hz1344LowPower5376Hz => 1_344,
        }
    }
}

/// SPI serial interface mode (`CTRL_REG4.SIM`).
///
/// Only four-wire mode is configured by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 1]
pub enum SpiMode {
    /// Four-wire, full duplex.
    FourWire = 0,
    /// Three-wire, half duplex.
    ThreeWire = 1,
}

/// I²C device address selected by the SDO/SA0 strap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DeviceAddress {
    /// SDO/SA0 tied to ground.
    #[default]
    Low = 0b0001_1000,
    /// SDO/SA0 tied to the supply rail.
    High = 0b0001_1001,
}

impl DeviceAddress {
    /// Returns the seven-bit bus address.
    pub const fn addr(self) -> u8 {
        self as u8
    }
}
