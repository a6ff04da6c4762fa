//! I²C interface implementation built on top of `embedded-hal` `I2c`.

use embedded_hal::i2c::I2c;

use super::Lis3dhtrInterface;
use crate::params::DeviceAddress;
use crate::registers::I2C_AUTO_INCREMENT;

/// I²C-based interface implementation for the LIS3DHTR driver.
///
/// Registers are addressed by writing the register address as the first
/// payload byte; there is no separate command byte.
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cInterface<I2C> {
    /// Creates a new interface talking to the device at the strapped `address`.
    pub const fn new(i2c: I2C, address: DeviceAddress) -> Self {
        Self {
            i2c,
            address: address.addr(),
        }
    }

    /// Returns the seven-bit bus address in use.
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Provides mutable access to the wrapped I²C bus.
    pub fn i2c_mut(&mut self) -> &mut I2C {
        &mut self.i2c
    }

    /// Consumes the interface and returns the owned I²C bus.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> Lis3dhtrInterface for I2cInterface<I2C>
where
    I2C: I2c,
{
    type Error = I2C::Error;

    fn read_register(&mut self, register: u8) -> core::result::Result<u8, Self::Error> {
        let mut value = [0u8; 1];
        self.i2c.write_read(self.address, &[register], &mut value)?;
        Ok(value[0])
    }

    fn write_register(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error> {
        self.i2c.write(self.address, &[register, value])
    }

    fn burst_read(&mut self, register: u8, buf: &mut [u8]) -> core::result::Result<(), Self::Error> {
        if buf.is_empty() {
            return Ok(());
        }

        let sub_address = if buf.len() > 1 {
            register | I2C_AUTO_INCREMENT
        } else {
            register
        };
        self.i2c.write_read(self.address, &[sub_address], buf)
    }
}
