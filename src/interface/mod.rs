//! Bus interface abstraction for the LIS3DHTR driver.

pub mod i2c;
pub mod spi;

pub use self::i2c::I2cInterface;
pub use self::spi::{SpiError, SpiInterface};

use crate::registers::BitField;

/// Abstraction over the low-level bus access required by the driver.
pub trait Lis3dhtrInterface {
    /// Error type produced by the concrete bus implementation.
    type Error;

    /// Reads a single register.
    fn read_register(&mut self, register: u8) -> core::result::Result<u8, Self::Error>;

    /// Writes a single register.
    fn write_register(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error>;

    /// Reads `buf.len()` consecutive registers starting at `register` in one transaction.
    fn burst_read(&mut self, register: u8, buf: &mut [u8]) -> core::result::Result<(), Self::Error>;

    /// Replaces `field` within `register` with `value`, preserving every other bit.
    ///
    /// The current register byte is always read before the updated byte is written.
    fn write_field(
        &mut self,
        register: u8,
        field: BitField,
        value: u8,
    ) -> core::result::Result<(), Self::Error> {
        let current = self.read_register(register)?;
        let updated = field.insert(current, value);
        trace!("reg {=u8:#x}: {=u8:#x} -> {=u8:#x}", register, current, updated);
        self.write_register(register, updated)
    }
}
