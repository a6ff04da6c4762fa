//! SPI interface implementation built on top of `embedded-hal` `SpiBus` and a
//! dedicated chip-select `OutputPin`.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use super::Lis3dhtrInterface;

/// Command byte flag selecting a read transfer.
pub const SPI_READ: u8 = 1 << 7;
/// Command byte flag enabling register auto-increment across the transfer.
pub const SPI_AUTO_INCREMENT: u8 = 1 << 6;
/// Command byte bits carrying the register address.
pub const SPI_ADDRESS_MASK: u8 = 0x3F;

/// Errors raised by either half of the SPI transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiError<SpiE, PinE> {
    /// The SPI bus reported a failure.
    Spi(SpiE),
    /// Driving the chip-select line failed.
    ChipSelect(PinE),
}

/// Builds the command byte used to address registers over SPI.
///
/// Layout: bit 7 read flag, bit 6 auto-increment flag, bits 5:0 register address.
pub const fn command_byte(register: u8, is_read: bool, auto_increment: bool) -> u8 {
    let mut command = register & SPI_ADDRESS_MASK;
    if is_read {
        command |= SPI_READ;
    }
    if auto_increment {
        command |= SPI_AUTO_INCREMENT;
    }
    command
}

/// SPI-based interface implementation for the LIS3DHTR driver.
///
/// Every transaction is framed by driving `cs` low before the transfer and high
/// again afterwards, including when the transfer fails.
pub struct SpiInterface<SPI, CS> {
    spi: SPI,
    cs: CS,
}

impl<SPI, CS> SpiInterface<SPI, CS> {
    /// Creates a new interface from an SPI bus and its chip-select line.
    pub const fn new(spi: SPI, cs: CS) -> Self {
        Self { spi, cs }
    }

    /// Provides mutable access to the wrapped SPI bus.
    pub fn spi_mut(&mut self) -> &mut SPI {
        &mut self.spi
    }

    /// Consumes the interface and returns the owned SPI bus and chip-select pin.
    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }
}

impl<SPI, CS> SpiInterface<SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    /// Runs `transfer` with chip-select asserted.
    ///
    /// Chip-select is released on every exit path. A transfer error takes
    /// precedence over a failure to release the line.
    fn framed<R, F>(&mut self, transfer: F) -> core::result::Result<R, SpiError<SPI::Error, CS::Error>>
    where
        F: FnOnce(&mut SPI) -> core::result::Result<R, SPI::Error>,
    {
        if let Err(err) = self.cs.set_low() {
            let _ = self.cs.set_high();
            return Err(SpiError::ChipSelect(err));
        }

        let result = transfer(&mut self.spi).and_then(|value| self.spi.flush().map(|()| value));
        let released = self.cs.set_high();

        let value = result.map_err(SpiError::Spi)?;
        released.map_err(SpiError::ChipSelect)?;
        Ok(value)
    }
}

impl<SPI, CS> Lis3dhtrInterface for SpiInterface<SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    type Error = SpiError<SPI::Error, CS::Error>;

    fn read_register(&mut self, register: u8) -> core::result::Result<u8, Self::Error> {
        let mut value = [0u8; 1];
        self.burst_read(register, &mut value)?;
        Ok(value[0])
    }

    fn write_register(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error> {
        let frame = [command_byte(register, false, false), value];
        self.framed(|spi| spi.write(&frame))
    }

    fn burst_read(&mut self, register: u8, buf: &mut [u8]) -> core::result::Result<(), Self::Error> {
        if buf.is_empty() {
            return Ok(());
        }

        let command = [command_byte(register, true, buf.len() > 1)];
        self.framed(|spi| {
            spi.write(&command)?;
            spi.read(buf)
        })
    }
}
