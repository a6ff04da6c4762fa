//! High-level LIS3DHTR device driver implementation.

use crate::accelerometer::Accelerometer;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::interface::i2c::I2cInterface;
use crate::interface::spi::{SpiError, SpiInterface};
use crate::interface::Lis3dhtrInterface;
use crate::params::{DataRate, DeviceAddress, FullScale, SpiMode};
use crate::registers::{
    CtrlReg1,
    CtrlReg4,
    Register,
    DATA_RATE_FIELD,
    EXPECTED_WHO_AM_I,
    FULL_SCALE_FIELD,
    REG_CTRL_REG4,
    REG_OUT_X_L,
    REG_WHO_AM_I,
    SPI_MODE_FIELD,
};
use crate::sample::{self, Acceleration, RAW_SAMPLE_BYTES};
use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::I2c;
use embedded_hal::spi::SpiBus;

/// Data rate programmed by [`Lis3dhtr::power_on`].
const POWER_ON_RATE: DataRate = DataRate::Hz400;

/// High-level synchronous driver for the LIS3DHTR accelerometer.
///
/// A handle only exists once the device has been verified, powered on and
/// given its full-scale range. The bus handle may be passed by value or as
/// `&mut` borrow, in which case the caller keeps it valid for the driver's
/// lifetime and gets it back even when construction fails.
pub struct Lis3dhtr<IFACE> {
    interface: IFACE,
    full_scale: FullScale,
    data_rate: DataRate,
}

/// Operating state observable on a constructed driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Sampling at a non-zero data rate; reads are accepted.
    Ready,
    /// Data rate set to power-down; reads are rejected with [`Error::NotReady`].
    PoweredDown,
}

/// Decoded view of `CTRL_REG1` and `CTRL_REG4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlSnapshot {
    /// CTRL_REG1[7:4] ODR; `None` for reserved encodings.
    pub data_rate: Option<DataRate>,
    /// CTRL_REG1[3] LPen.
    pub low_power: bool,
    /// CTRL_REG1[0] Xen.
    pub x_enabled: bool,
    /// CTRL_REG1[1] Yen.
    pub y_enabled: bool,
    /// CTRL_REG1[2] Zen.
    pub z_enabled: bool,
    /// CTRL_REG4[5:4] FS.
    pub full_scale: FullScale,
    /// CTRL_REG4[3] HR.
    pub high_resolution: bool,
    /// CTRL_REG4[0] SIM.
    pub spi_mode: SpiMode,
}

impl ControlSnapshot {
    /// Builds a snapshot from the raw control register bitfields.
    pub fn from_registers(reg1: CtrlReg1, reg4: CtrlReg4) -> Self {
        Self {
            data_rate: reg1.data_rate_or_err().ok(),
            low_power: reg1.low_power(),
            x_enabled: reg1.x_enable(),
            y_enabled: reg1.y_enable(),
            z_enabled: reg1.z_enable(),
            full_scale: reg4.full_scale(),
            high_resolution: reg4.high_resolution(),
            spi_mode: reg4.spi_mode(),
        }
    }
}

impl<IFACE> Lis3dhtr<IFACE> {
    // ==================================================================
    // == Driver Ownership ==============================================
    // ==================================================================
    /// Consumes the driver and returns the owned interface.
    pub fn release(self) -> IFACE {
        self.interface
    }

    /// Provides mutable access to the underlying interface.
    pub fn interface_mut(&mut self) -> &mut IFACE {
        &mut self.interface
    }

    /// Full-scale range last written to the device.
    pub fn full_scale(&self) -> FullScale {
        self.full_scale
    }

    /// Data rate last written to the device.
    pub fn data_rate(&self) -> DataRate {
        self.data_rate
    }

    /// Returns whether samples can currently be read.
    pub fn state(&self) -> State {
        if self.data_rate == DataRate::PowerDown {
            State::PoweredDown
        } else {
            State::Ready
        }
    }
}

impl<I2C> Lis3dhtr<I2cInterface<I2C>>
where
    I2C: I2c,
{
    // ==================================================================
    // == I2C Convenience Constructors ==================================
    // ==================================================================
    /// Constructs the driver on an I²C bus at the strapped `address`.
    pub fn new_i2c(i2c: I2C, address: DeviceAddress, config: Config) -> Result<Self, I2C::Error> {
        Self::new(I2cInterface::new(i2c, address), config)
    }

    /// Releases the driver, returning the I²C bus.
    pub fn release_i2c(self) -> I2C {
        self.release().release()
    }
}

impl<SPI, CS> Lis3dhtr<SpiInterface<SPI, CS>>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    // ==================================================================
    // == SPI Convenience Constructors ==================================
    // ==================================================================
    /// Constructs the driver on an SPI bus framed by the `cs` chip-select line.
    ///
    /// The device is switched to four-wire mode before its identity is checked.
    pub fn new_spi(
        spi: SPI,
        cs: CS,
        config: Config,
    ) -> Result<Self, SpiError<SPI::Error, CS::Error>> {
        let mut interface = SpiInterface::new(spi, cs);
        interface.write_field(REG_CTRL_REG4, SPI_MODE_FIELD, SpiMode::FourWire as u8)?;
        Self::new(interface, config)
    }

    /// Releases the driver, returning the SPI bus and chip-select pin.
    pub fn release_spi(self) -> (SPI, CS) {
        self.release().release()
    }
}

impl<IFACE, CommE> Lis3dhtr<IFACE>
where
    IFACE: Lis3dhtrInterface<Error = CommE>,
{
    // ==================================================================
    // == Construction ==================================================
    // ==================================================================
    /// Verifies the device, powers it on and applies `config`.
    ///
    /// The first failing step aborts construction and is returned; no
    /// partially configured driver is handed out.
    pub fn new(interface: IFACE, config: Config) -> Result<Self, CommE> {
        let mut device = Self {
            interface,
            full_scale: FullScale::default(),
            data_rate: DataRate::PowerDown,
        };

        device.verify_device()?;
        device.power_on()?;
        device.configure_full_scale(config.full_scale)?;

        info!("LIS3DHTR ready");
        Ok(device)
    }

    // ==================================================================
    // == Identification ================================================
    // ==================================================================
    /// Checks that `WHO_AM_I` reads back the LIS3DHTR identity byte.
    pub fn verify_device(&mut self) -> Result<(), CommE> {
        let who_am_i = self.interface.read_register(REG_WHO_AM_I)?;

        if who_am_i != EXPECTED_WHO_AM_I {
            warn!("WHO_AM_I mismatch: {=u8:#x}", who_am_i);
            return Err(Error::DeviceIdMismatch(who_am_i));
        }

        debug!("WHO_AM_I verified");
        Ok(())
    }

    /// Reads both control registers and decodes them.
    pub fn read_controls(&mut self) -> Result<ControlSnapshot, CommE> {
        let reg1 = CtrlReg1::from(self.interface.read_register(CtrlReg1::ADDRESS)?);
        let reg4 = CtrlReg4::from(self.interface.read_register(CtrlReg4::ADDRESS)?);

        Ok(ControlSnapshot::from_registers(reg1, reg4))
    }

    // ==================================================================
    // == Power & Range Configuration ===================================
    // ==================================================================
    /// Enables sampling at 400 Hz.
    pub fn power_on(&mut self) -> Result<(), CommE> {
        self.configure_data_rate(POWER_ON_RATE)
    }

    /// Puts the device into power-down mode.
    pub fn power_off(&mut self) -> Result<(), CommE> {
        self.configure_data_rate(DataRate::PowerDown)
    }

    /// Programs the output data rate, leaving the rest of `CTRL_REG1` untouched.
    pub fn configure_data_rate(&mut self, rate: DataRate) -> Result<(), CommE> {
        self.interface
            .write_field(CtrlReg1::ADDRESS, DATA_RATE_FIELD, rate.code())?;

        self.data_rate = rate;
        debug!("data rate set to {=u32} Hz", rate.hz());
        Ok(())
    }

    /// Programs the full-scale range used for subsequent reads.
    ///
    /// The stored range only changes once the register write succeeded.
    pub fn configure_full_scale(&mut self, full_scale: FullScale) -> Result<(), CommE> {
        self.interface
            .write_field(CtrlReg4::ADDRESS, FULL_SCALE_FIELD, full_scale.code())?;

        self.full_scale = full_scale;
        debug!("full scale set to +/-{=f32} g", full_scale.output_limit());
        Ok(())
    }

    // ==================================================================
    // == Data Acquisition ==============================================
    // ==================================================================
    fn read_burst(&mut self) -> Result<[u8; RAW_SAMPLE_BYTES], CommE> {
        if self.state() != State::Ready {
            return Err(Error::NotReady);
        }

        let mut raw = [0u8; RAW_SAMPLE_BYTES];
        self.interface.burst_read(REG_OUT_X_L, &mut raw)?;
        Ok(raw)
    }

    /// Reads the raw signed X, Y, Z samples.
    pub fn read_raw(&mut self) -> Result<[i16; 3], CommE> {
        let raw = self.read_burst()?;
        Ok(sample::decode_raw(&raw))
    }

    /// Reads an acceleration triplet scaled to g with the configured range.
    pub fn read_acceleration(&mut self) -> Result<Acceleration, CommE> {
        let raw = self.read_burst()?;
        Ok(sample::decode(&raw, self.full_scale))
    }
}

impl<IFACE, CommE> Accelerometer for Lis3dhtr<IFACE>
where
    IFACE: Lis3dhtrInterface<Error = CommE>,
{
    type Error = Error<CommE>;

    fn read(&mut self) -> core::result::Result<Acceleration, Self::Error> {
        self.read_acceleration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::REG_CTRL_REG1;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};

    const ADDR: u8 = 0x18;

    fn startup(ctrl1: u8, ctrl4: u8, full_scale: FullScale) -> Vec<I2cTransaction> {
        vec![
            I2cTransaction::write_read(ADDR, vec![REG_WHO_AM_I], vec![0x33]),
            I2cTransaction::write_read(ADDR, vec![REG_CTRL_REG1], vec![ctrl1]),
            I2cTransaction::write(ADDR, vec![REG_CTRL_REG1, DATA_RATE_FIELD.insert(ctrl1, 0x7)]),
            I2cTransaction::write_read(ADDR, vec![REG_CTRL_REG4], vec![ctrl4]),
            I2cTransaction::write(
                ADDR,
                vec![REG_CTRL_REG4, FULL_SCALE_FIELD.insert(ctrl4, full_scale.code())],
            ),
        ]
    }

    fn assert_close(actual: f32, expected: f32) {
        assert!((actual - expected).abs() < 1e-3, "{actual} != {expected}");
    }

    fn read_through<A: Accelerometer>(sensor: &mut A) -> core::result::Result<Acceleration, A::Error> {
        sensor.read()
    }

    #[test]
    fn construction_preserves_unrelated_control_bits() {
        let mut i2c = I2cMock::new(&startup(0x0F, 0x88, FullScale::G4));

        let device = Lis3dhtr::new_i2c(&mut i2c, DeviceAddress::Low, Config::new().with_full_scale(FullScale::G4))
            .unwrap();
        assert_eq!(device.full_scale(), FullScale::G4);
        assert_eq!(device.data_rate(), DataRate::Hz400);
        assert_eq!(device.state(), State::Ready);

        drop(device);
        i2c.done();
    }

    #[test]
    fn identity_mismatch_fails_over_i2c() {
        let expectations = [I2cTransaction::write_read(ADDR, vec![REG_WHO_AM_I], vec![0x44])];
        let mut i2c = I2cMock::new(&expectations);

        let result = Lis3dhtr::new_i2c(&mut i2c, DeviceAddress::Low, Config::default());
        assert!(matches!(result, Err(Error::DeviceIdMismatch(0x44))));
        i2c.done();
    }

    #[test]
    fn every_foreign_identity_byte_is_rejected() {
        for byte in (0..=u8::MAX).filter(|b| *b != EXPECTED_WHO_AM_I) {
            let expectations = [I2cTransaction::write_read(ADDR, vec![REG_WHO_AM_I], vec![byte])];
            let mut i2c = I2cMock::new(&expectations);

            let result = Lis3dhtr::new_i2c(&mut i2c, DeviceAddress::Low, Config::default());
            assert!(
                matches!(result, Err(Error::DeviceIdMismatch(found)) if found == byte),
                "identity {byte:#04x} accepted"
            );
            i2c.done();
        }
    }

    #[test]
    fn identity_mismatch_fails_over_spi() {
        let mut spi = SpiMock::new(&[
            SpiTransaction::write(0xA3),
            SpiTransaction::read(0x00),
            SpiTransaction::flush(),
            SpiTransaction::write_vec(vec![0x23, 0x00]),
            SpiTransaction::flush(),
            SpiTransaction::write(0x8F),
            SpiTransaction::read(0x32),
            SpiTransaction::flush(),
        ]);
        let mut cs = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);

        let result = Lis3dhtr::new_spi(&mut spi, &mut cs, Config::default());
        assert!(matches!(result, Err(Error::DeviceIdMismatch(0x32))));
        spi.done();
        cs.done();
    }

    #[test]
    fn bus_failure_aborts_construction() {
        let expectations = [
            I2cTransaction::write_read(ADDR, vec![REG_WHO_AM_I], vec![0x33]),
            I2cTransaction::write_read(ADDR, vec![REG_CTRL_REG1], vec![0x07]),
            I2cTransaction::write(ADDR, vec![REG_CTRL_REG1, 0x77]).with_error(ErrorKind::Other),
        ];
        let mut i2c = I2cMock::new(&expectations);

        let result = Lis3dhtr::new_i2c(&mut i2c, DeviceAddress::Low, Config::default());
        assert!(matches!(result, Err(Error::Interface(ErrorKind::Other))));
        i2c.done();
    }

    #[test]
    fn reconfigured_scale_applies_to_next_read() {
        let mut expectations = startup(0x00, 0x00, FullScale::G2);
        expectations.extend([
            I2cTransaction::write_read(ADDR, vec![REG_CTRL_REG4], vec![0x00]),
            I2cTransaction::write(ADDR, vec![REG_CTRL_REG4, 0x20]),
            I2cTransaction::write_read(ADDR, vec![0xA8], vec![0x00, 0x40, 0x00, 0x40, 0x00, 0x40]),
        ]);
        let mut i2c = I2cMock::new(&expectations);

        let mut device = Lis3dhtr::new_i2c(&mut i2c, DeviceAddress::Low, Config::default()).unwrap();
        device.configure_full_scale(FullScale::G8).unwrap();
        let reading = read_through(&mut device).unwrap();
        assert_close(reading.x, 8.0 * (0x4000 as f32 / 0x7FFF as f32));
        assert_close(reading.y, 4.0);
        assert_close(reading.z, 4.0);

        drop(device);
        i2c.done();
    }

    #[test]
    fn failed_reconfiguration_keeps_previous_scale() {
        let mut expectations = startup(0x00, 0x00, FullScale::G2);
        expectations.extend([
            I2cTransaction::write_read(ADDR, vec![REG_CTRL_REG4], vec![0x00]),
            I2cTransaction::write(ADDR, vec![REG_CTRL_REG4, 0x30]).with_error(ErrorKind::Other),
            I2cTransaction::write_read(ADDR, vec![0xA8], vec![0x00, 0x40, 0x00, 0x40, 0x00, 0x40]),
        ]);
        let mut i2c = I2cMock::new(&expectations);

        let mut device = Lis3dhtr::new_i2c(&mut i2c, DeviceAddress::Low, Config::default()).unwrap();
        assert!(device.configure_full_scale(FullScale::G16).is_err());
        assert_eq!(device.full_scale(), FullScale::G2);
        assert_close(device.read_acceleration().unwrap().x, 1.0);

        drop(device);
        i2c.done();
    }

    #[test]
    fn reads_rejected_while_powered_down() {
        let mut expectations = startup(0x07, 0x00, FullScale::G2);
        expectations.extend([
            I2cTransaction::write_read(ADDR, vec![REG_CTRL_REG1], vec![0x77]),
            I2cTransaction::write(ADDR, vec![REG_CTRL_REG1, 0x07]),
            I2cTransaction::write_read(ADDR, vec![REG_CTRL_REG1], vec![0x07]),
            I2cTransaction::write(ADDR, vec![REG_CTRL_REG1, 0x77]),
            I2cTransaction::write_read(ADDR, vec![0xA8], vec![0x00, 0x00, 0x00, 0x00, 0x00, 0x80]),
        ]);
        let mut i2c = I2cMock::new(&expectations);

        let mut device = Lis3dhtr::new_i2c(&mut i2c, DeviceAddress::Low, Config::default()).unwrap();
        device.power_off().unwrap();
        assert_eq!(device.state(), State::PoweredDown);
        assert!(matches!(device.read_acceleration(), Err(Error::NotReady)));
        assert!(matches!(device.read_raw(), Err(Error::NotReady)));

        device.power_on().unwrap();
        assert_eq!(device.full_scale(), FullScale::G2);
        assert_eq!(device.read_raw().unwrap(), [0, 0, i16::MIN]);

        drop(device);
        i2c.done();
    }

    #[test]
    fn read_controls_decodes_both_registers() {
        let mut expectations = startup(0x07, 0x00, FullScale::G8);
        expectations.extend([
            I2cTransaction::write_read(ADDR, vec![REG_CTRL_REG1], vec![0x77]),
            I2cTransaction::write_read(ADDR, vec![REG_CTRL_REG4], vec![0x28]),
        ]);
        let mut i2c = I2cMock::new(&expectations);

        let mut device = Lis3dhtr::new_i2c(&mut i2c, DeviceAddress::Low, Config::new().with_full_scale(FullScale::G8))
            .unwrap();
        let controls = device.read_controls().unwrap();
        assert_eq!(controls.data_rate, Some(DataRate::Hz400));
        assert!(controls.x_enabled && controls.y_enabled && controls.z_enabled);
        assert!(!controls.low_power);
        assert_eq!(controls.full_scale, FullScale::G8);
        assert!(controls.high_resolution);
        assert_eq!(controls.spi_mode, SpiMode::FourWire);

        drop(device);
        i2c.done();
    }

    #[test]
    fn reserved_data_rate_reported_as_none() {
        let snapshot = ControlSnapshot::from_registers(CtrlReg1::from(0xF7), CtrlReg4::from(0x00));
        assert_eq!(snapshot.data_rate, None);
    }
}
