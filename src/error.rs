//! Error handling primitives for the LIS3DHTR driver.

/// Crate-wide result type alias.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Error variants produced by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Any error reported by the underlying bus interface.
    Interface(E),
    /// `WHO_AM_I` did not read back the expected identity; carries the byte read.
    DeviceIdMismatch(u8),
    /// A sample was requested while the device is powered down.
    NotReady,
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Self::Interface(err)
    }
}
