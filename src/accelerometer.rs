//! Sensor capability shared by every transport variant of the driver.

use crate::sample::Acceleration;

/// A device able to report a three-axis acceleration in g.
pub trait Accelerometer {
    /// Error produced when a reading cannot be taken.
    type Error;

    /// Takes a fresh acceleration reading.
    fn read(&mut self) -> core::result::Result<Acceleration, Self::Error>;
}
