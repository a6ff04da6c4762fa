//! Configuration primitives for the LIS3DHTR driver.

use crate::params::FullScale;

/// User-facing configuration applied while constructing the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Full-scale range programmed after power-on.
    pub full_scale: FullScale,
}

impl Config {
    /// Creates a configuration using the default ±2 g range.
    pub const fn new() -> Self {
        Self {
            full_scale: FullScale::G2,
        }
    }

    /// Overrides the full-scale range.
    pub const fn with_full_scale(mut self, full_scale: FullScale) -> Self {
        self.full_scale = full_scale;
        self
    }
}
