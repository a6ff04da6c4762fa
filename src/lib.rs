#![cfg_attr(not(test), no_std)]

#[macro_use]
mod log;

mod error;

pub mod accelerometer;
pub mod config;
pub mod device;
pub mod interface;
pub mod params;
pub mod registers;
pub mod sample;

pub use crate::accelerometer::Accelerometer;
pub use crate::config::Config;
pub use crate::device::{ControlSnapshot, Lis3dhtr, State};
pub use crate::error::{Error, Result};
pub use crate::params::{DataRate, DeviceAddress, FullScale};
pub use crate::sample::Acceleration;
