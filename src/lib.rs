/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

#![no_std]
#![allow(async_fn_in_trait)]

use core::fmt;

pub mod config;
pub mod constants;
pub mod interface;
pub mod wrapper;
pub mod wrapper_async;

pub use config::Config;
pub use constants::DistanceUnit;
pub use interface::{AsyncSensorInterface, I2cInterface, SensorInterface};
pub use wrapper::Srf08;
pub use wrapper_async::Srf08Async;

pub(crate) const WRONG_UNITS_MSG: &str =
    "Wrong units for distance, should be 'c' or 'i' or 'm'.";
pub(crate) const READING_ERROR_MSG: &str = "srf08 - distance reading error.";

/// Errors in this crate
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<CommE> {
    /// Distance unit code is not one of the ranging commands
    InvalidUnit(u8),
    /// A ranging or light measurement failed on the bus
    Reading(CommE),
    /// Sensor communication error outside a measurement
    Comm(CommE),
    /// Gain, range or echo index out of bounds
    InvalidArgument,
}

/// Coarse classification of [`Error`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    /// The device could not produce what was asked of it
    Thing,
    /// The bus failed
    Io,
    /// The caller passed something the driver can't use
    Api,
}

impl<CommE> Error<CommE> {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidUnit(_) | Error::Reading(_) => ErrorKind::Thing,
            Error::Comm(_) => ErrorKind::Io,
            Error::InvalidArgument => ErrorKind::Api,
        }
    }

    /// The underlying bus error, if there was one
    pub fn cause(&self) -> Option<&CommE> {
        match self {
            Error::Reading(e) | Error::Comm(e) => Some(e),
            _ => None,
        }
    }
}

impl<CommE> fmt::Display for Error<CommE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidUnit(_) => f.write_str(WRONG_UNITS_MSG),
            Error::Reading(_) => f.write_str(READING_ERROR_MSG),
            Error::Comm(_) => f.write_str("srf08 - bus communication error."),
            Error::InvalidArgument => f.write_str("srf08 - argument out of range."),
        }
    }
}
