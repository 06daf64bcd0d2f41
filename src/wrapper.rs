/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

use crate::config::Config;
use crate::constants::*;
use crate::interface::SensorInterface;
use crate::{Error, READING_ERROR_MSG, WRONG_UNITS_MSG};
use embedded_hal::delay::DelayNs;
use log::{debug, error};

/// SRF08 ultrasonic range finder and light sensor.
///
/// Every measurement fires a ranging cycle and blocks for
/// [`RANGING_DELAY_MS`] before the result is read back.
pub struct Srf08<SI> {
    pub(crate) sensor_interface: SI,
    config: Config,
}

impl<SI> Srf08<SI> {
    /// Bind to a device at the default address
    pub fn new(sensor_interface: SI) -> Self {
        Self::new_with_config(sensor_interface, Config::default())
    }

    pub fn new_with_config(sensor_interface: SI, config: Config) -> Self {
        Self {
            sensor_interface,
            config,
        }
    }

    /// Run `f` against a device bound for the duration of the call.
    /// The interface is handed back whatever `f` returns.
    pub fn scoped<R>(
        sensor_interface: SI,
        config: Config,
        f: impl FnOnce(&mut Self) -> R,
    ) -> (R, SI) {
        let mut dev = Self::new_with_config(sensor_interface, config);
        let res = f(&mut dev);
        (res, dev.free())
    }

    /// The address this handle talks to
    pub fn address(&self) -> u8 {
        self.config.address
    }

    /// Returns previously consumed sensor interface.
    pub fn free(self) -> SI {
        self.sensor_interface
    }
}

impl<SI, SE> Srf08<SI>
where
    SI: SensorInterface<SensorError = SE>,
{
    /// Write the gain and range overrides from the config, if any
    pub fn init(&mut self) -> Result<(), Error<SE>> {
        if let Some(gain) = self.config.gain {
            self.set_gain(gain)?;
        }
        if let Some(range) = self.config.range {
            self.set_range(range)?;
        }
        Ok(())
    }

    /// Reprogram the device to answer on `new_address`.
    ///
    /// Addresses above 0x7F are refused before touching the bus.
    ///
    /// The new address survives power cycles. If any of the four writes
    /// fails the handle keeps the old address, while the device may or may
    /// not have switched already.
    pub fn change_address(&mut self, new_address: u8) -> Result<(), Error<SE>> {
        if self.config.address == new_address {
            return Ok(());
        }
        let payloads = address_change_payloads(new_address).ok_or_else(|| {
            error!("srf08 address 0x{:02X} is not a 7-bit address", new_address);
            Error::InvalidArgument
        })?;
        debug!(
            "srf08 changing address 0x{:02X} -> 0x{:02X}",
            self.config.address, new_address
        );
        for payload in payloads.iter() {
            self.sensor_interface
                .transaction(self.config.address, payload, &mut [])
                .map_err(|e| {
                    error!("srf08 address change to 0x{:02X} failed", new_address);
                    Error::Comm(e)
                })?;
        }
        self.config.address = new_address;
        Ok(())
    }

    /// Measure the distance to the closest object
    pub fn distance(
        &mut self,
        delay: &mut impl DelayNs,
        unit: DistanceUnit,
    ) -> Result<u16, Error<SE>> {
        self.start_ranging(delay, unit)
            .and_then(|_| self.read_register::<2>(RESULT))
            .map(u16::from_be_bytes)
            .map_err(Self::reading_error)
    }

    /// Same as [`Self::distance`], for a unit given as its ranging
    /// command byte. Anything but `INCH`, `CM` or `MS` is refused before
    /// touching the bus.
    pub fn distance_raw(
        &mut self,
        delay: &mut impl DelayNs,
        code: u8,
    ) -> Result<u16, Error<SE>> {
        let unit = DistanceUnit::try_from(code).map_err(|code| {
            error!("{}", WRONG_UNITS_MSG);
            Error::InvalidUnit(code)
        })?;
        self.distance(delay, unit)
    }

    /// Measure light intensity, 0 to 255 in the sensor's own relative scale
    pub fn light(&mut self, delay: &mut impl DelayNs) -> Result<u8, Error<SE>> {
        // the light reading only updates as part of a ranging cycle
        self.start_ranging(delay, DistanceUnit::Centimeters)
            .and_then(|_| self.read_register::<1>(LIGHT))
            .map(|buf| buf[0])
            .map_err(Self::reading_error)
    }

    /// Range and return the `index`th echo, nearest first.
    /// Echoes the device did not receive read as zero.
    pub fn echo(
        &mut self,
        delay: &mut impl DelayNs,
        index: usize,
        unit: DistanceUnit,
    ) -> Result<u16, Error<SE>> {
        if index >= MAX_ECHOES {
            return Err(Error::InvalidArgument);
        }
        self.start_ranging(delay, unit)
            .and_then(|_| self.read_register::<2>(echo_register(index)))
            .map(u16::from_be_bytes)
            .map_err(Self::reading_error)
    }

    /// Software revision of the device firmware
    pub fn revision(&mut self) -> Result<u8, Error<SE>> {
        let buf = self.read_register::<1>(CMD).map_err(Error::Comm)?;
        debug!("srf08 revision {}", buf[0]);
        Ok(buf[0])
    }

    /// Set the max analogue gain, 0 to 31
    pub fn set_gain(&mut self, gain: u8) -> Result<(), Error<SE>> {
        if gain > MAX_GAIN {
            error!("srf08 gain {} out of range (0-{})", gain, MAX_GAIN);
            return Err(Error::InvalidArgument);
        }
        debug!("srf08 set gain {}", gain);
        self.sensor_interface
            .transaction(self.config.address, &[GAIN_WRITE_REGISTER, gain], &mut [])
            .map_err(Error::Comm)?;
        self.config.gain = Some(gain);
        Ok(())
    }

    /// Set the range register; max range is `(range * 43mm) + 43mm`
    pub fn set_range(&mut self, range: u8) -> Result<(), Error<SE>> {
        debug!("srf08 set range {}", range);
        self.sensor_interface
            .transaction(self.config.address, &[RANGE_WRITE_REGISTER, range], &mut [])
            .map_err(Error::Comm)?;
        self.config.range = Some(range);
        Ok(())
    }

    fn start_ranging(
        &mut self,
        delay: &mut impl DelayNs,
        unit: DistanceUnit,
    ) -> Result<(), SE> {
        debug!("srf08 0x{:02X} ranging {:?}", self.config.address, unit);
        self.sensor_interface
            .transaction(self.config.address, &[CMD, unit.command()], &mut [])?;
        delay.delay_ms(RANGING_DELAY_MS);
        Ok(())
    }

    fn read_register<const N: usize>(&mut self, register: u8) -> Result<[u8; N], SE> {
        let mut buf = [0u8; N];
        self.sensor_interface
            .transaction(self.config.address, &[register], &mut buf)?;
        Ok(buf)
    }

    fn reading_error(e: SE) -> Error<SE> {
        error!("{}", READING_ERROR_MSG);
        Error::Reading(e)
    }
}
