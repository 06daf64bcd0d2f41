/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

use crate::config::Config;
use crate::constants::*;
use crate::interface::AsyncSensorInterface;
use crate::{Error, READING_ERROR_MSG, WRONG_UNITS_MSG};
use embedded_hal_async::delay::DelayNs;
use log::{debug, error};

/// Async variant of [`crate::Srf08`].
///
/// Dropping an in-flight `change_address` future leaves the device in the
/// same undefined state as a bus error partway through the sequence.
pub struct Srf08Async<SI> {
    pub(crate) sensor_interface: SI,
    config: Config,
}

impl<SI> Srf08Async<SI> {
    pub fn new(sensor_interface: SI) -> Self {
        Self::new_with_config(sensor_interface, Config::default())
    }

    pub fn new_with_config(sensor_interface: SI, config: Config) -> Self {
        Self {
            sensor_interface,
            config,
        }
    }

    pub fn address(&self) -> u8 {
        self.config.address
    }

    /// Returns previously consumed sensor interface.
    pub fn free(self) -> SI {
        self.sensor_interface
    }
}

impl<SI, SE> Srf08Async<SI>
where
    SI: AsyncSensorInterface<SensorError = SE>,
{
    pub async fn init(&mut self) -> Result<(), Error<SE>> {
        if let Some(gain) = self.config.gain {
            self.set_gain(gain).await?;
        }
        if let Some(range) = self.config.range {
            self.set_range(range).await?;
        }
        Ok(())
    }

    pub async fn change_address(&mut self, new_address: u8) -> Result<(), Error<SE>> {
        if self.config.address == new_address {
            return Ok(());
        }
        let payloads = match address_change_payloads(new_address) {
            Some(payloads) => payloads,
            None => {
                error!("srf08 address 0x{:02X} is not a 7-bit address", new_address);
                return Err(Error::InvalidArgument);
            }
        };
        debug!(
            "srf08 changing address 0x{:02X} -> 0x{:02X}",
            self.config.address, new_address
        );
        for payload in payloads.iter() {
            if let Err(e) = self
                .sensor_interface
                .transaction(self.config.address, payload, &mut [])
                .await
            {
                error!("srf08 address change to 0x{:02X} failed", new_address);
                return Err(Error::Comm(e));
            }
        }
        self.config.address = new_address;
        Ok(())
    }

    pub async fn distance(
        &mut self,
        delay: &mut impl DelayNs,
        unit: DistanceUnit,
    ) -> Result<u16, Error<SE>> {
        match self.ranged_read::<2>(delay, unit, RESULT).await {
            Ok(buf) => Ok(u16::from_be_bytes(buf)),
            Err(e) => Err(Self::reading_error(e)),
        }
    }

    pub async fn distance_raw(
        &mut self,
        delay: &mut impl DelayNs,
        code: u8,
    ) -> Result<u16, Error<SE>> {
        let unit = DistanceUnit::try_from(code).map_err(|code| {
            error!("{}", WRONG_UNITS_MSG);
            Error::InvalidUnit(code)
        })?;
        self.distance(delay, unit).await
    }

    pub async fn light(&mut self, delay: &mut impl DelayNs) -> Result<u8, Error<SE>> {
        match self
            .ranged_read::<1>(delay, DistanceUnit::Centimeters, LIGHT)
            .await
        {
            Ok(buf) => Ok(buf[0]),
            Err(e) => Err(Self::reading_error(e)),
        }
    }

    pub async fn echo(
        &mut self,
        delay: &mut impl DelayNs,
        index: usize,
        unit: DistanceUnit,
    ) -> Result<u16, Error<SE>> {
        if index >= MAX_ECHOES {
            return Err(Error::InvalidArgument);
        }
        match self.ranged_read::<2>(delay, unit, echo_register(index)).await {
            Ok(buf) => Ok(u16::from_be_bytes(buf)),
            Err(e) => Err(Self::reading_error(e)),
        }
    }

    pub async fn revision(&mut self) -> Result<u8, Error<SE>> {
        let mut buf = [0u8; 1];
        self.sensor_interface
            .transaction(self.config.address, &[CMD], &mut buf)
            .await
            .map_err(Error::Comm)?;
        debug!("srf08 revision {}", buf[0]);
        Ok(buf[0])
    }

    pub async fn set_gain(&mut self, gain: u8) -> Result<(), Error<SE>> {
        if gain > MAX_GAIN {
            error!("srf08 gain {} out of range (0-{})", gain, MAX_GAIN);
            return Err(Error::InvalidArgument);
        }
        debug!("srf08 set gain {}", gain);
        self.sensor_interface
            .transaction(self.config.address, &[GAIN_WRITE_REGISTER, gain], &mut [])
            .await
            .map_err(Error::Comm)?;
        self.config.gain = Some(gain);
        Ok(())
    }

    pub async fn set_range(&mut self, range: u8) -> Result<(), Error<SE>> {
        debug!("srf08 set range {}", range);
        self.sensor_interface
            .transaction(self.config.address, &[RANGE_WRITE_REGISTER, range], &mut [])
            .await
            .map_err(Error::Comm)?;
        self.config.range = Some(range);
        Ok(())
    }

    /// Fire a ranging cycle, wait it out, then read `N` bytes at `register`
    async fn ranged_read<const N: usize>(
        &mut self,
        delay: &mut impl DelayNs,
        unit: DistanceUnit,
        register: u8,
    ) -> Result<[u8; N], SE> {
        debug!("srf08 0x{:02X} ranging {:?}", self.config.address, unit);
        self.sensor_interface
            .transaction(self.config.address, &[CMD, unit.command()], &mut [])
            .await?;
        delay.delay_ms(RANGING_DELAY_MS).await;
        let mut buf = [0u8; N];
        self.sensor_interface
            .transaction(self.config.address, &[register], &mut buf)
            .await?;
        Ok(buf)
    }

    fn reading_error(e: SE) -> Error<SE> {
        error!("{}", READING_ERROR_MSG);
        Error::Reading(e)
    }
}
