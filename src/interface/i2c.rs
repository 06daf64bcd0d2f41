use super::{AsyncSensorInterface, SensorInterface};

/// Drives the sensor over an embedded-hal i2c bus, blocking or async
pub struct I2cInterface<I2C> {
    /// i2c port
    i2c_port: I2C,
}

impl<I2C> I2cInterface<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self { i2c_port: i2c }
    }

    /// Returns the consumed i2c port
    pub fn free(self) -> I2C {
        self.i2c_port
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cCommError<E> {
    /// I2C bus error
    I2c(E),
}

impl<I2C> SensorInterface for I2cInterface<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    type SensorError = I2cCommError<I2C::Error>;

    fn transaction(
        &mut self,
        address: u8,
        out: &[u8],
        response: &mut [u8],
    ) -> Result<(), Self::SensorError> {
        let res = if response.is_empty() {
            self.i2c_port.write(address, out)
        } else {
            self.i2c_port.write_read(address, out, response)
        };
        res.map_err(I2cCommError::I2c)
    }
}

impl<I2C> AsyncSensorInterface for I2cInterface<I2C>
where
    I2C: embedded_hal_async::i2c::I2c,
{
    type SensorError = I2cCommError<I2C::Error>;

    async fn transaction(
        &mut self,
        address: u8,
        out: &[u8],
        response: &mut [u8],
    ) -> Result<(), Self::SensorError> {
        let res = if response.is_empty() {
            self.i2c_port.write(address, out).await
        } else {
            self.i2c_port.write_read(address, out, response).await
        };
        res.map_err(I2cCommError::I2c)
    }
}
