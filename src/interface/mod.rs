pub mod i2c;
#[cfg(test)]
pub mod mock_i2c_port;

/// A method of communicating with the sensor
pub trait SensorInterface {
    /// Interface error type
    type SensorError;

    /// Write `out` to the device at `address`, then, if `response` is not
    /// empty, read exactly `response.len()` bytes back.
    fn transaction(
        &mut self,
        address: u8,
        out: &[u8],
        response: &mut [u8],
    ) -> Result<(), Self::SensorError>;
}

/// Async counterpart of [`SensorInterface`]
pub trait AsyncSensorInterface {
    /// Interface error type
    type SensorError;

    /// See [`SensorInterface::transaction`]
    async fn transaction(
        &mut self,
        address: u8,
        out: &[u8],
        response: &mut [u8],
    ) -> Result<(), Self::SensorError>;
}

pub use self::i2c::{I2cCommError, I2cInterface};
