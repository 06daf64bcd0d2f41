use crate::constants::DEFAULT_ADDRESS;

/// Configuration settings for the SRF08 sensor.
///
/// Gain and range are only written to the device by `init`; when left unset
/// the device keeps its power-on values (max gain 31, range 0xFF, about 11m).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// The 7-bit i2c address the device currently answers on.
    pub address: u8,
    /// Max analogue gain, 0 to 31.
    pub gain: Option<u8>,
    /// Range register value; max range is `(range * 43mm) + 43mm`.
    pub range: Option<u8>,
}

impl Config {
    /// Creates a new `Config` for a device at `address`, with no overrides.
    pub fn new(address: u8) -> Config {
        Config {
            address,
            gain: None,
            range: None,
        }
    }

    /// Sets the device address for the configuration.
    pub fn address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Sets the max analogue gain written by `init`.
    pub fn gain(mut self, gain: u8) -> Self {
        self.gain = Some(gain);
        self
    }

    /// Sets the range register value written by `init`.
    ///
    /// Shortening the range lets the device be fired faster than the 65ms
    /// a full range cycle takes, at the cost of missing distant echoes.
    pub fn range(mut self, range: u8) -> Self {
        self.range = Some(range);
        self
    }
}

/// The default configuration uses address `0x70` and leaves the device's
/// gain and range untouched.
impl Default for Config {
    fn default() -> Config {
        Config::new(DEFAULT_ADDRESS)
    }
}
