// SRF08 register map, per the Devantech SRF08 datasheet

/// The i2c address the SRF08 ships with (0xE0 in 8-bit notation)
pub const DEFAULT_ADDRESS: u8 = 0x70;

// Register addresses
/// Command register. Reading it returns the software revision.
pub const CMD: u8 = 0x00;
/// Light sensor reading, updated by every ranging cycle.
/// On write this is the max analogue gain register.
pub const LIGHT: u8 = 0x01;
/// First byte of the 2-byte ranging result.
/// On write this is the range register.
pub const RESULT: u8 = 0x02;
pub const GAIN_WRITE_REGISTER: u8 = 0x01;
pub const RANGE_WRITE_REGISTER: u8 = 0x02;

// Trailing bytes of every address change write
pub const GAIN_REGISTER: u8 = 0x00;
pub const RANGE_LOCATION: u8 = 0xFF;

// Ranging commands
pub const INCH: u8 = 0x50;
pub const CM: u8 = 0x51;
pub const MS: u8 = 0x52;

// Must precede the address write, in this order
pub const ADDRESS_UNLOCK_SEQUENCE: [u8; 3] = [0xA0, 0xAA, 0xA5];

/// The ranging result is only valid this long after the command is issued
pub const RANGING_DELAY_MS: u32 = 80;

pub const MAX_GAIN: u8 = 31;
/// Echo 0 is the nearest object, up to echo 16
pub const MAX_ECHOES: usize = 17;

/// Unit the SRF08 reports a ranging result in
#[derive(PartialEq, Eq, Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DistanceUnit {
    Inches,
    #[default]
    Centimeters,
    /// Echo round trip time
    EchoTime,
}

impl DistanceUnit {
    /// The ranging command byte for this unit
    pub const fn command(self) -> u8 {
        match self {
            DistanceUnit::Inches => INCH,
            DistanceUnit::Centimeters => CM,
            DistanceUnit::EchoTime => MS,
        }
    }
}

impl TryFrom<u8> for DistanceUnit {
    type Error = u8;

    /// Accepts only the three ranging command bytes
    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            INCH => Ok(DistanceUnit::Inches),
            CM => Ok(DistanceUnit::Centimeters),
            MS => Ok(DistanceUnit::EchoTime),
            other => Err(other),
        }
    }
}

impl TryFrom<char> for DistanceUnit {
    type Error = char;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            'i' => Ok(DistanceUnit::Inches),
            'c' => Ok(DistanceUnit::Centimeters),
            'm' => Ok(DistanceUnit::EchoTime),
            other => Err(other),
        }
    }
}

/// The four writes that reprogram the device address.
/// The IC takes the 8-bit form of the address, so the low bit is reserved.
/// `None` if `new_address` does not fit in 7 bits.
pub(crate) fn address_change_payloads(new_address: u8) -> Option<[[u8; 4]; 4]> {
    let address_byte = new_address.checked_mul(2)?;
    let [a, b, c] = ADDRESS_UNLOCK_SEQUENCE;
    Some([
        [CMD, a, GAIN_REGISTER, RANGE_LOCATION],
        [CMD, b, GAIN_REGISTER, RANGE_LOCATION],
        [CMD, c, GAIN_REGISTER, RANGE_LOCATION],
        [CMD, address_byte, GAIN_REGISTER, RANGE_LOCATION],
    ])
}

/// Register holding the first byte of echo `index`
pub(crate) const fn echo_register(index: usize) -> u8 {
    RESULT + (index as u8) * 2
}
