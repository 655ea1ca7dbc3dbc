//! Sensor-defined constants and pure helper functions, straight from the
//! SHT2x/HTU21D datasheet: command opcodes, user-register layout, measurement
//! timing, checksum validation and the raw-to-physical conversions.

#[cfg(feature = "crc")]
use crc::{Algorithm, Crc};

#[cfg(feature = "defmt")]
use defmt::Format;

/// Fixed 7-bit bus address of the sensor.
pub const I2C_ADDR: u8 = 0x40;

/// Worst-case conversion time is 50 ms (14-bit temperature); wait a little
/// longer before reading back.
pub const MEASUREMENT_SETTLE_MS: u32 = 55;

/// Delay between read attempts while the sensor is still converting.
pub const READ_POLL_INTERVAL_MS: u32 = 1;

/// Read attempts before a measurement is reported as timed out.
pub const MAX_READ_ATTEMPTS: u32 = 100;

/// The sensor reboots in under 15 ms after a soft reset.
pub const SOFT_RESET_SETTLE_MS: u32 = 15;

/// The two least-significant bits of a raw reading are status flags, not
/// measurement data.
pub const STATUS_BITS_MASK: u16 = 0x0003;

/// User-register bits encoding the measurement resolution (bits 7 and 0).
pub const USER_REG_RESOLUTION_MASK: u8 = 0b1000_0001;

/// User-register bits unrelated to resolution (heater, OTP reload,
/// end-of-battery and the unassigned bits); these must survive a resolution
/// update unchanged.
pub const USER_REG_RESERVED_MASK: u8 = 0b0111_1110;

/// End-of-battery flag, set by the sensor when VDD drops below 2.25 V.
pub const USER_REG_END_OF_BATTERY: u8 = 1 << 6;

/// On-chip heater enable.
pub const USER_REG_HEATER_ENABLE: u8 = 1 << 2;

/// Disables reloading the calibration OTP before each measurement.
pub const USER_REG_OTP_RELOAD_DISABLE: u8 = 1 << 1;

/// Sentinel returned by the original Arduino library on a checksum failure.
/// Kept for callers porting code that matched on it; the driver itself
/// reports [`Error::ChecksumMismatch`](crate::Error::ChecksumMismatch).
pub const LEGACY_CHECKSUM_ERROR: u16 = 998;

/// Sentinel returned by the original Arduino library on a timeout. Kept for
/// callers porting code that matched on it; the driver itself reports
/// [`Error::Timeout`](crate::Error::Timeout).
pub const LEGACY_TIMEOUT_ERROR: u16 = 999;

/// Command opcodes understood by the sensor.
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Command {
    /// Trigger a temperature measurement, hold mode.
    TriggerTempHold = 0xE3,
    /// Trigger a relative humidity measurement, hold mode.
    TriggerRelHumidHold = 0xE5,
    /// Trigger a temperature measurement, no-hold mode.
    TriggerTempNoHold = 0xF3,
    /// Trigger a relative humidity measurement, no-hold mode.
    TriggerRelHumidNoHold = 0xF5,
    /// Write the user register.
    WriteUserRegister = 0xE6,
    /// Read the user register.
    ReadUserRegister = 0xE7,
    /// Soft reset, reboots the sensor with the user register at its default.
    SoftReset = 0xFE,
}

impl Command {
    /// Opcode as the single-byte bus frame it is sent as.
    pub fn bytes(self) -> [u8; 1] {
        [self as u8]
    }
}

/// Measurement resolution, as the pair of user-register bits 7 and 0.
///
/// Power-on default is [`Resolution::Rh12Temp14`].
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Resolution {
    /// 12-bit relative humidity, 14-bit temperature.
    Rh12Temp14 = 0x00,
    /// 8-bit relative humidity, 12-bit temperature.
    Rh8Temp12 = 0x01,
    /// 10-bit relative humidity, 13-bit temperature.
    Rh10Temp13 = 0x80,
    /// 11-bit relative humidity, 11-bit temperature.
    Rh11Temp11 = 0x81,
}

impl Resolution {
    /// The user-register bit pattern for this resolution.
    pub fn bits(self) -> u8 {
        self as u8
    }
}

/// CRC-8 parameters from the datasheet: polynomial x^8 + x^5 + x^4 + 1
/// (0x31), zero initial value, no reflection. This differs from the catalog
/// algorithms only in the initial value, so it is spelled out here.
#[cfg(feature = "crc")]
const CRC_8_SHT2X: Algorithm<u8> = Algorithm {
    width: 8,
    poly: 0x31,
    init: 0x00,
    refin: false,
    refout: false,
    xorout: 0x00,
    check: 0xA2,
    residue: 0x00,
};

#[cfg(feature = "crc")]
const CRC: Crc<u8> = Crc::<u8>::new(&CRC_8_SHT2X);

/// Check byte the sensor would append to `value`.
#[cfg(feature = "crc")]
pub(crate) fn checksum(value: u16) -> u8 {
    CRC.checksum(&value.to_be_bytes())
}

/// Whether a 16-bit reading and the check byte the sensor appended to it
/// form an uncorrupted transmission.
///
/// Equivalent to dividing the 24-bit message `(value << 8) | check` by the
/// generator polynomial and requiring a zero remainder, which is how the
/// datasheet describes it.
#[cfg(feature = "crc")]
pub fn checksum_valid(value: u16, check: u8) -> bool {
    checksum(value) == check
}

/// Clear the two status bits of a raw reading.
pub fn mask_status_bits(raw: u16) -> u16 {
    raw & !STATUS_BITS_MASK
}

/// Merge the resolution bits of `resolution_bits` into `register`, leaving
/// every non-resolution register bit untouched. Bits of `resolution_bits`
/// outside the resolution field are dropped.
pub fn merge_resolution(register: u8, resolution_bits: u8) -> u8 {
    (register & USER_REG_RESERVED_MASK) | (resolution_bits & USER_REG_RESOLUTION_MASK)
}

/// Convert a masked raw reading into relative humidity in percent.
///
/// RH = -6 + 125 * S_RH / 2^16 (datasheet section 6.1).
pub fn raw_rel_humid_to_percent(raw: u16) -> f32 {
    -6.0 + 125.0 / 65536.0 * raw as f32
}

/// Convert a masked raw reading into degrees Celsius.
///
/// T = -46.85 + 175.72 * S_T / 2^16 (datasheet section 6.2).
pub fn raw_temp_to_centigrade(raw: u16) -> f32 {
    -46.85 + 175.72 / 65536.0 * raw as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "crc")]
    #[test]
    fn checksum_matches_datasheet_vectors() {
        // Example transmissions from the HTU21D datasheet, page 15.
        assert_eq!(checksum(0x683A), 0x7C);
        assert_eq!(checksum(0x4E85), 0x6B);
        assert_eq!(checksum(0x00DC), 0x79);

        assert!(checksum_valid(0x683A, 0x7C));
        assert!(checksum_valid(0x4E85, 0x6B));
        assert!(!checksum_valid(0x683A, 0x7D));
    }

    #[cfg(feature = "crc")]
    #[test]
    fn checksum_is_deterministic() {
        for _ in 0..3 {
            assert_eq!(checksum(0x6230), 0x49);
        }
    }

    #[cfg(feature = "crc")]
    #[test]
    fn checksum_detects_every_single_bit_flip() {
        for value in 0..=u16::MAX {
            let check = checksum(value);
            assert!(checksum_valid(value, check));

            let message = (u32::from(value) << 8) | u32::from(check);
            for bit in 0..24 {
                let corrupted = message ^ (1 << bit);
                let bad_value = (corrupted >> 8) as u16;
                let bad_check = (corrupted & 0xFF) as u8;
                assert!(
                    !checksum_valid(bad_value, bad_check),
                    "missed single-bit corruption of {message:#08x} at bit {bit}"
                );
            }
        }
    }

    #[test]
    fn status_bits_are_cleared_and_nothing_else() {
        for raw in [0x0000u16, 0x0003, 0x6230, 0x683A, 0xFFFF] {
            let masked = mask_status_bits(raw);
            assert_eq!(masked & STATUS_BITS_MASK, 0);
            assert_eq!(masked & !STATUS_BITS_MASK, raw & !STATUS_BITS_MASK);
        }
    }

    #[test]
    fn merge_keeps_reserved_register_bits() {
        // Heater on, end-of-battery set, plus the unassigned bits.
        let register = 0b0101_0110;
        for resolution in [
            Resolution::Rh12Temp14,
            Resolution::Rh8Temp12,
            Resolution::Rh10Temp13,
            Resolution::Rh11Temp11,
        ] {
            let merged = merge_resolution(register, resolution.bits());
            assert_eq!(merged & USER_REG_RESERVED_MASK, register & USER_REG_RESERVED_MASK);
            assert_eq!(merged & USER_REG_RESOLUTION_MASK, resolution.bits());
        }
    }

    #[test]
    fn merge_drops_stray_resolution_bits() {
        // Only bits 7 and 0 of the argument may reach the register.
        let merged = merge_resolution(0b0000_0000, 0b0111_1110);
        assert_eq!(merged, 0b0000_0000);

        let merged = merge_resolution(0b0000_0000, 0b1111_1111);
        assert_eq!(merged, USER_REG_RESOLUTION_MASK);
    }

    #[test]
    fn conversion_anchor_points() {
        assert_eq!(raw_rel_humid_to_percent(0), -6.0);
        assert_eq!(raw_temp_to_centigrade(0), -46.85);

        // Approaches 119 %RH from below at full scale.
        let full_scale = raw_rel_humid_to_percent(u16::MAX);
        assert!(full_scale > 118.9 && full_scale < 119.0);
    }

    #[test]
    fn conversion_matches_datasheet_examples() {
        // 0x7C80 => 54.8 %RH, 0x683A (masked to 0x6838) => 24.7 C.
        assert!((raw_rel_humid_to_percent(0x7C80) - 54.8).abs() < 0.05);
        assert!((raw_temp_to_centigrade(0x6838) - 24.7).abs() < 0.05);
    }
}
