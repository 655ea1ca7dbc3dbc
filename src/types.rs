use crate::hw_def::*;

use core::fmt;

#[cfg(feature = "defmt")]
use defmt::Format;

/// All possible errors in this crate
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug, Eq, PartialEq)]
pub enum Error<E> {
    /// I²C communication error
    I2c(E),
    /// The sensor never delivered the 3-byte measurement within the polling
    /// budget
    Timeout,
    /// The measurement arrived but failed checksum validation
    #[cfg(feature = "crc")]
    ChecksumMismatch,
}

impl<E> Error<E> {
    /// The sentinel value the original Arduino library returned in place of
    /// this error, if it had one. Bus errors were not distinguished there.
    pub fn legacy_code(&self) -> Option<u16> {
        match self {
            Error::I2c(_) => None,
            Error::Timeout => Some(LEGACY_TIMEOUT_ERROR),
            #[cfg(feature = "crc")]
            Error::ChecksumMismatch => Some(LEGACY_CHECKSUM_ERROR),
        }
    }
}

/// Contents of the sensor's user register.
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UserRegister {
    raw: u8,
}

impl From<u8> for UserRegister {
    fn from(raw: u8) -> Self {
        Self { raw }
    }
}

impl UserRegister {
    /// Get the raw register byte
    pub fn raw(&self) -> u8 {
        self.raw
    }

    /// Configured measurement resolution (register bits 7 and 0)
    pub fn resolution(&self) -> Resolution {
        match self.raw & USER_REG_RESOLUTION_MASK {
            0x00 => Resolution::Rh12Temp14,
            0x01 => Resolution::Rh8Temp12,
            0x80 => Resolution::Rh10Temp13,
            _ => Resolution::Rh11Temp11,
        }
    }

    /// Supply voltage dropped below 2.25 V during the last measurement
    pub fn end_of_battery(&self) -> bool {
        self.raw & USER_REG_END_OF_BATTERY != 0
    }

    /// On-chip heater is enabled
    pub fn heater_enabled(&self) -> bool {
        self.raw & USER_REG_HEATER_ENABLE != 0
    }

    /// Reloading the calibration OTP before each measurement is disabled
    pub fn otp_reload_disabled(&self) -> bool {
        self.raw & USER_REG_OTP_RELOAD_DISABLE != 0
    }
}

impl fmt::Display for UserRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserRegister {{ 0x{:02x}; {:?} ", self.raw, self.resolution())?;
        if self.end_of_battery() {
            write!(f, "end_of_battery ")?;
        }
        if self.heater_enabled() {
            write!(f, "heater_enabled ")?;
        }
        if self.otp_reload_disabled() {
            write!(f, "otp_reload_disabled ")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_codes_match_the_arduino_library() {
        assert_eq!(Error::<()>::Timeout.legacy_code(), Some(999));
        #[cfg(feature = "crc")]
        assert_eq!(Error::<()>::ChecksumMismatch.legacy_code(), Some(998));
        assert_eq!(Error::I2c(()).legacy_code(), None);
    }

    #[test]
    fn user_register_fields() {
        // Power-on default: 12/14-bit resolution, OTP reload disabled.
        let reg = UserRegister::from(0x02);
        assert_eq!(reg.raw(), 0x02);
        assert_eq!(reg.resolution(), Resolution::Rh12Temp14);
        assert!(!reg.end_of_battery());
        assert!(!reg.heater_enabled());
        assert!(reg.otp_reload_disabled());

        let reg = UserRegister::from(0b1100_0101);
        assert_eq!(reg.resolution(), Resolution::Rh11Temp11);
        assert!(reg.end_of_battery());
        assert!(reg.heater_enabled());
        assert!(!reg.otp_reload_disabled());
    }

    #[test]
    fn user_register_display_lists_set_flags() {
        let rendered = format!("{}", UserRegister::from(0b0100_0100));
        assert!(rendered.contains("end_of_battery"));
        assert!(rendered.contains("heater_enabled"));
        assert!(!rendered.contains("otp_reload_disabled"));
    }
}
