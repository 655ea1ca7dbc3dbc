//! Blocking driver, built on the [`embedded-hal`] 1.0 traits.
//!
//! [`embedded-hal`]: https://github.com/rust-embedded/embedded-hal

use crate::hw_def::*;
use crate::types::*;

use embedded_hal::{delay::DelayNs, i2c::I2c};

cfg_if::cfg_if! {
    if #[cfg(feature = "defmt")] {
        use defmt::{trace, warn};
    } else if #[cfg(feature = "log")] {
        use log::{trace, warn};
    } else {
        macro_rules! trace {
            ($($arg:tt)*) => {};
        }
        macro_rules! warn {
            ($($arg:tt)*) => {};
        }
    }
}

/// SHT2x/HTU21D device driver
#[derive(Debug)]
pub struct Sht2x<I2C, Delay> {
    i2c: I2C,
    delay: Delay,
}

impl<I2C, Delay, E> Sht2x<I2C, Delay>
where
    I2C: I2c<Error = E>,
    Delay: DelayNs,
{
    /// Create a new SHT2x driver instance
    pub fn new(i2c: I2C, delay: Delay) -> Self {
        Self { i2c, delay }
    }

    /// Measure relative humidity in percent
    pub fn humidity(&mut self) -> Result<f32, Error<E>> {
        let raw = self.read_measurement(Command::TriggerRelHumidHold)?;
        Ok(raw_rel_humid_to_percent(raw))
    }

    /// Measure temperature in degrees Celsius
    pub fn temperature(&mut self) -> Result<f32, Error<E>> {
        let raw = self.read_measurement(Command::TriggerTempHold)?;
        Ok(raw_temp_to_centigrade(raw))
    }

    /// Read the user register
    pub fn read_user_register(&mut self) -> Result<UserRegister, Error<E>> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(I2C_ADDR, &Command::ReadUserRegister.bytes(), &mut buf)
            .map_err(Error::I2c)?;
        Ok(UserRegister::from(buf[0]))
    }

    /// Set the measurement resolution, leaving the other user-register bits
    /// as they are on the device
    pub fn set_resolution(&mut self, resolution: Resolution) -> Result<(), Error<E>> {
        let current = self.read_user_register()?.raw();
        let merged = merge_resolution(current, resolution.bits());
        trace!("sht2x::set_resolution(): current={}, merged={}", current, merged);
        self.i2c
            .write(I2C_ADDR, &[Command::WriteUserRegister as u8, merged])
            .map_err(Error::I2c)
    }

    /// Soft reset; the user register comes back up at its power-on default
    pub fn soft_reset(&mut self) -> Result<(), Error<E>> {
        self.i2c
            .write(I2C_ADDR, &Command::SoftReset.bytes())
            .map_err(Error::I2c)?;
        self.delay.delay_ms(SOFT_RESET_SETTLE_MS);
        Ok(())
    }

    /// Release the bus and delay resources
    pub fn release(self) -> (I2C, Delay) {
        (self.i2c, self.delay)
    }

    // One measurement transaction: trigger, wait out the conversion, read
    // MSB/LSB/check, validate, clear the status bits. Checksum and timeout
    // failures are not retried here; that is the caller's call.
    fn read_measurement(&mut self, command: Command) -> Result<u16, Error<E>> {
        trace!("sht2x::read_measurement(): command={}", command as u8);
        self.i2c
            .write(I2C_ADDR, &command.bytes())
            .map_err(Error::I2c)?;

        self.delay.delay_ms(MEASUREMENT_SETTLE_MS);

        // The sensor answers reads with NACK until the conversion is done.
        let mut buf = [0u8; 3];
        let mut attempts = 0;
        while self.i2c.read(I2C_ADDR, &mut buf).is_err() {
            attempts += 1;
            if attempts >= MAX_READ_ATTEMPTS {
                warn!("sht2x::read_measurement(): sensor not ready after {} read attempts", attempts);
                return Err(Error::Timeout);
            }
            self.delay.delay_ms(READ_POLL_INTERVAL_MS);
        }

        let raw = u16::from_be_bytes([buf[0], buf[1]]);
        #[cfg(feature = "crc")]
        if !checksum_valid(raw, buf[2]) {
            warn!("sht2x::read_measurement(): checksum mismatch: raw={}, check={}", raw, buf[2]);
            return Err(Error::ChecksumMismatch);
        }

        Ok(mask_status_bits(raw))
    }
}
