//! Async driver, built on the [`embedded-hal-async`] 1.0 traits.
//!
//! Same transaction protocol as [`blocking`](crate::blocking); the
//! conversion wait and the not-ready polling become suspension points.
//!
//! [`embedded-hal-async`]: https://github.com/rust-embedded/embedded-hal

use crate::hw_def::*;
use crate::types::*;

use embedded_hal_async::{delay::DelayNs, i2c::I2c};

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
    pub async fn humidity(&mut self) -> Result<f32, Error<E>> {
        let raw = self.read_measurement(Command::TriggerRelHumidHold).await?;
        Ok(raw_rel_humid_to_percent(raw))
    }

    /// Measure temperature in degrees Celsius
    pub async fn temperature(&mut self) -> Result<f32, Error<E>> {
        let raw = self.read_measurement(Command::TriggerTempHold).await?;
        Ok(raw_temp_to_centigrade(raw))
    }

    /// Read the user register
    pub async fn read_user_register(&mut self) -> Result<UserRegister, Error<E>> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(I2C_ADDR, &Command::ReadUserRegister.bytes(), &mut buf)
            .await
            .map_err(Error::I2c)?;
        Ok(UserRegister::from(buf[0]))
    }

    /// Set the measurement resolution, leaving the other user-register bits
    /// as they are on the device
    pub async fn set_resolution(&mut self, resolution: Resolution) -> Result<(), Error<E>> {
        let current = self.read_user_register().await?.raw();
        let merged = merge_resolution(current, resolution.bits());
        trace!("sht2x::set_resolution(): current={}, merged={}", current, merged);
        self.i2c
            .write(I2C_ADDR, &[Command::WriteUserRegister as u8, merged])
            .await
            .map_err(Error::I2c)
    }

    /// Soft reset; the user register comes back up at its power-on default
    pub async fn soft_reset(&mut self) -> Result<(), Error<E>> {
        self.i2c
            .write(I2C_ADDR, &Command::SoftReset.bytes())
            .await
            .map_err(Error::I2c)?;
        self.delay.delay_ms(SOFT_RESET_SETTLE_MS).await;
        Ok(())
    }

    /// Release the bus and delay resources
    pub fn release(self) -> (I2C, Delay) {
        (self.i2c, self.delay)
    }

    // One measurement transaction: trigger, wait out the conversion, read
    // MSB/LSB/check, validate, clear the status bits. Checksum and timeout
    // failures are not retried here; that is the caller's call.
    async fn read_measurement(&mut self, command: Command) -> Result<u16, Error<E>> {
        trace!("sht2x::read_measurement(): command={}", command as u8);
        self.i2c
            .write(I2C_ADDR, &command.bytes())
            .await
            .map_err(Error::I2c)?;

        self.delay.delay_ms(MEASUREMENT_SETTLE_MS).await;

        // The sensor answers reads with NACK until the conversion is done.
        let mut buf = [0u8; 3];
        let mut attempts = 0;
        while self.i2c.read(I2C_ADDR, &mut buf).await.is_err() {
            attempts += 1;
            if attempts >= MAX_READ_ATTEMPTS {
                warn!("sht2x::read_measurement(): sensor not ready after {} read attempts", attempts);
                return Err(Error::Timeout);
            }
            self.delay.delay_ms(READ_POLL_INTERVAL_MS).await;
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
