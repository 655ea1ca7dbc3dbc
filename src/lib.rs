//! This is a platform-agnostic Rust driver for the Sensirion SHT20/SHT21/SHT25
//! and TE MEAS HTU21D humidity and temperature digital sensors using the
//! [`embedded-hal`] or [`embedded-hal-async`] traits.
//!
//! [`embedded-hal`]: https://github.com/rust-embedded/embedded-hal/tree/master/embedded-hal
//! [`embedded-hal-async`]: https://github.com/rust-embedded/embedded-hal/tree/master/embedded-hal-async
//!
//! This driver allows you to:
//! - Measure relative humidity and temperature using the hold-mode trigger
//!   commands, with the conversion wait and data-ready polling handled for you.
//! - Validate every measurement against the check byte the sensor appends.
//! - Change the measurement resolution without disturbing the heater and
//!   status bits of the user register.
//! - Read the user register (resolution, heater enable, end-of-battery).
//! - Trigger a soft reset.
//! - Blocking API support.
//! - Async API support.
//!
//! ## Features
//!
//! - `async`: Enables async API.
//! - `blocking`: Enables blocking API.
//! - `crc`: Checks received CRC against computed CRC.
//! - `defmt`: Enables logging using the `defmt` framework.
//! - `log`: Enables logging using the `log` framework.
//!
//! ## Supported devices: SHT20, SHT21, SHT25, HTU21D
//!
//! The sensor answers on the fixed bus address `0x40` and returns every
//! measurement as a 16-bit big-endian reading followed by a CRC-8 check byte.
//! The two least-significant bits of the reading are status flags and are
//! cleared before conversion. Worst-case conversion time at full resolution
//! is about 50 ms.
//!
//! Datasheets:
//!   [SHT21](https://sensirion.com/media/documents/120BBE4C/63500094/Sensirion_Datasheet_Humidity_Sensor_SHT21.pdf)
//!   [HTU21D](https://cdn-shop.adafruit.com/datasheets/1899_HTU21D.pdf)
//!
//! To use this driver, import this crate and an `embedded_hal` or
//! `embedded_hal_async` implementation, then instantiate the device.
//!
//! ## Blocking Example:
//!
//! ```
//! # use embedded_hal_mock::eh1::delay::NoopDelay;
//! # use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};
//! # fn main() -> Result<(), sht2x::Error<embedded_hal::i2c::ErrorKind>> {
//! use sht2x::Sht2x;
//!
//! # let expectations = [
//! #     Transaction::write(0x40, vec![0xE5]),
//! #     Transaction::read(0x40, vec![0x62, 0x30, 0x49]),
//! # ];
//! # let i2c = I2cMock::new(&expectations);
//! # let delay = NoopDelay::new();
//! // Platform-specific: any embedded_hal::i2c::I2c and
//! // embedded_hal::delay::DelayNs instances.
//! let mut sensor = Sht2x::new(i2c, delay);
//!
//! let rh = sensor.humidity()?;
//! println!("{rh:.1} %RH");
//! # let (mut i2c, _) = sensor.release();
//! # i2c.done();
//! # Ok(())
//! # }
//! ```
//!
//! ## Async Example:
//!
//! ```no_run
//! # async fn example<I2C, Delay>(i2c: I2C, delay: Delay) -> Result<(), sht2x::Error<I2C::Error>>
//! # where
//! #     I2C: embedded_hal_async::i2c::I2c,
//! #     Delay: embedded_hal_async::delay::DelayNs,
//! # {
//! use sht2x::asynch::Sht2x;
//!
//! let mut sensor = Sht2x::new(i2c, delay);
//!
//! let rh = sensor.humidity().await?;
//! let temp = sensor.temperature().await?;
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(not(test), no_std)]

#[cfg(not(any(feature = "async", feature = "blocking")))]
compile_error!("At least one of \"async\" and \"blocking\" features must be enabled");

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("Features \"defmt\" and \"log\" are mutually exclusive and cannot be enabled together");

#[cfg(feature = "async")]
pub mod asynch;
#[cfg(feature = "blocking")]
pub mod blocking;
mod hw_def;
mod types;

pub use crate::{hw_def::*, types::*};

#[cfg(feature = "blocking")]
pub use crate::blocking::Sht2x;
