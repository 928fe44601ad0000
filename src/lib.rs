//! Userspace driver for the PCA9685 16-channel PWM controller.
//!
//! Transactions go through an injected [`I2cTransport`]; the bundled
//! [`I2cTools`] implementation shells out to the `i2c-tools` utilities
//! (`i2cdetect`, `i2cget`, `i2cset`) instead of binding a kernel driver.

pub mod config;
pub mod i2c;
pub mod pca9685;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_utils;

pub use i2c::I2cTools;
pub use pca9685::{channel_registers, prescale_from_frequency, split_ticks};
pub use pca9685::{Pca9685, Pca9685Error};
pub use transport::{I2cTransport, TransportError};
