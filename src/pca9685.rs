use std::thread;

use log::{debug, warn};
use thiserror::Error;

use crate::config::*;
use crate::transport::{I2cTransport, TransportError};

#[derive(Debug, Error)]
pub enum Pca9685Error {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A transport failure during the power-on sequence. The controller
    /// is unusable and must be rebuilt.
    #[error("device initialization failed: {0}")]
    Init(#[source] TransportError),

    #[error("channel {0} out of range, must be 0-15")]
    ChannelOutOfRange(u8),

    #[error("tick value {0} out of range, must be 0-4095")]
    TickOutOfRange(u16),

    #[error("pwm frequency {0} Hz invalid, must be positive")]
    InvalidFrequency(f64),
}

/// Compute the PRESCALE value for a PWM output frequency.
///
/// prescale = floor(25 MHz / (4096 * freq_hz) - 1 + 0.5)
///
/// The caller must pass a positive, finite frequency. The chip honors
/// roughly 24-1526 Hz; the formula accepts values outside that range but
/// the result saturates at the u8 bounds and the hardware may not follow
/// it.
pub fn prescale_from_frequency(freq_hz: f64) -> u8 {
    let mut prescale = f64::from(OSC_CLOCK_HZ);
    prescale /= f64::from(TICKS_PER_PERIOD);
    prescale /= freq_hz;
    prescale -= 1.0;
    debug!("estimated pre-scale: {prescale}");
    (prescale + 0.5).floor() as u8
}

/// Locate the four registers holding a channel's ON/OFF tick pair.
///
/// # Arguments
/// * `channel` - The channel index, 0-15
///
/// # Returns
/// * Ok(registers) for a valid channel
/// * Err(Pca9685Error::ChannelOutOfRange) otherwise, before any I/O
pub fn channel_registers(channel: u8) -> Result<ChannelRegisters, Pca9685Error> {
    if channel >= CHANNEL_COUNT {
        return Err(Pca9685Error::ChannelOutOfRange(channel));
    }
    let base = LED0_ON_L + 4 * channel;
    Ok(ChannelRegisters {
        on_l: base,
        on_h: base + 1,
        off_l: base + 2,
        off_h: base + 3,
    })
}

/// Split a 12-bit tick count into its low and high register bytes.
///
/// Callers must not pass values above [`TICK_MAX`]; the upper nibble of
/// the high byte must stay zero on the wire.
pub fn split_ticks(ticks: u16) -> (u8, u8) {
    ((ticks & 0xff) as u8, (ticks >> 8) as u8)
}

fn check_ticks(ticks: u16) -> Result<(), Pca9685Error> {
    if ticks > TICK_MAX {
        return Err(Pca9685Error::TickOutOfRange(ticks));
    }
    Ok(())
}

/// PCA9685 16-channel PWM controller on one bus address.
///
/// Holds an injected [`I2cTransport`] and sequences the documented chip
/// protocol over it. Register read-modify-write sequences are not atomic
/// across transactions, so a chip must have one logical owner at a time;
/// no internal locking is provided.
pub struct Pca9685<T: I2cTransport> {
    transport: T,
    bus: u32,
    address: u8,
}

impl<T: I2cTransport> Pca9685<T> {
    /// Bring up the controller on one bus address.
    ///
    /// Probes the bus (advisory only, the chip may not acknowledge a pure
    /// probe cycle), then runs the power-on sequence: zero every channel,
    /// MODE2 = OUTDRV, MODE1 = ALLCALL, and wake the oscillator with the
    /// required settle delays.
    ///
    /// # Arguments
    /// * `transport` - The I2C transport to issue transactions through
    /// * `bus` - The bus number
    /// * `address` - The 7-bit device address
    ///
    /// # Returns
    /// * Ok(controller) ready for frequency and channel writes
    /// * Err(Pca9685Error::Init) if any transaction of the power-on
    ///   sequence failed; no usable controller exists in that case
    pub fn new(transport: T, bus: u32, address: u8) -> Result<Self, Pca9685Error> {
        let mut controller = Self {
            transport,
            bus,
            address,
        };
        if let Err(err) = controller.transport.probe(bus, address) {
            warn!("bus probe failed: {err}");
        }
        controller.initialize().map_err(Pca9685Error::Init)?;
        Ok(controller)
    }

    pub fn into_inner(self) -> T {
        self.transport
    }

    pub fn inner(&self) -> &T {
        &self.transport
    }

    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    fn initialize(&mut self) -> Result<(), TransportError> {
        self.write_ticks(&ALL_CHANNELS, 0, 0)?;
        self.write_register(MODE2, OUTDRV)?;
        self.write_register(MODE1, ALLCALL)?;
        thread::sleep(OSC_SETTLE);
        let mode1 = self.read_register_raw(MODE1)?;
        debug!("mode1 = 0x{mode1:02X}");
        self.write_register(MODE1, mode1 & !SLEEP)?; // wake up
        thread::sleep(OSC_SETTLE);
        Ok(())
    }

    /// Set the PWM output frequency for all channels.
    ///
    /// PRESCALE only latches while the oscillator is asleep, so this puts
    /// the chip to sleep, writes the prescaler, restores the previous
    /// mode, and restarts PWM after the oscillator settle delay. A
    /// transport error part-way through leaves the chip indeterminate
    /// (likely still asleep); rebuild the controller in that case.
    ///
    /// # Arguments
    /// * `freq_hz` - Output frequency in hertz; the chip honors roughly
    ///   24-1526 Hz
    ///
    /// # Returns
    /// * Ok(()) if the full sleep/write/restart sequence completed
    pub fn set_pwm_freq(&mut self, freq_hz: f64) -> Result<(), Pca9685Error> {
        if !freq_hz.is_finite() || freq_hz <= 0.0 {
            return Err(Pca9685Error::InvalidFrequency(freq_hz));
        }
        debug!("setting PWM frequency to {freq_hz} Hz");
        let prescale = prescale_from_frequency(freq_hz);
        debug!("final pre-scale: {prescale}");
        let old_mode = self.read_register_raw(MODE1)?;
        debug!("oldmode = 0x{old_mode:02X}");
        self.write_register(MODE1, (old_mode & !RESTART) | SLEEP)?;
        self.write_register(PRESCALE, prescale)?;
        self.write_register(MODE1, old_mode)?;
        thread::sleep(OSC_SETTLE);
        self.write_register(MODE1, old_mode | RESTART)?;
        Ok(())
    }

    /// Set one channel's ON/OFF transition points.
    ///
    /// # Arguments
    /// * `channel` - The channel index, 0-15
    /// * `on` - Tick at which the output switches on, 0-4095
    /// * `off` - Tick at which the output switches off, 0-4095
    ///
    /// # Returns
    /// * Ok(()) if all four register writes completed
    /// * Err with a range error before any I/O for invalid arguments
    pub fn set_pwm(&mut self, channel: u8, on: u16, off: u16) -> Result<(), Pca9685Error> {
        let registers = channel_registers(channel)?;
        check_ticks(on)?;
        check_ticks(off)?;
        self.write_ticks(&registers, on, off)?;
        Ok(())
    }

    /// Set every channel's ON/OFF transition points in one broadcast.
    ///
    /// Targets the ALL_LED registers, so all 16 channels move without 16
    /// separate channel writes.
    pub fn set_all_pwm(&mut self, on: u16, off: u16) -> Result<(), Pca9685Error> {
        check_ticks(on)?;
        check_ticks(off)?;
        self.write_ticks(&ALL_CHANNELS, on, off)?;
        Ok(())
    }

    /// Reset the chip to power-on defaults via its General Call byte.
    ///
    /// This is a raw single-byte write with no register-address phase.
    /// Afterwards the frequency and every channel are back at power-on
    /// defaults; the caller must rebuild the controller (or replay the
    /// power-on and frequency setup) before further output is meaningful.
    pub fn software_reset(&mut self) -> Result<(), Pca9685Error> {
        self.transport.write_raw(self.bus, self.address, SWRST)?;
        Ok(())
    }

    /// Raw single-register read, exposed for diagnostics.
    pub fn read_register(&mut self, register: u8) -> Result<u8, Pca9685Error> {
        Ok(self.read_register_raw(register)?)
    }

    fn read_register_raw(&mut self, register: u8) -> Result<u8, TransportError> {
        self.transport.read_byte(self.bus, self.address, register)
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), TransportError> {
        self.transport
            .write_byte(self.bus, self.address, register, value)
    }

    fn write_ticks(
        &mut self,
        registers: &ChannelRegisters,
        on: u16,
        off: u16,
    ) -> Result<(), TransportError> {
        let (on_l, on_h) = split_ticks(on);
        let (off_l, off_h) = split_ticks(off);
        self.write_register(registers.on_l, on_l)?;
        self.write_register(registers.on_h, on_h)?;
        self.write_register(registers.off_l, off_l)?;
        self.write_register(registers.off_h, off_h)?;
        Ok(())
    }
}
