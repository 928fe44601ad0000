use thiserror::Error;

/// I2C transaction errors
#[derive(Debug, Error)]
pub enum TransportError {
    /// The bus tool could not be executed at all
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The bus tool ran but reported failure
    #[error("{command} exited with code {code:?}: {stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// A read transaction returned something that is not a byte
    #[error("unparseable response from {command}: {output:?}")]
    Parse { command: String, output: String },
}

/// Single-byte I2C transaction capability.
///
/// Implementations issue one transaction per call against the device at
/// `address` on bus number `bus` and block until it completes. The
/// controller layer never sees how the transaction is carried out, only
/// whether it succeeded.
pub trait I2cTransport {
    /// Scan the bus for the device. Best effort, the device may not
    /// acknowledge a pure probe cycle.
    fn probe(&mut self, bus: u32, address: u8) -> Result<(), TransportError>;

    /// Read one byte from a register.
    fn read_byte(
        &mut self,
        bus: u32,
        address: u8,
        register: u8,
    ) -> Result<u8, TransportError>;

    /// Write one byte to a register.
    fn write_byte(
        &mut self,
        bus: u32,
        address: u8,
        register: u8,
        value: u8,
    ) -> Result<(), TransportError>;

    /// Write one raw byte with no register-address phase.
    fn write_raw(
        &mut self,
        bus: u32,
        address: u8,
        value: u8,
    ) -> Result<(), TransportError>;
}

impl<T> I2cTransport for &mut T
where
    T: I2cTransport,
{
    fn probe(&mut self, bus: u32, address: u8) -> Result<(), TransportError> {
        T::probe(self, bus, address)
    }

    fn read_byte(
        &mut self,
        bus: u32,
        address: u8,
        register: u8,
    ) -> Result<u8, TransportError> {
        T::read_byte(self, bus, address, register)
    }

    fn write_byte(
        &mut self,
        bus: u32,
        address: u8,
        register: u8,
        value: u8,
    ) -> Result<(), TransportError> {
        T::write_byte(self, bus, address, register, value)
    }

    fn write_raw(
        &mut self,
        bus: u32,
        address: u8,
        value: u8,
    ) -> Result<(), TransportError> {
        T::write_raw(self, bus, address, value)
    }
}
