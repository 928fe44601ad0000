use std::collections::VecDeque;

use crate::transport::{I2cTransport, TransportError};

/// One recorded transport call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    Probe {
        bus: u32,
        address: u8,
    },
    ReadByte {
        bus: u32,
        address: u8,
        register: u8,
    },
    WriteByte {
        bus: u32,
        address: u8,
        register: u8,
        value: u8,
    },
    WriteRaw {
        bus: u32,
        address: u8,
        value: u8,
    },
}

/// Transport double recording every transaction in order.
///
/// Reads are served from a scripted byte queue. Setting `fail_at` makes
/// the transaction with that index fail after being recorded, standing in
/// for a bus error mid-sequence.
pub struct FakeTransport {
    pub transactions: Vec<Transaction>,
    pub read_data: VecDeque<u8>,
    pub fail_at: Option<usize>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self {
            transactions: Vec::new(),
            read_data: VecDeque::new(),
            fail_at: None,
        }
    }

    pub fn new_with_read_data(read_data: &[u8]) -> Self {
        Self {
            transactions: Vec::new(),
            read_data: read_data.iter().copied().collect(),
            fail_at: None,
        }
    }

    pub fn transactions_as_ref(&self) -> &[Transaction] {
        self.transactions.as_slice()
    }

    fn record(&mut self, transaction: Transaction) -> Result<(), TransportError> {
        self.transactions.push(transaction);
        if self.fail_at == Some(self.transactions.len() - 1) {
            return Err(TransportError::CommandFailed {
                command: "fake".to_string(),
                code: Some(1),
                stderr: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

impl I2cTransport for FakeTransport {
    fn probe(&mut self, bus: u32, address: u8) -> Result<(), TransportError> {
        self.record(Transaction::Probe { bus, address })
    }

    fn read_byte(
        &mut self,
        bus: u32,
        address: u8,
        register: u8,
    ) -> Result<u8, TransportError> {
        self.record(Transaction::ReadByte {
            bus,
            address,
            register,
        })?;
        Ok(self
            .read_data
            .pop_front()
            .expect("fake transport read past scripted data"))
    }

    fn write_byte(
        &mut self,
        bus: u32,
        address: u8,
        register: u8,
        value: u8,
    ) -> Result<(), TransportError> {
        self.record(Transaction::WriteByte {
            bus,
            address,
            register,
            value,
        })
    }

    fn write_raw(
        &mut self,
        bus: u32,
        address: u8,
        value: u8,
    ) -> Result<(), TransportError> {
        self.record(Transaction::WriteRaw { bus, address, value })
    }
}
