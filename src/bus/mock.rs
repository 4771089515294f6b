//! Mock bus implementation for testing
//!
//! This module provides a mock bus channel that can be used to test the
//! register and command-framing layers without requiring actual hardware.

use crate::error::RegBusError;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::BusChannel;

/// Mock bus that simulates a half-duplex device transport
#[derive(Clone, Default)]
pub struct MockBus {
    /// Transactions written to the bus (outgoing), one entry per write
    pub tx_transactions: Arc<Mutex<Vec<Vec<u8>>>>,
    /// Byte stream to be returned by reads (incoming)
    pub rx_buffer: Arc<Mutex<VecDeque<u8>>>,
    /// Simulated error returned by the next read or write
    pub next_error: Arc<Mutex<Option<RegBusError>>>,
    /// Delays requested through the channel, in milliseconds
    pub delays: Arc<Mutex<Vec<u64>>>,
}

impl MockBus {
    pub fn new() -> Self {
        MockBus::default()
    }

    /// Queue data to be returned by subsequent reads
    pub fn queue_rx_data(&self, data: &[u8]) {
        let mut rx = self.rx_buffer.lock().unwrap();
        rx.extend(data);
    }

    /// Get all transactions written to the bus
    pub fn tx_transactions(&self) -> Vec<Vec<u8>> {
        self.tx_transactions.lock().unwrap().clone()
    }

    /// Get the most recent transaction written to the bus
    pub fn last_tx(&self) -> Option<Vec<u8>> {
        self.tx_transactions.lock().unwrap().last().cloned()
    }

    /// Get the delays requested so far
    pub fn delays(&self) -> Vec<u64> {
        self.delays.lock().unwrap().clone()
    }

    /// Clear all buffers
    pub fn clear(&self) {
        self.tx_transactions.lock().unwrap().clear();
        self.rx_buffer.lock().unwrap().clear();
        self.delays.lock().unwrap().clear();
    }

    /// Set an error to be returned on the next read or write
    pub fn set_next_error(&self, error: RegBusError) {
        *self.next_error.lock().unwrap() = Some(error);
    }

    fn take_error(&self) -> Option<RegBusError> {
        self.next_error.lock().unwrap().take()
    }
}

impl BusChannel for MockBus {
    fn write_raw(&mut self, bytes: &[u8]) -> Result<(), RegBusError> {
        if let Some(error) = self.take_error() {
            return Err(error);
        }
        self.tx_transactions.lock().unwrap().push(bytes.to_vec());
        Ok(())
    }

    fn read_raw(&mut self, len: usize) -> Result<Vec<u8>, RegBusError> {
        if let Some(error) = self.take_error() {
            return Err(error);
        }
        let mut rx = self.rx_buffer.lock().unwrap();
        if rx.len() < len {
            return Err(RegBusError::ShortRead {
                expected: len,
                actual: rx.len(),
            });
        }
        Ok(rx.drain(..len).collect())
    }

    fn delay(&mut self, ms: u64) {
        self.delays.lock().unwrap().push(ms);
    }
}
