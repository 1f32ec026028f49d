//! Transport trait for device communication.
//!
//! The [`Transport`] trait abstracts over the physical link to the player
//! board. The production implementation is the serial transport in
//! `wavedeck-transport`; tests use `MockTransport` from
//! `wavedeck-test-harness` with scripted inbound byte chunks.
//!
//! The driver operates on a `Transport` rather than directly on a serial
//! port, so the framing/parsing logic can be exercised deterministically
//! without hardware.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;

/// Asynchronous byte-level transport to the player board.
///
/// Implementations handle buffering and error recovery at the physical
/// layer. Frame delimiting and payload interpretation are handled by the
/// driver that consumes this trait.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send raw bytes to the device.
    ///
    /// Implementations should not return until all bytes have been handed
    /// to the underlying transport (serial TX buffer). Commands are
    /// fire-and-forget at the protocol level, so there is no response to
    /// wait for here.
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Receive bytes from the device into the provided buffer.
    ///
    /// Returns the number of bytes actually read. Waits up to `timeout`
    /// for data to arrive; returns [`Error::Timeout`](crate::error::Error::Timeout)
    /// if nothing is received within the deadline. A zero timeout drains
    /// only bytes already buffered.
    async fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize>;

    /// Close the transport connection.
    ///
    /// After calling `close()`, subsequent `send()` and `receive()` calls
    /// should return [`Error::NotConnected`](crate::error::Error::NotConnected).
    async fn close(&mut self) -> Result<()>;

    /// Check whether the transport is currently connected.
    fn is_connected(&self) -> bool;
}
