//! Mock transport for deterministic testing of the driver.
//!
//! The player board's protocol is fire-and-forget on the command side and
//! unsolicited on the report side, so [`MockTransport`] is a scripted byte
//! source rather than a request/response matcher: tests queue inbound
//! chunks with [`queue_rx`](MockTransport::queue_rx) and each `receive()`
//! call yields at most one queued chunk. Chunk boundaries are preserved,
//! which lets tests split a frame across several `poll()` drains to
//! exercise partial-frame buffering.
//!
//! Everything sent through the transport is recorded in a [`SentLog`].
//! Grab a handle with [`sent_log`](MockTransport::sent_log) *before*
//! moving the mock into the driver, then assert on the frames afterwards.
//!
//! # Example
//!
//! ```
//! use wavedeck_test_harness::MockTransport;
//!
//! let mut mock = MockTransport::new();
//! let sent = mock.sent_log();
//! // A system-info response: 32 voices, 100 tracks.
//! mock.queue_rx(&[0xF0, 0xAA, 0x08, 0x82, 0x20, 0x64, 0x00, 0x55]);
//! # let _ = sent.frames();
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use wavedeck_core::error::{Error, Result};
use wavedeck_core::transport::Transport;

/// Shared record of every frame sent through a [`MockTransport`].
///
/// Clones share the same log, so a handle taken before the transport is
/// handed to the driver keeps observing sends made through the driver.
#[derive(Debug, Clone, Default)]
pub struct SentLog(Arc<Mutex<Vec<Vec<u8>>>>);

impl SentLog {
    /// Snapshot of all sent frames, one entry per `send()` call, in order.
    pub fn frames(&self) -> Vec<Vec<u8>> {
        self.0.lock().expect("sent log poisoned").clone()
    }

    /// Number of `send()` calls recorded so far.
    pub fn len(&self) -> usize {
        self.0.lock().expect("sent log poisoned").len()
    }

    /// `true` if nothing has been sent.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn record(&self, frame: &[u8]) {
        self.0.lock().expect("sent log poisoned").push(frame.to_vec());
    }
}

/// A mock [`Transport`] for testing the driver without hardware.
///
/// Queued inbound chunks are returned one per `receive()` call, in order.
/// When the queue is empty, `receive()` returns [`Error::Timeout`], which
/// is exactly how a real transport reports "nothing buffered" to a
/// zero-timeout drain.
#[derive(Debug, Default)]
pub struct MockTransport {
    /// Inbound byte chunks, one per future `receive()` call.
    rx_chunks: VecDeque<Vec<u8>>,
    /// Record of all bytes sent through this transport.
    sent: SentLog,
    /// Whether the transport is "connected".
    connected: bool,
}

impl MockTransport {
    /// Create a new mock transport in the connected state.
    pub fn new() -> Self {
        MockTransport {
            rx_chunks: VecDeque::new(),
            sent: SentLog::default(),
            connected: true,
        }
    }

    /// Queue a chunk of inbound bytes.
    ///
    /// Each queued chunk is delivered by exactly one `receive()` call
    /// (assuming the caller's buffer is large enough), so queuing a frame
    /// as several chunks simulates arbitrary serial fragmentation.
    pub fn queue_rx(&mut self, chunk: &[u8]) {
        self.rx_chunks.push_back(chunk.to_vec());
    }

    /// Handle onto the log of sent frames.
    pub fn sent_log(&self) -> SentLog {
        self.sent.clone()
    }

    /// Snapshot of all data sent through this transport so far.
    pub fn sent_data(&self) -> Vec<Vec<u8>> {
        self.sent.frames()
    }

    /// Number of queued inbound chunks not yet delivered.
    pub fn remaining_rx(&self) -> usize {
        self.rx_chunks.len()
    }

    /// Set the connected state.
    ///
    /// When `false`, subsequent `send()` and `receive()` calls return
    /// [`Error::NotConnected`].
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&mut self, data: &[u8]) -> Result<()> {
        if !self.connected {
            return Err(Error::NotConnected);
        }
        self.sent.record(data);
        Ok(())
    }

    async fn receive(&mut self, buf: &mut [u8], _timeout: Duration) -> Result<usize> {
        if !self.connected {
            return Err(Error::NotConnected);
        }

        match self.rx_chunks.pop_front() {
            Some(chunk) => {
                let n = chunk.len().min(buf.len());
                buf[..n].copy_from_slice(&chunk[..n]);
                // If the caller's buffer was too small, requeue the tail
                // so no scripted bytes are lost.
                if n < chunk.len() {
                    self.rx_chunks.push_front(chunk[n..].to_vec());
                }
                Ok(n)
            }
            None => Err(Error::Timeout),
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.connected = false;
        self.rx_chunks.clear();
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_sent_data() {
        let mut mock = MockTransport::new();
        mock.send(&[0xF0, 0xAA, 0x05, 0x01, 0x55]).await.unwrap();
        mock.send(&[0xF0, 0xAA, 0x05, 0x02, 0x55]).await.unwrap();

        let sent = mock.sent_data();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], vec![0xF0, 0xAA, 0x05, 0x01, 0x55]);
        assert_eq!(sent[1], vec![0xF0, 0xAA, 0x05, 0x02, 0x55]);
    }

    #[tokio::test]
    async fn sent_log_handle_survives_move() {
        let mut mock = MockTransport::new();
        let log = mock.sent_log();

        // Simulate the driver taking ownership.
        let mut boxed: Box<dyn Transport> = Box::new(mock);
        boxed.send(&[0x01, 0x02]).await.unwrap();

        assert_eq!(log.frames(), vec![vec![0x01, 0x02]]);
    }

    #[tokio::test]
    async fn delivers_chunks_in_order() {
        let mut mock = MockTransport::new();
        mock.queue_rx(&[0x01, 0x02]);
        mock.queue_rx(&[0x03]);

        let mut buf = [0u8; 8];
        let n = mock.receive(&mut buf, Duration::ZERO).await.unwrap();
        assert_eq!(&buf[..n], &[0x01, 0x02]);

        let n = mock.receive(&mut buf, Duration::ZERO).await.unwrap();
        assert_eq!(&buf[..n], &[0x03]);
    }

    #[tokio::test]
    async fn empty_queue_times_out() {
        let mut mock = MockTransport::new();
        let mut buf = [0u8; 8];
        let result = mock.receive(&mut buf, Duration::ZERO).await;
        assert!(matches!(result.unwrap_err(), Error::Timeout));
    }

    #[tokio::test]
    async fn small_buffer_requeues_tail() {
        let mut mock = MockTransport::new();
        mock.queue_rx(&[0xAA, 0xBB, 0xCC, 0xDD]);

        let mut buf = [0u8; 2];
        let n = mock.receive(&mut buf, Duration::ZERO).await.unwrap();
        assert_eq!(&buf[..n], &[0xAA, 0xBB]);

        let n = mock.receive(&mut buf, Duration::ZERO).await.unwrap();
        assert_eq!(&buf[..n], &[0xCC, 0xDD]);
    }

    #[tokio::test]
    async fn disconnect() {
        let mut mock = MockTransport::new();
        assert!(mock.is_connected());

        mock.close().await.unwrap();
        assert!(!mock.is_connected());

        let result = mock.send(&[0x01]).await;
        assert!(matches!(result.unwrap_err(), Error::NotConnected));

        let mut buf = [0u8; 8];
        let result = mock.receive(&mut buf, Duration::ZERO).await;
        assert!(matches!(result.unwrap_err(), Error::NotConnected));
    }
}
