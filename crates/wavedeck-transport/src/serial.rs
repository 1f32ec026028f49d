//! Serial port transport for the player board.
//!
//! Implements the [`Transport`] trait over a USB virtual COM port or a raw
//! UART. The board talks 8 data bits, 1 stop bit, no parity, no flow
//! control, at 57600 baud; there is nothing to negotiate, so the only
//! configuration is the port path and (for nonstandard bridges) the baud
//! rate.
//!
//! # Example
//!
//! ```no_run
//! use wavedeck_transport::SerialTransport;
//! use wavedeck_core::transport::Transport;
//! use std::time::Duration;
//!
//! # async fn example() -> wavedeck_core::Result<()> {
//! let mut transport = SerialTransport::open("/dev/ttyUSB0", 57_600).await?;
//!
//! // Request the firmware version string.
//! transport.send(&[0xF0, 0xAA, 0x05, 0x01, 0x55]).await?;
//!
//! // Drain whatever has arrived so far.
//! let mut buf = [0u8; 64];
//! let n = transport.receive(&mut buf, Duration::from_millis(50)).await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_serial::{SerialPortBuilderExt, SerialStream};

use wavedeck_core::error::{Error, Result};
use wavedeck_core::transport::Transport;

/// Serial port transport for the player board.
pub struct SerialTransport {
    /// The underlying serial port stream. `None` after `close()`.
    port: Option<SerialStream>,
    /// Port name for logging/debugging.
    port_name: String,
}

impl SerialTransport {
    /// Open a serial port with the board's fixed 8N1 settings.
    ///
    /// # Arguments
    ///
    /// * `port` - Serial port path (e.g. "/dev/ttyUSB0" on Linux, "COM3" on Windows)
    /// * `baud_rate` - Baud rate; the board runs at 57600
    pub async fn open(port: &str, baud_rate: u32) -> Result<Self> {
        tracing::debug!(port = %port, baud_rate, "opening serial port");

        let stream = tokio_serial::new(port, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .stop_bits(tokio_serial::StopBits::One)
            .parity(tokio_serial::Parity::None)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|e| {
                tracing::error!(port = %port, error = %e, "failed to open serial port");
                Error::Transport(format!("failed to open serial port {}: {}", port, e))
            })?;

        tracing::info!(port = %port, baud_rate, "serial port opened");

        Ok(Self {
            port: Some(stream),
            port_name: port.to_string(),
        })
    }

    /// Get the name of the serial port.
    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

#[async_trait]
impl Transport for SerialTransport {
    async fn send(&mut self, data: &[u8]) -> Result<()> {
        let port = self.port.as_mut().ok_or(Error::NotConnected)?;

        tracing::trace!(port = %self.port_name, bytes = data.len(), data = ?data, "sending frame");

        port.write_all(data).await.map_err(|e| {
            tracing::error!(port = %self.port_name, error = %e, "failed to send");
            if e.kind() == std::io::ErrorKind::BrokenPipe
                || e.kind() == std::io::ErrorKind::NotConnected
            {
                Error::ConnectionLost
            } else {
                Error::Io(e)
            }
        })?;

        // Flush so the frame hits the wire now; the protocol has no
        // retransmission, so a frame stuck in a buffer is a frame lost
        // to the caller's timing.
        port.flush().await.map_err(Error::Io)?;

        Ok(())
    }

    async fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize> {
        let port = self.port.as_mut().ok_or(Error::NotConnected)?;

        let result = tokio::time::timeout(timeout, port.read(buf)).await;

        match result {
            Ok(Ok(n)) => {
                tracing::trace!(port = %self.port_name, bytes = n, data = ?&buf[..n], "received data");
                Ok(n)
            }
            Ok(Err(e)) => {
                tracing::error!(port = %self.port_name, error = %e, "failed to receive");
                if e.kind() == std::io::ErrorKind::BrokenPipe
                    || e.kind() == std::io::ErrorKind::NotConnected
                {
                    Err(Error::ConnectionLost)
                } else {
                    Err(Error::Io(e))
                }
            }
            Err(_) => Err(Error::Timeout),
        }
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(mut port) = self.port.take() {
            tracing::debug!(port = %self.port_name, "closing serial port");
            if let Err(e) = port.flush().await {
                tracing::warn!(port = %self.port_name, error = %e, "flush before close failed");
            }
            // Dropping the stream closes the port.
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.port.is_some()
    }
}

impl Drop for SerialTransport {
    fn drop(&mut self) {
        if self.port.is_some() {
            tracing::debug!(port = %self.port_name, "SerialTransport dropped, closing port");
        }
    }
}
