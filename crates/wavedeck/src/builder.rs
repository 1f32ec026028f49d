//! Builder for constructing a [`WaveDeck`].

use std::time::Duration;

use wavedeck_core::error::{Error, Result};
use wavedeck_core::transport::Transport;
use wavedeck_core::types::VoiceMode;
use wavedeck_transport::{SerialTransport, DEFAULT_BAUD_RATE};

use crate::deck::WaveDeck;

/// Builder for [`WaveDeck`] instances.
///
/// # Example
///
/// ```no_run
/// use wavedeck::{DeckBuilder, VoiceMode};
///
/// # async fn example() -> wavedeck::Result<()> {
/// let mut deck = DeckBuilder::new()
///     .voice_mode(VoiceMode::Stereo)
///     .serial_port("/dev/ttyUSB0")
///     .build()
///     .await?;
/// deck.start().await?;
/// # Ok(())
/// # }
/// ```
pub struct DeckBuilder {
    voice_mode: VoiceMode,
    serial_port: Option<String>,
    baud_rate: u32,
    read_timeout: Duration,
}

impl DeckBuilder {
    /// Create a builder with defaults: stereo firmware, factory baud rate,
    /// zero read timeout (polls drain only already-buffered bytes).
    pub fn new() -> Self {
        DeckBuilder {
            voice_mode: VoiceMode::Stereo,
            serial_port: None,
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: Duration::ZERO,
        }
    }

    /// Set the firmware voice mode, which sizes the driver's voice table.
    pub fn voice_mode(mut self, mode: VoiceMode) -> Self {
        self.voice_mode = mode;
        self
    }

    /// Set the serial port path (e.g. `/dev/ttyUSB0` or `COM3`).
    /// Required for [`build`](Self::build).
    pub fn serial_port(mut self, port: &str) -> Self {
        self.serial_port = Some(port.to_string());
        self
    }

    /// Override the baud rate. The device ships at
    /// [`DEFAULT_BAUD_RATE`].
    pub fn baud_rate(mut self, baud: u32) -> Self {
        self.baud_rate = baud;
        self
    }

    /// Set how long a poll waits on an empty transport before concluding
    /// nothing is buffered. Zero (the default) never blocks.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Build a deck over an already-constructed transport. This is how
    /// tests wire in a mock.
    pub fn build_with_transport(self, transport: Box<dyn Transport>) -> WaveDeck {
        WaveDeck::new(transport, self.voice_mode, self.read_timeout)
    }

    /// Open the configured serial port and build a deck over it.
    pub async fn build(self) -> Result<WaveDeck> {
        let port = self
            .serial_port
            .as_deref()
            .ok_or_else(|| Error::InvalidParameter("serial port not set".to_string()))?;
        let transport = SerialTransport::open(port, self.baud_rate).await?;
        Ok(WaveDeck::new(
            Box::new(transport),
            self.voice_mode,
            self.read_timeout,
        ))
    }
}

impl Default for DeckBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wavedeck_test_harness::MockTransport;

    #[tokio::test]
    async fn build_without_port_fails() {
        let result = DeckBuilder::new().build().await;
        assert!(matches!(result.unwrap_err(), Error::InvalidParameter(_)));
    }

    #[tokio::test]
    async fn defaults_are_stereo_and_connected_transport() {
        let deck = DeckBuilder::new().build_with_transport(Box::new(MockTransport::new()));
        assert_eq!(deck.configured_voices(), 18);
        assert!(deck.is_connected());
    }

    #[tokio::test]
    async fn voice_mode_sizes_the_table() {
        let deck = DeckBuilder::new()
            .voice_mode(VoiceMode::Mono)
            .build_with_transport(Box::new(MockTransport::new()));
        assert_eq!(deck.configured_voices(), 32);
    }
}
