//! Asynchronous driver event types.
//!
//! Events are emitted through a `tokio::sync::broadcast` channel as the
//! driver dispatches decoded responses during `poll()`. Show-control and
//! installation software subscribes to these for reactive cueing instead
//! of repeatedly scanning the voice table.

/// An event emitted by the driver when a device report is dispatched.
///
/// Subscribe via `WaveDeck::subscribe()` in the `wavedeck` crate. Delivery
/// is best-effort through a bounded broadcast channel; slow consumers may
/// miss events under heavy report traffic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckEvent {
    /// A track began sounding on a voice.
    TrackStarted {
        /// One-based track number (1..=4096).
        track: u16,
        /// Voice slot the track occupies.
        voice: u8,
    },

    /// A track stopped sounding on a voice.
    TrackStopped {
        /// One-based track number (1..=4096).
        track: u16,
        /// Voice slot the track was playing on.
        voice: u8,
    },

    /// The device's firmware version string arrived.
    VersionReceived {
        /// Version string as reported by the device (at most 22 characters).
        version: String,
    },

    /// The device's system info report arrived.
    SystemInfoReceived {
        /// Number of concurrent playback voices the firmware supports.
        voices: u8,
        /// Number of tracks found on the device's storage.
        tracks: u16,
    },
}
