//! The driver facade.
//!
//! [`WaveDeck`] owns the transport, the stream parser, and the voice
//! table, and exposes the device's commands as methods. The model is
//! poll-driven: the device pushes unsolicited bytes (track reports,
//! power-up banners) whenever it likes, and the host absorbs them by
//! calling [`poll`](WaveDeck::poll) -- directly, or implicitly through
//! any of the query methods. Nothing blocks waiting for a response.

use std::time::Duration;

use tokio::sync::broadcast;
use tracing::debug;

use wavedeck_core::error::{Error, Result};
use wavedeck_core::events::DeckEvent;
use wavedeck_core::transport::Transport;
use wavedeck_core::types::VoiceMode;

use crate::commands::{self, TrackAction, FLAG_LOCK};
use crate::frame::{decode, Response};
use crate::parser::StreamParser;
use crate::voices::VoiceTable;

/// Read buffer size for a single transport drain. Frames are at most 32
/// bytes, so this comfortably holds a burst of reports.
const READ_BUF_LEN: usize = 64;

/// Event channel capacity. Slow subscribers that fall further behind than
/// this lose the oldest events, per `tokio::sync::broadcast` semantics.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Driver for a wav-playback deck attached over a serial transport.
///
/// Created via [`DeckBuilder`](crate::DeckBuilder). Commands are
/// fire-and-forget; device state arrives asynchronously and is surfaced
/// through the query methods and the [`DeckEvent`] broadcast channel.
pub struct WaveDeck {
    transport: Box<dyn Transport>,
    parser: StreamParser,
    voices: VoiceTable,
    version: Option<String>,
    voice_count: Option<u8>,
    track_count: Option<u16>,
    event_tx: broadcast::Sender<DeckEvent>,
    read_timeout: Duration,
}

impl std::fmt::Debug for WaveDeck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaveDeck")
            .field("version", &self.version)
            .field("voice_count", &self.voice_count)
            .field("track_count", &self.track_count)
            .field("read_timeout", &self.read_timeout)
            .finish_non_exhaustive()
    }
}

impl WaveDeck {
    pub(crate) fn new(
        transport: Box<dyn Transport>,
        mode: VoiceMode,
        read_timeout: Duration,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        WaveDeck {
            transport,
            parser: StreamParser::new(),
            voices: VoiceTable::new(mode),
            version: None,
            voice_count: None,
            track_count: None,
            event_tx,
            read_timeout,
        }
    }

    /// Subscribe to device events.
    ///
    /// Events are emitted during [`poll`](Self::poll) as inbound frames are
    /// dispatched. Each subscriber gets every event from the moment it
    /// subscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<DeckEvent> {
        self.event_tx.subscribe()
    }

    /// Initialize the session: discard any stale inbound bytes, then
    /// request the firmware version and system info.
    ///
    /// Cached device info is cleared first, so queries answer `None` until
    /// the fresh responses arrive. Call this once after opening the
    /// connection, then [`poll`](Self::poll) until
    /// [`version`](Self::version) and [`track_count`](Self::track_count)
    /// report `Some`.
    pub async fn start(&mut self) -> Result<()> {
        self.version = None;
        self.voice_count = None;
        self.track_count = None;
        self.flush().await?;
        debug!("requesting firmware version and system info");
        self.transport.send(&commands::cmd_get_version()).await?;
        self.transport.send(&commands::cmd_get_sys_info()).await?;
        Ok(())
    }

    /// Discard all buffered inbound bytes and reset parser and voice state.
    ///
    /// Useful after a device reset, when anything already in flight no
    /// longer describes reality.
    pub async fn flush(&mut self) -> Result<()> {
        self.parser.reset();
        self.voices.clear();
        let mut buf = [0u8; READ_BUF_LEN];
        loop {
            match self.transport.receive(&mut buf, self.read_timeout).await {
                Ok(0) | Err(Error::Timeout) => break,
                Ok(_) => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Drain buffered inbound bytes and dispatch every complete frame.
    ///
    /// Returns once the transport has nothing more buffered (a read
    /// timeout, or a zero-length read). Track reports update the voice
    /// table, version and system-info responses fill the cached device
    /// info, and every dispatched response emits a [`DeckEvent`] where one
    /// applies. Safe to call as often as you like; an idle call is cheap.
    pub async fn poll(&mut self) -> Result<()> {
        let mut buf = [0u8; READ_BUF_LEN];
        loop {
            let n = match self.transport.receive(&mut buf, self.read_timeout).await {
                Ok(0) | Err(Error::Timeout) => break,
                Ok(n) => n,
                Err(e) => return Err(e),
            };
            for payload in self.parser.feed(&buf[..n]) {
                self.dispatch(&payload);
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, payload: &[u8]) {
        let Some(response) = decode(payload) else {
            return;
        };
        match response {
            Response::TrackReport {
                track,
                voice,
                started,
            } => {
                debug!(track, voice, started, "track report");
                self.voices.apply_report(track, voice, started);
                let event = if started {
                    DeckEvent::TrackStarted { track, voice }
                } else {
                    DeckEvent::TrackStopped { track, voice }
                };
                let _ = self.event_tx.send(event);
            }
            Response::Version(version) => {
                debug!(version = %version, "firmware version received");
                let _ = self.event_tx.send(DeckEvent::VersionReceived {
                    version: version.clone(),
                });
                self.version = Some(version);
            }
            Response::SystemInfo { voices, tracks } => {
                debug!(voices, tracks, "system info received");
                self.voice_count = Some(voices);
                self.track_count = Some(tracks);
                let _ = self
                    .event_tx
                    .send(DeckEvent::SystemInfoReceived { voices, tracks });
            }
            Response::Unknown { kind, data } => {
                debug!(kind, len = data.len(), "ignoring unrecognized response");
            }
        }
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// The voice a track is currently playing on, if any.
    ///
    /// Polls first, so the answer reflects every report the device has
    /// delivered so far. Accurate only while reporting is enabled via
    /// [`set_reporting`](Self::set_reporting).
    pub async fn is_track_playing(&mut self, track: u16) -> Result<Option<usize>> {
        self.poll().await?;
        Ok(self.voices.find(track))
    }

    /// The firmware version string, once received.
    pub async fn version(&mut self) -> Result<Option<String>> {
        self.poll().await?;
        Ok(self.version.clone())
    }

    /// The number of tracks on the device's storage, once received.
    pub async fn track_count(&mut self) -> Result<Option<u16>> {
        self.poll().await?;
        Ok(self.track_count)
    }

    /// The device's reported voice capacity, once received.
    ///
    /// This is what the hardware says; the driver's own table is sized
    /// from the configured [`VoiceMode`].
    pub async fn voice_count(&mut self) -> Result<Option<u8>> {
        self.poll().await?;
        Ok(self.voice_count)
    }

    /// Number of voice slots in the driver's occupancy table.
    pub fn configured_voices(&self) -> usize {
        self.voices.capacity()
    }

    // ---------------------------------------------------------------
    // Track transport
    // ---------------------------------------------------------------

    /// Play a track alone: everything already sounding is stopped first.
    ///
    /// `out` selects the target output (masked to the low 3 bits); `lock`
    /// pins the track to that output for its lifetime.
    pub async fn track_play_solo(&mut self, track: u16, out: u8, lock: bool) -> Result<()> {
        debug!(track, out, lock, "play solo");
        self.track_control(TrackAction::PlaySolo, track, out, lock_flags(lock))
            .await
    }

    /// Play a track mixed with whatever is already sounding.
    pub async fn track_play_poly(&mut self, track: u16, out: u8, lock: bool) -> Result<()> {
        debug!(track, out, lock, "play poly");
        self.track_control(TrackAction::PlayPoly, track, out, lock_flags(lock))
            .await
    }

    /// Load a track paused at its first sample, ready for
    /// [`resume_all_in_sync`](Self::resume_all_in_sync).
    pub async fn track_load(&mut self, track: u16, out: u8, lock: bool) -> Result<()> {
        debug!(track, out, lock, "load");
        self.track_control(TrackAction::Load, track, out, lock_flags(lock))
            .await
    }

    /// Stop a track.
    pub async fn track_stop(&mut self, track: u16) -> Result<()> {
        debug!(track, "stop");
        self.track_control(TrackAction::Stop, track, 0, 0).await
    }

    /// Pause a track, holding its position.
    pub async fn track_pause(&mut self, track: u16) -> Result<()> {
        debug!(track, "pause");
        self.track_control(TrackAction::Pause, track, 0, 0).await
    }

    /// Resume a paused track.
    pub async fn track_resume(&mut self, track: u16) -> Result<()> {
        debug!(track, "resume");
        self.track_control(TrackAction::Resume, track, 0, 0).await
    }

    /// Enable or disable looping on a track. Takes effect at the track's
    /// next loop point.
    pub async fn track_loop(&mut self, track: u16, enable: bool) -> Result<()> {
        debug!(track, enable, "loop");
        let action = if enable {
            TrackAction::LoopOn
        } else {
            TrackAction::LoopOff
        };
        self.track_control(action, track, 0, 0).await
    }

    async fn track_control(
        &mut self,
        action: TrackAction,
        track: u16,
        out: u8,
        flags: u8,
    ) -> Result<()> {
        self.transport
            .send(&commands::cmd_track_control(action, track, out, flags))
            .await
    }

    /// Stop every playing track.
    pub async fn stop_all_tracks(&mut self) -> Result<()> {
        debug!("stop all tracks");
        self.transport.send(&commands::cmd_stop_all()).await
    }

    /// Resume all paused tracks sample-synchronously. Pair with
    /// [`track_load`](Self::track_load) to start a multi-track arrangement
    /// perfectly aligned.
    pub async fn resume_all_in_sync(&mut self) -> Result<()> {
        debug!("resume all in sync");
        self.transport.send(&commands::cmd_resume_all_sync()).await
    }

    // ---------------------------------------------------------------
    // Gain and pitch
    // ---------------------------------------------------------------

    /// Set a track's gain in dB (nominal range -70..=10).
    pub async fn track_gain(&mut self, track: u16, gain: i16) -> Result<()> {
        debug!(track, gain, "track gain");
        self.transport
            .send(&commands::cmd_track_volume(track, gain))
            .await
    }

    /// Ramp a track's gain to `gain` dB over `time_ms` milliseconds,
    /// stopping the track when the ramp completes if `stop_at_end` is set.
    pub async fn track_fade(
        &mut self,
        track: u16,
        gain: i16,
        time_ms: u16,
        stop_at_end: bool,
    ) -> Result<()> {
        debug!(track, gain, time_ms, stop_at_end, "track fade");
        self.transport
            .send(&commands::cmd_track_fade(track, gain, time_ms, stop_at_end))
            .await
    }

    /// Set an output's master gain in dB (nominal range -70..=10).
    pub async fn master_gain(&mut self, out: u8, gain: i16) -> Result<()> {
        debug!(out, gain, "master gain");
        self.transport
            .send(&commands::cmd_master_volume(out, gain))
            .await
    }

    /// Offset an output's sample rate for pitch bends. The full signed
    /// 16-bit range maps to roughly plus or minus one octave.
    pub async fn samplerate_offset(&mut self, out: u8, offset: i16) -> Result<()> {
        debug!(out, offset, "samplerate offset");
        self.transport
            .send(&commands::cmd_samplerate_offset(out, offset))
            .await
    }

    // ---------------------------------------------------------------
    // Device configuration
    // ---------------------------------------------------------------

    /// Enable or disable unsolicited track reports.
    ///
    /// The voice table and the `TrackStarted`/`TrackStopped` events only
    /// work while reporting is on.
    pub async fn set_reporting(&mut self, enable: bool) -> Result<()> {
        debug!(enable, "set reporting");
        self.transport
            .send(&commands::cmd_set_reporting(enable))
            .await
    }

    /// Select the active trigger bank.
    pub async fn set_trigger_bank(&mut self, bank: u8) -> Result<()> {
        debug!(bank, "set trigger bank");
        self.transport
            .send(&commands::cmd_set_trigger_bank(bank))
            .await
    }

    /// Route the audio input to a set of outputs; `mix` is a bitwise OR of
    /// the [`IMIX_OUT*`](crate::commands::IMIX_OUT1) masks.
    pub async fn set_input_mix(&mut self, mix: u8) -> Result<()> {
        debug!(mix, "set input mix");
        self.transport.send(&commands::cmd_set_input_mix(mix)).await
    }

    /// Select the active MIDI bank.
    pub async fn set_midi_bank(&mut self, bank: u8) -> Result<()> {
        debug!(bank, "set midi bank");
        self.transport.send(&commands::cmd_set_midi_bank(bank)).await
    }

    /// Close the underlying transport.
    pub async fn close(&mut self) -> Result<()> {
        debug!("closing transport");
        self.transport.close().await
    }

    /// Whether the underlying transport is connected.
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }
}

fn lock_flags(lock: bool) -> u8 {
    if lock {
        FLAG_LOCK
    } else {
        0
    }
}
