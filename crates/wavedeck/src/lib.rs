//! Async driver for serially-attached polyphonic wav-playback decks.
//!
//! The deck is an embedded audio player: tracks live on its storage, and a
//! host drives playback over a UART using a fixed-format binary protocol.
//! Commands are fire-and-forget; the device pushes unsolicited responses
//! (track start/stop reports, its version banner) whenever it likes. This
//! crate handles the framing, the command encoding, and the bookkeeping
//! needed to answer "what is playing right now?".
//!
//! # Crates
//!
//! | Crate | Purpose |
//! |-------|---------|
//! | `wavedeck` | Driver facade, protocol codec, voice tracking (this crate) |
//! | `wavedeck-core` | Shared types: errors, events, the `Transport` trait |
//! | `wavedeck-transport` | Serial transport over `tokio-serial` |
//! | `wavedeck-test-harness` | Mock transport for hardware-free tests |
//!
//! # Quick start
//!
//! ```no_run
//! use wavedeck::{DeckBuilder, VoiceMode};
//!
//! #[tokio::main]
//! async fn main() -> wavedeck::Result<()> {
//!     let mut deck = DeckBuilder::new()
//!         .voice_mode(VoiceMode::Stereo)
//!         .serial_port("/dev/ttyUSB0")
//!         .build()
//!         .await?;
//!
//!     deck.start().await?;
//!     deck.set_reporting(true).await?;
//!     deck.track_play_poly(1, 0, false).await?;
//!
//!     // The device answers asynchronously; poll to absorb its reports.
//!     deck.poll().await?;
//!     if let Some(voice) = deck.is_track_playing(1).await? {
//!         println!("track 1 is sounding on voice {voice}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Events
//!
//! Every dispatched response that changes driver state also goes out on a
//! broadcast channel, so observers can react without polling the queries:
//!
//! ```no_run
//! # use wavedeck::DeckEvent;
//! # async fn example(deck: &wavedeck::WaveDeck) {
//! let mut events = deck.subscribe();
//! while let Ok(event) = events.recv().await {
//!     match event {
//!         DeckEvent::TrackStarted { track, voice } => {
//!             println!("track {track} started on voice {voice}");
//!         }
//!         DeckEvent::TrackStopped { track, voice } => {
//!             println!("track {track} stopped on voice {voice}");
//!         }
//!         _ => {}
//!     }
//! }
//! # }
//! ```

pub mod commands;
pub mod frame;
pub mod parser;
pub mod voices;

mod builder;
mod deck;

pub use builder::DeckBuilder;
pub use deck::WaveDeck;
pub use frame::Response;
pub use parser::{Phase, StreamParser};
pub use voices::VoiceTable;

// Re-export the shared types so most users only depend on this crate.
pub use wavedeck_core::error::{Error, Result};
pub use wavedeck_core::events::DeckEvent;
pub use wavedeck_core::transport::Transport;
pub use wavedeck_core::types::{VoiceMode, MAX_TRACK};
