//! wavedeck-core: Core traits, types, and error definitions for wavedeck.
//!
//! This crate defines the transport abstraction and shared types that the
//! wavedeck driver builds on. Applications normally depend on the `wavedeck`
//! facade crate, which re-exports everything here.
//!
//! # Key types
//!
//! - [`Transport`] -- byte-level communication channel to the player board
//! - [`DeckEvent`] -- track start/stop and device-info notifications
//! - [`VoiceMode`] -- stereo or mono voice-count configuration
//! - [`Error`] / [`Result`] -- error handling

pub mod error;
pub mod events;
pub mod transport;
pub mod types;

// Re-export key types at crate root for ergonomic `use wavedeck_core::*`.
pub use error::{Error, Result};
pub use events::DeckEvent;
pub use transport::Transport;
pub use types::*;
