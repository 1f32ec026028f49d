//! Shared types for wavedeck.

use std::fmt;

/// Highest track number addressable by the protocol (tracks are one-based).
pub const MAX_TRACK: u16 = 4096;

/// Voice-count configuration of the player board.
///
/// The firmware runs in either stereo or mono voice mode, selected by the
/// configuration file on the device's storage card. The host driver must be
/// configured to match, since the mode determines how many voice slots the
/// driver mirrors. This is fixed at construction time, not per message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceMode {
    /// 18 stereo voices.
    Stereo,
    /// 32 mono voices.
    Mono,
}

impl VoiceMode {
    /// Number of concurrent playback voices in this mode.
    pub fn voices(self) -> usize {
        match self {
            VoiceMode::Stereo => 18,
            VoiceMode::Mono => 32,
        }
    }
}

impl fmt::Display for VoiceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoiceMode::Stereo => write!(f, "stereo"),
            VoiceMode::Mono => write!(f, "mono"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voice_counts() {
        assert_eq!(VoiceMode::Stereo.voices(), 18);
        assert_eq!(VoiceMode::Mono.voices(), 32);
    }

    #[test]
    fn display() {
        assert_eq!(VoiceMode::Stereo.to_string(), "stereo");
        assert_eq!(VoiceMode::Mono.to_string(), "mono");
    }
}
