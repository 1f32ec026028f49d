//! Command builders.
//!
//! One function per outbound command code, each producing a complete wire
//! frame via [`encode_command`](crate::frame::encode_command). All functions
//! are pure -- they build byte vectors without performing any I/O; the
//! driver facade sends them through its transport.
//!
//! Track numbers are one-based at this boundary (1..=4096) and converted to
//! the wire's zero-based numbering here. Parameter ranges are otherwise the
//! caller's contract: out-of-range integers are truncated to their field
//! width, matching the device's own tolerance. Output selectors are masked
//! to the low 3 bits (8 mono or 4 stereo outputs).

use crate::frame::encode_command;

// ---------------------------------------------------------------
// Command codes
// ---------------------------------------------------------------

/// Request the firmware version string (cmd 1). No parameters.
pub const CMD_GET_VERSION: u8 = 1;

/// Request system info: voice capacity and track count (cmd 2). No parameters.
pub const CMD_GET_SYS_INFO: u8 = 2;

/// Track transport control (cmd 3). Parameters: verb, track, output, flags.
pub const CMD_TRACK_CONTROL: u8 = 3;

/// Stop every playing track (cmd 4). No parameters.
pub const CMD_STOP_ALL: u8 = 4;

/// Set an output's master gain (cmd 5).
pub const CMD_MASTER_VOLUME: u8 = 5;

/// Set a single track's gain (cmd 8).
pub const CMD_TRACK_VOLUME: u8 = 8;

/// Fade a track's gain over time, optionally stopping it at the end (cmd 10).
pub const CMD_TRACK_FADE: u8 = 10;

/// Resume all paused tracks sample-synchronously (cmd 11). No parameters.
pub const CMD_RESUME_ALL_SYNC: u8 = 11;

/// Offset an output's sample rate for pitch bends (cmd 12).
pub const CMD_SAMPLERATE_OFFSET: u8 = 12;

/// Enable or disable unsolicited track reports (cmd 13).
pub const CMD_SET_REPORTING: u8 = 13;

/// Select the active trigger bank (cmd 14).
pub const CMD_SET_TRIGGER_BANK: u8 = 14;

/// Route the audio input to a set of outputs (cmd 15).
pub const CMD_SET_INPUT_MIX: u8 = 15;

/// Select the active MIDI bank (cmd 16).
pub const CMD_SET_MIDI_BANK: u8 = 16;

/// Track-control flag: lock the track's output assignment.
pub const FLAG_LOCK: u8 = 0x01;

// Input-mix routing masks for CMD_SET_INPUT_MIX.

/// Route the input to output 1.
pub const IMIX_OUT1: u8 = 0x01;
/// Route the input to output 2.
pub const IMIX_OUT2: u8 = 0x02;
/// Route the input to output 3.
pub const IMIX_OUT3: u8 = 0x04;
/// Route the input to output 4.
pub const IMIX_OUT4: u8 = 0x08;

/// Transport verb carried by a track-control command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackAction {
    /// Stop everything else and play this track.
    PlaySolo = 0,
    /// Play this track mixed with whatever is already sounding.
    PlayPoly = 1,
    /// Pause the track, holding its position.
    Pause = 2,
    /// Resume a paused track.
    Resume = 3,
    /// Stop the track.
    Stop = 4,
    /// Enable looping on the track.
    LoopOn = 5,
    /// Disable looping on the track.
    LoopOff = 6,
    /// Load and pause the track, ready for a synchronized resume.
    Load = 7,
}

/// Convert a one-based API track number to its zero-based wire encoding.
fn track_wire(track: u16) -> [u8; 2] {
    track.wrapping_sub(1).to_le_bytes()
}

// ---------------------------------------------------------------
// Builders
// ---------------------------------------------------------------

/// Build a get-version request. The device answers with a version-string
/// response.
pub fn cmd_get_version() -> Vec<u8> {
    encode_command(CMD_GET_VERSION, &[])
}

/// Build a system-info request. The device answers with its voice capacity
/// and the number of tracks on storage.
pub fn cmd_get_sys_info() -> Vec<u8> {
    encode_command(CMD_GET_SYS_INFO, &[])
}

/// Build a track-control command: apply `action` to `track`, targeting
/// output `out` (masked to the low 3 bits) with the given flag bits.
pub fn cmd_track_control(action: TrackAction, track: u16, out: u8, flags: u8) -> Vec<u8> {
    let trk = track_wire(track);
    encode_command(
        CMD_TRACK_CONTROL,
        &[action as u8, trk[0], trk[1], out & 0x07, flags],
    )
}

/// Build a stop-all command.
pub fn cmd_stop_all() -> Vec<u8> {
    encode_command(CMD_STOP_ALL, &[])
}

/// Build a master-gain command for output `out`.
///
/// `gain` is in dB, nominal range -70..=10; transmitted as signed 16-bit
/// little-endian, unvalidated.
pub fn cmd_master_volume(out: u8, gain: i16) -> Vec<u8> {
    let g = gain.to_le_bytes();
    encode_command(CMD_MASTER_VOLUME, &[out & 0x07, g[0], g[1]])
}

/// Build a track-gain command.
pub fn cmd_track_volume(track: u16, gain: i16) -> Vec<u8> {
    let trk = track_wire(track);
    let g = gain.to_le_bytes();
    encode_command(CMD_TRACK_VOLUME, &[trk[0], trk[1], g[0], g[1]])
}

/// Build a track-fade command: ramp the track's gain to `gain` over
/// `time_ms` milliseconds, stopping the track at the end of the ramp if
/// `stop_at_end` is set.
pub fn cmd_track_fade(track: u16, gain: i16, time_ms: u16, stop_at_end: bool) -> Vec<u8> {
    let trk = track_wire(track);
    let g = gain.to_le_bytes();
    let t = time_ms.to_le_bytes();
    encode_command(
        CMD_TRACK_FADE,
        &[trk[0], trk[1], g[0], g[1], t[0], t[1], stop_at_end as u8],
    )
}

/// Build a resume-all-in-sync command. Tracks previously paused via
/// [`TrackAction::Load`] or [`TrackAction::Pause`] restart sample-aligned.
pub fn cmd_resume_all_sync() -> Vec<u8> {
    encode_command(CMD_RESUME_ALL_SYNC, &[])
}

/// Build a samplerate-offset command for output `out`.
///
/// `offset` covers the full signed 16-bit range, mapping to roughly plus
/// or minus one octave of pitch bend.
pub fn cmd_samplerate_offset(out: u8, offset: i16) -> Vec<u8> {
    let o = offset.to_le_bytes();
    encode_command(CMD_SAMPLERATE_OFFSET, &[out & 0x07, o[0], o[1]])
}

/// Build a set-reporting command. With reporting enabled the device sends
/// an unsolicited track report whenever a voice starts or stops.
pub fn cmd_set_reporting(enable: bool) -> Vec<u8> {
    encode_command(CMD_SET_REPORTING, &[enable as u8])
}

/// Build a set-trigger-bank command.
pub fn cmd_set_trigger_bank(bank: u8) -> Vec<u8> {
    encode_command(CMD_SET_TRIGGER_BANK, &[bank])
}

/// Build a set-input-mix command. `mix` is a bitwise OR of the
/// `IMIX_OUT*` masks.
pub fn cmd_set_input_mix(mix: u8) -> Vec<u8> {
    encode_command(CMD_SET_INPUT_MIX, &[mix])
}

/// Build a set-midi-bank command.
pub fn cmd_set_midi_bank(bank: u8) -> Vec<u8> {
    encode_command(CMD_SET_MIDI_BANK, &[bank])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_version_wire_bytes() {
        assert_eq!(cmd_get_version(), vec![0xF0, 0xAA, 0x05, 0x01, 0x55]);
    }

    #[test]
    fn get_sys_info_wire_bytes() {
        assert_eq!(cmd_get_sys_info(), vec![0xF0, 0xAA, 0x05, 0x02, 0x55]);
    }

    #[test]
    fn stop_all_wire_bytes() {
        assert_eq!(cmd_stop_all(), vec![0xF0, 0xAA, 0x05, 0x04, 0x55]);
    }

    #[test]
    fn resume_all_sync_wire_bytes() {
        assert_eq!(cmd_resume_all_sync(), vec![0xF0, 0xAA, 0x05, 0x0B, 0x55]);
    }

    #[test]
    fn track_control_solo_locked() {
        // Track 1 (wire 0), output 7, lock flag.
        let bytes = cmd_track_control(TrackAction::PlaySolo, 1, 7, FLAG_LOCK);
        assert_eq!(
            bytes,
            vec![0xF0, 0xAA, 0x0A, 0x03, 0x00, 0x00, 0x00, 0x07, 0x01, 0x55]
        );
    }

    #[test]
    fn track_control_zero_based_wire_numbering() {
        // API track 5 goes out as wire track 4.
        let bytes = cmd_track_control(TrackAction::PlayPoly, 5, 0, 0);
        assert_eq!(&bytes[4..7], &[0x01, 0x04, 0x00]);
    }

    #[test]
    fn track_control_high_track_little_endian() {
        // API track 4096 = wire 4095 = 0x0FFF.
        let bytes = cmd_track_control(TrackAction::Stop, 4096, 0, 0);
        assert_eq!(&bytes[5..7], &[0xFF, 0x0F]);
    }

    #[test]
    fn track_control_output_masked_to_3_bits() {
        let bytes = cmd_track_control(TrackAction::PlayPoly, 1, 0xFF, 0);
        assert_eq!(bytes[7], 0x07);
    }

    #[test]
    fn master_volume_negative_gain() {
        // -10 dB = 0xFFF6 little-endian.
        let bytes = cmd_master_volume(2, -10);
        assert_eq!(
            bytes,
            vec![0xF0, 0xAA, 0x08, 0x05, 0x02, 0xF6, 0xFF, 0x55]
        );
    }

    #[test]
    fn track_volume_wire_bytes() {
        // Track 10 (wire 9), gain +10.
        let bytes = cmd_track_volume(10, 10);
        assert_eq!(
            bytes,
            vec![0xF0, 0xAA, 0x09, 0x08, 0x09, 0x00, 0x0A, 0x00, 0x55]
        );
    }

    #[test]
    fn track_fade_wire_bytes() {
        // Track 3 (wire 2), fade to -70 dB over 2000 ms, stop at end.
        let bytes = cmd_track_fade(3, -70, 2000, true);
        assert_eq!(
            bytes,
            vec![
                0xF0, 0xAA, 0x0C, 0x0A, 0x02, 0x00, 0xBA, 0xFF, 0xD0, 0x07, 0x01, 0x55
            ]
        );
    }

    #[test]
    fn samplerate_offset_full_range() {
        let bytes = cmd_samplerate_offset(1, -32768);
        assert_eq!(
            bytes,
            vec![0xF0, 0xAA, 0x08, 0x0C, 0x01, 0x00, 0x80, 0x55]
        );
        let bytes = cmd_samplerate_offset(1, 32767);
        assert_eq!(&bytes[5..7], &[0xFF, 0x7F]);
    }

    #[test]
    fn set_reporting_wire_bytes() {
        assert_eq!(
            cmd_set_reporting(true),
            vec![0xF0, 0xAA, 0x06, 0x0D, 0x01, 0x55]
        );
        assert_eq!(
            cmd_set_reporting(false),
            vec![0xF0, 0xAA, 0x06, 0x0D, 0x00, 0x55]
        );
    }

    #[test]
    fn bank_and_mix_commands() {
        assert_eq!(
            cmd_set_trigger_bank(2),
            vec![0xF0, 0xAA, 0x06, 0x0E, 0x02, 0x55]
        );
        assert_eq!(
            cmd_set_input_mix(IMIX_OUT1 | IMIX_OUT3),
            vec![0xF0, 0xAA, 0x06, 0x0F, 0x05, 0x55]
        );
        assert_eq!(
            cmd_set_midi_bank(1),
            vec![0xF0, 0xAA, 0x06, 0x10, 0x01, 0x55]
        );
    }
}
