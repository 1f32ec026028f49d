//! Frame encoder/decoder.
//!
//! The player board speaks a fixed-format binary protocol over its UART.
//! This module handles the pure byte-level encoding of command frames and
//! decoding of de-framed response payloads. Delimiting an inbound byte
//! stream into payloads is the job of [`StreamParser`](crate::parser::StreamParser).
//!
//! # Frame format
//!
//! ```text
//! 0xF0 0xAA <len> <cmd> [<params>...] 0x55
//! ```
//!
//! - Start of message: `0xF0 0xAA`
//! - `len`: total frame length in bytes, counting every byte from `0xF0`
//!   through `0x55` inclusive (so the shortest frame has `len = 5`)
//! - `cmd`: command byte (host→device) or response type byte (device→host)
//! - `params`: fixed-width fields, 16-bit values little-endian
//! - End of message: `0x55`
//!
//! There is no checksum. Multi-byte integers are truncated to their field
//! width rather than validated; range checking is the caller's contract.

use bytes::{BufMut, BytesMut};

/// First start-of-message marker byte.
pub const SOM1: u8 = 0xF0;

/// Second start-of-message marker byte.
pub const SOM2: u8 = 0xAA;

/// End-of-message marker byte.
pub const EOM: u8 = 0x55;

/// Largest frame the device will ever produce or accept.
pub const MAX_FRAME_LEN: u8 = 32;

/// Smallest structurally valid length byte.
pub const MIN_FRAME_LEN: u8 = 4;

/// Maximum number of characters in the firmware version string.
pub const VERSION_STRING_LEN: usize = 22;

/// Response type byte: firmware version string.
pub const RSP_VERSION_STRING: u8 = 129;

/// Response type byte: system info (voice count and track count).
pub const RSP_SYSTEM_INFO: u8 = 130;

/// Response type byte: status. Present in the protocol but carries nothing
/// this driver interprets; it decodes as [`Response::Unknown`].
pub const RSP_STATUS: u8 = 131;

/// Response type byte: per-voice track start/stop report.
pub const RSP_TRACK_REPORT: u8 = 132;

/// Encode a command frame ready for transmission.
///
/// Produces the full wire format including markers and the length byte.
/// The length byte is computed from the parameter count; callers never
/// supply it.
///
/// # Example
///
/// ```
/// use wavedeck::frame::encode_command;
///
/// // Get-version request (command 0x01, no parameters)
/// let bytes = encode_command(0x01, &[]);
/// assert_eq!(bytes, vec![0xF0, 0xAA, 0x05, 0x01, 0x55]);
/// ```
pub fn encode_command(cmd: u8, params: &[u8]) -> Vec<u8> {
    let total = 5 + params.len();
    let mut buf = BytesMut::with_capacity(total);
    buf.put_u8(SOM1);
    buf.put_u8(SOM2);
    buf.put_u8(total as u8);
    buf.put_u8(cmd);
    buf.put_slice(params);
    buf.put_u8(EOM);
    buf.to_vec()
}

/// A decoded response payload from the device.
///
/// Track numbers are one-based here (1..=4096); the wire carries them
/// zero-based and the conversion happens in [`decode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Firmware version string, sent once shortly after power-up or on
    /// request.
    Version(String),

    /// Voice capacity and track count, sent on request.
    SystemInfo {
        /// Number of concurrent playback voices.
        voices: u8,
        /// Number of tracks found on the device's storage.
        tracks: u16,
    },

    /// A track started or stopped sounding on a voice. Only sent when
    /// reporting has been enabled.
    TrackReport {
        /// One-based track number.
        track: u16,
        /// Voice slot index.
        voice: u8,
        /// `true` for track start, `false` for track stop.
        started: bool,
    },

    /// A response type this driver does not interpret.
    ///
    /// Covers future firmware response types, the status response
    /// ([`RSP_STATUS`]), and structurally valid frames whose payload is
    /// too short for their declared type. Always a no-op for the caller,
    /// never an error.
    Unknown {
        /// The response type byte.
        kind: u8,
        /// The remaining payload bytes, uninterpreted.
        data: Vec<u8>,
    },
}

/// Decode a complete, de-framed response payload (`[type, fields...]`).
///
/// Returns `None` only for an empty payload. Unrecognized type bytes and
/// payloads too short for their declared type decode to
/// [`Response::Unknown`] -- forward compatibility, not failure.
pub fn decode(payload: &[u8]) -> Option<Response> {
    let (&kind, fields) = payload.split_first()?;

    let response = match kind {
        RSP_VERSION_STRING => {
            // The device pads the field with NULs; keep the characters
            // before the first NUL, capped at the protocol maximum.
            let raw = &fields[..fields.len().min(VERSION_STRING_LEN)];
            let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
            Response::Version(String::from_utf8_lossy(&raw[..end]).into_owned())
        }
        RSP_SYSTEM_INFO if fields.len() >= 3 => Response::SystemInfo {
            voices: fields[0],
            tracks: u16::from_le_bytes([fields[1], fields[2]]),
        },
        RSP_TRACK_REPORT if fields.len() >= 4 => Response::TrackReport {
            track: u16::from_le_bytes([fields[0], fields[1]]).wrapping_add(1),
            voice: fields[2],
            started: fields[3] != 0,
        },
        _ => Response::Unknown {
            kind,
            data: fields.to_vec(),
        },
    };

    Some(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---------------------------------------------------------------
    // Command encoding
    // ---------------------------------------------------------------

    #[test]
    fn encode_no_params() {
        assert_eq!(encode_command(0x01, &[]), vec![0xF0, 0xAA, 0x05, 0x01, 0x55]);
        assert_eq!(encode_command(0x04, &[]), vec![0xF0, 0xAA, 0x05, 0x04, 0x55]);
    }

    #[test]
    fn encode_length_scales_with_params() {
        let bytes = encode_command(0x05, &[0x00, 0xF6, 0xFF]);
        assert_eq!(bytes, vec![0xF0, 0xAA, 0x08, 0x05, 0x00, 0xF6, 0xFF, 0x55]);
    }

    #[test]
    fn encode_length_counts_every_frame_byte() {
        for n in 0..=8usize {
            let params = vec![0u8; n];
            let bytes = encode_command(0x03, &params);
            assert_eq!(bytes.len(), 5 + n);
            assert_eq!(bytes[2] as usize, bytes.len());
        }
    }

    // ---------------------------------------------------------------
    // Response decoding
    // ---------------------------------------------------------------

    #[test]
    fn decode_empty_payload() {
        assert_eq!(decode(&[]), None);
    }

    #[test]
    fn decode_system_info() {
        let payload = [RSP_SYSTEM_INFO, 32, 0x01, 0x00];
        assert_eq!(
            decode(&payload),
            Some(Response::SystemInfo {
                voices: 32,
                tracks: 1
            })
        );
    }

    #[test]
    fn decode_system_info_16bit_track_count() {
        // 1000 tracks = 0x03E8 little-endian
        let payload = [RSP_SYSTEM_INFO, 18, 0xE8, 0x03];
        assert_eq!(
            decode(&payload),
            Some(Response::SystemInfo {
                voices: 18,
                tracks: 1000
            })
        );
    }

    #[test]
    fn decode_track_report_started() {
        // Wire track 4 = API track 5, voice 2, started
        let payload = [RSP_TRACK_REPORT, 0x04, 0x00, 0x02, 0x01];
        assert_eq!(
            decode(&payload),
            Some(Response::TrackReport {
                track: 5,
                voice: 2,
                started: true
            })
        );
    }

    #[test]
    fn decode_track_report_stopped() {
        let payload = [RSP_TRACK_REPORT, 0x04, 0x00, 0x02, 0x00];
        assert_eq!(
            decode(&payload),
            Some(Response::TrackReport {
                track: 5,
                voice: 2,
                started: false
            })
        );
    }

    #[test]
    fn decode_track_report_high_track_number() {
        // Wire track 4095 = API track 4096
        let payload = [RSP_TRACK_REPORT, 0xFF, 0x0F, 0x00, 0x01];
        assert_eq!(
            decode(&payload),
            Some(Response::TrackReport {
                track: 4096,
                voice: 0,
                started: true
            })
        );
    }

    #[test]
    fn decode_version_string() {
        let mut payload = vec![RSP_VERSION_STRING];
        payload.extend_from_slice(b"v1.23c\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0");
        assert_eq!(decode(&payload), Some(Response::Version("v1.23c".into())));
    }

    #[test]
    fn decode_version_string_unterminated() {
        // 22 characters exactly, no NUL terminator.
        let mut payload = vec![RSP_VERSION_STRING];
        payload.extend_from_slice(b"abcdefghijklmnopqrstuv");
        assert_eq!(
            decode(&payload),
            Some(Response::Version("abcdefghijklmnopqrstuv".into()))
        );
    }

    #[test]
    fn decode_version_string_over_length_is_capped() {
        let mut payload = vec![RSP_VERSION_STRING];
        payload.extend_from_slice(&[b'x'; 30]);
        match decode(&payload) {
            Some(Response::Version(v)) => assert_eq!(v.len(), VERSION_STRING_LEN),
            other => panic!("expected Version, got {other:?}"),
        }
    }

    #[test]
    fn decode_status_is_unknown() {
        // The status response exists in the protocol but this driver does
        // not interpret it.
        let payload = [RSP_STATUS, 0x01, 0x02];
        assert_eq!(
            decode(&payload),
            Some(Response::Unknown {
                kind: RSP_STATUS,
                data: vec![0x01, 0x02]
            })
        );
    }

    #[test]
    fn decode_unrecognized_kind_is_unknown() {
        let payload = [0x01];
        assert_eq!(
            decode(&payload),
            Some(Response::Unknown {
                kind: 0x01,
                data: vec![]
            })
        );
    }

    #[test]
    fn decode_short_known_type_is_unknown() {
        // A track report needs 4 field bytes; 2 is structurally valid
        // framing but uninterpretable, so it must not decode as a report.
        let payload = [RSP_TRACK_REPORT, 0x04, 0x00];
        assert_eq!(
            decode(&payload),
            Some(Response::Unknown {
                kind: RSP_TRACK_REPORT,
                data: vec![0x04, 0x00]
            })
        );
    }
}
