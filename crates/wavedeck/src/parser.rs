//! Incremental stream parser for inbound response frames.
//!
//! Serial reads deliver bytes in arbitrary chunks: a frame may arrive whole,
//! split anywhere, or glued to its neighbors. [`StreamParser`] consumes one
//! byte at a time, buffers partial frames across calls, and emits each
//! completed, validated payload (`[type, fields...]`, markers and length
//! stripped) in arrival order.
//!
//! # Resynchronization
//!
//! Any structural violation -- wrong second marker, out-of-range length
//! byte, missing terminator -- resets the parser to [`Phase::AwaitSom1`]
//! and discards the partial frame. The offending byte is dropped rather
//! than re-scanned as a potential new start marker; with a two-byte marker
//! and short frames, realignment on the next genuine frame is fast enough
//! that the simpler policy wins. There is no input that can wedge the
//! parser: every byte either advances a frame or resets to the hunt state.

use bytes::{BufMut, BytesMut};

use crate::frame::{EOM, MAX_FRAME_LEN, MIN_FRAME_LEN, SOM1, SOM2};

/// Parser phase, advanced one consumed byte at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Hunting for the first start marker. Also the resynchronization
    /// state: non-marker bytes here are dropped silently.
    AwaitSom1,
    /// First marker seen; expecting the second.
    AwaitSom2,
    /// Markers seen; expecting the length byte.
    AwaitLength,
    /// Accumulating payload bytes.
    AwaitPayload,
    /// Payload complete; expecting the end-of-message byte.
    AwaitTerminator,
}

/// Byte-at-a-time frame delimiter.
///
/// State persists between [`feed`](StreamParser::feed) calls, so input may
/// be fragmented arbitrarily: the set and order of emitted payloads depends
/// only on the byte sequence, never on chunk boundaries.
#[derive(Debug)]
pub struct StreamParser {
    phase: Phase,
    /// Index at which the terminator byte is expected, counted from the
    /// length byte. The wire encodes this as `LEN - 1`: the length byte
    /// gives the total frame length, and subtracting one lands on the
    /// terminator position. This off-by-one is part of the wire format
    /// and is reproduced exactly.
    expected_len: usize,
    /// Payload bytes accumulated for the frame in progress.
    buf: BytesMut,
}

impl StreamParser {
    /// Create a parser in the hunt state.
    pub fn new() -> Self {
        StreamParser {
            phase: Phase::AwaitSom1,
            expected_len: 0,
            buf: BytesMut::with_capacity(MAX_FRAME_LEN as usize),
        }
    }

    /// Current phase. Exposed for state inspection after error recovery.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Discard any partial frame and return to the hunt state.
    pub fn reset(&mut self) {
        self.phase = Phase::AwaitSom1;
        self.expected_len = 0;
        self.buf.clear();
    }

    /// Consume one byte. Returns the completed payload when this byte
    /// terminates a valid frame.
    pub fn push(&mut self, byte: u8) -> Option<Vec<u8>> {
        match self.phase {
            Phase::AwaitSom1 => {
                if byte == SOM1 {
                    self.phase = Phase::AwaitSom2;
                }
                // Anything else is inter-frame noise; drop it.
                None
            }
            Phase::AwaitSom2 => {
                if byte == SOM2 {
                    self.phase = Phase::AwaitLength;
                } else {
                    self.reset();
                }
                None
            }
            Phase::AwaitLength => {
                if (MIN_FRAME_LEN..=MAX_FRAME_LEN).contains(&byte) {
                    self.expected_len = byte as usize - 1;
                    self.buf.clear();
                    // Three header bytes precede the payload; a frame whose
                    // terminator index is 3 carries no payload at all.
                    self.phase = if self.expected_len == 3 {
                        Phase::AwaitTerminator
                    } else {
                        Phase::AwaitPayload
                    };
                } else {
                    self.reset();
                }
                None
            }
            Phase::AwaitPayload => {
                self.buf.put_u8(byte);
                if self.buf.len() == self.expected_len - 3 {
                    self.phase = Phase::AwaitTerminator;
                }
                None
            }
            Phase::AwaitTerminator => {
                if byte == EOM {
                    let payload = self.buf.split().to_vec();
                    self.reset();
                    Some(payload)
                } else {
                    self.reset();
                    None
                }
            }
        }
    }

    /// Consume a chunk of bytes, returning every payload completed within
    /// it in arrival order.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Vec<u8>> {
        let mut payloads = Vec::new();
        for &byte in chunk {
            if let Some(payload) = self.push(byte) {
                payloads.push(payload);
            }
        }
        payloads
    }
}

impl Default for StreamParser {
    fn default() -> Self {
        Self::new()
    }
}
