//! wavedeck-test-harness: test doubles for driver and protocol tests.
//!
//! Provides [`MockTransport`], a scriptable in-memory [`Transport`]
//! implementation for exercising the frame codec, stream parser, and
//! driver facade without hardware.
//!
//! [`Transport`]: wavedeck_core::transport::Transport

pub mod mock_serial;

pub use mock_serial::{MockTransport, SentLog};
