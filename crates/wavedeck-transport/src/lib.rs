//! wavedeck-transport: Physical transport implementations for wavedeck.
//!
//! Currently this means serial: the player board presents a 3.3V UART
//! (commonly bridged to USB) running 8N1 at a fixed baud rate. See
//! [`SerialTransport`].

pub mod serial;

pub use serial::SerialTransport;

/// The player board's fixed UART baud rate.
pub const DEFAULT_BAUD_RATE: u32 = 57_600;
