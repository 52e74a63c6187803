//! Serial transport for the rover control link.
//!
//! Opens and configures a byte-oriented tty device and exposes it as a
//! plain `Read + Write` stream with bounded-wait reads. This is the lowest
//! layer of roverlink; framing and packet semantics live above it.

pub mod error;

#[cfg(unix)]
pub mod serial;

pub use error::{Result, TransportError};

#[cfg(unix)]
pub use serial::{DataBits, Parity, SerialConfig, SerialStream, StopBits};
