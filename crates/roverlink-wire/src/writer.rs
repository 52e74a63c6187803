use std::io::{ErrorKind, Write};

use crate::codec::encode_packet;
use crate::error::{Result, WireError};
use crate::packet::{Packet, PACKET_SIZE};

/// Writes complete packet frames to any `Write` stream.
pub struct PacketWriter<T> {
    inner: T,
}

impl<T: Write> PacketWriter<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Encode and send one packet (blocking).
    ///
    /// The whole [`PACKET_SIZE`]-byte frame is written and the stream
    /// flushed before returning, so frames never interleave on the wire.
    pub fn send(&mut self, packet: &Packet) -> Result<()> {
        let frame = encode_packet(packet);

        let mut offset = 0usize;
        while offset < PACKET_SIZE {
            match self.inner.write(&frame[offset..]) {
                Ok(0) => return Err(WireError::LinkClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(err.into()),
            }
        }

        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
