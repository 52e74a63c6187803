use std::io::{ErrorKind, Read};

use bytes::{Buf, BytesMut};

use crate::assembler::{Assembled, FrameAssembler};
use crate::error::Result;
use crate::packet::Packet;

const READ_CHUNK_SIZE: usize = 256;

/// Reads complete packets from any `Read` stream.
///
/// Handles partial reads internally and retains the tail of a read that ran
/// past a frame boundary, re-offering it before touching the transport again.
pub struct PacketReader<T> {
    inner: T,
    assembler: FrameAssembler,
    pending: BytesMut,
}

impl<T: Read> PacketReader<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            assembler: FrameAssembler::new(),
            pending: BytesMut::with_capacity(READ_CHUNK_SIZE),
        }
    }

    /// Try to produce the next packet, performing at most one transport read.
    ///
    /// Returns `Ok(None)` when the transport had nothing to deliver (a
    /// zero-byte or timed-out read) or the frame is still incomplete, so a
    /// caller can poll a cancellation flag between calls. Frame errors are
    /// returned but leave the reader ready for the next frame; interrupted
    /// reads are retried.
    pub fn poll_packet(&mut self) -> Result<Option<Packet>> {
        if let Some(packet) = self.drain_pending()? {
            return Ok(Some(packet));
        }

        let mut chunk = [0u8; READ_CHUNK_SIZE];
        let read = loop {
            match self.inner.read(&mut chunk) {
                Ok(n) => break n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err)
                    if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
                {
                    return Ok(None)
                }
                Err(err) => return Err(err.into()),
            }
        };

        if read == 0 {
            return Ok(None);
        }

        self.pending.extend_from_slice(&chunk[..read]);
        self.drain_pending()
    }

    /// Feed buffered bytes to the assembler until it yields a packet, an
    /// error, or runs dry. Unconsumed bytes stay buffered for the next call.
    fn drain_pending(&mut self) -> Result<Option<Packet>> {
        while !self.pending.is_empty() {
            let (used, result) = self.assembler.feed(&self.pending);
            self.pending.advance(used);
            match result? {
                Assembled::Packet(packet) => return Ok(Some(packet)),
                Assembled::Incomplete => {}
            }
        }
        Ok(None)
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
