//! Incremental frame assembly over arbitrarily-chunked reads.

use tracing::{debug, trace};

use crate::codec::decode_packet;
use crate::error::Result;
use crate::packet::{Packet, PACKET_SIZE};

/// Outcome of feeding bytes that did not produce an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Assembled {
    /// More bytes are needed before the frame can be evaluated.
    Incomplete,
    /// A complete frame decoded successfully.
    Packet(Packet),
}

/// Accumulates transport bytes into exactly [`PACKET_SIZE`]-byte frames.
///
/// One assembler per connection. It owns its accumulation buffer exclusively
/// and resets to empty after every completed frame attempt, valid or not, so
/// a malformed frame never poisons the next one. It does not re-scan a
/// discarded frame for an embedded magic byte; realignment waits for the
/// next frame-sized window. That limitation matches the deployed firmware's
/// framing behaviour and is relied on by tests.
#[derive(Debug)]
pub struct FrameAssembler {
    frame: [u8; PACKET_SIZE],
    held: usize,
}

impl FrameAssembler {
    pub fn new() -> Self {
        Self {
            frame: [0u8; PACKET_SIZE],
            held: 0,
        }
    }

    /// Bytes currently buffered for the in-progress frame.
    pub fn held(&self) -> usize {
        self.held
    }

    /// Offer bytes to the assembler.
    ///
    /// Returns how many input bytes were consumed alongside the outcome.
    /// At most one frame completes per call: input past the frame boundary
    /// is left unconsumed and must be re-offered by the caller. An empty
    /// input is a no-op yielding [`Assembled::Incomplete`].
    pub fn feed(&mut self, input: &[u8]) -> (usize, Result<Assembled>) {
        let take = input.len().min(PACKET_SIZE - self.held);
        self.frame[self.held..self.held + take].copy_from_slice(&input[..take]);
        self.held += take;

        if self.held < PACKET_SIZE {
            trace!(held = self.held, consumed = take, "frame incomplete");
            return (take, Ok(Assembled::Incomplete));
        }

        // Reset before decoding: the frame attempt is over either way.
        self.held = 0;
        match decode_packet(&self.frame) {
            Ok(packet) => (take, Ok(Assembled::Packet(packet))),
            Err(err) => {
                debug!(%err, "discarding malformed frame");
                (take, Err(err))
            }
        }
    }
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new()
    }
}
