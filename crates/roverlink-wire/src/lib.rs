//! Fixed-size, checksum-verified packet protocol for the rover control link.
//!
//! This is the core value-add layer of roverlink. Every message travels as a
//! constant-length frame:
//! - A 1-byte magic sentinel for stream synchronization
//! - Type, code, parameter, and text fields in a fixed binary layout
//! - A 1-byte XOR checksum over everything before it
//!
//! The [`FrameAssembler`] turns arbitrarily-chunked transport reads into
//! whole validated packets; no partial reads, no buffer management in user
//! code.

pub mod assembler;
pub mod codec;
pub mod error;
pub mod packet;
pub mod reader;
pub mod telemetry;
pub mod writer;

pub use assembler::{Assembled, FrameAssembler};
pub use codec::{decode_packet, encode_packet};
pub use error::{Result, WireError};
pub use packet::{
    CommandOp, Packet, RemoteFault, Response, DATA_SIZE, MAGIC, MAX_MESSAGE_LEN, MAX_PARAMS,
    PACKET_SIZE,
};
pub use reader::PacketReader;
pub use telemetry::{ChannelBand, ColourClass, ColourReading, StatusReport};
pub use writer::PacketWriter;
