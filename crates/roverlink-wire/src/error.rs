/// Errors that can occur while encoding, decoding, or assembling frames.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The frame does not start with the magic byte.
    #[error("bad magic byte (got {found:#04x}, expected {expected:#04x})")]
    BadMagic { found: u8, expected: u8 },

    /// The frame contents fail the checksum relation.
    #[error("bad checksum (stored {stored:#04x}, computed {computed:#04x})")]
    BadChecksum { stored: u8, computed: u8 },

    /// The packet type byte is not a known discriminant.
    #[error("unknown packet type {0:#04x}")]
    UnknownPacketType(u8),

    /// A COMMAND frame carries a code outside the command set.
    #[error("unknown command code {0:#04x}")]
    UnknownCommand(u8),

    /// An I/O error occurred while reading or writing frames.
    #[error("link I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The transport reported closure mid-write.
    #[error("link closed")]
    LinkClosed,
}

impl WireError {
    /// Frame-level errors are non-fatal: the assembler discards the frame
    /// attempt and the link keeps running. I/O errors and closure are not.
    pub fn is_frame_error(&self) -> bool {
        matches!(
            self,
            WireError::BadMagic { .. }
                | WireError::BadChecksum { .. }
                | WireError::UnknownPacketType(_)
                | WireError::UnknownCommand(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, WireError>;
