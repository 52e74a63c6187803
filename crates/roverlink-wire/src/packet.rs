use serde::{Deserialize, Serialize};

use crate::telemetry::{ColourReading, StatusReport};

/// Total wire size of one frame: magic + fields + checksum.
pub const PACKET_SIZE: usize = 101;

/// Magic byte: start-of-frame sentinel.
pub const MAGIC: u8 = 0xFC;

/// Number of 32-bit parameter slots in a frame.
pub const MAX_PARAMS: usize = 16;

/// Capacity of the text payload region, including the terminating NUL.
pub const DATA_SIZE: usize = 32;

/// Longest message text that survives encoding untruncated.
pub const MAX_MESSAGE_LEN: usize = DATA_SIZE - 1;

/// A motion or query command sent to the rover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandOp {
    Forward,
    NudgeForward,
    SpeedForward,
    Reverse,
    NudgeReverse,
    SpeedReverse,
    TurnLeft,
    SpeedLeft,
    TurnRight,
    SpeedRight,
    Stop,
    GetDistance,
    GetColour,
    Buzzer,
}

impl CommandOp {
    /// The wire code for this command.
    pub fn code(self) -> u8 {
        match self {
            CommandOp::Forward => 0,
            CommandOp::NudgeForward => 1,
            CommandOp::SpeedForward => 2,
            CommandOp::Reverse => 3,
            CommandOp::NudgeReverse => 4,
            CommandOp::SpeedReverse => 5,
            CommandOp::TurnLeft => 6,
            CommandOp::SpeedLeft => 7,
            CommandOp::TurnRight => 8,
            CommandOp::SpeedRight => 9,
            CommandOp::Stop => 10,
            CommandOp::GetDistance => 11,
            CommandOp::GetColour => 12,
            CommandOp::Buzzer => 13,
        }
    }

    /// Look up a command by wire code.
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => CommandOp::Forward,
            1 => CommandOp::NudgeForward,
            2 => CommandOp::SpeedForward,
            3 => CommandOp::Reverse,
            4 => CommandOp::NudgeReverse,
            5 => CommandOp::SpeedReverse,
            6 => CommandOp::TurnLeft,
            7 => CommandOp::SpeedLeft,
            8 => CommandOp::TurnRight,
            9 => CommandOp::SpeedRight,
            10 => CommandOp::Stop,
            11 => CommandOp::GetDistance,
            12 => CommandOp::GetColour,
            13 => CommandOp::Buzzer,
            _ => return None,
        })
    }

    /// Human-readable name for prompts and logs.
    pub fn name(self) -> &'static str {
        match self {
            CommandOp::Forward => "forward",
            CommandOp::NudgeForward => "nudge-forward",
            CommandOp::SpeedForward => "speed-forward",
            CommandOp::Reverse => "reverse",
            CommandOp::NudgeReverse => "nudge-reverse",
            CommandOp::SpeedReverse => "speed-reverse",
            CommandOp::TurnLeft => "turn-left",
            CommandOp::SpeedLeft => "speed-left",
            CommandOp::TurnRight => "turn-right",
            CommandOp::SpeedRight => "speed-right",
            CommandOp::Stop => "stop",
            CommandOp::GetDistance => "get-distance",
            CommandOp::GetColour => "get-colour",
            CommandOp::Buzzer => "buzzer",
        }
    }

    /// All commands, in wire-code order.
    pub fn all() -> &'static [CommandOp] {
        &[
            CommandOp::Forward,
            CommandOp::NudgeForward,
            CommandOp::SpeedForward,
            CommandOp::Reverse,
            CommandOp::NudgeReverse,
            CommandOp::SpeedReverse,
            CommandOp::TurnLeft,
            CommandOp::SpeedLeft,
            CommandOp::TurnRight,
            CommandOp::SpeedRight,
            CommandOp::Stop,
            CommandOp::GetDistance,
            CommandOp::GetColour,
            CommandOp::Buzzer,
        ]
    }
}

/// A successful reply from the rover, keyed by response code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Response {
    /// Command acknowledged, no payload.
    Ok,
    /// Odometry counters.
    Status(StatusReport),
    /// Ultrasonic distance in centimetres.
    Distance(u32),
    /// Colour sensor channel frequencies.
    Colour(ColourReading),
    /// A response code this build does not recognize.
    Unknown(u8),
}

/// A framing fault the rover detected on its end, echoed back as payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemoteFault {
    /// The rover saw a frame without the magic byte.
    BadMagicReceived,
    /// The rover saw a frame failing its checksum.
    BadChecksumReceived,
    /// The rover did not recognize the command code.
    BadCommand,
    /// The rover received a response it did not expect.
    UnexpectedResponse,
    /// A fault code this build does not recognize.
    Other(u8),
}

impl RemoteFault {
    pub fn code(self) -> u8 {
        match self {
            RemoteFault::BadMagicReceived => 2,
            RemoteFault::BadChecksumReceived => 3,
            RemoteFault::BadCommand => 4,
            RemoteFault::UnexpectedResponse => 5,
            RemoteFault::Other(code) => code,
        }
    }

    pub fn from_code(code: u8) -> Self {
        match code {
            2 => RemoteFault::BadMagicReceived,
            3 => RemoteFault::BadChecksumReceived,
            4 => RemoteFault::BadCommand,
            5 => RemoteFault::UnexpectedResponse,
            other => RemoteFault::Other(other),
        }
    }
}

/// One message on the link, either direction.
///
/// The wire layout is a flat fixed-size record; the codec maps it onto one
/// variant per semantic kind so a decoded packet carries only the fields
/// that are meaningful for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Packet {
    /// Link-open greeting sent by the host.
    Hello,
    /// A command for the rover.
    Command(CommandOp),
    /// A reply to a command.
    Response(Response),
    /// A fault report from the rover.
    Error(RemoteFault),
    /// Free-text from the rover, at most [`MAX_MESSAGE_LEN`] bytes.
    Message(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_codes_roundtrip() {
        for op in CommandOp::all() {
            assert_eq!(CommandOp::from_code(op.code()), Some(*op));
        }
    }

    #[test]
    fn command_codes_are_dense_and_distinct() {
        let all = CommandOp::all();
        for (i, op) in all.iter().enumerate() {
            assert_eq!(op.code() as usize, i);
        }
        assert_eq!(CommandOp::from_code(all.len() as u8), None);
    }

    #[test]
    fn fault_codes_roundtrip() {
        for code in 0..=u8::MAX {
            assert_eq!(RemoteFault::from_code(code).code(), code);
        }
    }
}
