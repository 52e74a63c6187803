//! Stateless conversion between [`Packet`] values and fixed-size frames.
//!
//! Wire format (all `PACKET_SIZE` bytes, length-based framing):
//!
//! ```text
//! ┌───────────┬──────┬──────┬──────────┬──────────────┬───────────┬──────────┐
//! │ Magic (1) │ Type │ Code │ Reserved │ Params       │ Data      │ Checksum │
//! │ 0xFC      │ (1)  │ (1)  │ (1)      │ (16×u32 LE)  │ (32B NUL) │ (1)      │
//! └───────────┴──────┴──────┴──────────┴──────────────┴───────────┴──────────┘
//! ```
//!
//! The checksum byte is the XOR of every preceding byte, so a well-formed
//! frame XORs to zero overall. Unused param and data bytes are zero-filled;
//! every frame is exactly the same length regardless of content.

use crate::error::{Result, WireError};
use crate::packet::{
    CommandOp, Packet, RemoteFault, Response, DATA_SIZE, MAGIC, MAX_MESSAGE_LEN, MAX_PARAMS,
    PACKET_SIZE,
};
use crate::telemetry::{ColourReading, StatusReport};

const TYPE_OFFSET: usize = 1;
const CODE_OFFSET: usize = 2;
const PARAMS_OFFSET: usize = 4;
const DATA_OFFSET: usize = PARAMS_OFFSET + MAX_PARAMS * 4;
const CHECKSUM_OFFSET: usize = PACKET_SIZE - 1;

const TYPE_COMMAND: u8 = 0;
const TYPE_RESPONSE: u8 = 1;
const TYPE_ERROR: u8 = 2;
const TYPE_MESSAGE: u8 = 3;
const TYPE_HELLO: u8 = 4;

const RESP_OK: u8 = 0;
const RESP_STATUS: u8 = 1;
const RESP_DIST: u8 = 6;
const RESP_COLOUR: u8 = 7;

fn xor_checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, b| acc ^ b)
}

fn put_params(frame: &mut [u8; PACKET_SIZE], params: &[u32; MAX_PARAMS]) {
    for (i, value) in params.iter().enumerate() {
        let at = PARAMS_OFFSET + i * 4;
        frame[at..at + 4].copy_from_slice(&value.to_le_bytes());
    }
}

fn get_params(frame: &[u8; PACKET_SIZE]) -> [u32; MAX_PARAMS] {
    let mut params = [0u32; MAX_PARAMS];
    for (i, slot) in params.iter_mut().enumerate() {
        let at = PARAMS_OFFSET + i * 4;
        // Infallible: the slice is exactly 4 bytes.
        *slot = u32::from_le_bytes(frame[at..at + 4].try_into().unwrap());
    }
    params
}

/// Encode a packet into one complete frame.
///
/// Cannot fail: every structurally valid [`Packet`] has a frame. Message
/// text longer than [`MAX_MESSAGE_LEN`] bytes is truncated deterministically.
pub fn encode_packet(packet: &Packet) -> [u8; PACKET_SIZE] {
    let mut frame = [0u8; PACKET_SIZE];
    frame[0] = MAGIC;

    match packet {
        Packet::Hello => {
            frame[TYPE_OFFSET] = TYPE_HELLO;
        }
        Packet::Command(op) => {
            frame[TYPE_OFFSET] = TYPE_COMMAND;
            frame[CODE_OFFSET] = op.code();
        }
        Packet::Response(response) => {
            frame[TYPE_OFFSET] = TYPE_RESPONSE;
            let mut params = [0u32; MAX_PARAMS];
            frame[CODE_OFFSET] = match response {
                Response::Ok => RESP_OK,
                Response::Status(report) => {
                    report.fill_params(&mut params);
                    RESP_STATUS
                }
                Response::Distance(cm) => {
                    params[0] = *cm;
                    RESP_DIST
                }
                Response::Colour(reading) => {
                    params[0] = reading.red;
                    params[1] = reading.green;
                    params[2] = reading.blue;
                    RESP_COLOUR
                }
                Response::Unknown(code) => *code,
            };
            put_params(&mut frame, &params);
        }
        Packet::Error(fault) => {
            frame[TYPE_OFFSET] = TYPE_ERROR;
            frame[CODE_OFFSET] = fault.code();
        }
        Packet::Message(text) => {
            frame[TYPE_OFFSET] = TYPE_MESSAGE;
            let bytes = text.as_bytes();
            let len = bytes.len().min(MAX_MESSAGE_LEN);
            frame[DATA_OFFSET..DATA_OFFSET + len].copy_from_slice(&bytes[..len]);
        }
    }

    frame[CHECKSUM_OFFSET] = xor_checksum(&frame[..CHECKSUM_OFFSET]);
    frame
}

/// Decode one complete frame.
///
/// Checks run in order: magic first, then checksum, then field
/// reconstruction. A failed decode leaves no partial state anywhere.
pub fn decode_packet(frame: &[u8; PACKET_SIZE]) -> Result<Packet> {
    if frame[0] != MAGIC {
        return Err(WireError::BadMagic {
            found: frame[0],
            expected: MAGIC,
        });
    }

    let stored = frame[CHECKSUM_OFFSET];
    let computed = xor_checksum(&frame[..CHECKSUM_OFFSET]);
    if stored != computed {
        return Err(WireError::BadChecksum { stored, computed });
    }

    let code = frame[CODE_OFFSET];
    match frame[TYPE_OFFSET] {
        TYPE_HELLO => Ok(Packet::Hello),
        TYPE_COMMAND => CommandOp::from_code(code)
            .map(Packet::Command)
            .ok_or(WireError::UnknownCommand(code)),
        TYPE_RESPONSE => {
            let params = get_params(frame);
            let response = match code {
                RESP_OK => Response::Ok,
                RESP_STATUS => Response::Status(StatusReport::from_params(&params)),
                RESP_DIST => Response::Distance(params[0]),
                RESP_COLOUR => Response::Colour(ColourReading::new(
                    params[0], params[1], params[2],
                )),
                other => Response::Unknown(other),
            };
            Ok(Packet::Response(response))
        }
        TYPE_ERROR => Ok(Packet::Error(RemoteFault::from_code(code))),
        TYPE_MESSAGE => {
            let data = &frame[DATA_OFFSET..DATA_OFFSET + DATA_SIZE];
            let len = data.iter().position(|&b| b == 0).unwrap_or(DATA_SIZE);
            Ok(Packet::Message(
                String::from_utf8_lossy(&data[..len]).into_owned(),
            ))
        }
        other => Err(WireError::UnknownPacketType(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::ColourClass;

    fn sample_packets() -> Vec<Packet> {
        let mut packets = vec![
            Packet::Hello,
            Packet::Response(Response::Ok),
            Packet::Response(Response::Distance(42)),
            Packet::Response(Response::Colour(ColourReading::new(50, 150, 250))),
            Packet::Response(Response::Unknown(200)),
            Packet::Error(RemoteFault::BadMagicReceived),
            Packet::Error(RemoteFault::BadChecksumReceived),
            Packet::Error(RemoteFault::BadCommand),
            Packet::Error(RemoteFault::UnexpectedResponse),
            Packet::Error(RemoteFault::Other(99)),
            Packet::Message(String::new()),
            Packet::Message("hello from the rover".to_string()),
        ];
        for op in CommandOp::all() {
            packets.push(Packet::Command(*op));
        }
        let mut params = [0u32; MAX_PARAMS];
        params[..10].copy_from_slice(&[10, 10, 5, 5, 1, 1, 0, 0, 100, 50]);
        packets.push(Packet::Response(Response::Status(
            StatusReport::from_params(&params),
        )));
        packets
    }

    #[test]
    fn roundtrip_all_variants() {
        for packet in sample_packets() {
            let frame = encode_packet(&packet);
            assert_eq!(frame.len(), PACKET_SIZE);
            let decoded = decode_packet(&frame).unwrap();
            assert_eq!(decoded, packet, "roundtrip failed for {packet:?}");
        }
    }

    #[test]
    fn frames_are_fixed_size_and_xor_to_zero() {
        for packet in sample_packets() {
            let frame = encode_packet(&packet);
            assert_eq!(frame[0], MAGIC);
            assert_eq!(xor_checksum(&frame), 0);
        }
    }

    #[test]
    fn magic_gate_checked_before_checksum() {
        let mut frame = encode_packet(&Packet::Hello);
        frame[0] = 0x00;
        // checksum is now stale too, but magic must win
        let err = decode_packet(&frame).unwrap_err();
        assert!(matches!(err, WireError::BadMagic { found: 0x00, .. }));
    }

    #[test]
    fn any_non_magic_first_byte_is_rejected() {
        let mut frame = encode_packet(&Packet::Command(CommandOp::Stop));
        for byte in 0..=u8::MAX {
            if byte == MAGIC {
                continue;
            }
            frame[0] = byte;
            assert!(matches!(
                decode_packet(&frame),
                Err(WireError::BadMagic { .. })
            ));
        }
    }

    #[test]
    fn single_bit_flips_are_detected() {
        let original = encode_packet(&Packet::Response(Response::Distance(1234)));
        for index in 1..PACKET_SIZE {
            for bit in 0..8 {
                let mut frame = original;
                frame[index] ^= 1 << bit;
                // XOR folds every bit position independently, so a single
                // flipped bit can never collide with the stored checksum.
                let err = decode_packet(&frame).unwrap_err();
                assert!(
                    matches!(err, WireError::BadChecksum { .. }),
                    "flip at byte {index} bit {bit} gave {err:?}"
                );
            }
        }
    }

    #[test]
    fn unknown_packet_type_rejected() {
        let mut frame = [0u8; PACKET_SIZE];
        frame[0] = MAGIC;
        frame[1] = 0x7A;
        frame[PACKET_SIZE - 1] = xor_checksum(&frame[..PACKET_SIZE - 1]);
        assert!(matches!(
            decode_packet(&frame),
            Err(WireError::UnknownPacketType(0x7A))
        ));
    }

    #[test]
    fn unknown_command_code_rejected() {
        let mut frame = encode_packet(&Packet::Command(CommandOp::Forward));
        frame[2] = 0xEE;
        frame[PACKET_SIZE - 1] = xor_checksum(&frame[..PACKET_SIZE - 1]);
        assert!(matches!(
            decode_packet(&frame),
            Err(WireError::UnknownCommand(0xEE))
        ));
    }

    #[test]
    fn unknown_response_code_is_preserved_not_rejected() {
        let frame = encode_packet(&Packet::Response(Response::Unknown(250)));
        assert_eq!(
            decode_packet(&frame).unwrap(),
            Packet::Response(Response::Unknown(250))
        );
    }

    #[test]
    fn forward_command_frame_fields() {
        let frame = encode_packet(&Packet::Command(CommandOp::Forward));
        assert_eq!(frame[1], TYPE_COMMAND);
        assert_eq!(frame[2], CommandOp::Forward.code());
    }

    #[test]
    fn message_truncates_at_capacity() {
        let long = "x".repeat(DATA_SIZE * 2);
        let frame = encode_packet(&Packet::Message(long));
        match decode_packet(&frame).unwrap() {
            Packet::Message(text) => assert_eq!(text, "x".repeat(MAX_MESSAGE_LEN)),
            other => panic!("expected message, got {other:?}"),
        }
    }

    #[test]
    fn message_is_nul_terminated_on_the_wire() {
        let frame = encode_packet(&Packet::Message("hi".to_string()));
        assert_eq!(frame[DATA_OFFSET], b'h');
        assert_eq!(frame[DATA_OFFSET + 1], b'i');
        assert_eq!(frame[DATA_OFFSET + 2], 0);
    }

    #[test]
    fn colour_scenario_frames_classify() {
        let green = encode_packet(&Packet::Response(Response::Colour(ColourReading::new(
            50, 150, 250,
        ))));
        match decode_packet(&green).unwrap() {
            Packet::Response(Response::Colour(reading)) => {
                assert_eq!(reading.classify(), ColourClass::Green);
            }
            other => panic!("expected colour response, got {other:?}"),
        }

        let white = encode_packet(&Packet::Response(Response::Colour(ColourReading::new(
            250, 250, 250,
        ))));
        match decode_packet(&white).unwrap() {
            Packet::Response(Response::Colour(reading)) => {
                assert_eq!(reading.classify(), ColourClass::White);
            }
            other => panic!("expected colour response, got {other:?}"),
        }
    }
}
