use std::time::Instant;

use roverlink_wire::{CommandOp, Packet, PacketReader, PacketWriter};
use tracing::info;

use crate::cmd::{parse_duration, SendArgs};
use crate::exit::{wire_error, CliError, CliResult, SUCCESS, USAGE};
use crate::keymap::{action_for, KeyAction};
use crate::report::{render_frame_error, render_packet, OutputFormat};

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let op = resolve_command(&args.command)?;
    let wait = args.wait.as_deref().map(parse_duration).transpose()?;

    let stream = args.link.open()?;
    let mut writer = PacketWriter::new(stream);
    info!(command = op.name(), "sending command");
    writer
        .send(&Packet::Command(op))
        .map_err(|err| wire_error("send failed", err))?;

    if let Some(wait) = wait {
        let deadline = Instant::now() + wait;
        let mut reader = PacketReader::new(writer.into_inner());
        while Instant::now() < deadline {
            match reader.poll_packet() {
                Ok(Some(packet)) => {
                    if let Some(rendered) = render_packet(&packet, format) {
                        println!("{rendered}");
                    }
                }
                Ok(None) => {}
                Err(err) if err.is_frame_error() => {
                    eprintln!("{}", render_frame_error(&err));
                }
                Err(err) => return Err(wire_error("receive failed", err)),
            }
        }
    }

    Ok(SUCCESS)
}

/// Accept either a drive key (`w`) or a command name (`forward`).
fn resolve_command(input: &str) -> CliResult<CommandOp> {
    let input = input.trim();

    if let Some(op) = CommandOp::all().iter().find(|op| op.name() == input) {
        return Ok(*op);
    }

    let mut chars = input.chars();
    if let (Some(key), None) = (chars.next(), chars.next()) {
        if let KeyAction::Send(op) = action_for(key) {
            return Ok(op);
        }
    }

    Err(CliError::new(
        USAGE,
        format!("not a sendable command: {input}"),
    ))
}
