use std::io::BufRead;
use std::thread;
use std::time::Duration;

use roverlink_wire::{Packet, PacketWriter};
use tracing::{info, warn};

use crate::cmd::DriveArgs;
use crate::exit::{transport_error, wire_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::keymap::{action_for, KeyAction, PROMPT};
use crate::report::OutputFormat;
use crate::session::{spawn_receiver, RunFlag};

/// Give the rover's microcontroller time to come back up after the port
/// open resets it.
const REBOOT_DELAY: Duration = Duration::from_secs(2);

pub fn run(args: DriveArgs, format: OutputFormat) -> CliResult<i32> {
    let stream = args.link.open()?;
    let reader_stream = stream
        .try_clone()
        .map_err(|err| transport_error("failed to clone serial stream", err))?;

    info!(delay = ?REBOOT_DELAY, "waiting for the rover to reboot");
    thread::sleep(REBOOT_DELAY);

    let running = RunFlag::new();
    install_ctrlc_handler(running.clone())?;

    let receiver = spawn_receiver(reader_stream, format, running.clone());
    let mut writer = PacketWriter::new(stream);

    writer
        .send(&Packet::Hello)
        .map_err(|err| wire_error("hello failed", err))?;

    let stdin = std::io::stdin();
    println!("{PROMPT}");
    for line in stdin.lock().lines() {
        if !running.is_set() {
            break;
        }
        let line = line.map_err(|err| crate::exit::io_error("stdin read failed", err))?;
        let Some(key) = line.trim().chars().next() else {
            println!("{PROMPT}");
            continue;
        };

        match action_for(key) {
            KeyAction::Send(op) => {
                info!(command = op.name(), "sending command");
                // best effort: a lost command is reported, not fatal
                if let Err(err) = writer.send(&Packet::Command(op)) {
                    warn!(%err, "send failed");
                    eprintln!("send failed: {err}");
                }
            }
            KeyAction::Quit => break,
            KeyAction::Unknown(key) => println!("Bad command: {key}"),
        }
        println!("{PROMPT}");
    }

    info!("closing link to the rover");
    running.clear();
    let stats = receiver
        .join()
        .map_err(|_| CliError::new(INTERNAL, "receive thread panicked"))?;
    info!(
        packets = stats.packets,
        frame_errors = stats.frame_errors,
        "session finished"
    );

    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: RunFlag) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.clear();
    })
    .map_err(|err| {
        CliError::new(
            INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
