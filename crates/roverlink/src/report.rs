//! Human-readable rendering of decoded packets and frame errors.

use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use roverlink_wire::{Packet, RemoteFault, Response, WireError};

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Text
        } else {
            Self::Json
        }
    }
}

/// Render one decoded packet, or `None` for kinds the host never reports
/// (COMMAND and HELLO only travel host-to-rover; seeing one echoed back is
/// ignored, matching the device's behaviour).
pub fn render_packet(packet: &Packet, format: OutputFormat) -> Option<String> {
    if matches!(packet, Packet::Command(_) | Packet::Hello) {
        return None;
    }

    match format {
        OutputFormat::Json => Some(
            serde_json::to_string(packet).unwrap_or_else(|_| "{}".to_string()),
        ),
        OutputFormat::Text => Some(render_text(packet)),
    }
}

fn render_text(packet: &Packet) -> String {
    match packet {
        Packet::Response(Response::Ok) => "Command OK".to_string(),
        Packet::Response(Response::Status(report)) => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["COUNTER", "VALUE"]);
            for (label, value) in report.fields() {
                table.add_row(vec![label.to_string(), value.to_string()]);
            }
            format!("Rover status report\n{table}")
        }
        Packet::Response(Response::Distance(cm)) => {
            format!("Ultrasonic distance: {cm} cm")
        }
        Packet::Response(Response::Colour(reading)) => format!(
            "Colour sensor: R={} G={} B={} -> {}",
            reading.red,
            reading.green,
            reading.blue,
            reading.classify().label()
        ),
        Packet::Response(Response::Unknown(code)) => {
            format!("Rover is confused (response code {code})")
        }
        Packet::Error(fault) => render_fault(*fault),
        Packet::Message(text) => format!("Message from rover: {text}"),
        // filtered out by render_packet
        Packet::Command(_) | Packet::Hello => String::new(),
    }
}

fn render_fault(fault: RemoteFault) -> String {
    match fault {
        RemoteFault::BadMagicReceived => "Rover received a bad magic byte".to_string(),
        RemoteFault::BadChecksumReceived => "Rover received a bad checksum".to_string(),
        RemoteFault::BadCommand => "Rover received a bad command".to_string(),
        RemoteFault::UnexpectedResponse => "Rover received an unexpected response".to_string(),
        RemoteFault::Other(code) => format!("Rover reports an unknown fault (code {code})"),
    }
}

/// Render a local framing error from the receive path.
pub fn render_frame_error(err: &WireError) -> String {
    match err {
        WireError::BadMagic { .. } => "ERROR: bad magic byte".to_string(),
        WireError::BadChecksum { .. } => "ERROR: bad checksum".to_string(),
        other => format!("ERROR: {other}"),
    }
}
