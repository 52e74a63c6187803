use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};
use roverlink_transport::{SerialConfig, SerialStream};

use crate::exit::{transport_error, CliError, CliResult, USAGE};
use crate::report::OutputFormat;

pub mod drive;
pub mod send;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive drive session.
    Drive(DriveArgs),
    /// Send a single command, optionally waiting for replies.
    Send(SendArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Drive(args) => drive::run(args, format),
        Command::Send(args) => send::run(args, format),
    }
}

/// Connection settings shared by every subcommand.
#[derive(Args, Debug)]
pub struct LinkArgs {
    /// Serial device the rover is attached to.
    #[arg(
        long,
        short = 'p',
        value_name = "DEV",
        default_value = "/dev/ttyACM0",
        env = "ROVERLINK_PORT"
    )]
    pub port: PathBuf,

    /// Line speed in baud.
    #[arg(long, default_value_t = 9600)]
    pub baud: u32,

    /// Bound on each receive-loop read (e.g. 500ms, 2s).
    #[arg(long, value_name = "DURATION", default_value = "500ms")]
    pub read_timeout: String,
}

impl LinkArgs {
    pub fn serial_config(&self) -> CliResult<SerialConfig> {
        Ok(SerialConfig {
            baud: self.baud,
            read_timeout: parse_duration(&self.read_timeout)?,
            ..SerialConfig::default()
        })
    }

    pub fn open(&self) -> CliResult<SerialStream> {
        let config = self.serial_config()?;
        SerialStream::open(&self.port, &config)
            .map_err(|err| transport_error("failed to open serial port", err))
    }
}

#[derive(Args, Debug)]
pub struct DriveArgs {
    #[command(flatten)]
    pub link: LinkArgs,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    #[command(flatten)]
    pub link: LinkArgs,

    /// Command to send: a drive key (e.g. `w`) or a name (e.g. `forward`).
    pub command: String,

    /// Keep printing replies for this long before exiting (e.g. 2s).
    #[arg(long, value_name = "DURATION")]
    pub wait: Option<String>,
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        _ => Err(CliError::new(
            USAGE,
            format!("unsupported duration unit: {unit}"),
        )),
    }
}
