use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::os::fd::AsRawFd;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{Result, TransportError};

/// Character size per frame on the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataBits {
    Five,
    Six,
    Seven,
    #[default]
    Eight,
}

/// Parity bit discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parity {
    #[default]
    None,
    Even,
    Odd,
}

/// Number of stop bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopBits {
    #[default]
    One,
    Two,
}

/// Line settings for a serial device.
///
/// The read timeout bounds every `read` call: a read returns 0 bytes once
/// the timeout elapses with nothing on the line, so a receive loop can poll
/// a shutdown flag instead of blocking forever.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    pub baud: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub read_timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud: 9600,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            read_timeout: Duration::from_millis(500),
        }
    }
}

fn baud_to_speed(baud: u32) -> Option<libc::speed_t> {
    Some(match baud {
        1200 => libc::B1200,
        2400 => libc::B2400,
        4800 => libc::B4800,
        9600 => libc::B9600,
        19200 => libc::B19200,
        38400 => libc::B38400,
        57600 => libc::B57600,
        115200 => libc::B115200,
        _ => return None,
    })
}

/// VTIME is in tenths of a second, 1..=255. Sub-decisecond timeouts round
/// up so the wait stays bounded but never busy-spins at zero.
fn timeout_deciseconds(timeout: Duration) -> libc::cc_t {
    let ds = timeout.as_millis().div_ceil(100);
    ds.clamp(1, 255) as libc::cc_t
}

fn apply_settings(tio: &mut libc::termios, config: &SerialConfig) -> Result<()> {
    let speed = baud_to_speed(config.baud).ok_or(TransportError::UnsupportedBaud(config.baud))?;

    // SAFETY: `tio` is a valid, exclusively borrowed termios struct.
    unsafe {
        libc::cfmakeraw(tio);
        libc::cfsetispeed(tio, speed);
        libc::cfsetospeed(tio, speed);
    }

    tio.c_cflag &= !libc::CSIZE;
    tio.c_cflag |= match config.data_bits {
        DataBits::Five => libc::CS5,
        DataBits::Six => libc::CS6,
        DataBits::Seven => libc::CS7,
        DataBits::Eight => libc::CS8,
    };

    match config.parity {
        Parity::None => tio.c_cflag &= !libc::PARENB,
        Parity::Even => {
            tio.c_cflag |= libc::PARENB;
            tio.c_cflag &= !libc::PARODD;
        }
        Parity::Odd => tio.c_cflag |= libc::PARENB | libc::PARODD,
    }

    match config.stop_bits {
        StopBits::One => tio.c_cflag &= !libc::CSTOPB,
        StopBits::Two => tio.c_cflag |= libc::CSTOPB,
    }

    tio.c_cflag |= libc::CLOCAL | libc::CREAD;

    // VMIN=0 with a nonzero VTIME: read returns whatever arrived within
    // the window, possibly nothing. Framing happens above this layer.
    tio.c_cc[libc::VMIN] = 0;
    tio.c_cc[libc::VTIME] = timeout_deciseconds(config.read_timeout);

    Ok(())
}

/// An open serial device — implements Read + Write.
///
/// Reads and writes go through independent kernel paths on a tty, so one
/// handle (or a `try_clone` pair) can serve a writer and a reader thread
/// concurrently. The descriptor closes when the last handle drops.
pub struct SerialStream {
    file: File,
    path: PathBuf,
}

impl SerialStream {
    /// Open and configure a serial device.
    ///
    /// The device is put into raw mode with the requested line settings and
    /// any bytes already queued in either direction are flushed, so the
    /// first frame starts from a clean line.
    pub fn open(path: impl AsRef<Path>, config: &SerialConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NOCTTY)
            .open(&path)
            .map_err(|e| TransportError::Open {
                path: path.clone(),
                source: e,
            })?;

        let fd = file.as_raw_fd();
        let configure_err = |source: std::io::Error| TransportError::Configure {
            path: path.clone(),
            source,
        };

        // SAFETY: `fd` is an open descriptor owned by `file`, and `tio` is
        // a valid writable pointer for the duration of each call.
        let mut tio: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(fd, &mut tio) } != 0 {
            return Err(configure_err(std::io::Error::last_os_error()));
        }

        apply_settings(&mut tio, config)?;

        if unsafe { libc::tcflush(fd, libc::TCIOFLUSH) } != 0 {
            return Err(configure_err(std::io::Error::last_os_error()));
        }
        if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &tio) } != 0 {
            return Err(configure_err(std::io::Error::last_os_error()));
        }

        info!(?path, baud = config.baud, "opened serial port");

        Ok(Self { file, path })
    }

    /// Try to clone this stream (creates a new file descriptor).
    ///
    /// The clone shares the device and its line settings; use it to hand
    /// the read side to a receive thread while the writer keeps the
    /// original.
    pub fn try_clone(&self) -> Result<Self> {
        let file = self.file.try_clone()?;
        debug!(path = ?self.path, "cloned serial stream");
        Ok(Self {
            file,
            path: self.path.clone(),
        })
    }

    /// The device path this stream is attached to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Transport name for diagnostics.
    pub fn transport_name(&self) -> &'static str {
        "serial-tty"
    }
}

impl Read for SerialStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.file.read(buf)
    }
}

impl Write for SerialStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.file.flush()
    }
}

impl std::fmt::Debug for SerialStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialStream")
            .field("path", &self.path)
            .finish()
    }
}
