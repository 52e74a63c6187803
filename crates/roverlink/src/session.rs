//! Receive-side loop and shutdown plumbing for a live link.

use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use roverlink_wire::PacketReader;
use tracing::{debug, error, warn};

use crate::report::{render_frame_error, render_packet, OutputFormat};

/// Cancellation flag shared by the command loop, the ctrl-c handler, and
/// the receive thread. Cleared once, observed everywhere.
#[derive(Clone, Debug)]
pub struct RunFlag(Arc<AtomicBool>);

impl RunFlag {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Default for RunFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Counters the receive loop hands back when it exits.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReceiveStats {
    pub packets: usize,
    pub frame_errors: usize,
}

/// Spawn the receive flow on its own thread.
///
/// The loop polls the run flag every iteration; the transport's bounded
/// read timeout keeps that poll live even on a silent line. Frame errors
/// are reported and the loop continues; only transport I/O failure or
/// cancellation ends it.
pub fn spawn_receiver<T>(stream: T, format: OutputFormat, running: RunFlag) -> JoinHandle<ReceiveStats>
where
    T: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut reader = PacketReader::new(stream);
        let mut stats = ReceiveStats::default();

        while running.is_set() {
            match reader.poll_packet() {
                Ok(Some(packet)) => {
                    stats.packets += 1;
                    debug!(?packet, "packet received");
                    if let Some(rendered) = render_packet(&packet, format) {
                        println!("{rendered}");
                    }
                }
                Ok(None) => {}
                Err(err) if err.is_frame_error() => {
                    stats.frame_errors += 1;
                    warn!(%err, "malformed frame discarded");
                    eprintln!("{}", render_frame_error(&err));
                }
                Err(err) => {
                    error!(%err, "receive flow stopping");
                    eprintln!("receive failed: {err}");
                    break;
                }
            }
        }

        debug!(
            packets = stats.packets,
            frame_errors = stats.frame_errors,
            "receive flow finished"
        );
        stats
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::os::unix::net::UnixStream;
    use std::time::Duration;

    use roverlink_wire::{encode_packet, Packet, PacketWriter, Response};

    use super::*;

    fn pair_with_timeout() -> (UnixStream, UnixStream) {
        let (a, b) = UnixStream::pair().unwrap();
        b.set_read_timeout(Some(Duration::from_millis(10))).unwrap();
        (a, b)
    }

    #[test]
    fn receiver_counts_packets_and_stops_on_clear() {
        let (host, rover) = pair_with_timeout();
        let running = RunFlag::new();
        let handle = spawn_receiver(rover, OutputFormat::Text, running.clone());

        let mut writer = PacketWriter::new(host);
        writer.send(&Packet::Response(Response::Ok)).unwrap();
        writer.send(&Packet::Response(Response::Distance(7))).unwrap();
        thread::sleep(Duration::from_millis(100));

        running.clear();
        let stats = handle.join().unwrap();
        assert_eq!(stats.packets, 2);
        assert_eq!(stats.frame_errors, 0);
    }

    #[test]
    fn receiver_survives_frame_errors() {
        let (mut host, rover) = pair_with_timeout();
        let running = RunFlag::new();
        let handle = spawn_receiver(rover, OutputFormat::Text, running.clone());

        let mut corrupt = encode_packet(&Packet::Response(Response::Ok));
        corrupt[10] ^= 0xFF;
        host.write_all(&corrupt).unwrap();
        host.write_all(&encode_packet(&Packet::Response(Response::Ok)))
            .unwrap();
        thread::sleep(Duration::from_millis(100));

        running.clear();
        let stats = handle.join().unwrap();
        assert_eq!(stats.frame_errors, 1);
        assert_eq!(stats.packets, 1);
    }

    #[test]
    fn receiver_exits_on_cancellation_with_silent_line() {
        let (_host, rover) = pair_with_timeout();
        let running = RunFlag::new();
        let handle = spawn_receiver(rover, OutputFormat::Text, running.clone());

        thread::sleep(Duration::from_millis(30));
        running.clear();
        let stats = handle.join().unwrap();
        assert_eq!(stats, ReceiveStats::default());
    }

    #[test]
    fn run_flag_clones_share_state() {
        let flag = RunFlag::new();
        let clone = flag.clone();
        assert!(clone.is_set());
        flag.clear();
        assert!(!clone.is_set());
    }
}
