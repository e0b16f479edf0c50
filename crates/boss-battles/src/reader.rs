//! Line input from a serial port, a file, or stdin.
//!
//! A tokio task reads the source line by line and forwards each line over a
//! bounded channel. The tick loop drains the channel without blocking.

use std::path::PathBuf;

use boss_battles_core::server::{Reader, ReaderError};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::task::JoinHandle;
use tokio_serial::SerialPortBuilderExt;
use tracing::{debug, info, warn};

const CHANNEL_CAPACITY: usize = 256;

/// Baud rate the micro:bit radio bridge writes at.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Where lines come from.
#[derive(Debug, Clone)]
pub enum LineSource {
    /// A serial port, e.g. `/dev/ttyACM0` or `COM3`.
    Serial {
        /// Port name.
        port: String,
        /// Line speed.
        baud_rate: u32,
    },
    /// A recorded command file, read once to the end.
    File(PathBuf),
    /// The process's standard input.
    Stdin,
}

/// A [`Reader`] fed by a background task.
#[derive(Debug)]
pub struct ChannelReader {
    source: LineSource,
    rx: Option<mpsc::Receiver<String>>,
    task: Option<JoinHandle<()>>,
}

impl ChannelReader {
    /// Creates a reader; nothing is opened until [`Reader::open`].
    pub fn new(source: LineSource) -> Self {
        Self {
            source,
            rx: None,
            task: None,
        }
    }
}

impl Reader for ChannelReader {
    fn open(&mut self) -> Result<(), ReaderError> {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let task = match &self.source {
            LineSource::Serial { port, baud_rate } => {
                let stream = tokio_serial::new(port.as_str(), *baud_rate)
                    .open_native_async()
                    .map_err(std::io::Error::from)?;
                info!(%port, baud_rate, "reading commands from serial port");
                tokio::spawn(forward_lines(BufReader::new(stream), tx))
            }
            LineSource::File(path) => {
                let file = std::fs::File::open(path)?;
                info!(path = %path.display(), "replaying commands from file");
                let reader = BufReader::new(tokio::fs::File::from_std(file));
                tokio::spawn(forward_lines(reader, tx))
            }
            LineSource::Stdin => {
                info!("reading commands from stdin");
                tokio::spawn(forward_lines(BufReader::new(tokio::io::stdin()), tx))
            }
        };
        self.rx = Some(rx);
        self.task = Some(task);
        Ok(())
    }

    fn close(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.rx = None;
        debug!("input closed");
    }

    fn read(&mut self) -> Vec<String> {
        let Some(rx) = self.rx.as_mut() else {
            return Vec::new();
        };
        let mut lines = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(line) => lines.push(line),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    debug!("input source finished");
                    break;
                }
            }
        }
        lines
    }
}

impl Drop for ChannelReader {
    fn drop(&mut self) {
        self.close();
    }
}

async fn forward_lines<B>(reader: B, tx: mpsc::Sender<String>)
where
    B: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }
                if tx.send(line).await.is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(err) => {
                warn!(%err, "input read failed");
                break;
            }
        }
    }
}
