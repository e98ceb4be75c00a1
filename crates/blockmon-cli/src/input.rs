//! Slog input reading and decoding
//!
//! Lines are read and decoded on a separate task and handed to the
//! monitor over a channel, so the monitor stays the only owner of its state.

use blockmon_core::{decode_line, Event, RecordError};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Channel depth between the reader task and the monitor
const CHANNEL_CAPACITY: usize = 1024;

/// Input errors; all are fatal
#[derive(Debug, Error)]
pub enum InputError {
    /// Reading the input failed
    #[error("read error: {0}")]
    Io(#[from] std::io::Error),

    /// A line failed to decode or validate
    #[error(transparent)]
    Record(#[from] RecordError),
}

/// Line reader over stdin or a file, optionally following appended data
pub struct LineSource {
    reader: Box<dyn AsyncBufRead + Unpin + Send>,
    follow: Option<Duration>,
    line_no: u64,
    buf: String,
}

impl LineSource {
    /// Read from stdin until end of stream
    pub fn stdin() -> Self {
        Self::new(Box::new(BufReader::new(tokio::io::stdin())), None)
    }

    /// Read from a file. With `follow`, end of file means "poll again after this long".
    pub async fn open(path: &Path, follow: Option<Duration>) -> std::io::Result<Self> {
        let file = tokio::fs::File::open(path).await?;
        Ok(Self::new(Box::new(BufReader::new(file)), follow))
    }

    /// Wrap an arbitrary buffered reader
    pub fn new(reader: Box<dyn AsyncBufRead + Unpin + Send>, follow: Option<Duration>) -> Self {
        Self {
            reader,
            follow,
            line_no: 0,
            buf: String::new(),
        }
    }

    /// Next complete line with its 1-based number, or `None` at end of input.
    ///
    /// In follow mode a trailing partial line is held until its newline arrives.
    pub async fn next_line(&mut self) -> std::io::Result<Option<(u64, String)>> {
        loop {
            let n = self.reader.read_line(&mut self.buf).await?;
            if n == 0 {
                match self.follow {
                    Some(poll) => {
                        tokio::time::sleep(poll).await;
                        continue;
                    }
                    None if self.buf.is_empty() => return Ok(None),
                    None => {}
                }
            } else if !self.buf.ends_with('\n') && self.follow.is_some() {
                continue;
            }

            self.line_no += 1;
            let line = std::mem::take(&mut self.buf);
            let line = line.trim_end_matches(['\n', '\r']).to_string();
            return Ok(Some((self.line_no, line)));
        }
    }
}

/// Spawn the reader task. Decoded events arrive on the returned channel;
/// the first error is sent and ends the stream.
pub fn spawn_reader(
    mut source: LineSource,
    strict: bool,
) -> (mpsc::Receiver<Result<Event, InputError>>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let handle = tokio::spawn(async move {
        loop {
            let item = match source.next_line().await {
                Ok(Some((line_no, text))) => {
                    if text.trim().is_empty() {
                        continue;
                    }
                    match decode_line(line_no, &text, strict) {
                        Ok(Some(event)) => Ok(event),
                        Ok(None) => continue,
                        Err(e) => Err(InputError::from(e)),
                    }
                }
                Ok(None) => {
                    tracing::debug!("End of input after {} lines", source.line_no);
                    break;
                }
                Err(e) => Err(InputError::from(e)),
            };

            let fatal = item.is_err();
            if tx.send(item).await.is_err() || fatal {
                break;
            }
        }
    });
    (rx, handle)
}
