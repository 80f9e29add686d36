use std::io;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

/// Something the operator did: a code was decoded or a command was typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// Raw decoded QR text.
    Payload(String),
    /// Close the detail view.
    Close,
    /// Open the certificate of the displayed product.
    OpenCertificate,
    Quit,
}

/// Source of decoded QR payloads.
#[async_trait]
pub trait ScanSource {
    /// Next event, or `None` once the source is exhausted.
    async fn next_event(&mut self) -> io::Result<Option<ScanEvent>>;
}

/// Reads one payload per line; lines starting with `:` are commands.
pub struct LineScanSource<R> {
    lines: Lines<R>,
}

impl<R> LineScanSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

#[async_trait]
impl<R> ScanSource for LineScanSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn next_event(&mut self) -> io::Result<Option<ScanEvent>> {
        while let Some(line) = self.lines.next_line().await? {
            if let Some(event) = parse_line(&line) {
                return Ok(Some(event));
            }
        }
        Ok(None)
    }
}

/// Interpret one input line. Blank lines and unknown commands yield `None`.
pub fn parse_line(line: &str) -> Option<ScanEvent> {
    if line.trim().is_empty() {
        return None;
    }

    let Some(command) = line.trim().strip_prefix(':') else {
        return Some(ScanEvent::Payload(line.to_string()));
    };

    match command {
        "close" | "c" => Some(ScanEvent::Close),
        "cert" => Some(ScanEvent::OpenCertificate),
        "quit" | "q" => Some(ScanEvent::Quit),
        other => {
            log::warn!("Unknown command ':{other}'");
            None
        }
    }
}
