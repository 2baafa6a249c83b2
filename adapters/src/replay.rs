use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use async_trait::async_trait;
use corelib::models::{Event, FeedKind};
use tracing::debug;

use crate::source::{FeedSource, SourceError};

/// Replays a JSON-lines log of events, one event per tick.
///
/// Blank lines are skipped. A line that does not decode yields
/// `SourceError::Decode` carrying its 1-based line number; the next poll
/// continues with the following line.
pub struct ReplaySource<R> {
    feed: FeedKind,
    reader: R,
    line_no: usize,
    buf: Vec<u8>,
}

impl ReplaySource<BufReader<File>> {
    pub fn open(feed: FeedKind, path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let file = File::open(path.as_ref())?;
        debug!(feed = %feed, path = %path.as_ref().display(), "replay log opened");
        Ok(Self::new(feed, BufReader::new(file)))
    }
}

impl<R: BufRead> ReplaySource<R> {
    pub fn new(feed: FeedKind, reader: R) -> Self {
        Self {
            feed,
            reader,
            line_no: 0,
            buf: Vec::new(),
        }
    }

    /// Next decoded event, or `None` at end of input.
    fn read_event(&mut self) -> Result<Option<Event>, SourceError> {
        loop {
            self.buf.clear();
            if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            let line = self.buf.trim_ascii();
            if line.is_empty() {
                continue;
            }

            // Invalid UTF-8 surfaces as a decode error on this line.
            return serde_json::from_slice(line)
                .map(Some)
                .map_err(|source| SourceError::Decode {
                    line: self.line_no,
                    source,
                });
        }
    }
}

#[async_trait]
impl<R: BufRead + Send> FeedSource for ReplaySource<R> {
    fn feed(&self) -> FeedKind {
        self.feed
    }

    async fn next_batch(&mut self) -> Result<Option<Vec<Event>>, SourceError> {
        Ok(self.read_event()?.map(|event| vec![event]))
    }
}
