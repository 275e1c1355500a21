//! Feed backed by a JSON Lines file that grows over time.

use std::ops::Range;
use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};

use super::error::FeedError;
use super::item::{EventFeed, RawFeedItem};

/// What a [`JsonlFeed::refresh`] observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedChange {
    /// No new lines.
    Unchanged,
    /// This many items were appended.
    Appended(usize),
    /// The file shrank; all items were reloaded from the start.
    Replaced,
}

/// In-memory mirror of a JSONL event file.
///
/// Each line holds one [`RawFeedItem`]. Malformed lines, including ones that
/// are not valid UTF-8, are skipped with a warning. A partial trailing line is left unread until it is completed.
#[derive(Debug)]
pub struct JsonlFeed {
    path: PathBuf,
    offset: u64,
    items: Vec<RawFeedItem>,
}

impl JsonlFeed {
    /// Feed for `path`, empty until the first [`JsonlFeed::refresh`].
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            offset: 0,
            items: Vec::new(),
        }
    }

    /// Open `path` and read everything currently in it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, FeedError> {
        let mut feed = Self::new(path);
        feed.refresh().await?;
        Ok(feed)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Byte offset of the first unread line.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    #[must_use]
    pub fn items(&self) -> &[RawFeedItem] {
        &self.items
    }

    /// Read lines appended since the last refresh.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened (deleted, permission
    /// denied) or an I/O error occurs while reading.
    pub async fn refresh(&mut self) -> Result<FeedChange, FeedError> {
        let mut file = File::open(&self.path)
            .await
            .map_err(|e| FeedError::from_open(&self.path, e))?;

        let file_len = file.metadata().await?.len();
        let replaced = file_len < self.offset;
        if replaced {
            tracing::warn!(
                path = %self.path.display(),
                old_offset = self.offset,
                new_len = file_len,
                "Feed file truncated, reloading from start"
            );
            self.offset = 0;
            self.items.clear();
        }

        if file_len == self.offset {
            return Ok(if replaced {
                FeedChange::Replaced
            } else {
                FeedChange::Unchanged
            });
        }

        file.seek(std::io::SeekFrom::Start(self.offset)).await?;
        let mut reader = BufReader::new(file);
        let mut buf = Vec::new();
        let mut appended = 0;

        loop {
            buf.clear();
            let bytes_read = reader.read_until(b'\n', &mut buf).await?;
            if bytes_read == 0 || buf.last() != Some(&b'\n') {
                break;
            }
            self.offset += bytes_read as u64;

            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        offset = self.offset - bytes_read as u64,
                        error = %e,
                        "Skipping feed line that is not UTF-8"
                    );
                    continue;
                }
            };
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match serde_json::from_str::<RawFeedItem>(trimmed) {
                Ok(item) => {
                    self.items.push(item);
                    appended += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        line = %trimmed,
                        error = %e,
                        "Skipping malformed feed line"
                    );
                }
            }
        }

        Ok(if replaced {
            FeedChange::Replaced
        } else if appended > 0 {
            FeedChange::Appended(appended)
        } else {
            FeedChange::Unchanged
        })
    }
}

impl EventFeed for JsonlFeed {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn slice(&self, range: Range<usize>) -> &[RawFeedItem] {
        &self.items[range]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn line(kind: &str, message: &str) -> String {
        format!(
            r#"{{"type":"{kind}","timestamp":"2026-01-29T10:00:00Z","sessionId":"s1","details":{{"message":"{message}"}}}}"#
        )
    }

    #[tokio::test]
    async fn test_open_reads_existing_lines() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", line("SUPERVISOR_START", "a")).unwrap();
        writeln!(file, "{}", line("SUPERVISOR_RESULT", "b")).unwrap();
        file.flush().unwrap();

        let feed = JsonlFeed::open(file.path()).await.unwrap();
        assert_eq!(feed.len(), 2);
        assert_eq!(feed.items()[0].kind, "SUPERVISOR_START");
        assert_eq!(feed.items()[1].session_ref.as_deref(), Some("s1"));
        assert!(feed.offset() > 0);
    }

    #[tokio::test]
    async fn test_refresh_reads_only_new_lines() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", line("SUPERVISOR_START", "a")).unwrap();
        file.flush().unwrap();

        let mut feed = JsonlFeed::open(file.path()).await.unwrap();
        assert_eq!(feed.refresh().await.unwrap(), FeedChange::Unchanged);

        writeln!(file, "{}", line("LLM_CALL", "b")).unwrap();
        writeln!(file, "{}", line("LLM_CALL", "c")).unwrap();
        file.flush().unwrap();

        assert_eq!(feed.refresh().await.unwrap(), FeedChange::Appended(2));
        assert_eq!(feed.len(), 3);
    }

    #[tokio::test]
    async fn test_refresh_waits_for_complete_line() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", line("SUPERVISOR_START", "a")).unwrap();
        file.flush().unwrap();

        let mut feed = JsonlFeed::open(file.path()).await.unwrap();
        assert!(feed.is_empty());
        assert_eq!(feed.offset(), 0);

        writeln!(file).unwrap();
        file.flush().unwrap();
        assert_eq!(feed.refresh().await.unwrap(), FeedChange::Appended(1));
    }

    #[tokio::test]
    async fn test_refresh_handles_truncation() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();
        {
            let mut f = std::fs::File::create(&path).unwrap();
            writeln!(f, "{}", line("SUPERVISOR_START", "a")).unwrap();
            writeln!(f, "{}", line("SUPERVISOR_START", "b")).unwrap();
        }

        let mut feed = JsonlFeed::open(&path).await.unwrap();
        assert_eq!(feed.len(), 2);

        {
            let mut f = std::fs::File::create(&path).unwrap();
            writeln!(f, "{}", line("SUPERVISOR_START", "c")).unwrap();
        }

        assert_eq!(feed.refresh().await.unwrap(), FeedChange::Replaced);
        assert_eq!(feed.len(), 1);
    }

    #[tokio::test]
    async fn test_skips_invalid_utf8_and_keeps_reading() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", line("SUPERVISOR_START", "a")).unwrap();
        file.write_all(b"{\"kind\":\"LLM_CALL\",\"payload\":\"\xff\xfe\"}\n").unwrap();
        file.flush().unwrap();

        let mut feed = JsonlFeed::open(file.path()).await.unwrap();
        assert_eq!(feed.len(), 1);
        let after_bad_line = feed.offset();
        assert_eq!(after_bad_line, std::fs::metadata(file.path()).unwrap().len());

        writeln!(file, "{}", line("SUPERVISOR_COMPLETE", "b")).unwrap();
        file.flush().unwrap();
        assert_eq!(feed.refresh().await.unwrap(), FeedChange::Appended(1));
        assert_eq!(feed.items()[1].kind, "SUPERVISOR_COMPLETE");
        assert!(feed.offset() > after_bad_line);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let result = JsonlFeed::open("/tmp/nonexistent-feed-12345.jsonl").await;
        assert!(matches!(result, Err(FeedError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_skips_malformed_lines() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", line("SUPERVISOR_START", "a")).unwrap();
        writeln!(file, "not valid json").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "{}", line("SUPERVISOR_START", "b")).unwrap();
        file.flush().unwrap();

        let feed = JsonlFeed::open(file.path()).await.unwrap();
        assert_eq!(feed.len(), 2);
    }
}
