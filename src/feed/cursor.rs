//! Consumed-position tracking over the shared feed.

use serde::{Deserialize, Serialize};

use super::item::{EventFeed, RawFeedItem};

/// Number of feed items already consumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StreamCursor {
    processed: usize,
}

/// Result of draining a feed from a cursor.
#[derive(Debug)]
pub struct Drained<'a> {
    /// Items not yet consumed, in feed order.
    pub items: &'a [RawFeedItem],
    /// Cursor to store once `items` have been processed.
    pub next: StreamCursor,
    /// The cursor pointed past the end of the feed, so the feed was read from
    /// the start.
    pub replaced: bool,
}

impl StreamCursor {
    /// Cursor at the start of the feed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cursor with `processed` items already consumed.
    #[must_use]
    pub fn at(processed: usize) -> Self {
        Self { processed }
    }

    /// Cursor that acknowledges everything currently in `feed`.
    #[must_use]
    pub fn caught_up<F: EventFeed + ?Sized>(feed: &F) -> Self {
        Self::at(feed.len())
    }

    /// Number of items consumed.
    #[must_use]
    pub fn position(&self) -> usize {
        self.processed
    }

    /// Return the unconsumed suffix of `feed` and the cursor that follows it.
    ///
    /// Does not move `self`; callers store [`Drained::next`] after the batch
    /// has been handled.
    #[must_use]
    pub fn drain<'a, F: EventFeed + ?Sized>(&self, feed: &'a F) -> Drained<'a> {
        let len = feed.len();
        let (start, replaced) = if self.processed > len {
            tracing::warn!(
                cursor = self.processed,
                feed_len = len,
                "Feed is shorter than cursor, reading from start"
            );
            (0, true)
        } else {
            (self.processed, false)
        };

        Drained {
            items: feed.slice(start..len),
            next: Self::at(len),
            replaced,
        }
    }
}
