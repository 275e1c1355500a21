//! Sources of raw feed items and consumption tracking.

mod cursor;
mod error;
mod item;
mod jsonl;
mod watcher;

pub use cursor::{Drained, StreamCursor};
pub use error::FeedError;
pub use item::{EventFeed, RawFeedItem};
pub use jsonl::{FeedChange, JsonlFeed};
pub use watcher::{FeedSignal, FeedWatcher, DEBOUNCE};
