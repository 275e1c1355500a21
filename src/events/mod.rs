//! Event registry, parsing and severity classification.

mod details;
mod kind;
mod parser;
mod record;
mod severity;

pub use details::*;
pub use kind::{Category, EventKind, UnknownKind};
pub use parser::{parse_timestamp, EventParser, Rejection};
pub use record::AuditRecord;
pub use severity::{classify, Severity};
