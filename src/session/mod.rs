//! Per-session audit logs and their durable copies.

mod clipboard;
mod error;
mod schema;
mod storage;
mod store;

pub use clipboard::*;
pub use error::*;
pub use schema::*;
pub use storage::*;
pub use store::*;
