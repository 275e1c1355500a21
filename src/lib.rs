//! Curation Audit - ingestion, classification and formatting of curation
//! pipeline audit events into per-session logs.

pub mod commands;
pub mod config;
pub mod display;
pub mod events;
pub mod feed;
pub mod format;
pub mod session;
