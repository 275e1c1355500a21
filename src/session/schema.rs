//! Database schema for durable session logs.

/// Current schema version for migrations.
pub const SCHEMA_VERSION: u32 = 1;

/// SQL schema for the session log database.
pub const SCHEMA: &str = r"
-- Enable WAL mode for better concurrent read/write performance
PRAGMA journal_mode = WAL;

-- One snapshot of the ordered record list per session
CREATE TABLE IF NOT EXISTS session_logs (
    session_id TEXT PRIMARY KEY NOT NULL,
    records TEXT NOT NULL,
    record_count INTEGER NOT NULL DEFAULT 0,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Feed items processed per session. Survives deletion of the snapshot.
CREATE TABLE IF NOT EXISTS session_positions (
    session_id TEXT PRIMARY KEY NOT NULL,
    position INTEGER NOT NULL DEFAULT 0,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Schema version table for migrations
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

INSERT OR IGNORE INTO schema_version (version) VALUES (1);

CREATE INDEX IF NOT EXISTS idx_session_logs_updated_at ON session_logs(updated_at);
";
