//! SQLite schema for the key-value backend.

/// Schema applied on every open.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Key-value slots
-- ============================================================================

CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
