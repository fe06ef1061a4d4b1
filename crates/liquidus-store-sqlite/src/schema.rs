//! SQL schema for the Liquidus SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- The type registry. `position` keeps registry order stable.
CREATE TABLE IF NOT EXISTS drink_types (
    type_id          TEXT PRIMARY KEY,
    name             TEXT NOT NULL,
    kind             TEXT NOT NULL,   -- 'water' | 'coffee' | 'soda' | 'juice' | 'custom'
    enabled          INTEGER NOT NULL DEFAULT 1,
    hydration_factor REAL NOT NULL DEFAULT 1.0,
    position         INTEGER NOT NULL
);

-- Records are never updated except by a unit conversion.
CREATE TABLE IF NOT EXISTS drinks (
    record_id TEXT PRIMARY KEY,
    timestamp TEXT NOT NULL,          -- fixed-width RFC 3339 UTC
    amount    REAL NOT NULL CHECK (amount >= 0),
    type_id   TEXT NOT NULL REFERENCES drink_types(type_id)
);

-- Single-row settings table.
CREATE TABLE IF NOT EXISTS settings (
    id               INTEGER PRIMARY KEY CHECK (id = 1),
    daily_goal       REAL NOT NULL CHECK (daily_goal > 0),
    units            TEXT NOT NULL,   -- 'ml' | 'oz'
    last_health_sync TEXT
);

CREATE UNIQUE INDEX IF NOT EXISTS drink_types_name_idx ON drink_types(name COLLATE NOCASE);
CREATE INDEX IF NOT EXISTS drinks_timestamp_idx ON drinks(timestamp);
CREATE INDEX IF NOT EXISTS drinks_type_idx      ON drinks(type_id);

PRAGMA user_version = 1;
";
