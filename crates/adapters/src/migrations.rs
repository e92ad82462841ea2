pub const MIGRATIONS: &[&str] = &["CREATE TABLE IF NOT EXISTS session_entries (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    );"];
