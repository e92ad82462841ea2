use rusqlite::{params, Connection, OptionalExtension, Result};

pub fn find_value(conn: &Connection, key: &str) -> Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM session_entries WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
}

pub fn upsert_value(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO session_entries (key, value)
         VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn delete_value(conn: &Connection, key: &str) -> Result<()> {
    conn.execute("DELETE FROM session_entries WHERE key = ?1", params![key])?;
    Ok(())
}

pub fn delete_all(conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM session_entries", [])?;
    Ok(())
}
