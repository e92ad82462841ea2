mod queries;

use std::fs;
use std::path::PathBuf;

use my_space_application::{ApplicationError, SessionStore};
use rusqlite::Connection;

use crate::migrations::MIGRATIONS;

#[derive(Debug, Clone)]
pub struct SqliteSessionStore {
    path: PathBuf,
}

impl SqliteSessionStore {
    pub fn new(path: String) -> Self {
        Self {
            path: PathBuf::from(path),
        }
    }

    pub fn initialize(&self) -> Result<(), ApplicationError> {
        if self.path.as_os_str().is_empty() {
            return Err(ApplicationError::InvalidInput(
                "session path must not be empty".to_string(),
            ));
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|error| ApplicationError::Io(error.to_string()))?;
            }
        }

        let conn = self.open_connection()?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(|error| ApplicationError::Persistence(error.to_string()))?;

        for migration in MIGRATIONS {
            conn.execute_batch(migration)
                .map_err(|error| ApplicationError::Persistence(error.to_string()))?;
        }

        Ok(())
    }

    fn open_connection(&self) -> Result<Connection, ApplicationError> {
        Connection::open(&self.path)
            .map_err(|error| ApplicationError::Persistence(error.to_string()))
    }
}

impl SessionStore for SqliteSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, ApplicationError> {
        let conn = self.open_connection()?;
        queries::find_value(&conn, key)
            .map_err(|error| ApplicationError::Persistence(error.to_string()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ApplicationError> {
        let conn = self.open_connection()?;
        queries::upsert_value(&conn, key, value)
            .map_err(|error| ApplicationError::Persistence(error.to_string()))
    }

    fn remove(&self, key: &str) -> Result<(), ApplicationError> {
        let conn = self.open_connection()?;
        queries::delete_value(&conn, key)
            .map_err(|error| ApplicationError::Persistence(error.to_string()))
    }

    fn clear(&self) -> Result<(), ApplicationError> {
        let conn = self.open_connection()?;
        queries::delete_all(&conn)
            .map_err(|error| ApplicationError::Persistence(error.to_string()))
    }
}
