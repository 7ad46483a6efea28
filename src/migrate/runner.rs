use rusqlite::Connection;
use std::path::Path;
use tracing::info;

use super::migrator::{SchemaMigrator, SchemaState};
use crate::error::{SchemaError, SchemaResult};

/// Runs the schema migrator against a SQLite database, one transaction per run
pub struct MigrationRunner {
    conn: Connection,
    migrator: SchemaMigrator,
}

impl MigrationRunner {
    pub fn open(db_path: &Path) -> SchemaResult<Self> {
        let conn = Connection::open(db_path).map_err(SchemaError::ConnectionFailure)?;
        info!(path = %db_path.display(), "Opened database");
        Self::with_connection(conn)
    }

    pub fn in_memory() -> SchemaResult<Self> {
        let conn = Connection::open_in_memory().map_err(SchemaError::ConnectionFailure)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> SchemaResult<Self> {
        // SQLite ignores foreign keys, and therefore cascades, unless asked.
        // The pragma is a no-op inside a transaction, so set it up front.
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(SchemaError::ConnectionFailure)?;

        Ok(Self {
            conn,
            migrator: SchemaMigrator::new()?,
        })
    }

    /// Apply the schema; on failure nothing is left behind
    pub fn up(&mut self) -> SchemaResult<()> {
        let tx = self
            .conn
            .transaction()
            .map_err(SchemaError::ConnectionFailure)?;

        self.migrator.apply(&tx)?;

        tx.commit().map_err(SchemaError::ConnectionFailure)?;
        info!("Schema applied");
        Ok(())
    }

    /// Revert the schema; returns the tables that were dropped
    pub fn down(&mut self) -> SchemaResult<Vec<&'static str>> {
        let tx = self
            .conn
            .transaction()
            .map_err(SchemaError::ConnectionFailure)?;

        let dropped = self.migrator.revert(&tx)?;

        tx.commit().map_err(SchemaError::ConnectionFailure)?;
        info!(dropped = dropped.len(), "Schema reverted");
        Ok(dropped)
    }

    pub fn status(&self) -> SchemaResult<SchemaState> {
        self.migrator.state(&self.conn)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
