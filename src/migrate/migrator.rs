use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use super::sql_gen::{
    generate_create_table, generate_drop_table, generate_indexes, render_down, render_up, Dialect,
};
use crate::error::{SchemaError, SchemaResult};
use crate::schema::{DependencyResolver, TableSchema, ALL_TABLES};

/// Whether the table set exists, taken as a unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaState {
    Absent,
    Present,
    /// Left behind by an interrupted non-transactional apply; needs manual repair
    Partial {
        present: Vec<&'static str>,
        missing: Vec<&'static str>,
    },
}

/// Creates and drops a fixed set of tables in foreign key order
pub struct SchemaMigrator {
    /// Creation order; teardown walks it backwards
    tables: Vec<&'static TableSchema>,
    /// Foreign keys into tables this migrator does not create
    external: Vec<(&'static str, &'static str)>,
}

impl SchemaMigrator {
    /// Migrator for the full zoo schema
    pub fn new() -> SchemaResult<Self> {
        Self::for_tables(ALL_TABLES)
    }

    pub fn for_tables(tables: &[&'static TableSchema]) -> SchemaResult<Self> {
        for table in tables {
            table.validate()?;
        }

        let resolver = DependencyResolver::for_tables(tables);

        Ok(Self {
            tables: resolver.creation_order()?,
            external: resolver.external_dependencies(),
        })
    }

    pub fn creation_order(&self) -> &[&'static TableSchema] {
        &self.tables
    }

    pub fn teardown_order(&self) -> impl Iterator<Item = &'static TableSchema> + '_ {
        self.tables.iter().rev().copied()
    }

    /// Forward migration: create every table, parents first
    ///
    /// Fails before touching the database if any table of the set already
    /// exists or an external parent table is missing.
    pub fn apply(&self, conn: &Connection) -> SchemaResult<()> {
        for schema in &self.tables {
            if table_exists(conn, schema.name)? {
                return Err(SchemaError::AlreadyExists {
                    table: schema.name.to_string(),
                });
            }
        }

        for (table, parent) in &self.external {
            if !table_exists(conn, parent)? {
                return Err(SchemaError::MissingDependency {
                    table: table.to_string(),
                    references: parent.to_string(),
                });
            }
        }

        info!(tables = self.tables.len(), "Applying schema");

        for schema in &self.tables {
            let sql = generate_create_table(schema, Dialect::Sqlite);
            debug!(table = schema.name, %sql, "Creating table");
            conn.execute(&sql, [])
                .map_err(|e| SchemaError::from_sqlite(schema.name, e))?;

            for index_sql in generate_indexes(schema) {
                debug!(table = schema.name, sql = %index_sql, "Creating index");
                conn.execute(&index_sql, [])
                    .map_err(|e| SchemaError::from_sqlite(schema.name, e))?;
            }

            info!(table = schema.name, "Created table");
        }

        Ok(())
    }

    /// Reverse migration: drop every table, children first
    ///
    /// Tables that do not exist are skipped, so reverting an absent schema is a
    /// no-op. Returns the tables actually dropped, in drop order.
    pub fn revert(&self, conn: &Connection) -> SchemaResult<Vec<&'static str>> {
        info!(tables = self.tables.len(), "Reverting schema");
        let mut dropped = Vec::new();

        for schema in self.teardown_order() {
            let existed = table_exists(conn, schema.name)?;

            let sql = generate_drop_table(schema);
            debug!(table = schema.name, %sql, "Dropping table");
            conn.execute(&sql, [])
                .map_err(|e| SchemaError::from_sqlite(schema.name, e))?;

            if existed {
                info!(table = schema.name, "Dropped table");
                dropped.push(schema.name);
            } else {
                debug!(table = schema.name, "Table already absent");
            }
        }

        Ok(dropped)
    }

    pub fn state(&self, conn: &Connection) -> SchemaResult<SchemaState> {
        let mut present = Vec::new();
        let mut missing = Vec::new();

        for schema in &self.tables {
            if table_exists(conn, schema.name)? {
                present.push(schema.name);
            } else {
                missing.push(schema.name);
            }
        }

        Ok(match (present.is_empty(), missing.is_empty()) {
            (true, _) => SchemaState::Absent,
            (false, true) => SchemaState::Present,
            (false, false) => SchemaState::Partial { present, missing },
        })
    }

    /// Forward DDL script for another engine
    pub fn up_script(&self, dialect: Dialect) -> Vec<String> {
        render_up(&self.tables, dialect)
    }

    pub fn down_script(&self) -> Vec<String> {
        let teardown: Vec<_> = self.teardown_order().collect();
        render_down(&teardown)
    }
}

pub fn table_exists(conn: &Connection, name: &str) -> SchemaResult<bool> {
    conn.query_row(
        "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [name],
        |_| Ok(()),
    )
    .optional()
    .map(|row| row.is_some())
    .map_err(|e| SchemaError::from_sqlite(name, e))
}
