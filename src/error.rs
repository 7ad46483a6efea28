use rusqlite::ErrorCode;
use thiserror::Error;

/// Failures surfaced by schema declaration, ordering and migration.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("table `{table}` already exists")]
    AlreadyExists { table: String },

    #[error("table `{table}` references `{references}`, which does not exist yet")]
    MissingDependency { table: String, references: String },

    #[error("circular dependency detected at: {table}")]
    CircularDependency { table: String },

    #[error("invalid definition for table `{table}`: {reason}")]
    InvalidDefinition { table: String, reason: String },

    #[error("constraint violation on table `{table}`: {source}")]
    ConstraintViolation {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("database connection unusable: {0}")]
    ConnectionFailure(#[source] rusqlite::Error),

    #[error("storage error on table `{table}`: {source}")]
    Storage {
        table: String,
        #[source]
        source: rusqlite::Error,
    },
}

pub type SchemaResult<T> = Result<T, SchemaError>;

impl SchemaError {
    /// Classify an engine error raised while working on `table`.
    pub fn from_sqlite(table: &str, err: rusqlite::Error) -> Self {
        let table = table.to_string();

        let (code, message) = match &err {
            rusqlite::Error::SqliteFailure(e, msg) => (Some(e.code), msg.clone()),
            _ => (None, None),
        };

        match code {
            Some(ErrorCode::ConstraintViolation) => {
                SchemaError::ConstraintViolation { table, source: err }
            }
            Some(
                ErrorCode::CannotOpen
                | ErrorCode::NotADatabase
                | ErrorCode::PermissionDenied
                | ErrorCode::SystemIoFailure
                | ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::DatabaseCorrupt
                | ErrorCode::ReadOnly,
            ) => SchemaError::ConnectionFailure(err),
            _ => match message.as_deref().and_then(existing_table) {
                Some(existing) => SchemaError::AlreadyExists { table: existing },
                None => SchemaError::Storage { table, source: err },
            },
        }
    }

    /// Name of the table the error is about, if any.
    pub fn table(&self) -> Option<&str> {
        match self {
            SchemaError::AlreadyExists { table }
            | SchemaError::MissingDependency { table, .. }
            | SchemaError::CircularDependency { table }
            | SchemaError::InvalidDefinition { table, .. }
            | SchemaError::ConstraintViolation { table, .. }
            | SchemaError::Storage { table, .. } => Some(table),
            SchemaError::ConnectionFailure(_) => None,
        }
    }
}

/// Table named by a `table <name> already exists` message.
///
/// Other objects (indexes, views, triggers) share the namespace and produce the
/// same wording with a different prefix; those are not table clashes.
fn existing_table(message: &str) -> Option<String> {
    let name = message
        .strip_prefix("table ")?
        .strip_suffix(" already exists")?;
    Some(name.trim_matches(|c| c == '"' || c == '`' || c == '[' || c == ']').to_string())
}
