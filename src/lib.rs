pub mod cli;
pub mod error;
pub mod migrate;
pub mod schema;

pub use cli::{Cli, Commands};
pub use error::{SchemaError, SchemaResult};
pub use migrate::{MigrationRunner, SchemaMigrator, SchemaState};
