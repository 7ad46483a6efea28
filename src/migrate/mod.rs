mod migrator;
mod runner;
mod sql_gen;

pub use migrator::{table_exists, SchemaMigrator, SchemaState};
pub use runner::MigrationRunner;
pub use sql_gen::{
    generate_create_table, generate_drop_table, generate_indexes, render_down, render_up, Dialect,
};
