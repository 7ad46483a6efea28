use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::migrate::Dialect;

#[derive(Parser, Debug)]
#[command(name = "zoo-schema")]
#[command(version, about = "Apply or revert the zoo residency schema")]
pub struct Cli {
    /// SQLite database path (default: platform data directory)
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create all tables, parents first
    Up,

    /// Drop all tables, children first
    Down,

    /// Report whether the tables exist
    Status,

    /// Print the DDL script without touching a database
    Sql {
        /// Target database engine
        #[arg(long, value_enum, default_value_t = Dialect::Sqlite)]
        dialect: Dialect,

        /// Print the teardown script instead
        #[arg(long)]
        down: bool,
    },

    /// Print the table declarations as JSON
    Describe,

    /// List all table names in creation order
    ListTables,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sql_dialect() {
        let cli =
            Cli::try_parse_from(["zoo-schema", "sql", "--dialect", "mysql", "--down"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Sql {
                dialect: Dialect::MySql,
                down: true
            }
        ));
    }

    #[test]
    fn test_global_database_flag() {
        let cli = Cli::try_parse_from(["zoo-schema", "up", "--database", "zoo.db"]).unwrap();
        assert_eq!(cli.database, Some(PathBuf::from("zoo.db")));
        assert!(matches!(cli.command, Commands::Up));
    }
}
