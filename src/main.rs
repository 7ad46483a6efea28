use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use zoo_schema::{
    cli::{Cli, Commands},
    migrate::MigrationRunner,
    schema::{DependencyResolver, ALL_TABLES},
    SchemaMigrator, SchemaState,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_args();

    match cli.command {
        Commands::Up => {
            let mut runner = open_runner(cli.database)?;
            runner.up().context("Failed to apply schema")?;
            println!("Created {} tables", ALL_TABLES.len());
        }

        Commands::Down => {
            let mut runner = open_runner(cli.database)?;
            let dropped = runner.down().context("Failed to revert schema")?;
            println!("Dropped {} tables", dropped.len());
        }

        Commands::Status => {
            let runner = open_runner(cli.database)?;
            match runner.status()? {
                SchemaState::Absent => println!("absent"),
                SchemaState::Present => println!("present"),
                SchemaState::Partial { present, missing } => {
                    println!("partial (needs manual repair)");
                    println!("  present: {}", present.join(", "));
                    println!("  missing: {}", missing.join(", "));
                }
            }
        }

        Commands::Sql { dialect, down } => {
            let migrator = SchemaMigrator::new()?;
            let script = if down {
                migrator.down_script()
            } else {
                migrator.up_script(dialect)
            };

            for statement in script {
                println!("{};\n", statement);
            }
        }

        Commands::Describe => {
            let migrator = SchemaMigrator::new()?;
            let json = serde_json::to_string_pretty(migrator.creation_order())
                .context("Failed to serialize table declarations")?;
            println!("{}", json);
        }

        Commands::ListTables => {
            let resolver = DependencyResolver::new();
            let migrator = SchemaMigrator::new()?;
            println!("Tables in creation order:\n");
            for name in migrator.creation_order().iter().map(|t| t.name) {
                let dependents = resolver.dependents(name);
                if dependents.is_empty() {
                    println!("  {}", name);
                } else {
                    println!("  {} (referenced by {})", name, dependents.join(", "));
                }
            }
        }
    }

    Ok(())
}

fn open_runner(database: Option<PathBuf>) -> Result<MigrationRunner> {
    let db_path = match database {
        Some(path) => path,
        None => {
            let proj_dirs = ProjectDirs::from("", "", "zoo-schema")
                .context("Could not determine data directory")?;
            proj_dirs.data_dir().join("zoo.db")
        }
    };

    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).context("Failed to create database directory")?;
    }

    MigrationRunner::open(&db_path).with_context(|| format!("Failed to open {:?}", db_path))
}
