use crate::schema::{Column, ColumnType, TableSchema};

/// Target database engine for generated DDL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Dialect {
    #[default]
    Sqlite,
    Postgres,
    #[value(name = "mysql")]
    MySql,
}

impl Dialect {
    /// Column type plus an optional CHECK expression
    fn column_type(&self, col: &Column) -> (String, Option<String>) {
        match (*self, col.col_type) {
            (Dialect::Sqlite, ColumnType::Increments) => (
                "INTEGER PRIMARY KEY AUTOINCREMENT".into(),
                Some(format!("{} >= 0", col.name)),
            ),
            (Dialect::Postgres, ColumnType::Increments) => (
                "SERIAL PRIMARY KEY".into(),
                Some(format!("{} >= 0", col.name)),
            ),
            (Dialect::MySql, ColumnType::Increments) => {
                ("INT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY".into(), None)
            }

            (Dialect::MySql, ColumnType::UnsignedInteger) => ("INT UNSIGNED".into(), None),
            (_, ColumnType::UnsignedInteger) => {
                ("INTEGER".into(), Some(format!("{} >= 0", col.name)))
            }

            // SQLite accepts any length for VARCHAR, so enforce it explicitly
            (Dialect::Sqlite, ColumnType::String(len)) => (
                format!("VARCHAR({})", len),
                Some(format!("length({}) <= {}", col.name, len)),
            ),
            (_, ColumnType::String(len)) => (format!("VARCHAR({})", len), None),
        }
    }
}

fn column_definition(dialect: Dialect, col: &Column) -> String {
    let (sql_type, check) = dialect.column_type(col);
    let mut def = format!("    {} {}", col.name, sql_type);

    if !col.nullable && col.col_type != ColumnType::Increments {
        def.push_str(" NOT NULL");
    }
    if let Some(check) = check {
        def.push_str(&format!(" CHECK ({})", check));
    }

    def
}

/// Generate CREATE TABLE SQL for a table schema
pub fn generate_create_table(schema: &TableSchema, dialect: Dialect) -> String {
    let mut sql = format!("CREATE TABLE {} (\n", schema.name);
    let mut columns: Vec<String> = schema
        .columns
        .iter()
        .map(|col| column_definition(dialect, col))
        .collect();

    // Identity columns carry their key inline
    if schema.identity_column().is_none() {
        columns.push(format!(
            "    CONSTRAINT {}_pkey PRIMARY KEY ({})",
            schema.name,
            schema.primary_key.join(", ")
        ));
    }

    for col in schema.columns.iter().filter(|c| c.unique) {
        columns.push(format!(
            "    CONSTRAINT {}_{}_unique UNIQUE ({})",
            schema.name, col.name, col.name
        ));
    }

    for fk in schema.foreign_keys {
        columns.push(format!(
            "    CONSTRAINT {}_{}_foreign FOREIGN KEY ({}) REFERENCES {} ({}) ON DELETE {} ON UPDATE {}",
            schema.name,
            fk.column,
            fk.column,
            fk.references_table,
            fk.references_column,
            fk.on_delete.keyword(),
            fk.on_update.keyword()
        ));
    }

    sql.push_str(&columns.join(",\n"));
    sql.push_str("\n)");

    sql
}

/// Generate CREATE INDEX statements for foreign key columns
///
/// A column leading the primary key is already indexed by it.
pub fn generate_indexes(schema: &TableSchema) -> Vec<String> {
    let leading_key = schema.primary_key.first().copied();

    schema
        .foreign_keys
        .iter()
        .filter(|fk| Some(fk.column) != leading_key)
        .map(|fk| {
            format!(
                "CREATE INDEX idx_{}_{} ON {} ({})",
                schema.name, fk.column, schema.name, fk.column
            )
        })
        .collect()
}

pub fn generate_drop_table(schema: &TableSchema) -> String {
    format!("DROP TABLE IF EXISTS {}", schema.name)
}

/// Full forward script; `tables` must already be in creation order
pub fn render_up(tables: &[&TableSchema], dialect: Dialect) -> Vec<String> {
    tables
        .iter()
        .flat_map(|schema| {
            std::iter::once(generate_create_table(schema, dialect))
                .chain(generate_indexes(schema))
        })
        .collect()
}

/// Full reverse script; `tables` must already be in teardown order
pub fn render_down(tables: &[&TableSchema]) -> Vec<String> {
    tables.iter().map(|schema| generate_drop_table(schema)).collect()
}
