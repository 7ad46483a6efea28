use serde::Serialize;
use std::collections::HashSet;

use crate::error::{SchemaError, SchemaResult};

/// Column data type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "length")]
pub enum ColumnType {
    /// Auto-incrementing unsigned integer primary key
    Increments,
    UnsignedInteger,
    /// Variable-length string with a maximum length
    String(u32),
}

/// Column definition
#[derive(Debug, Clone, Serialize)]
pub struct Column {
    pub name: &'static str,
    pub col_type: ColumnType,
    pub nullable: bool,
    pub unique: bool,
}

impl Column {
    /// Create an optional (nullable) column
    pub const fn new(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            nullable: true,
            unique: false,
        }
    }

    /// Create a required (non-nullable) column
    pub const fn required(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            nullable: false,
            unique: false,
        }
    }

    /// Create the auto-increment identity column
    pub const fn increments(name: &'static str) -> Self {
        Self::required(name, ColumnType::Increments)
    }

    /// Mark the column as globally unique
    pub const fn unique(self) -> Self {
        Self {
            unique: true,
            ..self
        }
    }
}

/// What the database does to child rows when a referenced key is deleted or updated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferentialAction {
    Cascade,
    Restrict,
    SetNull,
    NoAction,
}

impl ReferentialAction {
    pub fn keyword(&self) -> &'static str {
        match self {
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::Restrict => "RESTRICT",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::NoAction => "NO ACTION",
        }
    }
}

/// Foreign key reference
#[derive(Debug, Clone, Serialize)]
pub struct ForeignKey {
    pub column: &'static str,
    pub references_table: &'static str,
    pub references_column: &'static str,
    pub on_delete: ReferentialAction,
    pub on_update: ReferentialAction,
}

impl ForeignKey {
    pub const fn new(column: &'static str, references_table: &'static str) -> Self {
        Self {
            column,
            references_table,
            references_column: "id",
            on_delete: ReferentialAction::NoAction,
            on_update: ReferentialAction::NoAction,
        }
    }

    pub const fn on_delete(self, action: ReferentialAction) -> Self {
        Self {
            on_delete: action,
            ..self
        }
    }

    pub const fn on_update(self, action: ReferentialAction) -> Self {
        Self {
            on_update: action,
            ..self
        }
    }

    /// Cascade both deletes and updates of the referenced key
    pub const fn cascade(self) -> Self {
        self.on_delete(ReferentialAction::Cascade)
            .on_update(ReferentialAction::Cascade)
    }
}

/// Table schema definition
#[derive(Debug, Clone, Serialize)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [Column],
    /// Single identity column, or several columns for a composite key
    pub primary_key: &'static [&'static str],
    pub foreign_keys: &'static [ForeignKey],
}

impl TableSchema {
    /// Get all tables this table depends on (FK parents)
    pub fn dependencies(&self) -> HashSet<&'static str> {
        self.foreign_keys
            .iter()
            .map(|fk| fk.references_table)
            .filter(|&parent| parent != self.name)
            .collect()
    }

    pub fn column(&self, name: &str) -> Option<&'static Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Identity column when the primary key is a single auto-increment column
    pub fn identity_column(&self) -> Option<&'static Column> {
        match self.primary_key {
            [only] => self
                .column(only)
                .filter(|c| c.col_type == ColumnType::Increments),
            _ => None,
        }
    }

    pub fn has_composite_key(&self) -> bool {
        self.primary_key.len() > 1
    }

    /// Check that the declaration can be rendered into DDL
    pub fn validate(&self) -> SchemaResult<()> {
        let invalid = |reason: String| SchemaError::InvalidDefinition {
            table: self.name.to_string(),
            reason,
        };

        if self.primary_key.is_empty() {
            return Err(invalid("no primary key".into()));
        }

        for pk in self.primary_key {
            let col = self
                .column(pk)
                .ok_or_else(|| invalid(format!("primary key column `{}` is not declared", pk)))?;
            if col.nullable {
                return Err(invalid(format!("primary key column `{}` is nullable", pk)));
            }
        }

        let increments: Vec<_> = self
            .columns
            .iter()
            .filter(|c| c.col_type == ColumnType::Increments)
            .collect();
        match increments.as_slice() {
            [] => {}
            [col] if self.primary_key == [col.name] => {}
            [col] => {
                return Err(invalid(format!(
                    "auto-increment column `{}` must be the sole primary key",
                    col.name
                )))
            }
            _ => return Err(invalid("more than one auto-increment column".into())),
        }

        for fk in self.foreign_keys {
            let col = self.column(fk.column).ok_or_else(|| {
                invalid(format!("foreign key column `{}` is not declared", fk.column))
            })?;
            let sets_null = fk.on_delete == ReferentialAction::SetNull
                || fk.on_update == ReferentialAction::SetNull;
            if sets_null && !col.nullable {
                return Err(invalid(format!(
                    "SET NULL on required column `{}`",
                    fk.column
                )));
            }
        }

        Ok(())
    }
}
