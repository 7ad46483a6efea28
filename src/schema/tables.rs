//! Table definitions for the zoo residency schema

use super::types::*;

// =============================================================================
// Independent Tables (no FK dependencies)
// =============================================================================

pub static ZOOS: TableSchema = TableSchema {
    name: "zoos",
    columns: &[
        Column::increments("id"),
        Column::required("zoo_name", ColumnType::String(255)),
        Column::required("address", ColumnType::String(255)).unique(),
    ],
    primary_key: &["id"],
    foreign_keys: &[],
};

pub static SPECIES: TableSchema = TableSchema {
    name: "species",
    columns: &[
        Column::increments("id"),
        Column::required("species_name", ColumnType::String(255)).unique(),
    ],
    primary_key: &["id"],
    foreign_keys: &[],
};

// =============================================================================
// Dependent Tables
// =============================================================================

pub static ANIMALS: TableSchema = TableSchema {
    name: "animals",
    columns: &[
        Column::increments("id"),
        Column::required("animal_name", ColumnType::String(255)),
        Column::required("species_id", ColumnType::UnsignedInteger),
    ],
    primary_key: &["id"],
    foreign_keys: &[ForeignKey::new("species_id", "species").cascade()],
};

/// Residency history: at most one row per (zoo, animal) pair
pub static ZOO_ANIMALS: TableSchema = TableSchema {
    name: "zoo_animals",
    columns: &[
        Column::required("zoo_id", ColumnType::UnsignedInteger),
        Column::required("animal_id", ColumnType::UnsignedInteger),
    ],
    primary_key: &["zoo_id", "animal_id"],
    foreign_keys: &[
        ForeignKey::new("zoo_id", "zoos").cascade(),
        ForeignKey::new("animal_id", "animals").cascade(),
    ],
};

/// All tables, parents before children
pub static ALL_TABLES: &[&TableSchema] = &[&ZOOS, &SPECIES, &ANIMALS, &ZOO_ANIMALS];

pub fn get_table(name: &str) -> Option<&'static TableSchema> {
    ALL_TABLES.iter().find(|t| t.name == name).copied()
}

pub fn table_names() -> Vec<&'static str> {
    ALL_TABLES.iter().map(|t| t.name).collect()
}
