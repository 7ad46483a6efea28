use super::tables::ALL_TABLES;
use super::types::TableSchema;
use crate::error::{SchemaError, SchemaResult};
use std::collections::{HashMap, HashSet};

/// Resolves creation and teardown order from foreign key dependencies
pub struct DependencyResolver {
    /// Tables in declaration order; ties in the sort keep this order
    tables: Vec<&'static TableSchema>,
    /// Map of table name -> tables it depends on
    deps: HashMap<&'static str, HashSet<&'static str>>,
    /// Map of table name -> tables that depend on it
    reverse_deps: HashMap<&'static str, HashSet<&'static str>>,
}

impl DependencyResolver {
    pub fn new() -> Self {
        Self::for_tables(ALL_TABLES)
    }

    pub fn for_tables(tables: &[&'static TableSchema]) -> Self {
        let mut deps: HashMap<&'static str, HashSet<&'static str>> = HashMap::new();
        let mut reverse_deps: HashMap<&'static str, HashSet<&'static str>> = HashMap::new();

        for table in tables {
            let table_deps = table.dependencies();

            for dep in &table_deps {
                reverse_deps.entry(*dep).or_default().insert(table.name);
            }

            deps.insert(table.name, table_deps);
        }

        Self {
            tables: tables.to_vec(),
            deps,
            reverse_deps,
        }
    }

    /// Tables that hold a foreign key to `name`, in declaration order
    pub fn dependents(&self, name: &str) -> Vec<&'static str> {
        let Some(children) = self.reverse_deps.get(name) else {
            return Vec::new();
        };

        self.tables
            .iter()
            .map(|t| t.name)
            .filter(|t| children.contains(t))
            .collect()
    }

    /// Foreign keys pointing outside this table set, as (table, referenced table)
    pub fn external_dependencies(&self) -> Vec<(&'static str, &'static str)> {
        let included: HashSet<&str> = self.tables.iter().map(|t| t.name).collect();

        self.tables
            .iter()
            .flat_map(|t| t.foreign_keys.iter().map(move |fk| (t.name, fk.references_table)))
            .filter(|(_, parent)| !included.contains(parent))
            .collect()
    }

    /// Parents before children; parents outside the set are skipped
    pub fn creation_order(&self) -> SchemaResult<Vec<&'static TableSchema>> {
        self.topological_sort()
    }

    /// Children before parents: the exact reverse of `creation_order`
    pub fn teardown_order(&self) -> SchemaResult<Vec<&'static TableSchema>> {
        let mut order = self.creation_order()?;
        order.reverse();
        Ok(order)
    }

    fn topological_sort(&self) -> SchemaResult<Vec<&'static TableSchema>> {
        let mut result = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut temp_visited: HashSet<&str> = HashSet::new();

        for table in &self.tables {
            if !visited.contains(table.name) {
                self.visit(*table, &mut visited, &mut temp_visited, &mut result)?;
            }
        }

        Ok(result)
    }

    fn visit(
        &self,
        table: &'static TableSchema,
        visited: &mut HashSet<&'static str>,
        temp_visited: &mut HashSet<&'static str>,
        result: &mut Vec<&'static TableSchema>,
    ) -> SchemaResult<()> {
        if temp_visited.contains(table.name) {
            return Err(SchemaError::CircularDependency {
                table: table.name.to_string(),
            });
        }
        if visited.contains(table.name) {
            return Ok(());
        }

        temp_visited.insert(table.name);

        // Walk parents in declaration order so the result is deterministic
        let deps = &self.deps[table.name];
        for parent in self.tables.iter().filter(|t| deps.contains(t.name)) {
            self.visit(*parent, visited, temp_visited, result)?;
        }

        temp_visited.remove(table.name);
        visited.insert(table.name);
        result.push(table);

        Ok(())
    }
}

impl Default for DependencyResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tables::{ANIMALS, SPECIES, ZOOS, ZOO_ANIMALS};
    use crate::schema::types::{Column, ColumnType, ForeignKey};

    static EGGS: TableSchema = TableSchema {
        name: "eggs",
        columns: &[
            Column::increments("id"),
            Column::required("chicken_id", ColumnType::UnsignedInteger),
        ],
        primary_key: &["id"],
        foreign_keys: &[ForeignKey::new("chicken_id", "chickens")],
    };

    static CHICKENS: TableSchema = TableSchema {
        name: "chickens",
        columns: &[
            Column::increments("id"),
            Column::required("egg_id", ColumnType::UnsignedInteger),
        ],
        primary_key: &["id"],
        foreign_keys: &[ForeignKey::new("egg_id", "eggs")],
    };

    fn names(tables: &[&TableSchema]) -> Vec<&'static str> {
        tables.iter().map(|t| t.name).collect()
    }

    #[test]
    fn test_parents_before_children() {
        let resolver = DependencyResolver::new();
        let order = names(&resolver.creation_order().unwrap());

        let pos = |name| order.iter().position(|&n| n == name).unwrap();
        assert!(pos("species") < pos("animals"));
        assert!(pos("animals") < pos("zoo_animals"));
        assert!(pos("zoos") < pos("zoo_animals"));
    }

    #[test]
    fn test_teardown_is_reverse_of_creation() {
        let resolver = DependencyResolver::new();
        let mut creation = names(&resolver.creation_order().unwrap());
        creation.reverse();
        let teardown = names(&resolver.teardown_order().unwrap());

        assert_eq!(teardown, creation);
        assert_eq!(teardown, vec!["zoo_animals", "animals", "species", "zoos"]);
    }

    #[test]
    fn test_declaration_order_does_not_matter() {
        let resolver = DependencyResolver::for_tables(&[&ZOO_ANIMALS, &ANIMALS, &SPECIES, &ZOOS]);
        let order = names(&resolver.creation_order().unwrap());
        let pos = |name| order.iter().position(|&n| n == name).unwrap();

        assert!(pos("species") < pos("animals"));
        assert!(pos("animals") < pos("zoo_animals"));
        assert!(pos("zoos") < pos("zoo_animals"));
    }

    #[test]
    fn test_external_parent() {
        let resolver = DependencyResolver::for_tables(&[&ZOOS, &ANIMALS]);
        let order = names(&resolver.creation_order().unwrap());

        assert_eq!(order, vec!["zoos", "animals"]);
        assert_eq!(resolver.external_dependencies(), vec![("animals", "species")]);
        assert!(DependencyResolver::new().external_dependencies().is_empty());
    }

    #[test]
    fn test_cycle_detected() {
        let resolver = DependencyResolver::for_tables(&[&EGGS, &CHICKENS]);
        let err = resolver.creation_order().unwrap_err();
        assert!(matches!(err, SchemaError::CircularDependency { .. }));
    }

    #[test]
    fn test_dependents() {
        let resolver = DependencyResolver::new();
        assert_eq!(resolver.dependents("species"), vec!["animals"]);
        assert_eq!(resolver.dependents("animals"), vec!["zoo_animals"]);
        assert_eq!(resolver.dependents("zoos"), vec!["zoo_animals"]);
        assert!(resolver.dependents("zoo_animals").is_empty());
    }
}
