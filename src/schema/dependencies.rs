use super::tables::{get_table, ALL_TABLES};
use super::types::TableSchema;
use std::collections::{HashMap, HashSet};

/// Resolves foreign-key dependencies between tables
pub struct DependencyResolver {
    /// Map of table name -> tables it depends on
    deps: HashMap<&'static str, HashSet<&'static str>>,
}

impl DependencyResolver {
    pub fn new() -> Self {
        let deps = ALL_TABLES
            .iter()
            .map(|table| (table.name, table.dependencies()))
            .collect();

        Self { deps }
    }

    /// Return all tables in dependency order (parents before children).
    /// Ties keep registry order.
    pub fn load_order(&self) -> Result<Vec<&'static TableSchema>, String> {
        let mut result = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut temp_visited: HashSet<&str> = HashSet::new();

        for table in ALL_TABLES {
            self.visit(table.name, &mut visited, &mut temp_visited, &mut result)?;
        }

        Ok(result)
    }

    /// Check that `order` lists every table after all of its parents
    pub fn check_order(&self, order: &[&str]) -> Result<(), String> {
        let mut seen: HashSet<&str> = HashSet::new();

        for &name in order {
            let deps = self
                .deps
                .get(name)
                .ok_or_else(|| format!("Unknown table: {}", name))?;

            if let Some(missing) = deps.iter().find(|dep| !seen.contains(**dep)) {
                return Err(format!(
                    "{} is processed before the table it references: {}",
                    name, missing
                ));
            }

            if !seen.insert(name) {
                return Err(format!("{} is processed twice", name));
            }
        }

        Ok(())
    }

    fn visit<'a>(
        &self,
        name: &'a str,
        visited: &mut HashSet<&'a str>,
        temp_visited: &mut HashSet<&'a str>,
        result: &mut Vec<&'static TableSchema>,
    ) -> Result<(), String> {
        if temp_visited.contains(name) {
            return Err(format!("Circular dependency detected at: {}", name));
        }
        if visited.contains(name) {
            return Ok(());
        }

        temp_visited.insert(name);

        if let Some(deps) = self.deps.get(name) {
            let mut deps: Vec<_> = deps.iter().copied().collect();
            deps.sort_unstable();
            for dep in deps {
                self.visit(dep, visited, temp_visited, result)?;
            }
        }

        temp_visited.remove(name);
        visited.insert(name);

        if let Some(table) = get_table(name) {
            result.push(table);
        }

        Ok(())
    }
}

impl Default for DependencyResolver {
    fn default() -> Self {
        Self::new()
    }
}
