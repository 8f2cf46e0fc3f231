//! In-memory tabular data passed between reader, transformers and writer

mod value;

pub use value::{Key, Value, TIMESTAMP_FORMAT};

use std::collections::HashSet;

/// A named, ordered collection of rows sharing one column list
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from string column names and rows; rows shorter or
    /// longer than the column list are rejected.
    pub fn from_rows(
        name: impl Into<String>,
        columns: &[&str],
        rows: Vec<Vec<Value>>,
    ) -> Result<Self, String> {
        let mut table = Self::new(name, columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> Result<(), String> {
        if row.len() != self.columns.len() {
            return Err(format!(
                "row has {} fields, expected {}",
                row.len(),
                self.columns.len()
            ));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Value> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Non-null key values of a column
    pub fn key_set(&self, name: &str) -> Option<HashSet<Key>> {
        Some(self.column(name)?.filter_map(Value::key).collect())
    }

    /// Rewrite every value of a column in place. Returns false if the column is absent.
    pub fn map_column(&mut self, name: &str, mut f: impl FnMut(&Value) -> Value) -> bool {
        let Some(idx) = self.column_index(name) else {
            return false;
        };
        for row in &mut self.rows {
            row[idx] = f(&row[idx]);
        }
        true
    }

    /// Replace a whole column. Returns false if the column is absent or the lengths differ.
    pub fn set_column(&mut self, name: &str, values: Vec<Value>) -> bool {
        let Some(idx) = self.column_index(name) else {
            return false;
        };
        if values.len() != self.rows.len() {
            return false;
        }
        for (row, value) in self.rows.iter_mut().zip(values) {
            row[idx] = value;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn departments() -> Table {
        Table::from_rows(
            "departments",
            &["department_id", "department_name"],
            vec![
                vec![Value::Integer(2), Value::Text("Fitness".into())],
                vec![Value::Integer(3), Value::Text("Footwear".into())],
                vec![Value::Null, Value::Text("Apparel".into())],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_key_set_skips_nulls() {
        let keys = departments().key_set("department_id").unwrap();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&Key::Integer(2)));
        assert!(departments().key_set("missing").is_none());
    }

    #[test]
    fn test_map_and_set_column() {
        let mut table = departments();
        assert!(table.map_column("department_name", |v| match v {
            Value::Text(s) => Value::Text(s.to_uppercase()),
            other => other.clone(),
        }));
        assert_eq!(table.rows()[0][1], Value::Text("FITNESS".into()));

        assert!(!table.set_column("department_id", vec![Value::Null]));
        assert!(table.set_column("department_id", vec![Value::Integer(9); 3]));
        assert!(table.column("department_id").unwrap().all(|v| *v == Value::Integer(9)));
    }

    #[test]
    fn test_push_row_checks_width() {
        let mut table = departments();
        assert!(table.push_row(vec![Value::Integer(1)]).is_err());
        assert_eq!(table.len(), 3);
    }
}
