use crate::schema::{ColumnType, TableSchema};
use crate::table::{Table, Value};

/// Quote an SQL identifier
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Generate CREATE TABLE IF NOT EXISTS for the columns actually present in `table`.
///
/// Declared columns take their schema type; other columns get a type
/// inferred from their values.
pub fn generate_create_table(schema: &TableSchema, table: &Table) -> String {
    let mut sql = format!("CREATE TABLE IF NOT EXISTS {} (\n", quote_ident(schema.name));
    let mut columns = Vec::new();

    for (idx, name) in table.columns().iter().enumerate() {
        let line = match schema.column(name) {
            Some(col) if col.primary_key => format!(
                "    {} {} PRIMARY KEY NOT NULL",
                quote_ident(name),
                col.col_type.sql_type()
            ),
            Some(col) => format!("    {} {}", quote_ident(name), col.col_type.sql_type()),
            None => format!(
                "    {} {}",
                quote_ident(name),
                infer_type(table, idx).sql_type()
            ),
        };
        columns.push(line);
    }

    for fk in schema.foreign_keys {
        if table.column_index(fk.column).is_none() {
            continue;
        }
        columns.push(format!(
            "    FOREIGN KEY ({}) REFERENCES {}({})",
            quote_ident(fk.column),
            quote_ident(fk.references_table),
            quote_ident(fk.references_column)
        ));
    }

    sql.push_str(&columns.join(",\n"));
    sql.push_str("\n)");

    sql
}

/// Generate CREATE INDEX statements for foreign key columns
pub fn generate_indexes(schema: &TableSchema) -> Vec<String> {
    schema
        .foreign_keys
        .iter()
        .map(|fk| {
            format!(
                "CREATE INDEX IF NOT EXISTS {} ON {}({})",
                quote_ident(&format!("idx_{}_{}", schema.name, fk.column)),
                quote_ident(schema.name),
                quote_ident(fk.column)
            )
        })
        .collect()
}

/// Generate the parameterized INSERT for a table's columns
pub fn generate_insert(table: &Table) -> String {
    let columns: Vec<String> = table.columns().iter().map(|c| quote_ident(c)).collect();
    let placeholders: Vec<&str> = columns.iter().map(|_| "?").collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(table.name()),
        columns.join(", "),
        placeholders.join(", ")
    )
}

fn infer_type(table: &Table, idx: usize) -> ColumnType {
    let mut inferred: Option<ColumnType> = None;

    for row in table.rows() {
        let current = match &row[idx] {
            Value::Null => continue,
            Value::Integer(_) => ColumnType::Integer,
            Value::Real(_) => ColumnType::Real,
            Value::Text(_) | Value::Timestamp(_) => return ColumnType::Text,
        };
        inferred = match (inferred, current) {
            (Some(ColumnType::Real), _) | (_, ColumnType::Real) => Some(ColumnType::Real),
            _ => Some(ColumnType::Integer),
        };
    }

    inferred.unwrap_or(ColumnType::Text)
}
