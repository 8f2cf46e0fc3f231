use rusqlite::{Connection, OpenFlags};
use tracing::{debug, info};

use super::schema_gen::{generate_create_table, generate_indexes, generate_insert};
use super::Sink;
use crate::config::DatabaseConfig;
use crate::error::{PipelineError, Result};
use crate::schema::get_table;
use crate::table::Table;

/// Appends tables to a SQLite database over one connection held for the run
pub struct SqliteSink {
    conn: Connection,
    create_tables: bool,
}

impl SqliteSink {
    pub fn connect(config: &DatabaseConfig) -> Result<Self> {
        let mut flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        if config.create_if_missing {
            flags |= OpenFlags::SQLITE_OPEN_CREATE;
        }

        let connection_failed = |source| PipelineError::ConnectionFailed {
            path: config.path.clone(),
            source,
        };

        let conn = Connection::open_with_flags(&config.path, flags).map_err(connection_failed)?;
        let sink = Self::from_connection(conn, config.create_tables).map_err(connection_failed)?;

        info!(path = %config.path.display(), "Connected to database");
        Ok(sink)
    }

    /// Wrap an open connection, enforcing foreign keys on it
    pub fn from_connection(conn: Connection, create_tables: bool) -> rusqlite::Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self {
            conn,
            create_tables,
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn write(&mut self, table: &Table) -> rusqlite::Result<u64> {
        let tx = self.conn.transaction()?;

        if self.create_tables {
            if let Some(schema) = get_table(table.name()) {
                tx.execute_batch(&generate_create_table(schema, table))?;
                for index_sql in generate_indexes(schema) {
                    tx.execute(&index_sql, [])?;
                }
                debug!(table = table.name(), "Ensured destination table exists");
            }
        }

        let mut count: u64 = 0;
        {
            let mut stmt = tx.prepare_cached(&generate_insert(table))?;
            for row in table.rows() {
                for (idx, value) in row.iter().enumerate() {
                    value.bind_to(idx + 1, &mut stmt)?;
                }
                stmt.raw_execute()?;
                count += 1;
            }
        }

        tx.commit()?;
        Ok(count)
    }
}

impl Sink for SqliteSink {
    fn append(&mut self, table: &Table) -> Result<u64> {
        let count = self
            .write(table)
            .map_err(|e| PipelineError::sink_write(table.name(), e))?;
        info!(table = table.name(), rows = count, "Loaded table");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Value;
    use tempfile::tempdir;

    fn departments() -> Table {
        Table::from_rows(
            "departments",
            &["department_id", "department_name"],
            vec![
                vec![Value::Integer(2), Value::Text("Fitness".into())],
                vec![Value::Integer(3), Value::Text("Footwear".into())],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_append_creates_and_inserts() {
        let conn = Connection::open_in_memory().unwrap();
        let mut sink = SqliteSink::from_connection(conn, true).unwrap();

        assert_eq!(sink.append(&departments()).unwrap(), 2);

        let name: String = sink
            .connection()
            .query_row(
                "SELECT department_name FROM departments WHERE department_id = 3",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(name, "Footwear");
    }

    #[test]
    fn test_append_is_append_only() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE departments (department_id INTEGER, department_name TEXT)")
            .unwrap();
        let mut sink = SqliteSink::from_connection(conn, false).unwrap();

        sink.append(&departments()).unwrap();
        sink.append(&departments()).unwrap();

        let count: i64 = sink
            .connection()
            .query_row("SELECT COUNT(*) FROM departments", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 4);
    }

    #[test]
    fn test_missing_destination_fails_with_table_name() {
        let conn = Connection::open_in_memory().unwrap();
        let mut sink = SqliteSink::from_connection(conn, false).unwrap();

        match sink.append(&departments()).unwrap_err() {
            PipelineError::SinkWriteFailed { table, .. } => assert_eq!(table, "departments"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_failed_write_leaves_table_untouched() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE departments (department_id INTEGER PRIMARY KEY, department_name TEXT)",
        )
        .unwrap();
        let mut sink = SqliteSink::from_connection(conn, false).unwrap();

        let mut duplicated = departments();
        duplicated
            .push_row(vec![Value::Integer(2), Value::Text("Golf".into())])
            .unwrap();
        assert!(sink.append(&duplicated).is_err());

        let count: i64 = sink
            .connection()
            .query_row("SELECT COUNT(*) FROM departments", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_connect_requires_existing_database() {
        let dir = tempdir().unwrap();
        let config = DatabaseConfig {
            path: dir.path().join("missing.sqlite"),
            ..DatabaseConfig::default()
        };
        assert!(matches!(
            SqliteSink::connect(&config),
            Err(PipelineError::ConnectionFailed { .. })
        ));

        let config = DatabaseConfig {
            create_if_missing: true,
            ..config
        };
        assert!(SqliteSink::connect(&config).is_ok());
    }
}
