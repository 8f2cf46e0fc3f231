pub mod csv_source;

pub use csv_source::*;

use crate::error::Result;
use crate::schema::TableSchema;
use crate::table::Table;

/// Loads one dataset into memory
pub trait Source {
    fn read(&self, schema: &TableSchema) -> Result<Table>;
}
