pub mod schema_gen;
pub mod sqlite;

pub use sqlite::*;

use crate::error::Result;
use crate::table::Table;

/// Persistent destination for transformed tables
pub trait Sink {
    /// Append every row of `table` to the relation of the same name,
    /// returning the number of rows written.
    fn append(&mut self, table: &Table) -> Result<u64>;
}

impl<T: Sink + ?Sized> Sink for &mut T {
    fn append(&mut self, table: &Table) -> Result<u64> {
        (**self).append(table)
    }
}
