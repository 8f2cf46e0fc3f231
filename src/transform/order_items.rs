use tracing::info;

use super::{check_references, require_column, StepContext};
use crate::error::Result;
use crate::schema::ORDER_ITEMS;
use crate::table::{Table, Value};

const QUANTITY: &str = "order_item_quantity";
const PRICE: &str = "order_item_product_price";
const SUBTOTAL: &str = "order_item_subtotal";

/// Check order and product references, then recompute the subtotal column.
///
/// If any single row's subtotal differs from quantity * price, the whole
/// column is overwritten, rows that already matched included.
pub fn transform(mut table: Table, ctx: &mut StepContext<'_>) -> Result<Table> {
    for fk in ORDER_ITEMS.foreign_keys {
        check_references(&table, fk, ctx)?;
    }

    let quantity = require_column(&table, QUANTITY)?;
    let price = require_column(&table, PRICE)?;
    let subtotal = require_column(&table, SUBTOTAL)?;

    let computed: Vec<Value> = table
        .rows()
        .iter()
        .map(|row| match (row[quantity].as_f64(), row[price].as_f64()) {
            (Some(q), Some(p)) => Value::Real(q * p),
            _ => Value::Null,
        })
        .collect();

    let mismatched = table
        .rows()
        .iter()
        .zip(&computed)
        .filter(|(row, expected)| match (row[subtotal].as_f64(), expected) {
            (Some(stored), Value::Real(expected)) => stored != *expected,
            _ => true,
        })
        .count();

    if mismatched > 0 {
        info!(
            table = table.name(),
            mismatched, "Recomputing {} for every row", SUBTOTAL
        );
        table.set_column(SUBTOTAL, computed);
    }

    Ok(table)
}
