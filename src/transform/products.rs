use super::{check_references, StepContext};
use crate::error::Result;
use crate::schema::PRODUCTS;
use crate::table::Table;

pub fn transform(table: Table, ctx: &mut StepContext<'_>) -> Result<Table> {
    for fk in PRODUCTS.foreign_keys {
        check_references(&table, fk, ctx)?;
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::transform::test_support::*;

    fn categories() -> Table {
        table(
            "categories",
            &["category_id", "category_department_id"],
            vec![vec![int(2), int(2)], vec![int(3), int(2)]],
        )
    }

    fn products(category_ids: Vec<crate::table::Value>) -> Table {
        table(
            "products",
            &["product_id", "product_category_id", "product_price"],
            category_ids
                .into_iter()
                .enumerate()
                .map(|(i, c)| vec![int(i as i64 + 1), c, real(59.98)])
                .collect(),
        )
    }

    #[test]
    fn test_known_categories_pass() {
        let upstream = [categories()];
        let mut ctx = StepContext::new(&upstream);
        let input = products(vec![int(2), int(3), int(3)]);
        assert_eq!(transform(input.clone(), &mut ctx).unwrap(), input);
    }

    #[test]
    fn test_unknown_or_null_category_fails() {
        let upstream = [categories()];
        let mut ctx = StepContext::new(&upstream);
        let err = transform(
            products(vec![int(2), int(99), crate::table::Value::Null]),
            &mut ctx,
        )
        .unwrap_err();
        match err {
            PipelineError::ValidationFailed { table, reason } => {
                assert_eq!(table, "products");
                assert!(reason.starts_with("2 rows have product_category_id"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
