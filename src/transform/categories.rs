use super::{check_references, StepContext};
use crate::error::Result;
use crate::schema::CATEGORIES;
use crate::table::Table;

/// Every category must point at a loaded department.
pub fn transform(table: Table, ctx: &mut StepContext<'_>) -> Result<Table> {
    for fk in CATEGORIES.foreign_keys {
        check_references(&table, fk, ctx)?;
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::transform::test_support::*;

    fn categories(department_ids: &[i64]) -> Table {
        table(
            "categories",
            &["category_id", "category_department_id", "category_name"],
            department_ids
                .iter()
                .enumerate()
                .map(|(i, d)| vec![int(10 + i as i64), int(*d), text("Football")])
                .collect(),
        )
    }

    #[test]
    fn test_valid_references_pass_unchanged() {
        let upstream = [departments(&[1])];
        let mut ctx = StepContext::new(&upstream);
        let input = categories(&[1]);
        assert_eq!(transform(input.clone(), &mut ctx).unwrap(), input);
    }

    #[test]
    fn test_unknown_department_fails() {
        let upstream = [departments(&[1, 2])];
        let mut ctx = StepContext::new(&upstream);
        match transform(categories(&[1, 7, 2]), &mut ctx).unwrap_err() {
            PipelineError::ValidationFailed { table, reason } => {
                assert_eq!(table, "categories");
                assert!(reason.contains("departments.department_id"));
                assert!(reason.contains('7'));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
