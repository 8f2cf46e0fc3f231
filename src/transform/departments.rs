use std::collections::HashSet;

use super::{require_column, sample, StepContext};
use crate::error::Result;
use crate::table::{Key, Table, Value};

const NAME: &str = "department_name";

/// Duplicate names are reported as a warning; the table passes through unchanged.
pub fn transform(table: Table, ctx: &mut StepContext<'_>) -> Result<Table> {
    let duplicates = duplicate_values(&table, NAME)?;
    if !duplicates.is_empty() {
        let refs: Vec<&Value> = duplicates.iter().collect();
        ctx.warn(
            table.name(),
            format!("duplicate {} values: {}", NAME, sample(&refs)),
        );
    }
    Ok(table)
}

/// Values appearing more than once in `column`, each listed once in first-repeat order
fn duplicate_values(table: &Table, column: &str) -> Result<Vec<Value>> {
    let idx = require_column(table, column)?;
    let mut seen: HashSet<Key> = HashSet::new();
    let mut reported: HashSet<Key> = HashSet::new();
    let mut nulls = 0;
    let mut duplicates = Vec::new();

    for row in table.rows() {
        let value = &row[idx];
        match value.key() {
            Some(key) => {
                if !seen.insert(key.clone()) && reported.insert(key) {
                    duplicates.push(value.clone());
                }
            }
            None => {
                nulls += 1;
                if nulls == 2 {
                    duplicates.push(value.clone());
                }
            }
        }
    }

    Ok(duplicates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::test_support::*;

    #[test]
    fn test_duplicate_names_warn_and_pass_through() {
        let input = table(
            "departments",
            &["department_id", "department_name"],
            vec![
                vec![int(1), text("Apparel")],
                vec![int(2), text("Golf")],
                vec![int(3), text("Apparel")],
                vec![int(4), text("Apparel")],
            ],
        );
        let mut ctx = StepContext::new(&[]);
        let output = transform(input.clone(), &mut ctx).unwrap();

        assert_eq!(output, input);
        assert_eq!(ctx.warnings().len(), 1);
        assert!(ctx.warnings()[0].contains("\"Apparel\""));
    }

    #[test]
    fn test_duplicate_names_logged_at_warn() {
        let input = table(
            "departments",
            &["department_id", "department_name"],
            vec![vec![int(1), text("Golf")], vec![int(2), text("Golf")]],
        );
        let mut ctx = StepContext::new(&[]);

        let (result, logs) = capture_logs(|| transform(input, &mut ctx));

        assert!(result.is_ok());
        let line = logs
            .lines()
            .find(|line| line.contains("WARN"))
            .expect("no warning logged");
        assert!(line.contains("department_name"));
        assert!(line.contains("\"Golf\""));
    }

    #[test]
    fn test_unique_names_no_warning() {
        let mut ctx = StepContext::new(&[]);
        transform(departments(&[1, 2, 3]), &mut ctx).unwrap();
        assert!(ctx.warnings().is_empty());
    }

    #[test]
    fn test_duplicate_values_reports_each_once() {
        let input = table(
            "departments",
            &["department_id", "department_name"],
            vec![
                vec![int(1), text("Golf")],
                vec![int(2), Value::Null],
                vec![int(3), text("Golf")],
                vec![int(4), Value::Null],
                vec![int(5), text("Golf")],
            ],
        );
        let dups = duplicate_values(&input, NAME).unwrap();
        assert_eq!(dups, vec![text("Golf"), Value::Null]);
    }
}
