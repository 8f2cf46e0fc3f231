use super::{require_column, StepContext};
use crate::error::{PipelineError, Result};
use crate::table::{Table, Value};

const EMAIL: &str = "customer_email";
const REQUIRED: [&str; 3] = ["customer_fname", "customer_lname", EMAIL];

/// Lowercase emails, then require first name, last name and email on every row.
pub fn transform(mut table: Table, _ctx: &mut StepContext<'_>) -> Result<Table> {
    require_column(&table, EMAIL)?;
    table.map_column(EMAIL, |value| match value {
        Value::Text(email) => Value::Text(email.to_lowercase()),
        other => other.clone(),
    });

    for column in REQUIRED {
        let idx = require_column(&table, column)?;
        let nulls = table.rows().iter().filter(|row| row[idx].is_null()).count();
        if nulls > 0 {
            return Err(PipelineError::validation(
                table.name(),
                format!("{} rows have a null {}", nulls, column),
            ));
        }
    }

    Ok(table)
}
