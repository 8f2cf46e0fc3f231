use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::{check_references, require_column, sample, StepContext};
use crate::error::{PipelineError, Result};
use crate::schema::ORDERS;
use crate::table::{Table, Value};

const DATE: &str = "order_date";

/// Offset-qualified forms, normalized to UTC
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%Y%m%d"];

/// Parse `order_date`, coercing bad values to null, then reject nulls and
/// orders whose customer is unknown.
pub fn transform(mut table: Table, ctx: &mut StepContext<'_>) -> Result<Table> {
    let idx = require_column(&table, DATE)?;

    let originals: Vec<Value> = table.rows().iter().map(|row| row[idx].clone()).collect();
    table.map_column(DATE, coerce_timestamp);

    let invalid: Vec<&Value> = table
        .rows()
        .iter()
        .zip(&originals)
        .filter(|(row, _)| row[idx].is_null())
        .map(|(_, original)| original)
        .collect();
    if !invalid.is_empty() {
        return Err(PipelineError::validation(
            table.name(),
            format!(
                "{} rows have an invalid {}: {}",
                invalid.len(),
                DATE,
                sample(&invalid)
            ),
        ));
    }

    for fk in ORDERS.foreign_keys {
        check_references(&table, fk, ctx)?;
    }

    Ok(table)
}

fn coerce_timestamp(value: &Value) -> Value {
    match value {
        Value::Timestamp(ts) => Value::Timestamp(*ts),
        Value::Text(raw) => parse_timestamp(raw).map_or(Value::Null, Value::Timestamp),
        _ => Value::Null,
    }
}

/// Parse a date or date-time; date-only values land on midnight
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    DateTime::parse_from_rfc3339(raw)
        .ok()
        .or_else(|| {
            OFFSET_FORMATS
                .iter()
                .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
        })
        .map(|dt| dt.naive_utc())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        })
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::test_support::*;

    fn customers(ids: &[i64]) -> Table {
        table(
            "customers",
            &["customer_id", "customer_fname", "customer_lname", "customer_email"],
            ids.iter()
                .map(|id| vec![int(*id), text("Mary"), text("Barrett"), text("m@x.org")])
                .collect(),
        )
    }

    fn orders(rows: Vec<(&str, i64)>) -> Table {
        table(
            "orders",
            &["order_id", "order_date", "order_customer_id", "order_status"],
            rows.into_iter()
                .enumerate()
                .map(|(i, (date, customer))| {
                    vec![int(i as i64 + 1), text(date), int(customer), text("CLOSED")]
                })
                .collect(),
        )
    }

    fn midnight(y: i32, m: u32, d: u32) -> Value {
        Value::Timestamp(NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap())
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2013, 7, 25).unwrap().and_hms_opt(0, 0, 0);
        assert_eq!(parse_timestamp("2013-07-25 00:00:00"), expected);
        assert_eq!(parse_timestamp("2013-07-25 00:00:00.0"), expected);
        assert_eq!(parse_timestamp("2013-07-25T00:00:00"), expected);
        assert_eq!(parse_timestamp("2013-07-25"), expected);
        assert_eq!(parse_timestamp("07/25/2013"), expected);
        assert_eq!(parse_timestamp("20130725"), expected);
        assert_eq!(parse_timestamp("2013-07-25 00:00"), expected);
        assert_eq!(parse_timestamp("2013-07-25T00:00:00Z"), expected);
        assert_eq!(parse_timestamp("2013-07-25 00:00:00+00:00"), expected);
        assert_eq!(parse_timestamp("2013-07-25T02:00:00+02:00"), expected);
        assert_eq!(parse_timestamp("2013-07-24 22:00:00-0200"), expected);
        assert_eq!(parse_timestamp("not-a-date"), None);
        assert_eq!(parse_timestamp("2013-02-30"), None);
    }

    #[test]
    fn test_dates_parsed() {
        let upstream = [customers(&[11599, 256])];
        let mut ctx = StepContext::new(&upstream);
        let output = transform(
            orders(vec![("2013-07-25 00:00:00", 11599), ("2013-07-26", 256)]),
            &mut ctx,
        )
        .unwrap();

        assert_eq!(output.rows()[0][1], midnight(2013, 7, 25));
        assert_eq!(output.rows()[1][1], midnight(2013, 7, 26));
        assert_eq!(output.rows()[1][3], text("CLOSED"));
    }

    #[test]
    fn test_invalid_date_fails() {
        let upstream = [customers(&[1])];
        let mut ctx = StepContext::new(&upstream);
        match transform(orders(vec![("2013-07-25", 1), ("not-a-date", 1)]), &mut ctx).unwrap_err() {
            PipelineError::ValidationFailed { table, reason } => {
                assert_eq!(table, "orders");
                assert!(reason.contains("\"not-a-date\""));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_date_checked_before_customers() {
        // Both rules fail; the date rule is reported
        let upstream = [customers(&[1])];
        let mut ctx = StepContext::new(&upstream);
        let err = transform(orders(vec![("", 42)]), &mut ctx).unwrap_err();
        assert!(err.to_string().contains("order_date"));
    }

    #[test]
    fn test_unknown_customer_fails() {
        let upstream = [customers(&[1])];
        let mut ctx = StepContext::new(&upstream);
        let err = transform(orders(vec![("2014-01-01", 2)]), &mut ctx).unwrap_err();
        assert!(err.to_string().contains("customers.customer_id"));
    }
}
