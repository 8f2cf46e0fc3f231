use chrono::NaiveDateTime;
use std::fmt;

use crate::schema::ColumnType;

/// Storage format for timestamps written to the database
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Raw fields read as null. Matched exactly, without trimming.
const NULL_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_null_marker(raw: &str) -> bool {
    NULL_MARKERS.contains(&raw)
}

/// A single cell
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Timestamp(NaiveDateTime),
}

/// Hashable form of a value used for key-set membership
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Integer(i64),
    Text(String),
}

impl Value {
    /// Infer a value from a raw CSV field of an undeclared column
    pub fn infer(raw: &str) -> Value {
        let trimmed = raw.trim();
        if is_null_marker(raw) {
            Value::Null
        } else if let Ok(i) = trimmed.parse::<i64>() {
            Value::Integer(i)
        } else if let Ok(f) = trimmed.parse::<f64>() {
            Value::Real(f)
        } else {
            Value::Text(raw.to_string())
        }
    }

    /// Parse a raw CSV field of a declared column
    pub fn parse_as(raw: &str, col_type: ColumnType) -> Result<Value, String> {
        if is_null_marker(raw) {
            return Ok(Value::Null);
        }
        let trimmed = raw.trim();

        match col_type {
            ColumnType::Integer => trimmed
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| format!("expected integer, got {:?}", raw)),
            ColumnType::Real => trimmed
                .parse::<f64>()
                .map(Value::Real)
                .map_err(|_| format!("expected number, got {:?}", raw)),
            ColumnType::Text | ColumnType::Timestamp => Ok(Value::Text(raw.to_string())),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Real(f) => Some(*f),
            _ => None,
        }
    }

    /// Integral reals compare equal to the matching integer key
    pub fn key(&self) -> Option<Key> {
        match self {
            Value::Integer(i) => Some(Key::Integer(*i)),
            Value::Real(f) if f.fract() == 0.0 && f.is_finite() => Some(Key::Integer(*f as i64)),
            Value::Text(s) => Some(Key::Text(s.clone())),
            _ => None,
        }
    }

    pub fn bind_to(&self, idx: usize, stmt: &mut rusqlite::Statement) -> rusqlite::Result<()> {
        match self {
            Value::Null => stmt.raw_bind_parameter(idx, rusqlite::types::Null)?,
            Value::Integer(i) => stmt.raw_bind_parameter(idx, i)?,
            Value::Real(f) => stmt.raw_bind_parameter(idx, f)?,
            Value::Text(s) => stmt.raw_bind_parameter(idx, s.as_str())?,
            Value::Timestamp(ts) => {
                stmt.raw_bind_parameter(idx, ts.format(TIMESTAMP_FORMAT).to_string())?
            }
        }
        Ok(())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{}", r),
            Value::Text(s) => write!(f, "{:?}", s),
            Value::Timestamp(ts) => write!(f, "{}", ts.format(TIMESTAMP_FORMAT)),
        }
    }
}
