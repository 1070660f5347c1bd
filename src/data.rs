use std::fmt;

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single cell value. Missing cells are represented as `None` at the
/// column level, so every variant here is a present, typed value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
    Date(NaiveDate),
}

impl Value {
    pub fn as_display(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => {
                if f.fract() == 0.0 {
                    (*f as i64).to_string()
                } else {
                    f.to_string()
                }
            }
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }

    /// Numeric reading of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Text(_) | Value::Date(_) => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

/// Semantic classification of a column. The filter engine and summarizer
/// match exhaustively on this instead of inspecting cell types per row.
/// `Date` columns behave like categorical ones for filtering and frequency
/// purposes; only `Numeric` columns get range controls and histograms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    Categorical,
    Numeric,
    Date,
}

impl ColumnKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Numeric)
    }
}

pub fn parse_naive_date(value: &str) -> Result<NaiveDate> {
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%Y/%m/%d", "%d-%m-%Y"];
    for fmt in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(value, fmt) {
            return Ok(parsed);
        }
    }
    Err(anyhow!("Failed to parse '{value}' as date"))
}

/// Parses a raw cell into its narrowest type: integer, then float, then
/// date, falling back to text. Empty and whitespace-only cells are missing.
pub fn parse_cell(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(Value::Integer(i));
    }
    if let Ok(f) = trimmed.parse::<f64>()
        && f.is_finite()
    {
        return Some(Value::Float(f));
    }
    if let Ok(d) = parse_naive_date(trimmed) {
        return Some(Value::Date(d));
    }
    Some(Value::Text(trimmed.to_string()))
}

/// Classifies a column from its parsed cells: purely number-valued columns
/// are `Numeric`, purely date-valued ones are `Date`, and everything else
/// (text, mixed, or all-missing) is `Categorical`.
pub fn classify_column(values: &[Option<Value>]) -> ColumnKind {
    let mut saw_any = false;
    let mut all_numeric = true;
    let mut all_dates = true;
    for value in values.iter().flatten() {
        saw_any = true;
        match value {
            Value::Integer(_) | Value::Float(_) => all_dates = false,
            Value::Date(_) => all_numeric = false,
            Value::Text(_) => {
                all_numeric = false;
                all_dates = false;
            }
        }
    }
    if !saw_any {
        return ColumnKind::Categorical;
    }
    if all_numeric {
        ColumnKind::Numeric
    } else if all_dates {
        ColumnKind::Date
    } else {
        ColumnKind::Categorical
    }
}
