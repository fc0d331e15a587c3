use crate::enums::Table;
use crate::error::CoreError;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// A single bindable column value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i32),
    Text(String),
    Date(NaiveDate),
    /// SQL `NULL`; only ever assigned to a nullable column.
    Null,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Text(v) => f.write_str(v),
            Value::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            Value::Null => f.write_str("NULL"),
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

/// An equality condition `column = value` on a known column of a known table.
///
/// Construction checks the column against the table's declared columns, so a
/// `Condition` always names a real column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    table: Table,
    column: &'static str,
    value: Value,
}

impl Condition {
    pub fn new(table: Table, column: &str, value: impl Into<Value>) -> Result<Self, CoreError> {
        let def = table.column(column)?;
        let value = value.into();
        if !def.kind.accepts(&value) {
            return Err(CoreError::InvalidInput(
                format!("{table}.{column}"),
                format!("'{value}' does not match the column type"),
            ));
        }
        Ok(Self { table, column: def.name, value })
    }

    /// Parses `column=value`, typing the value after the column it names.
    pub fn parse(table: Table, raw: &str) -> Result<Self, CoreError> {
        let (column, value) = split_assignment(raw)?;
        let def = table.column(column)?;
        let value = def.kind.parse(value)?;
        Ok(Self { table, column: def.name, value })
    }

    pub fn table(&self) -> Table {
        self.table
    }

    pub fn column(&self) -> &'static str {
        self.column
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

/// Splits `column=value` into its two halves.
pub fn split_assignment(raw: &str) -> Result<(&str, &str), CoreError> {
    raw.split_once('=')
        .map(|(c, v)| (c.trim(), v))
        .filter(|(c, _)| !c.is_empty())
        .ok_or_else(|| CoreError::InvalidInput(raw.to_string(), "expected column=value".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_parse_types_value_by_column() {
        let cond = Condition::parse(Table::Edition, "number_of_pages=300").unwrap();
        assert_eq!(cond.column(), "number_of_pages");
        assert_eq!(cond.value(), &Value::Int(300));

        let cond = Condition::parse(Table::Author, "surname=Smith=Jones").unwrap();
        assert_eq!(cond.value(), &Value::Text("Smith=Jones".into()));
    }

    #[test]
    fn test_condition_rejects_type_mismatch_and_unknown_column() {
        assert!(Condition::new(Table::Edition, "number_of_pages", "many").is_err());
        assert!(Condition::new(Table::Author, "edition_id", 1).is_err());
        assert!(Condition::parse(Table::Author, "surname").is_err());
        assert!(Condition::parse(Table::Author, "=Smith").is_err());
        assert!(Condition::new(Table::EditionCollection, "date", Value::Null).is_err());
    }

    #[test]
    fn test_value_display() {
        let date = NaiveDate::from_ymd_opt(1850, 3, 7).unwrap();
        assert_eq!(Value::Date(date).to_string(), "1850-03-07");
        assert_eq!(Value::Int(-4).to_string(), "-4");
        assert_eq!(Value::Null.to_string(), "NULL");
    }
}
