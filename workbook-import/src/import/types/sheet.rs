//! Parsed worksheet data handed over by the workbook reader

use std::fmt;

use serde_json::Value;

/// One worksheet row: column name -> raw cell value, kept in header order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<(String, Value)>,
}

impl Row {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from (column, value) pairs
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut row = Row::new();
        for (column, value) in pairs {
            row.insert(column, value);
        }
        row
    }

    /// Set a cell, replacing any earlier value for the same column
    pub fn insert(&mut self, column: impl Into<String>, value: Value) {
        let column = column.into();
        match self.cells.iter_mut().find(|(name, _)| *name == column) {
            Some((_, existing)) => *existing = value,
            None => self.cells.push((column, value)),
        }
    }

    /// Raw cell value, blank or not
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Cell value if the column holds something other than a blank
    pub fn present(&self, column: &str) -> Option<&Value> {
        self.get(column).filter(|value| !is_blank(value))
    }

    /// Column names in header order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.cells.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Renders the row as a JSON object, columns in header order
impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (column, value)) in self.cells.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}:{}", Value::String(column.clone()), value)?;
        }
        write!(f, "}}")
    }
}

/// A named worksheet and its data rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Row>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Row>) -> Self {
        Sheet {
            name: name.into(),
            rows,
        }
    }
}

/// All worksheets of a workbook, in workbook order (empty sheets included)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Workbook { sheets }
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// First sheet that carries at least one data row
    pub fn first_populated(&self) -> Option<&Sheet> {
        self.sheets.iter().find(|s| !s.rows.is_empty())
    }
}

/// Null and empty strings count as blank cells
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Truthiness of a control cell: blanks, `false` and zero are false
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Plain text of a cell (strings without JSON quoting)
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_keeps_header_order() {
        let mut row = Row::new();
        row.insert("name", json!("Ada"));
        row.insert("age", json!(36));
        row.insert("name", json!("Grace"));

        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["name", "age"]);
        assert_eq!(row.get("name"), Some(&json!("Grace")));
    }

    #[test]
    fn test_present_skips_blanks() {
        let row = Row::from_pairs([("a", json!("")), ("b", Value::Null), ("c", json!(0))]);
        assert!(row.present("a").is_none());
        assert!(row.present("b").is_none());
        assert_eq!(row.present("c"), Some(&json!(0)));
        assert!(row.present("missing").is_none());
    }

    #[test]
    fn test_truthiness() {
        assert!(is_truthy(&json!("1")));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!(2)));
        assert!(is_truthy(&json!(true)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&Value::Null));
    }

    #[test]
    fn test_display_as_json_object() {
        let row = Row::from_pairs([("Entity:alias", json!("bob")), ("query", json!(1))]);
        assert_eq!(row.to_string(), r#"{"Entity:alias":"bob","query":1}"#);
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&json!("42")), "42");
        assert_eq!(cell_text(&json!(42)), "42");
        assert_eq!(cell_text(&Value::Null), "");
    }
}
