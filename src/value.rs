// Row and dataset model shared by the loader, normalizer and layout compiler

use std::fmt;

/// A single cell. Numeric-vs-category decisions are made once, when the
/// value is built, instead of being re-inferred at every use site.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Numeric(f64),
    Text(String),
    Missing,
}

impl Value {
    /// Infer a value from raw cell text (CSV fields, spreadsheet strings).
    pub fn from_cell(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Value::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Value::Numeric(n),
            _ => Value::Text(trimmed.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Numeric(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Text used for category comparison and axis labels.
    /// Missing values and blank text have no label.
    pub fn label(&self) -> Option<String> {
        match self {
            Value::Numeric(n) => Some(n.to_string()),
            Value::Text(s) if !s.trim().is_empty() => Some(s.clone()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Numeric(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
            Value::Missing => Ok(()),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Numeric(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

/// Field name -> value mapping that keeps insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Row { fields: Vec::new() }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == field).map(|(_, v)| v)
    }

    /// Insert or overwrite a field, keeping its original position on overwrite.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        let field = field.into();
        match self.fields.iter_mut().find(|(k, _)| *k == field) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((field, value)),
        }
    }

    /// Builder form of [`Row::insert`].
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value.into());
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Ordered rows; order is source-file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub rows: Vec<Row>,
}

impl Dataset {
    pub fn new(rows: Vec<Row>) -> Self {
        Dataset { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// Union of field names across all rows, in first-seen order.
    pub fn field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for row in &self.rows {
            for (name, _) in row.iter() {
                if !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cell_inference() {
        assert_eq!(Value::from_cell("42"), Value::Numeric(42.0));
        assert_eq!(Value::from_cell(" -1.5 "), Value::Numeric(-1.5));
        assert_eq!(Value::from_cell("North"), Value::Text("North".to_string()));
        assert_eq!(Value::from_cell(""), Value::Missing);
        assert_eq!(Value::from_cell("   "), Value::Missing);
        // Non-finite parses stay text
        assert_eq!(Value::from_cell("inf"), Value::Text("inf".to_string()));
        assert_eq!(Value::from_cell("NaN"), Value::Text("NaN".to_string()));
    }

    #[test]
    fn test_label() {
        assert_eq!(Value::Numeric(2020.0).label(), Some("2020".to_string()));
        assert_eq!(Value::Numeric(2.5).label(), Some("2.5".to_string()));
        assert_eq!(Value::Text("Q1".to_string()).label(), Some("Q1".to_string()));
        assert_eq!(Value::Text(" ".to_string()).label(), None);
        assert_eq!(Value::Missing.label(), None);
    }

    #[test]
    fn test_row_insert_keeps_position() {
        let mut row = Row::new().with("Year", 2020.0).with("Sales", 10.0);
        row.insert("Year", Value::Numeric(2021.0));
        let names: Vec<&str> = row.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["Year", "Sales"]);
        assert_eq!(row.get("Year"), Some(&Value::Numeric(2021.0)));
        assert_eq!(row.get("Profit"), None);
    }

    #[test]
    fn test_field_names_union_in_order() {
        let data = Dataset::new(vec![
            Row::new().with("Year", 2020.0).with("Sales", 1.0),
            Row::new().with("Year", 2021.0).with("Profit", 2.0),
        ]);
        assert_eq!(data.field_names(), vec!["Year", "Sales", "Profit"]);
    }
}
