// Collapse rows sharing a category key, summing their numeric fields

use crate::value::{Dataset, Row, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What to do with rows that have no usable category value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingKeyPolicy {
    /// Silently drop the row
    #[default]
    Drop,
    /// Keep the row as-is, unmerged, in its original position
    Retain,
}

/// Normalize with the default policy (rows lacking the category are dropped).
pub fn normalize(rows: &Dataset, category_field: &str) -> Dataset {
    normalize_with(rows, category_field, MissingKeyPolicy::Drop)
}

/// One output row per distinct case-insensitive category value, in first-seen order.
pub fn normalize_with(rows: &Dataset, category_field: &str, policy: MissingKeyPolicy) -> Dataset {
    let mut output: Vec<Row> = Vec::new();
    let mut slot_for_key: HashMap<String, usize> = HashMap::new();
    let mut dropped = 0usize;

    for row in rows.iter() {
        let label = match row.get(category_field).and_then(Value::label) {
            Some(label) => label,
            None => {
                match policy {
                    MissingKeyPolicy::Drop => dropped += 1,
                    MissingKeyPolicy::Retain => output.push(row.clone()),
                }
                continue;
            }
        };

        let (key, category) = category_key(&label);
        match slot_for_key.get(&key) {
            Some(&slot) => merge_into(&mut output[slot], row, category_field),
            None => {
                let mut first = row.clone();
                first.insert(category_field, category);
                slot_for_key.insert(key, output.len());
                output.push(first);
            }
        }
    }

    if dropped > 0 {
        tracing::debug!(
            "Dropped {} rows without a '{}' value during normalization",
            dropped,
            category_field
        );
    }

    Dataset::new(output)
}

/// Merge key plus the category value written to the output row.
///
/// Numeric-looking labels key on the parsed number, so "2020", "2020.0" and
/// "2.02e3" land in one group and come back as a number. Text keys compare
/// case-insensitively and keep their first-seen spelling.
fn category_key(label: &str) -> (String, Value) {
    match label.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => {
            // -0 and 0 are one category
            let n = if n == 0.0 { 0.0 } else { n };
            (n.to_string(), Value::Numeric(n))
        }
        _ => (label.to_lowercase(), Value::Text(label.to_string())),
    }
}

fn merge_into(acc: &mut Row, incoming: &Row, category_field: &str) {
    for (field, value) in incoming.iter() {
        if field == category_field || value.is_missing() {
            continue;
        }
        let merged = match (acc.get(field), value) {
            (Some(Value::Numeric(a)), Value::Numeric(b)) => Value::Numeric(a + b),
            // Numeric accumulator never gets replaced by text
            (Some(Value::Numeric(_)), _) => continue,
            // Absent or non-numeric accumulator: last seen wins
            _ => value.clone(),
        };
        acc.insert(field, merged);
    }
}
