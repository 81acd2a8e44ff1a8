// Which fields feed the x axis (categories) and which are plotted (values)

use serde::{Deserialize, Serialize};

/// How x and y selections interact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionPolicy {
    /// A field is never in both sets; selecting it on one side removes it from the other
    #[default]
    Exclusive,
    /// Exclusive, and at most one x field (a new x replaces the old one)
    ExclusiveSingleX,
    /// No restriction
    Overlapping,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSelection {
    pub policy: SelectionPolicy,
    x_fields: Vec<String>,
    y_fields: Vec<String>,
}

impl ChartSelection {
    pub fn new(policy: SelectionPolicy) -> Self {
        ChartSelection {
            policy,
            x_fields: Vec::new(),
            y_fields: Vec::new(),
        }
    }

    /// Build a selection from field lists, applying the policy in order
    pub fn with_fields(policy: SelectionPolicy, x: &[&str], y: &[&str]) -> Self {
        let mut selection = Self::new(policy);
        for field in x {
            selection.select_x(field);
        }
        for field in y {
            selection.select_y(field);
        }
        selection
    }

    pub fn x_fields(&self) -> &[String] {
        &self.x_fields
    }

    /// Value fields in selection order; order drives color and slice order
    pub fn y_fields(&self) -> &[String] {
        &self.y_fields
    }

    pub fn y_position(&self, field: &str) -> Option<usize> {
        self.y_fields.iter().position(|f| f == field)
    }

    pub fn select_x(&mut self, field: &str) {
        if self.x_fields.iter().any(|f| f == field) {
            return;
        }
        if self.policy != SelectionPolicy::Overlapping {
            self.y_fields.retain(|f| f != field);
        }
        if self.policy == SelectionPolicy::ExclusiveSingleX {
            self.x_fields.clear();
        }
        self.x_fields.push(field.to_string());
    }

    pub fn select_y(&mut self, field: &str) {
        if self.y_fields.iter().any(|f| f == field) {
            return;
        }
        if self.policy != SelectionPolicy::Overlapping {
            self.x_fields.retain(|f| f != field);
        }
        self.y_fields.push(field.to_string());
    }

    pub fn deselect_x(&mut self, field: &str) {
        self.x_fields.retain(|f| f != field);
    }

    pub fn deselect_y(&mut self, field: &str) {
        self.y_fields.retain(|f| f != field);
    }

    pub fn clear(&mut self) {
        self.x_fields.clear();
        self.y_fields.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclusive_moves_field_between_sets() {
        let mut sel = ChartSelection::new(SelectionPolicy::Exclusive);
        sel.select_y("Year");
        sel.select_y("Sales");
        sel.select_x("Year");
        assert_eq!(sel.x_fields(), ["Year"]);
        assert_eq!(sel.y_fields(), ["Sales"]);

        sel.select_y("Year");
        assert!(sel.x_fields().is_empty());
        assert_eq!(sel.y_fields(), ["Sales", "Year"]);
    }

    #[test]
    fn test_exclusive_allows_multiple_x() {
        let sel = ChartSelection::with_fields(SelectionPolicy::Exclusive, &["Year", "Region"], &["Sales"]);
        assert_eq!(sel.x_fields(), ["Year", "Region"]);
    }

    #[test]
    fn test_single_x_replaces() {
        let sel = ChartSelection::with_fields(
            SelectionPolicy::ExclusiveSingleX,
            &["Year", "Region"],
            &["Sales"],
        );
        assert_eq!(sel.x_fields(), ["Region"]);
        assert_eq!(sel.y_fields(), ["Sales"]);
    }

    #[test]
    fn test_overlapping_allows_both() {
        let sel = ChartSelection::with_fields(SelectionPolicy::Overlapping, &["Year"], &["Year"]);
        assert_eq!(sel.x_fields(), ["Year"]);
        assert_eq!(sel.y_fields(), ["Year"]);
    }

    #[test]
    fn test_select_is_idempotent_and_deselect() {
        let mut sel = ChartSelection::default();
        sel.select_y("Sales");
        sel.select_y("Sales");
        sel.select_y("Profit");
        assert_eq!(sel.y_position("Profit"), Some(1));
        sel.deselect_y("Sales");
        assert_eq!(sel.y_fields(), ["Profit"]);
        assert_eq!(sel.y_position("Sales"), None);
    }
}
