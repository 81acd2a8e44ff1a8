use crate::ir::TextLabel;
use crate::value::Dataset;

pub const TICK_STEPS: usize = 5;

/// Largest numeric value among `fields` across all rows.
/// Non-numeric and absent entries never win; with none at all the result
/// is `f64::NEG_INFINITY`.
pub fn max_value(data: &Dataset, fields: &[String]) -> f64 {
    data.iter()
        .flat_map(|row| fields.iter().map(move |f| row.get(f)))
        .map(|v| v.and_then(|v| v.as_number()).unwrap_or(f64::NEG_INFINITY))
        .fold(f64::NEG_INFINITY, f64::max)
}

/// Linear value -> pixel mapping on the vertical axis:
/// `y = baseline - (v / max) * height`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueScale {
    pub max_value: f64,
    pub baseline: f64,
    pub height: f64,
}

impl ValueScale {
    pub fn new(max_value: f64, baseline: f64, height: f64) -> Self {
        ValueScale {
            max_value,
            baseline,
            height,
        }
    }

    pub fn has_domain(&self) -> bool {
        self.max_value.is_finite()
    }

    // A zero or missing max would divide by zero; everything sits on the baseline instead
    fn divisor(&self) -> f64 {
        if self.max_value.is_finite() && self.max_value != 0.0 {
            self.max_value
        } else {
            1.0
        }
    }

    pub fn to_pixel(&self, value: f64) -> f64 {
        if !self.has_domain() {
            return self.baseline;
        }
        self.baseline - (value / self.divisor()) * self.height
    }

    /// `TICK_STEPS` equal steps from 0 to max, labels rounded to integers.
    /// `label_x` is where tick text starts; `shift` is the pan offset.
    pub fn ticks(&self, label_x: f64, shift: (f64, f64)) -> Vec<(f64, TextLabel)> {
        if !self.has_domain() {
            return Vec::new();
        }
        let step = self.max_value / TICK_STEPS as f64;
        (0..=TICK_STEPS)
            .map(|i| {
                let y = self.baseline - i as f64 * (self.height / TICK_STEPS as f64) + shift.1;
                let value = (step * i as f64).round() as i64;
                let label = TextLabel {
                    text: value.to_string(),
                    at: (label_x + shift.0, y + 5.0),
                };
                (y, label)
            })
            .collect()
    }
}
