use crate::backend_state::Record;

use super::{AxisField, Y_LABEL};

const LINE_BREAK: &str = "<br>";

/// Builds the hover text of a mark for the field it is currently bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TooltipBinder {
    field: AxisField,
}

impl TooltipBinder {
    pub fn new(field: AxisField) -> Self {
        Self { field }
    }

    pub fn bind(&mut self, field: AxisField) {
        self.field = field;
    }

    pub fn field(&self) -> AxisField {
        self.field
    }

    pub fn tooltip(&self, record: &Record) -> String {
        format!(
            "{}{LINE_BREAK}{}:{} {LINE_BREAK} {Y_LABEL}:{}",
            record.abbr,
            self.field.label(),
            format_number(record.x_value(self.field)),
            format_number(record.healthcare),
        )
    }

    /// The tooltip split into display lines.
    pub fn lines(&self, record: &Record) -> Vec<String> {
        self.tooltip(record)
            .split(LINE_BREAK)
            .map(|line| line.trim().to_string())
            .collect()
    }
}

/// Shortest text that reads back as `value`, without a trailing `.0`.
/// Magnitudes below 1e-6 or from 1e21 up use exponent form (`1e-7`, `1e+21`).
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if value == 0.0 {
        // also catches -0
        "0".to_string()
    } else if (1e-6..1e21).contains(&value.abs()) {
        format!("{value}")
    } else {
        let text = format!("{value:e}");
        match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => text,
        }
    }
}
