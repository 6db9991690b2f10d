//! Thousands grouping for identity document numbers
//!
//! Document numbers are printed with a dot every three digits counting from
//! the right (`1234567` becomes `1.234.567`). Values that already carry that
//! grouping are left alone, and anything that is not a number passes through
//! trimmed.

use calamine::Data;

use crate::xlsx_parser::render_cell;

/// A raw spreadsheet value, before any string rendering
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Empty cell
    Empty,
    /// Integer (also integral floats and booleans)
    Int(i64),
    /// Non-integral or non-finite number
    Float(f64),
    /// Text, or the rendering of a date/error cell
    Text(String),
}

impl RawValue {
    fn render(&self) -> String {
        match self {
            RawValue::Empty => String::new(),
            RawValue::Int(n) => n.to_string(),
            RawValue::Float(f) => f.to_string(),
            RawValue::Text(s) => s.clone(),
        }
    }
}

impl From<&Data> for RawValue {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::Empty => RawValue::Empty,
            Data::Int(n) => RawValue::Int(*n),
            Data::Float(f) => RawValue::from(*f),
            Data::Bool(b) => RawValue::Int(i64::from(*b)),
            Data::String(s) => RawValue::Text(s.clone()),
            other => RawValue::Text(render_cell(other)),
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        // Largest float magnitude below which every integer is exact
        const EXACT_LIMIT: f64 = 9_007_199_254_740_992.0;

        if value.is_finite() && value.fract() == 0.0 && value.abs() < EXACT_LIMIT {
            RawValue::Int(value as i64)
        } else {
            RawValue::Float(value)
        }
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Int(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(RawValue::Empty)
    }
}

/// Format a value with a dot as thousands separator
///
/// - empty values and `nan` give `""`
/// - strings already grouped as `d.ddd.ddd` (every group but the last has
///   three characters, the last at most three) are returned unchanged
/// - numbers, and strings made only of digits once dots are removed, are
///   truncated to an integer and regrouped
/// - anything else is returned trimmed
pub fn format_number_with_dots(value: &RawValue) -> String {
    let rendered = value.render();
    let trimmed = rendered.trim();

    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return String::new();
    }

    if is_grouped(trimmed) {
        return trimmed.to_string();
    }

    let digits = match value {
        RawValue::Int(n) => n.to_string(),
        RawValue::Float(f) if f.is_finite() => format!("{:.0}", f.trunc()),
        RawValue::Text(_) => {
            let without_dots = trimmed.replace('.', "");
            if without_dots.is_empty() || !without_dots.bytes().all(|b| b.is_ascii_digit()) {
                return trimmed.to_string();
            }
            without_dots
        }
        RawValue::Float(_) | RawValue::Empty => return trimmed.to_string(),
    };

    group_thousands(&digits)
}

/// Whether a string already looks like a dot-grouped number
fn is_grouped(text: &str) -> bool {
    if !text.contains('.') || text.starts_with('.') {
        return false;
    }

    let groups: Vec<&str> = text.split('.').collect();
    let (last, leading) = match groups.split_last() {
        Some(split) => split,
        None => return false,
    };

    leading.iter().all(|g| g.chars().count() == 3) && last.chars().count() <= 3
}

/// Insert a dot every three digits from the right of an integer string
fn group_thousands(number: &str) -> String {
    let (negative, digits) = match number.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, number),
    };

    let digits = digits.trim_start_matches('0');
    let digits = if digits.is_empty() { "0" } else { digits };

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if negative && digits != "0" {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}
