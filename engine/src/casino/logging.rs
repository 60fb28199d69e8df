//! Helpers for building JSON outcome log lines.

use std::fmt::Write;

/// Render a card or number list as a JSON array body, e.g. `12,0,51`.
pub(crate) fn format_number_list<T: std::fmt::Display>(values: &[T]) -> String {
    let mut out = String::with_capacity(values.len().saturating_mul(4));
    for (idx, value) in values.iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        let _ = write!(out, "{}", value);
    }
    out
}
