//! Number formatting for legend text.

use ryu_js::Buffer;

/// Shortest round-trip decimal, JS style: whole numbers print without `.0`.
pub fn number(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let v = if v == 0.0 { 0.0 } else { v };
    let mut b = Buffer::new();
    b.format_finite(v).to_string()
}

/// Like [`number`], but whole values keep one decimal (`1.0`, `0.5`, `1e+21`).
pub fn decimal(v: f64) -> String {
    let s = number(v);
    if v.is_finite() && !s.contains(['.', 'e', 'E']) {
        format!("{s}.0")
    } else {
        s
    }
}

/// Truncates toward zero and prints as an integer.
pub fn truncated(v: f64) -> String {
    if !v.is_finite() {
        return number(v);
    }
    format!("{}", v.trunc() as i64)
}

/// `a, b, c`
pub fn joined(values: impl IntoIterator<Item = String>) -> String {
    values.into_iter().collect::<Vec<_>>().join(", ")
}
