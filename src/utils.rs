/// Utility functions

/// Group digits in threes: 12345 -> "12,345"
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Labels for consecutive edge pairs: [400, 600, 800] + "km" -> ["400-600km", "600-800km"]
pub fn range_labels(edges: &[f64], unit: &str) -> Vec<String> {
    edges
        .windows(2)
        .map(|pair| format!("{}-{}{}", pair[0], pair[1], unit))
        .collect()
}

/// Smallest and largest value, ignoring NaN; `None` for an empty input
pub fn min_max<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
