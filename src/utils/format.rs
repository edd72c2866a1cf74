//! Number formatting for text reports.

/// Format a number with thousands separators (commas).
///
/// # Examples
/// ```
/// use netsift::utils::format::with_separators;
///
/// assert_eq!(with_separators(999), "999");
/// assert_eq!(with_separators(1234567), "1,234,567");
/// ```
pub fn with_separators(n: u64) -> String {
    let digits = n.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Share of `count` in `total` as a percentage with two decimals.
///
/// A zero `total` renders as `"0.00%"` rather than dividing by zero.
///
/// # Examples
/// ```
/// use netsift::utils::format::percentage;
///
/// assert_eq!(percentage(1, 3), "33.33%");
/// assert_eq!(percentage(5, 0), "0.00%");
/// ```
pub fn percentage(count: u64, total: u64) -> String {
    if total == 0 {
        return "0.00%".to_string();
    }
    format!("{:.2}%", count as f64 / total as f64 * 100.0)
}
