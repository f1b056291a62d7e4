//! Currency string parsing and formatting.

/// Parse a currency-formatted salary such as `"$120,000"`.
///
/// `$` and `,` are stripped, then the leading decimal digits are read, so
/// `"$1,234.50"` parses as `1234`. Returns `None` when no digits lead.
pub fn parse_salary(raw: &str) -> Option<u64> {
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '$' | ',')).collect();
    let trimmed = cleaned.trim_start();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    if end == 0 {
        return None;
    }
    trimmed[..end].parse().ok()
}

/// Format a whole-dollar amount with thousands separators: `$120,000`.
pub fn format_salary(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('$');
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
