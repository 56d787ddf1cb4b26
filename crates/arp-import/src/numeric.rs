//! Locale-tolerant number parsing for spreadsheet tokens.
//!
//! Accepted shapes (after trimming, NBSP removal and an optional `R$`/`$`
//! prefix):
//!
//! | Token         | Value      |
//! |---------------|------------|
//! | `30.445,10`   | 30445.10   |
//! | `2,0`         | 2.0        |
//! | `1.234.567`   | 1234567    |
//! | `12.5`        | 12.5       |
//! | `1.234`       | 1.234      |
//! | `R$ 1.200,00` | 1200.0     |
//!
//! A single dot with no comma is always a decimal point, so `1.234` is not
//! read as a thousand. Write `1.234,00` or `1234` for that.
//!
//! Empty or unparseable input yields `NaN`. Callers treat `NaN` as a
//! validation failure, never as zero.

/// Parse a free-text numeric token. Returns `f64::NAN` when it cannot.
pub fn parse_locale_number(raw: &str) -> f64 {
    let mut s: String = raw
        .chars()
        .filter(|c| !matches!(c, '\u{00A0}' | '\u{202F}' | '\u{2007}'))
        .collect::<String>()
        .trim()
        .to_string();

    if let Some(rest) = s.strip_prefix("R$").or_else(|| s.strip_prefix('$')) {
        s = rest.to_string();
    }
    let s: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    if s.is_empty() {
        return f64::NAN;
    }

    // Only sign, digits and separators; rejects "inf", "NaN", "1e5", "abc".
    let body = s.strip_prefix('-').or_else(|| s.strip_prefix('+')).unwrap_or(&s);
    if body.is_empty() || !body.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        return f64::NAN;
    }
    if !body.chars().any(|c| c.is_ascii_digit()) {
        return f64::NAN;
    }

    let normalized = if s.contains(',') {
        // Decimal comma: dots are thousands separators.
        if s.matches(',').count() > 1 {
            return f64::NAN;
        }
        s.replace('.', "").replace(',', ".")
    } else if s.matches('.').count() > 1 {
        // "1.234.567": dots can only be thousands separators.
        s.replace('.', "")
    } else {
        s
    };

    normalized.parse::<f64>().unwrap_or(f64::NAN)
}
