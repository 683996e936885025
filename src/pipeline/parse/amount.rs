//! Contract amount extraction.
//!
//! The amount stays as display text (`$1,500,000.00`): the source formatting
//! is preserved verbatim for the cédula. Strategy order: a `$`-prefixed token
//! with thousands separators and optional `M.N.` suffix, then a label-anchored
//! number (MONTO / IMPORTE / VALOR).

use std::sync::LazyLock;

use regex::Regex;

use super::first_match;

// $ 1,500,000.00 M.N. — capture the numeric text only, reassemble with "$".
static DOLLAR_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\$\s*((?:\d{1,3}(?:[.,]\d{3})+|\d+)(?:[.,]\d{1,2})?)(?:\s*M\.?\s*N\.?)?")
        .expect("valid regex")
});

static LABELED_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:MONTO|IMPORTE|VALOR)[^\d]*(\$?\s*[\d,]+\.?\d*)").expect("valid regex")
});

/// Extract the amount as display text; empty string when absent.
pub fn extract(text: &str) -> String {
    first_match(text, &[dollar_token, labeled_amount])
}

fn dollar_token(text: &str) -> Option<String> {
    DOLLAR_TOKEN.captures(text).map(|caps| {
        let value = caps[1].replace(' ', "");
        format!("${value}")
    })
}

fn labeled_amount(text: &str) -> Option<String> {
    LABELED_AMOUNT
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
}
