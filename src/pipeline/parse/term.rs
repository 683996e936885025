//! Contract term (plazo) extraction, in days.
//!
//! Strategy order: the explicit "11. PLAZO" section, then any
//! "<number> DÍAS" occurrence, then a "plazo de <number> día" phrasing.
//! First match wins; later fallbacks are not attempted.

use std::sync::LazyLock;

use regex::Regex;

use super::first_match;

static SECTION_PLAZO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)11\.\s*PLAZO[^\n]*?(?:es\s+de\s+)?\s*(\d{1,4})\s*(?:D[IÍ]AS)")
        .expect("valid regex")
});

static ANY_DAYS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d{1,4})\s*(?:D[IÍ]AS)").expect("valid regex"));

static PLAZO_PHRASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)plazo\s*(?:de\s+)?(\d{1,4})\s*d[ií]a").expect("valid regex"));

/// Extract the term in days as numeric text; empty string when absent.
pub fn extract(text: &str) -> String {
    first_match(text, &[section_plazo, any_days, plazo_phrase])
}

fn section_plazo(text: &str) -> Option<String> {
    SECTION_PLAZO.captures(text).map(|caps| caps[1].to_string())
}

fn any_days(text: &str) -> Option<String> {
    ANY_DAYS.captures(text).map(|caps| caps[1].to_string())
}

fn plazo_phrase(text: &str) -> Option<String> {
    PLAZO_PHRASE.captures(text).map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_heading_same_line() {
        assert_eq!(extract("11. PLAZO el periodo es de 180 DÍAS naturales"), "180");
    }

    #[test]
    fn section_heading_with_body_on_next_line_uses_fallback() {
        // The section pattern stays on the heading line; the generic
        // "<number> DÍAS" fallback still resolves it.
        assert_eq!(extract("11. PLAZO\nEl plazo es de 180 DÍAS."), "180");
    }

    #[test]
    fn days_without_accent() {
        assert_eq!(extract("entrega en 90 DIAS"), "90");
    }

    #[test]
    fn lowercase_days_accepted() {
        assert_eq!(extract("un periodo de 45 días hábiles"), "45");
    }

    #[test]
    fn plazo_phrase_singular_day() {
        assert_eq!(extract("con un plazo de 1 día"), "1");
    }

    #[test]
    fn first_strategy_wins_over_later_mentions() {
        let text = "garantía de 365 DÍAS\n11. PLAZO de ejecución de 120 DÍAS";
        // Section strategy runs first even though "365 DÍAS" appears earlier.
        assert_eq!(extract(text), "120");
    }

    #[test]
    fn no_term_returns_empty() {
        assert_eq!(extract("sin duración establecida"), "");
        assert_eq!(extract(""), "");
    }
}
