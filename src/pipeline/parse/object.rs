//! Contract object/description extraction.
//!
//! Locates the OBJETO section (numbered heading first, bare keyword second)
//! and captures its body up to the next numbered section or a MONTO /
//! CLÁUSULA boundary. Quoted material inside the body wins over the full
//! block.

use std::sync::LazyLock;

use regex::Regex;

// "4. ... OBJETO" heading, body up to the next numbered section, MONTO,
// CLÁUSULA, or a blank line.
static NUMBERED_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)(?:\n|^)\s*4\.\s*.*?OBJETO[^\n]*\n(.*?)(?:\n\s*(?:5\.|\d+\.)|\n\s*MONTO|\n\s*CL[AÁ]USULA|\n{2,})",
    )
    .expect("valid regex")
});

// Bare OBJETO keyword anywhere, same boundary set.
static KEYWORD_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)OBJETO(?:\s+DEL\s+CONTRATO)?[^\n]*[:\-]?\s*(.*?)(?:\n\s*\d+\.|\n{2,}|MONTO|PLAZO)")
        .expect("valid regex")
});

static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[“"«]([^”"»]+)[”"»]"#).expect("valid regex"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Extract the contract object; empty string when no section is found.
pub fn extract(text: &str) -> String {
    let captured = NUMBERED_SECTION
        .captures(text)
        .or_else(|| KEYWORD_SECTION.captures(text))
        .map(|caps| caps[1].trim().to_string());

    let Some(body) = captured else {
        return String::new();
    };

    if let Some(quoted) = QUOTED.captures(&body) {
        return quoted[1].trim().to_string();
    }

    WHITESPACE.replace_all(&body, " ").trim().to_string()
}
