//! Annex identifier detection.
//!
//! Four strategies run over the uppercased text and their results are
//! unioned, deduplicated and sorted:
//!
//! 1. quoted reference: `ANEXO "<code>"` (straight, curly or acute-accent
//!    quote-like delimiters);
//! 2. bare reference: `ANEXO <code>`, accepted only when the code is already
//!    in the vocabulary or has the short alphanumeric code shape — the guard
//!    against swallowing ordinary words after "ANEXO";
//! 3. section scan: every quoted code inside the INTEGRIDAD DEL CONTRATO
//!    block, the section that enumerates the contract's constituent annexes;
//! 4. vocabulary sweep: any known code appearing as `ANEXO <code>` with
//!    optional surrounding quote-like characters.
//!
//! Newly seen codes are fed back into the vocabulary before returning, so a
//! code learned from one document biases matching in the next
//! (read-before-match, write-after-match). A strategy whose dynamically
//! built regex fails to compile contributes nothing; the others still run.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use super::vocabulary::AnnexVocabulary;

static QUOTED_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"ANEXOS?\s+[“”"'´`«]+\s*([A-Z0-9\-]+)\s*[“”"'´`»]+"#).expect("valid regex")
});

static BARE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"ANEXOS?\s+([A-Z]{1,3}(?:-[A-Z0-9]{1,3})?)(?:[\s.,:]|\z)").expect("valid regex")
});

static CODE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{1,3}(?:-[A-Z0-9]{1,3})?$").expect("valid regex"));

// "2. INTEGRIDAD DEL CONTRATO ..." up to the next numbered section.
static INTEGRITY_NUMBERED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)2\.\s*INTEGRIDAD\s+DEL\s+CONTRATO(.*?)(?:\n\s*\d+\.|\z)")
        .expect("valid regex")
});

// Unnumbered fallback, bounded by a blank line as well.
static INTEGRITY_ANY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)INTEGRIDAD\s+DEL\s+CONTRATO(.*?)(?:\n{2,}|\n\s*\d+\.|\z)")
        .expect("valid regex")
});

static QUOTED_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[“”"'«]\s*([A-Z0-9\-]+)\s*[“”"'»]"#).expect("valid regex"));

/// Detect annex identifiers in `text`.
///
/// Returns a deduplicated, lexicographically sorted list, and adds every
/// returned code to `vocabulary`.
pub fn detect_annexes(text: &str, vocabulary: &AnnexVocabulary) -> Vec<String> {
    let upper = text.to_uppercase();

    let mut found: BTreeSet<String> = BTreeSet::new();
    found.extend(quoted_references(&upper));
    found.extend(bare_references(&upper, vocabulary));
    found.extend(integrity_section(&upper));
    found.extend(vocabulary_sweep(&upper, vocabulary));

    let detected: Vec<String> = found.into_iter().collect();
    vocabulary.extend(detected.iter().map(String::as_str));
    detected
}

fn quoted_references(upper: &str) -> BTreeSet<String> {
    QUOTED_REFERENCE
        .captures_iter(upper)
        .map(|caps| caps[1].trim().to_string())
        .filter(|code| !code.is_empty())
        .collect()
}

fn bare_references(upper: &str, vocabulary: &AnnexVocabulary) -> BTreeSet<String> {
    BARE_REFERENCE
        .captures_iter(upper)
        .map(|caps| caps[1].trim().to_string())
        .filter(|code| {
            !code.is_empty() && (vocabulary.contains(code) || CODE_SHAPE.is_match(code))
        })
        .collect()
}

fn integrity_section(upper: &str) -> BTreeSet<String> {
    let block = INTEGRITY_NUMBERED
        .captures(upper)
        .or_else(|| INTEGRITY_ANY.captures(upper))
        .map(|caps| caps[1].to_string());

    let Some(block) = block else {
        return BTreeSet::new();
    };

    // The block is the annex enumeration; only annex codes appear quoted
    // there, so every quoted token is taken.
    if !block.contains("ANEXO") {
        return BTreeSet::new();
    }

    QUOTED_CODE
        .captures_iter(&block)
        .map(|caps| caps[1].trim().to_uppercase())
        .filter(|code| !code.is_empty())
        .collect()
}

fn vocabulary_sweep(upper: &str, vocabulary: &AnnexVocabulary) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    for code in vocabulary.snapshot() {
        let pattern = format!(
            r#"ANEXOS?\s+[“”"'´`«]*\s*{}\s*[”“"'´`»]*(?:[\s.,:]|\z)"#,
            regex::escape(&code)
        );
        // A code that produces an invalid pattern is skipped, never fatal.
        let Ok(re) = Regex::new(&pattern) else {
            tracing::debug!(code = %code, "Vocabulary sweep pattern rejected");
            continue;
        };
        if re.is_match(upper) {
            found.insert(code);
        }
    }
    found
}
