//! Contract number and contractor extraction.
//!
//! The number and the contractor resolve independently: each strategy runs
//! only while its field is still unresolved, and one field succeeding via
//! one strategy does not block the other from resolving via a later one.
//!
//! Strategy order for the number: direct numbering-convention match, then
//! the labeled pair. For the contractor: labeled pair, then a contextual
//! window right after the number's location, then explicit labels
//! (PROVEEDOR / RAZÓN SOCIAL / CONTRATISTA).

use std::sync::LazyLock;

use regex::Regex;

// Numbering convention: digit sequence starting with 64, 8-9 digits total.
static DIRECT_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(64\d{6,7})\b").expect("valid regex"));

// Number and adjacent contractor name, anchored by the surrounding
// header markers (Hoja / Página / DE).
static LABELED_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)CONTRATO\s*(?:N(?:Ú|U)MERO|N\.|NO\.|N)\s*[:\-]?\s*(64\d{6,7}|\d{6,10})\s+([A-ZÁÉÍÓÚÑ0-9.,\s&\-]{5,200}?)\s+(?:HOJA|PÁGINA|\bDE\b)",
    )
    .expect("valid regex")
});

static LABELED_CONTRACTOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:PROVEEDOR|RAZ[ÓO]N\s+SOCIAL|CONTRATISTA)\s*[:\-]\s*([^\n]{5,200})")
        .expect("valid regex")
});

/// Extract `(contract_number, contractor)`; either side empty on a miss.
pub fn extract(text: &str) -> (String, String) {
    let mut number = direct_number(text).unwrap_or_default();
    let mut contractor = String::new();

    if let Some((paired_number, paired_contractor)) = labeled_pair(text) {
        if number.is_empty() {
            number = paired_number;
        }
        contractor = paired_contractor;
    }

    if contractor.is_empty() && !number.is_empty() {
        if let Some(candidate) = contextual_contractor(text, &number) {
            contractor = candidate;
        }
    }

    if contractor.is_empty() {
        if let Some(candidate) = labeled_contractor(text) {
            contractor = candidate;
        }
    }

    (number, contractor)
}

fn direct_number(text: &str) -> Option<String> {
    DIRECT_NUMBER
        .captures(text)
        .map(|caps| caps[1].to_string())
}

fn labeled_pair(text: &str) -> Option<(String, String)> {
    LABELED_PAIR
        .captures(text)
        .map(|caps| (caps[1].trim().to_string(), caps[2].trim().to_string()))
}

/// Windowed search: take the line following the number's own line and trim
/// it at any trailing page-header noise.
fn contextual_contractor(text: &str, number: &str) -> Option<String> {
    let pattern = format!(
        r"(?i).{{0,80}}{}[^\n]*\n([^\n]{{5,200}})",
        regex::escape(number)
    );
    let re = Regex::new(&pattern).ok()?;
    let caps = re.captures(text)?;
    let candidate = caps[1].trim();
    if candidate.chars().count() <= 4 {
        return None;
    }
    let cleaned = candidate
        .split("Hoja")
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();
    (!cleaned.is_empty()).then_some(cleaned)
}

fn labeled_contractor(text: &str) -> Option<String> {
    LABELED_CONTRACTOR
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_number_matches_convention() {
        let (number, _) = extract("CONTRATO NÚMERO 641234567\nEMPRESA XYZ");
        assert_eq!(number, "641234567");
    }

    #[test]
    fn direct_number_accepts_eight_digits() {
        assert_eq!(direct_number("folio 64123456 interno"), Some("64123456".into()));
    }

    #[test]
    fn direct_number_rejects_other_prefixes_and_lengths() {
        assert_eq!(direct_number("contrato 551234567"), None);
        assert_eq!(direct_number("folio 6412345"), None);
        assert_eq!(direct_number("serie 6412345678X"), None);
    }

    #[test]
    fn labeled_pair_captures_number_and_contractor() {
        let text = "Contrato Número: 641234567 CONSTRUCCIONES DEL GOLFO S.A. Hoja 1";
        let (number, contractor) = labeled_pair(text).unwrap();
        assert_eq!(number, "641234567");
        // The lazy capture stops at the first header marker (here "Hoja");
        // a "DE" inside "S.A. DE C.V." would cut it earlier, as the legacy
        // heuristic always did.
        assert_eq!(contractor, "CONSTRUCCIONES DEL GOLFO S.A.");
    }

    #[test]
    fn contextual_window_takes_the_following_line() {
        let text = "CONTRATO NÚMERO 641234567\nEMPRESA CONSTRUCTORA XYZ\notra línea";
        let (number, contractor) = extract(text);
        assert_eq!(number, "641234567");
        assert_eq!(contractor, "EMPRESA CONSTRUCTORA XYZ");
    }

    #[test]
    fn contextual_window_cuts_page_header_noise() {
        let text = "CONTRATO 641234567\nPERFORACIONES DEL NORTE Hoja 2 de 14\n";
        let (_, contractor) = extract(text);
        assert_eq!(contractor, "PERFORACIONES DEL NORTE");
    }

    #[test]
    fn contextual_window_rejects_short_candidates() {
        assert_eq!(contextual_contractor("No. 641234567\nA B\n", "641234567"), None);
    }

    #[test]
    fn label_fallback_resolves_contractor_without_number() {
        let (number, contractor) = extract("RAZÓN SOCIAL: TALLERES UNIDOS DEL SURESTE\n");
        assert_eq!(number, "");
        assert_eq!(contractor, "TALLERES UNIDOS DEL SURESTE");
    }

    #[test]
    fn proveedor_label_also_accepted() {
        let (_, contractor) = extract("PROVEEDOR: SERVICIOS INDUSTRIALES MARINA");
        assert_eq!(contractor, "SERVICIOS INDUSTRIALES MARINA");
    }

    #[test]
    fn fields_resolve_independently() {
        // Number from the direct pattern, contractor only via the label.
        let text = "Referencia 641111111 sin pareja\n\nCONTRATISTA: GRUPO ALFA OMEGA";
        let (number, contractor) = extract(text);
        assert_eq!(number, "641111111");
        assert_eq!(contractor, "GRUPO ALFA OMEGA");
    }

    #[test]
    fn no_match_returns_empty_pair() {
        let (number, contractor) = extract("texto sin datos contractuales");
        assert_eq!(number, "");
        assert_eq!(contractor, "");
    }
}
