//! Heuristic parsing of acquired contract text.
//!
//! Every extractor runs over the same normalized text and is best-effort:
//! a miss is an empty string, never an error. The field extractors
//! (`contract_number`, `object`, `amount`, `term`) are ordered strategy
//! lists combined with first-match-wins; the annex detector unions all of
//! its strategies, then deduplicates and sorts.

pub mod amount;
pub mod annex;
pub mod contract_number;
pub mod normalize;
pub mod object;
pub mod term;
pub mod vocabulary;

pub use annex::detect_annexes;
pub use normalize::normalize;
pub use vocabulary::AnnexVocabulary;

use crate::models::ContractRecord;

/// Run strategies in order; the first one to produce a value wins and the
/// remaining strategies are not attempted.
pub(crate) fn first_match(text: &str, strategies: &[fn(&str) -> Option<String>]) -> String {
    strategies
        .iter()
        .find_map(|strategy| strategy(text))
        .unwrap_or_default()
}

/// Parse raw acquired text into a [`ContractRecord`].
///
/// The five extractors run independently over the same normalized text; no
/// extractor's outcome gates another. Newly discovered annex codes are fed
/// back into `vocabulary`. `area` is the fixed configured constant and is
/// stamped on the record as-is. Never fails: every field defaults to empty.
pub fn extract_contract_data(
    raw_text: &str,
    vocabulary: &AnnexVocabulary,
    area: &str,
) -> ContractRecord {
    if raw_text.is_empty() {
        return ContractRecord {
            area: area.to_string(),
            ..Default::default()
        };
    }

    let text = normalize(raw_text);

    let (contract_number, contractor) = contract_number::extract(&text);
    let description = object::extract(&text);
    let amount = amount::extract(&text);
    let term_days = term::extract(&text);
    let annexes = detect_annexes(&text, vocabulary);

    tracing::debug!(
        contract_number = %contract_number,
        contractor_found = !contractor.is_empty(),
        annexes = annexes.len(),
        "Contract data extracted"
    );

    ContractRecord {
        contract_number,
        contractor,
        description,
        amount,
        term_days,
        annexes,
        area: area.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"CONTRATO NÚMERO 641234567
EMPRESA CONSTRUCTORA XYZ S.A. DE C.V.

4. OBJETO
"OBRAS DE MANTENIMIENTO Y CONSTRUCCIÓN EN PLANTA"

MONTO: $1,500,000.00 M.N.

11. PLAZO
El plazo es de 180 DÍAS para la ejecución total de los trabajos.

2. INTEGRIDAD DEL CONTRATO
Este contrato se integra por los Anexos "A", "B-1", "C" y "SSPA".
"#;

    #[test]
    fn full_sample_extracts_every_field() {
        let vocab = AnnexVocabulary::seeded();
        let record = extract_contract_data(SAMPLE, &vocab, "GERENCIA DE PRUEBA");

        assert_eq!(record.contract_number, "641234567");
        assert_eq!(
            record.description,
            "OBRAS DE MANTENIMIENTO Y CONSTRUCCIÓN EN PLANTA"
        );
        assert_eq!(record.amount, "$1,500,000.00");
        assert_eq!(record.term_days, "180");
        assert_eq!(record.annexes, vec!["A", "B-1", "C", "SSPA"]);
        assert_eq!(record.area, "GERENCIA DE PRUEBA");
    }

    #[test]
    fn empty_input_yields_default_record_with_area() {
        let vocab = AnnexVocabulary::seeded();
        let record = extract_contract_data("", &vocab, "AREA");
        assert_eq!(record.area, "AREA");
        assert_eq!(record.contract_number, "");
        assert_eq!(record.contractor, "");
        assert_eq!(record.description, "");
        assert_eq!(record.amount, "");
        assert_eq!(record.term_days, "");
        assert!(record.annexes.is_empty());
    }

    #[test]
    fn garbage_input_never_panics_and_defaults_to_empty() {
        let vocab = AnnexVocabulary::seeded();
        for text in ["%%%###", "\n\n\n", "solo palabras sin estructura", "$", "ANEXO"] {
            let record = extract_contract_data(text, &vocab, "AREA");
            assert_eq!(record.area, "AREA");
        }
    }

    #[test]
    fn detected_annexes_enter_the_vocabulary() {
        let vocab = AnnexVocabulary::seeded();
        assert!(!vocab.contains("ZZ-9"));
        let record = extract_contract_data("Se agrega el ANEXO \"ZZ-9\" al contrato.", &vocab, "");
        assert_eq!(record.annexes, vec!["ZZ-9"]);
        assert!(vocab.contains("ZZ-9"));
    }

    #[test]
    fn first_match_short_circuits() {
        fn never(_: &str) -> Option<String> {
            None
        }
        fn always(_: &str) -> Option<String> {
            Some("first".into())
        }
        fn panics(_: &str) -> Option<String> {
            panic!("later strategies must not run once one wins");
        }
        assert_eq!(first_match("x", &[never, always, panics]), "first");
        assert_eq!(first_match("x", &[never, never]), "");
    }
}
