use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Structured data extracted from one contract document.
///
/// Every field defaults to an empty string (or empty list) on an extraction
/// miss — downstream cédula rendering indexes fields unconditionally. Amount
/// and term stay as display text: the source formatting must be preserved
/// verbatim in the deliverable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractRecord {
    pub contract_number: String,
    pub contractor: String,
    pub description: String,
    pub amount: String,
    pub term_days: String,
    /// Deduplicated, sorted ascending.
    pub annexes: Vec<String>,
    /// Fixed organizational area from configuration, not extracted.
    pub area: String,
}

/// A contract persisted in the archive, with file metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredContract {
    pub id: Uuid,
    pub area: String,
    pub contract_number: String,
    pub contractor: String,
    pub amount: String,
    pub term_days: String,
    pub description: String,
    pub annexes: Vec<String>,
    pub file_name: String,
    pub file_type: Option<String>,
    pub file_size: i64,
    pub sha256: String,
    pub uploaded_by: String,
    pub uploaded_at: NaiveDateTime,
    pub processed: bool,
}

impl StoredContract {
    /// Build a row from an extracted record plus the original file's metadata.
    pub fn from_record(
        record: &ContractRecord,
        file_name: &str,
        file_type: Option<&str>,
        file_size: i64,
        sha256: &str,
        uploaded_by: &str,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            area: record.area.clone(),
            contract_number: record.contract_number.clone(),
            contractor: record.contractor.clone(),
            amount: record.amount.clone(),
            term_days: record.term_days.clone(),
            description: record.description.clone(),
            annexes: record.annexes.clone(),
            file_name: file_name.to_string(),
            file_type: file_type.map(str::to_string),
            file_size,
            sha256: sha256.to_string(),
            uploaded_by: uploaded_by.to_string(),
            uploaded_at: chrono::Utc::now().naive_utc(),
            processed: true,
        }
    }

    pub fn record(&self) -> ContractRecord {
        ContractRecord {
            contract_number: self.contract_number.clone(),
            contractor: self.contractor.clone(),
            description: self.description.clone(),
            amount: self.amount.clone(),
            term_days: self.term_days.clone(),
            annexes: self.annexes.clone(),
            area: self.area.clone(),
        }
    }
}

/// Search filters for the contract archive. All substring, case-insensitive.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContractFilters {
    pub contract_number: Option<String>,
    pub contractor: Option<String>,
    pub description: Option<String>,
    pub area: Option<String>,
}

impl ContractFilters {
    pub fn is_empty(&self) -> bool {
        self.contract_number.is_none()
            && self.contractor.is_none()
            && self.description.is_none()
            && self.area.is_none()
    }
}

/// Aggregate archive statistics.
#[derive(Debug, Clone, Serialize)]
pub struct ContractStats {
    pub total_contracts: i64,
    pub total_bytes: i64,
    pub distinct_contractors: i64,
    pub active_areas: i64,
    pub oldest_upload: Option<String>,
    pub newest_upload: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_has_no_null_like_fields() {
        let record = ContractRecord::default();
        assert_eq!(record.contract_number, "");
        assert_eq!(record.contractor, "");
        assert_eq!(record.description, "");
        assert_eq!(record.amount, "");
        assert_eq!(record.term_days, "");
        assert!(record.annexes.is_empty());
        assert_eq!(record.area, "");
    }

    #[test]
    fn stored_contract_round_trips_record() {
        let record = ContractRecord {
            contract_number: "641234567".into(),
            contractor: "CONSTRUCTORA XYZ S.A. DE C.V.".into(),
            description: "OBRAS DE MANTENIMIENTO".into(),
            amount: "$1,500,000.00".into(),
            term_days: "180".into(),
            annexes: vec!["A".into(), "SSPA".into()],
            area: "GERENCIA".into(),
        };
        let stored = StoredContract::from_record(
            &record,
            "contrato.pdf",
            Some("application/pdf"),
            1024,
            "abc123",
            "ADMIN",
        );
        assert_eq!(stored.record(), record);
        assert_eq!(stored.file_name, "contrato.pdf");
        assert!(stored.processed);
    }

    #[test]
    fn empty_filters_report_empty() {
        assert!(ContractFilters::default().is_empty());
        let filters = ContractFilters {
            contractor: Some("XYZ".into()),
            ..Default::default()
        };
        assert!(!filters.is_empty());
    }
}
