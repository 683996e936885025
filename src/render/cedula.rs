//! Cédula spreadsheet deliverable.
//!
//! The cédula is a fixed-layout worksheet: each extracted field lands in a
//! known cell, and the annex list fills a contiguous column range, one code
//! per row, truncated at the range's capacity. Empty fields leave their
//! cells untouched.

use std::path::Path;

use rust_xlsxwriter::{Format, FormatAlign, Workbook};

use super::RenderError;
use crate::models::ContractRecord;

// Cell map (0-based row/column). B7, I7, B8, C13, F13, B29.
const CONTRACTOR_CELL: (u32, u16) = (6, 1);
const CONTRACT_NUMBER_CELL: (u32, u16) = (6, 8);
const DESCRIPTION_CELL: (u32, u16) = (7, 1);
const AMOUNT_CELL: (u32, u16) = (12, 2);
const TERM_CELL: (u32, u16) = (12, 5);
const ANNEX_START: (u32, u16) = (28, 1);

/// The annex range spans 31 rows; any excess is silently dropped.
pub const MAX_ANNEX_ROWS: usize = 31;

const SHEET_NAME: &str = "CEDULA";

struct CellWrite {
    row: u32,
    col: u16,
    text: String,
    left_aligned: bool,
}

/// Plan every cell write for a record. Pure, so the layout rules are
/// testable without parsing xlsx output.
fn plan_writes(record: &ContractRecord) -> Vec<CellWrite> {
    let mut writes = Vec::new();

    if !record.contractor.is_empty() {
        writes.push(CellWrite {
            row: CONTRACTOR_CELL.0,
            col: CONTRACTOR_CELL.1,
            text: format!("Contratista: {}", record.contractor),
            left_aligned: false,
        });
    }

    if !record.contract_number.is_empty() {
        // Archive numbering always carries the 64 prefix.
        let number = if record.contract_number.starts_with("64") {
            record.contract_number.clone()
        } else {
            format!("64{}", record.contract_number)
        };
        writes.push(CellWrite {
            row: CONTRACT_NUMBER_CELL.0,
            col: CONTRACT_NUMBER_CELL.1,
            text: format!("NO. {number}"),
            left_aligned: false,
        });
    }

    if !record.description.is_empty() {
        writes.push(CellWrite {
            row: DESCRIPTION_CELL.0,
            col: DESCRIPTION_CELL.1,
            text: format!("Descripción del contrato: {}", record.description),
            left_aligned: false,
        });
    }

    if !record.amount.is_empty() {
        let amount = record.amount.trim();
        let amount = if amount.starts_with('$') {
            amount.to_string()
        } else {
            format!("${amount}")
        };
        writes.push(CellWrite {
            row: AMOUNT_CELL.0,
            col: AMOUNT_CELL.1,
            text: amount,
            left_aligned: false,
        });
    }

    if !record.term_days.is_empty() {
        writes.push(CellWrite {
            row: TERM_CELL.0,
            col: TERM_CELL.1,
            text: record.term_days.clone(),
            left_aligned: false,
        });
    }

    for (offset, annex) in record.annexes.iter().take(MAX_ANNEX_ROWS).enumerate() {
        writes.push(CellWrite {
            row: ANNEX_START.0 + offset as u32,
            col: ANNEX_START.1,
            text: annex.clone(),
            left_aligned: true,
        });
    }

    writes
}

fn build_workbook(record: &ContractRecord) -> Result<Workbook, RenderError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    let left = Format::new()
        .set_align(FormatAlign::Left)
        .set_align(FormatAlign::VerticalCenter);

    for write in plan_writes(record) {
        if write.left_aligned {
            sheet.write_string_with_format(write.row, write.col, &write.text, &left)?;
        } else {
            sheet.write_string(write.row, write.col, &write.text)?;
        }
    }

    Ok(workbook)
}

/// Render the cédula to a file, creating parent directories as needed.
pub fn render_cedula(record: &ContractRecord, path: &Path) -> Result<(), RenderError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut workbook = build_workbook(record)?;
    workbook.save(path)?;
    tracing::info!(path = %path.display(), "Cédula saved");
    Ok(())
}

/// Render the cédula to xlsx bytes (for HTTP download).
pub fn render_cedula_bytes(record: &ContractRecord) -> Result<Vec<u8>, RenderError> {
    let mut workbook = build_workbook(record)?;
    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> ContractRecord {
        ContractRecord {
            contract_number: "641234567".into(),
            contractor: "CONSTRUCTORA XYZ".into(),
            description: "OBRAS DE MANTENIMIENTO".into(),
            amount: "$1,500,000.00".into(),
            term_days: "180".into(),
            annexes: vec!["A".into(), "B-1".into()],
            area: "GERENCIA".into(),
        }
    }

    fn write_at(writes: &[CellWrite], row: u32, col: u16) -> Option<&CellWrite> {
        writes.iter().find(|w| w.row == row && w.col == col)
    }

    #[test]
    fn fields_land_in_their_fixed_cells() {
        let writes = plan_writes(&sample_record());
        assert_eq!(
            write_at(&writes, 6, 1).unwrap().text,
            "Contratista: CONSTRUCTORA XYZ"
        );
        assert_eq!(write_at(&writes, 6, 8).unwrap().text, "NO. 641234567");
        assert_eq!(
            write_at(&writes, 7, 1).unwrap().text,
            "Descripción del contrato: OBRAS DE MANTENIMIENTO"
        );
        assert_eq!(write_at(&writes, 12, 2).unwrap().text, "$1,500,000.00");
        assert_eq!(write_at(&writes, 12, 5).unwrap().text, "180");
    }

    #[test]
    fn annexes_fill_consecutive_rows_from_b29() {
        let writes = plan_writes(&sample_record());
        assert_eq!(write_at(&writes, 28, 1).unwrap().text, "A");
        assert_eq!(write_at(&writes, 29, 1).unwrap().text, "B-1");
        assert!(write_at(&writes, 28, 1).unwrap().left_aligned);
    }

    #[test]
    fn annex_list_truncates_at_capacity() {
        let mut record = sample_record();
        record.annexes = (0..40).map(|i| format!("X-{i:02}")).collect();
        let writes = plan_writes(&record);
        let annex_writes: Vec<_> = writes.iter().filter(|w| w.col == 1 && w.row >= 28).collect();
        assert_eq!(annex_writes.len(), MAX_ANNEX_ROWS);
        assert_eq!(annex_writes.last().unwrap().row, 28 + MAX_ANNEX_ROWS as u32 - 1);
    }

    #[test]
    fn number_without_prefix_gets_64_backfilled() {
        let mut record = sample_record();
        record.contract_number = "999888".into();
        let writes = plan_writes(&record);
        assert_eq!(write_at(&writes, 6, 8).unwrap().text, "NO. 64999888");
    }

    #[test]
    fn amount_without_dollar_gets_prefixed() {
        let mut record = sample_record();
        record.amount = "750,000.00".into();
        let writes = plan_writes(&record);
        assert_eq!(write_at(&writes, 12, 2).unwrap().text, "$750,000.00");
    }

    #[test]
    fn empty_fields_write_nothing() {
        let record = ContractRecord::default();
        assert!(plan_writes(&record).is_empty());
    }

    #[test]
    fn renders_valid_xlsx_bytes() {
        let bytes = render_cedula_bytes(&sample_record()).unwrap();
        // xlsx is a zip container: PK magic.
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn renders_to_file_creating_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("salidas").join("cedula.xlsx");
        render_cedula(&sample_record(), &path).unwrap();
        assert!(path.exists());
    }
}
