use chrono::NaiveDateTime;
use rusqlite::{params, params_from_iter, Connection};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{ContractFilters, ContractStats, StoredContract};

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const SELECT_COLUMNS: &str = "id, area, contract_number, contractor, amount, term_days,
         description, annexes, file_name, file_type, file_size, sha256, uploaded_by,
         uploaded_at, processed";

/// SHA-256 digest of the original file, hex-encoded.
pub fn file_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Insert a contract with its original file bytes.
/// A duplicate contract number maps to [`DatabaseError::DuplicateContract`].
pub fn insert_contract(
    conn: &Connection,
    contract: &StoredContract,
    file_data: &[u8],
) -> Result<(), DatabaseError> {
    let annexes_json = serde_json::to_string(&contract.annexes)
        .map_err(|e| DatabaseError::InvalidStoredValue {
            field: "annexes".into(),
            reason: e.to_string(),
        })?;

    let result = conn.execute(
        "INSERT INTO contracts (id, area, contract_number, contractor, amount, term_days,
         description, annexes, file_name, file_type, file_size, sha256, file_data,
         uploaded_by, uploaded_at, processed)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            contract.id.to_string(),
            contract.area,
            contract.contract_number,
            contract.contractor,
            contract.amount,
            contract.term_days,
            contract.description,
            annexes_json,
            contract.file_name,
            contract.file_type,
            contract.file_size,
            contract.sha256,
            file_data,
            contract.uploaded_by,
            contract.uploaded_at.format(DATETIME_FORMAT).to_string(),
            contract.processed as i32,
        ],
    );

    match result {
        Ok(_) => {
            tracing::info!(
                contract_number = %contract.contract_number,
                file_size = contract.file_size,
                "Contract stored"
            );
            Ok(())
        }
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(DatabaseError::DuplicateContract(
                contract.contract_number.clone(),
            ))
        }
        Err(e) => Err(e.into()),
    }
}

/// Filtered search, newest uploads first. Filters are case-insensitive
/// substring matches; an empty filter set returns everything.
pub fn search_contracts(
    conn: &Connection,
    filters: &ContractFilters,
) -> Result<Vec<StoredContract>, DatabaseError> {
    let mut conditions: Vec<&str> = Vec::new();
    let mut values: Vec<String> = Vec::new();

    if let Some(ref number) = filters.contract_number {
        conditions.push("contract_number LIKE ?");
        values.push(format!("%{number}%"));
    }
    if let Some(ref contractor) = filters.contractor {
        conditions.push("contractor LIKE ?");
        values.push(format!("%{contractor}%"));
    }
    if let Some(ref description) = filters.description {
        conditions.push("description LIKE ?");
        values.push(format!("%{description}%"));
    }
    if let Some(ref area) = filters.area {
        conditions.push("area LIKE ?");
        values.push(format!("%{area}%"));
    }

    let where_clause = if conditions.is_empty() {
        "1=1".to_string()
    } else {
        conditions.join(" AND ")
    };

    let sql = format!(
        "SELECT {SELECT_COLUMNS} FROM contracts WHERE {where_clause} ORDER BY uploaded_at DESC"
    );
    let mut stmt = conn.prepare(&sql)?;

    let rows = stmt.query_map(params_from_iter(values.iter()), contract_row)?;
    let mut contracts = Vec::new();
    for row in rows {
        contracts.push(contract_from_row(row?)?);
    }
    Ok(contracts)
}

/// Fetch one contract's metadata (no file bytes).
pub fn get_contract(conn: &Connection, id: &Uuid) -> Result<Option<StoredContract>, DatabaseError> {
    let sql = format!("SELECT {SELECT_COLUMNS} FROM contracts WHERE id = ?1");
    let mut stmt = conn.prepare(&sql)?;

    match stmt.query_row(params![id.to_string()], contract_row) {
        Ok(row) => Ok(Some(contract_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// The original file for a contract.
pub struct ContractFile {
    pub file_name: String,
    pub file_type: Option<String>,
    pub sha256: String,
    pub data: Vec<u8>,
}

/// Fetch the original file bytes, verifying integrity against the stored
/// digest. A mismatch is logged, not fatal — the caller still gets the bytes.
pub fn get_contract_file(
    conn: &Connection,
    id: &Uuid,
) -> Result<Option<ContractFile>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT file_name, file_type, sha256, file_data FROM contracts WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id.to_string()], |row| {
        Ok(ContractFile {
            file_name: row.get(0)?,
            file_type: row.get(1)?,
            sha256: row.get(2)?,
            data: row.get(3)?,
        })
    });

    match result {
        Ok(file) => {
            let digest = file_digest(&file.data);
            if digest != file.sha256 {
                tracing::warn!(
                    contract_id = %id,
                    stored = %file.sha256,
                    computed = %digest,
                    "Stored file digest mismatch"
                );
            }
            Ok(Some(file))
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Delete a contract (file blob included, same row).
pub fn delete_contract(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let deleted = conn.execute("DELETE FROM contracts WHERE id = ?1", params![id.to_string()])?;
    if deleted == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Contract".into(),
            id: id.to_string(),
        });
    }
    tracing::info!(contract_id = %id, "Contract deleted");
    Ok(())
}

/// Aggregate archive statistics.
pub fn contract_stats(conn: &Connection) -> Result<ContractStats, DatabaseError> {
    conn.query_row(
        "SELECT COUNT(*),
                COALESCE(SUM(file_size), 0),
                COUNT(DISTINCT contractor),
                COUNT(DISTINCT area),
                MIN(uploaded_at),
                MAX(uploaded_at)
         FROM contracts",
        [],
        |row| {
            Ok(ContractStats {
                total_contracts: row.get(0)?,
                total_bytes: row.get(1)?,
                distinct_contractors: row.get(2)?,
                active_areas: row.get(3)?,
                oldest_upload: row.get(4)?,
                newest_upload: row.get(5)?,
            })
        },
    )
    .map_err(Into::into)
}

// Internal row type for StoredContract mapping
struct ContractRow {
    id: String,
    area: String,
    contract_number: String,
    contractor: String,
    amount: String,
    term_days: String,
    description: String,
    annexes: String,
    file_name: String,
    file_type: Option<String>,
    file_size: i64,
    sha256: String,
    uploaded_by: String,
    uploaded_at: String,
    processed: i32,
}

fn contract_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ContractRow> {
    Ok(ContractRow {
        id: row.get(0)?,
        area: row.get(1)?,
        contract_number: row.get(2)?,
        contractor: row.get(3)?,
        amount: row.get(4)?,
        term_days: row.get(5)?,
        description: row.get(6)?,
        annexes: row.get(7)?,
        file_name: row.get(8)?,
        file_type: row.get(9)?,
        file_size: row.get(10)?,
        sha256: row.get(11)?,
        uploaded_by: row.get(12)?,
        uploaded_at: row.get(13)?,
        processed: row.get(14)?,
    })
}

fn contract_from_row(row: ContractRow) -> Result<StoredContract, DatabaseError> {
    let annexes: Vec<String> =
        serde_json::from_str(&row.annexes).unwrap_or_else(|_| Vec::new());

    Ok(StoredContract {
        id: Uuid::parse_str(&row.id).map_err(|e| DatabaseError::InvalidStoredValue {
            field: "id".into(),
            reason: e.to_string(),
        })?,
        area: row.area,
        contract_number: row.contract_number,
        contractor: row.contractor,
        amount: row.amount,
        term_days: row.term_days,
        description: row.description,
        annexes,
        file_name: row.file_name,
        file_type: row.file_type,
        file_size: row.file_size,
        sha256: row.sha256,
        uploaded_by: row.uploaded_by,
        uploaded_at: NaiveDateTime::parse_from_str(&row.uploaded_at, DATETIME_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(&row.uploaded_at, "%Y-%m-%dT%H:%M:%S"))
            .unwrap_or_default(),
        processed: row.processed != 0,
    })
}
