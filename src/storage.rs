//! On-disk layout for generated deliverables and physical-support scans.
//!
//! Each contract gets a per-user folder tree:
//! `output/<USER>/CONTRATOS/<NUMBER>/{CEDULA,ANEXOS,SOPORTES_FISICOS}`.

use std::path::{Path, PathBuf};

/// Folder set for one contract.
#[derive(Debug, Clone)]
pub struct ContractDirs {
    pub base: PathBuf,
    pub cedula: PathBuf,
    pub anexos: PathBuf,
    pub soportes: PathBuf,
}

/// Create (idempotently) the folder tree for a user's contract.
pub fn contract_dirs(
    output_dir: &Path,
    username: &str,
    contract_number: &str,
) -> std::io::Result<ContractDirs> {
    let base = output_dir
        .join(username.to_uppercase())
        .join("CONTRATOS")
        .join(contract_number);

    let dirs = ContractDirs {
        cedula: base.join("CEDULA"),
        anexos: base.join("ANEXOS"),
        soportes: base.join("SOPORTES_FISICOS"),
        base,
    };

    for dir in [&dirs.cedula, &dirs.anexos, &dirs.soportes] {
        std::fs::create_dir_all(dir)?;
    }

    Ok(dirs)
}

/// Persist uploaded bytes at `dest`, creating parent directories.
pub fn save_upload(bytes: &[u8], dest: &Path) -> std::io::Result<()> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(dest, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_full_folder_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = contract_dirs(tmp.path(), "ana", "641234567").unwrap();

        assert!(dirs.cedula.is_dir());
        assert!(dirs.anexos.is_dir());
        assert!(dirs.soportes.is_dir());
        assert!(dirs.base.ends_with("ANA/CONTRATOS/641234567"));
    }

    #[test]
    fn creation_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        contract_dirs(tmp.path(), "ANA", "641234567").unwrap();
        assert!(contract_dirs(tmp.path(), "ANA", "641234567").is_ok());
    }

    #[test]
    fn save_upload_creates_parents() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("uploads").join("contrato.pdf");
        save_upload(b"contenido", &dest).unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"contenido");
    }
}
