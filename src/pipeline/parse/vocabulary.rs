use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Annex codes every deployment starts with.
pub const BASE_ANNEXES: [&str; 21] = [
    "A", "B", "B-1", "C", "CN", "E", "F", "I", "SSPA", "PACMA", "AP", "MMRDD", "GNR", "PUE",
    "BDE", "GARANTÍAS", "FORMA", "DT-9", "II", "IV", "O",
];

/// Process-wide set of annex codes the system has ever recognized.
///
/// The detector reads the set to accept ambiguous matches and writes newly
/// discovered codes back after every detection (read-before-match,
/// write-after-match). The set grows monotonically and never shrinks. All
/// codes are stored uppercase. The `RwLock` serializes writers so concurrent
/// extractions cannot lose updates.
#[derive(Debug)]
pub struct AnnexVocabulary {
    codes: RwLock<BTreeSet<String>>,
}

impl AnnexVocabulary {
    /// Vocabulary seeded with [`BASE_ANNEXES`].
    pub fn seeded() -> Self {
        Self {
            codes: RwLock::new(BASE_ANNEXES.iter().map(|c| c.to_string()).collect()),
        }
    }

    /// Empty vocabulary (tests and callers that seed explicitly).
    pub fn empty() -> Self {
        Self {
            codes: RwLock::new(BTreeSet::new()),
        }
    }

    /// Seeded vocabulary merged with the codes persisted at `path`.
    ///
    /// A missing file is created from the seed list; an unreadable or
    /// malformed file is logged and the seed list used alone. Mirrors the
    /// tolerant startup of the credentials loader: bad state never aborts.
    pub fn load_or_seed(path: &Path) -> Self {
        let vocab = Self::seeded();

        if !path.exists() {
            if let Err(e) = vocab.save(path) {
                tracing::warn!(path = %path.display(), error = %e, "Cannot create annex file");
            }
            return vocab;
        }

        match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(stored) => {
                    let added = vocab.extend(stored.iter().map(String::as_str));
                    tracing::info!(
                        known = vocab.len(),
                        merged = added,
                        "Annex vocabulary loaded"
                    );
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Malformed annex file, using seed list");
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Cannot read annex file, using seed list");
            }
        }

        vocab
    }

    /// Persist the current snapshot as a sorted JSON array.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let snapshot = self.snapshot();
        let json = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(path, json)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.read().contains(&code.to_uppercase())
    }

    /// Add one code (uppercased). Returns `true` if it was new.
    pub fn add(&self, code: &str) -> bool {
        let code = code.trim().to_uppercase();
        if code.is_empty() {
            return false;
        }
        self.write().insert(code)
    }

    /// Add many codes; returns how many were new.
    pub fn extend<'a, I>(&self, codes: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        codes.into_iter().filter(|c| self.add(c)).count()
    }

    /// Sorted copy of the current codes.
    pub fn snapshot(&self) -> Vec<String> {
        self.read().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A poisoned lock only means a writer panicked mid-insert; the set is
    // still a valid BTreeSet, so recover the guard instead of propagating.
    fn read(&self) -> RwLockReadGuard<'_, BTreeSet<String>> {
        self.codes.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeSet<String>> {
        self.codes.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_contains_base_codes() {
        let vocab = AnnexVocabulary::seeded();
        assert_eq!(vocab.len(), BASE_ANNEXES.len());
        for code in BASE_ANNEXES {
            assert!(vocab.contains(code), "missing seed code {code}");
        }
    }

    #[test]
    fn add_uppercases_and_reports_novelty() {
        let vocab = AnnexVocabulary::empty();
        assert!(vocab.add("b-7"));
        assert!(!vocab.add("B-7"));
        assert!(vocab.contains("b-7"));
        assert_eq!(vocab.snapshot(), vec!["B-7"]);
    }

    #[test]
    fn add_ignores_empty_codes() {
        let vocab = AnnexVocabulary::empty();
        assert!(!vocab.add(""));
        assert!(!vocab.add("   "));
        assert!(vocab.is_empty());
    }

    #[test]
    fn snapshot_is_sorted_ascending() {
        let vocab = AnnexVocabulary::empty();
        vocab.extend(["SSPA", "A", "B-1", "C"]);
        assert_eq!(vocab.snapshot(), vec!["A", "B-1", "C", "SSPA"]);
    }

    #[test]
    fn extend_counts_only_new_codes() {
        let vocab = AnnexVocabulary::empty();
        assert_eq!(vocab.extend(["A", "B", "A"]), 2);
        assert_eq!(vocab.extend(["B", "C"]), 1);
    }

    #[test]
    fn load_creates_missing_file_from_seed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anexos_base.json");
        let vocab = AnnexVocabulary::load_or_seed(&path);
        assert!(path.exists());
        assert_eq!(vocab.len(), BASE_ANNEXES.len());

        let raw = std::fs::read_to_string(&path).unwrap();
        let stored: Vec<String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored, vocab.snapshot());
    }

    #[test]
    fn load_merges_persisted_codes_with_seed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anexos_base.json");
        std::fs::write(&path, r#"["ZZ-1", "A"]"#).unwrap();
        let vocab = AnnexVocabulary::load_or_seed(&path);
        assert!(vocab.contains("ZZ-1"));
        assert!(vocab.contains("GARANTÍAS"));
        assert_eq!(vocab.len(), BASE_ANNEXES.len() + 1);
    }

    #[test]
    fn load_tolerates_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anexos_base.json");
        std::fs::write(&path, "{not json").unwrap();
        let vocab = AnnexVocabulary::load_or_seed(&path);
        assert_eq!(vocab.len(), BASE_ANNEXES.len());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anexos_base.json");
        let vocab = AnnexVocabulary::seeded();
        vocab.add("NUEVO-1");
        vocab.save(&path).unwrap();

        let reloaded = AnnexVocabulary::load_or_seed(&path);
        assert!(reloaded.contains("NUEVO-1"));
    }
}
