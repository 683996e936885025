//! Shared application state for the API server.

use std::path::PathBuf;
use std::sync::Mutex;

use rusqlite::Connection;

use crate::auth::SessionStore;
use crate::pipeline::extraction::DocumentExtractor;
use crate::pipeline::parse::AnnexVocabulary;

/// Filesystem locations the service reads and writes.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub users_file: PathBuf,
    pub annexes_file: PathBuf,
    pub uploads_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl AppPaths {
    /// Production paths under the app data directory.
    pub fn from_config() -> Self {
        Self {
            users_file: crate::config::users_file(),
            annexes_file: crate::config::annexes_file(),
            uploads_dir: crate::config::uploads_dir(),
            output_dir: crate::config::output_dir(),
        }
    }
}

/// Process-wide state shared by every request handler.
///
/// The SQLite connection sits behind a `Mutex` (one writer at a time); the
/// vocabulary and session store carry their own locks.
pub struct AppState {
    pub db: Mutex<Connection>,
    pub vocabulary: AnnexVocabulary,
    pub sessions: SessionStore,
    pub extractor: DocumentExtractor,
    pub paths: AppPaths,
    /// Fixed organizational area stamped on every record.
    pub area: String,
}

impl AppState {
    pub fn new(
        db: Connection,
        vocabulary: AnnexVocabulary,
        extractor: DocumentExtractor,
        paths: AppPaths,
        area: &str,
    ) -> Self {
        Self {
            db: Mutex::new(db),
            vocabulary,
            sessions: SessionStore::new(),
            extractor,
            paths,
            area: area.to_string(),
        }
    }

    /// Persist the vocabulary snapshot; failures are logged, never fatal.
    pub fn save_vocabulary(&self) {
        if let Err(e) = self.vocabulary.save(&self.paths.annexes_file) {
            tracing::warn!(error = %e, "Cannot persist annex vocabulary");
        }
    }
}
