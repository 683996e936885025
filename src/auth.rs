//! Flat-file authentication and in-process sessions.
//!
//! Credentials live in a JSON array on disk (created with a default ADMIN
//! account when missing). Login issues an opaque bearer token held in
//! process memory; the API middleware validates it per request.

use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use thiserror::Error;
use uuid::Uuid;

use crate::models::UserAccount;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed users file: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("user {0} already exists")]
    DuplicateUser(String),
}

/// Create the users file with a default ADMIN account if it does not exist.
pub fn ensure_users_file(path: &Path) -> Result<(), AuthError> {
    if path.exists() {
        return Ok(());
    }
    tracing::warn!(path = %path.display(), "Users file not found, creating default");

    let defaults = vec![UserAccount {
        username: "ADMIN".into(),
        password: "admin123".into(),
        display_name: "ADMINISTRADOR".into(),
        role: "admin".into(),
        area: "SISTEMAS".into(),
    }];
    save_users(path, &defaults)
}

/// Load every account from the users file.
pub fn load_users(path: &Path) -> Result<Vec<UserAccount>, AuthError> {
    let raw = std::fs::read_to_string(path)?;
    let users: Vec<UserAccount> = serde_json::from_str(&raw)?;
    tracing::info!(count = users.len(), "Users loaded");
    Ok(users)
}

fn save_users(path: &Path, users: &[UserAccount]) -> Result<(), AuthError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(users)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Check credentials against the users file.
///
/// Tolerant of a missing or malformed file (logged, treated as no users) so
/// a broken deployment degrades to failed logins rather than a crash.
pub fn authenticate(path: &Path, username: &str, password: &str) -> Option<UserAccount> {
    let users = match load_users(path) {
        Ok(users) => users,
        Err(e) => {
            tracing::error!(error = %e, "Cannot load users file");
            return None;
        }
    };

    let found = users
        .into_iter()
        .find(|u| u.username == username && u.password == password);

    match &found {
        Some(user) => tracing::info!(username = %user.username, "User authenticated"),
        None => tracing::warn!(username = %username, "Authentication failed"),
    }
    found
}

/// Append a new account to the users file.
pub fn create_user(path: &Path, account: UserAccount) -> Result<(), AuthError> {
    let mut users = if path.exists() {
        load_users(path)?
    } else {
        Vec::new()
    };

    if users.iter().any(|u| u.username == account.username) {
        return Err(AuthError::DuplicateUser(account.username));
    }

    tracing::info!(username = %account.username, "User created");
    users.push(account);
    save_users(path, &users)
}

/// In-process bearer-token sessions.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, UserAccount>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh opaque token for an authenticated user.
    pub fn issue(&self, user: UserAccount) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.write().insert(token.clone(), user);
        token
    }

    /// Resolve a token to its account, if the session is live.
    pub fn validate(&self, token: &str) -> Option<UserAccount> {
        self.read().get(token).cloned()
    }

    /// Drop a session (logout). Returns whether it existed.
    pub fn revoke(&self, token: &str) -> bool {
        self.write().remove(token).is_some()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, UserAccount>> {
        self.sessions.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, UserAccount>> {
        self.sessions.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_users_file() -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("usuarios.json");
        (dir, path)
    }

    #[test]
    fn ensure_creates_default_admin() {
        let (_dir, path) = temp_users_file();
        ensure_users_file(&path).unwrap();
        assert!(path.exists());

        let users = load_users(&path).unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, "ADMIN");
        assert!(users[0].is_admin());
    }

    #[test]
    fn ensure_leaves_existing_file_alone() {
        let (_dir, path) = temp_users_file();
        std::fs::write(&path, "[]").unwrap();
        ensure_users_file(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn authenticate_accepts_valid_credentials() {
        let (_dir, path) = temp_users_file();
        ensure_users_file(&path).unwrap();
        let user = authenticate(&path, "ADMIN", "admin123").unwrap();
        assert_eq!(user.display_name, "ADMINISTRADOR");
    }

    #[test]
    fn authenticate_rejects_bad_password_and_unknown_user() {
        let (_dir, path) = temp_users_file();
        ensure_users_file(&path).unwrap();
        assert!(authenticate(&path, "ADMIN", "wrong").is_none());
        assert!(authenticate(&path, "NADIE", "admin123").is_none());
    }

    #[test]
    fn authenticate_tolerates_missing_file() {
        let (_dir, path) = temp_users_file();
        assert!(authenticate(&path, "ADMIN", "admin123").is_none());
    }

    #[test]
    fn create_user_appends_and_rejects_duplicates() {
        let (_dir, path) = temp_users_file();
        ensure_users_file(&path).unwrap();

        let account = UserAccount {
            username: "ANA".into(),
            password: "secreto".into(),
            display_name: "ANA LÓPEZ".into(),
            role: "usuario".into(),
            area: "ARCHIVO".into(),
        };
        create_user(&path, account.clone()).unwrap();
        assert!(authenticate(&path, "ANA", "secreto").is_some());

        let err = create_user(&path, account).unwrap_err();
        assert!(matches!(err, AuthError::DuplicateUser(u) if u == "ANA"));
    }

    #[test]
    fn session_tokens_validate_and_revoke() {
        let store = SessionStore::new();
        let user = UserAccount {
            username: "ADMIN".into(),
            password: "x".into(),
            display_name: "ADMIN".into(),
            role: "admin".into(),
            area: "SISTEMAS".into(),
        };
        let token = store.issue(user);
        assert_eq!(store.validate(&token).unwrap().username, "ADMIN");
        assert!(store.validate("otro-token").is_none());
        assert!(store.revoke(&token));
        assert!(store.validate(&token).is_none());
        assert!(!store.revoke(&token));
    }

    #[test]
    fn issued_tokens_are_unique() {
        let store = SessionStore::new();
        let user = UserAccount {
            username: "A".into(),
            password: "x".into(),
            display_name: "A".into(),
            role: "usuario".into(),
            area: "G".into(),
        };
        let t1 = store.issue(user.clone());
        let t2 = store.issue(user);
        assert_ne!(t1, t2);
    }
}
