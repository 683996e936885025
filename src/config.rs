use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Cedula";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fixed organizational area stamped on every contract record.
/// Supplied by configuration, never extracted from documents.
pub const FIXED_AREA: &str =
    "SUBDIRECCIÓN DE PRODUCCIÓN REGIÓN NORTE GERENCIA DE MANTENIMIENTO CONFIABILIDAD Y CONSTRUCCIÓN";

/// Default API port; override with the `CEDULA_PORT` env var.
pub const DEFAULT_PORT: u16 = 8741;

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "info,cedula=debug"
}

/// Get the application data directory
/// ~/Cedula/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Cedula")
}

/// Permanent data (users file, annex vocabulary, database)
pub fn data_dir() -> PathBuf {
    app_data_dir().join("data")
}

/// Temporary landing area for uploaded files before extraction
pub fn uploads_dir() -> PathBuf {
    app_data_dir().join("uploads")
}

/// Generated deliverables (cédula spreadsheets, contract folders)
pub fn output_dir() -> PathBuf {
    app_data_dir().join("output")
}

/// Flat credentials file (JSON array of user accounts)
pub fn users_file() -> PathBuf {
    data_dir().join("usuarios.json")
}

/// Persisted known-annex vocabulary (JSON array of codes)
pub fn annexes_file() -> PathBuf {
    data_dir().join("anexos_base.json")
}

/// SQLite database path
pub fn database_file() -> PathBuf {
    data_dir().join("cedula.db")
}

/// Create every directory the service writes into.
pub fn ensure_directories() -> std::io::Result<()> {
    for dir in [data_dir(), uploads_dir(), output_dir()] {
        std::fs::create_dir_all(&dir)?;
    }
    Ok(())
}

/// Port for the HTTP API, from `CEDULA_PORT` or the default.
pub fn api_port() -> u16 {
    std::env::var("CEDULA_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}
