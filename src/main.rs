use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use cedula::pipeline::extraction::DocumentExtractor;
use cedula::pipeline::parse::AnnexVocabulary;
use cedula::state::{AppPaths, AppState};
use cedula::{api, auth, config, db};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    config::ensure_directories()?;
    let paths = AppPaths::from_config();
    auth::ensure_users_file(&paths.users_file)?;

    let vocabulary = AnnexVocabulary::load_or_seed(&paths.annexes_file);
    let conn = db::sqlite::open_database(&config::database_file())?;
    let extractor = DocumentExtractor::from_environment();

    let state = Arc::new(AppState::new(
        conn,
        vocabulary,
        extractor,
        paths,
        config::FIXED_AREA,
    ));

    api::server::serve(state, config::api_port()).await?;
    Ok(())
}
