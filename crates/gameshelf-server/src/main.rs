//! Gameshelf backend server
//!
//! Loads `gameshelf.toml` (or the file named by `GAMESHELF_CONFIG`), applies
//! environment overrides and serves the game API.

use actix_web::{App, HttpServer, middleware, web};
use anyhow::{Context, Result};
use gameshelf_catalog::IgdbClient;
use gameshelf_config::{GameshelfConfig, LoggingConfig};
use gameshelf_library::{LibraryDatabase, LibraryService};
use std::sync::Arc;
use tracing::info;

#[actix_web::main]
async fn main() -> Result<()> {
    let mut config = GameshelfConfig::load_default().context("Failed to load configuration")?;
    config.apply_env_overrides();

    setup_logging(&config.logging);

    info!("Gameshelf server starting...");

    config.validate().context("Invalid configuration")?;

    let db_path = &config.database.path;
    if let Some(parent) = db_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let db = LibraryDatabase::open(db_path)
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;
    info!("Library database: {}", db_path.display());

    let catalog = IgdbClient::new(&config.catalog).context("Failed to create catalog client")?;
    let library = web::Data::new(LibraryService::new(Arc::new(catalog), db));

    let address = config.server.socket_address();
    info!("Listening on {}", address);

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(library.clone())
            .wrap(middleware::Logger::default())
            .configure(gameshelf_server::configure)
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&address)
        .with_context(|| format!("Failed to bind {}", address))?
        .run()
        .await?;

    info!("Gameshelf server stopped");
    Ok(())
}

/// Setup logging
///
/// `RUST_LOG` takes precedence over the configured level.
fn setup_logging(config: &LoggingConfig) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_ansi(config.ansi))
        .init();
}
