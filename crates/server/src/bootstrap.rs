use std::sync::Arc;

use thiserror::Error;
use tracing::info;
use wellora_core::config::{AppConfig, ConfigError, LoadOptions};
use wellora_core::{AdviceSources, CatalogError};
use wellora_db::{connect_with_settings, migrations, AdviceService, AdviceStores, DbPool};

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub advice: AdviceService,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("advice source failed to load: {0}")]
    Catalog(#[from] CatalogError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
}

#[cfg_attr(not(test), allow(dead_code))]
pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

/// Advice sources load before the database is touched so a bad source fails
/// startup without leaving a pool open.
pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let sources = AdviceSources::load(&config.catalog)?;
    info!(
        event_name = "system.bootstrap.sources_loaded",
        correlation_id = "bootstrap",
        skincare_records = sources.catalogs.skincare.len(),
        hair_records = sources.catalogs.hair.len(),
        "advice sources loaded"
    );

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let advice = AdviceService::new(Arc::new(sources), AdviceStores::sql(&db_pool));

    Ok(Application { config, db_pool, advice })
}
