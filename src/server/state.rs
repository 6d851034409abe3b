use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::standards::StandardsTable;
use crate::storage::Database;

/// Shared handler state.
pub struct AppState {
    pub db: Database,
    pub standards: StandardsTable,
    pub config: Config,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Arc<Self>> {
        info!("Connecting to {}", config.database_url);
        let db = Database::connect(&config.database_url).await?;

        let standards = StandardsTable::with_overrides(config.standards_path.as_ref())?;
        info!("Loaded {} nutrient standards", standards.len());

        Ok(Self::from_parts(db, standards, config))
    }

    pub fn from_parts(db: Database, standards: StandardsTable, config: Config) -> Arc<Self> {
        Arc::new(Self {
            db,
            standards,
            config,
        })
    }
}
