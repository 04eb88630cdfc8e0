use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::core::Config;
use crate::db;
use crate::media::MediaStore;
use crate::utils::AppError;

/// Shared application state
///
/// Cheap to clone; the database handle and media store are shared
/// references under the hood.
#[derive(Clone, Debug)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database (SurrealDB on RocksDB)
    pub db: Surreal<Db>,
    /// Uploaded file storage
    pub media: MediaStore,
}

impl ServerState {
    /// Initialize the full state: work directory layout, database,
    /// media store
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {e}")))?;

        let db = db::connect(&config.database_dir()).await?;

        let media = MediaStore::new(config.uploads_dir());
        media
            .ensure_layout()
            .map_err(|e| AppError::internal(format!("Failed to create uploads layout: {e}")))?;

        Ok(Self {
            config: config.clone(),
            db,
            media,
        })
    }
}
