//! Database Module
//!
//! Embedded SurrealDB (RocksDB engine). Documents are schema-flexible;
//! the only defined constraint is the unique index on product slugs.

pub mod models;
pub mod repository;

use std::path::Path;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "storefront";
const DATABASE: &str = "storefront";

/// Open (or create) the embedded database under `db_dir`
pub async fn connect(db_dir: &Path) -> Result<Surreal<Db>, AppError> {
    let db = Surreal::new::<RocksDb>(db_dir)
        .await
        .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

    db.use_ns(NAMESPACE)
        .use_db(DATABASE)
        .await
        .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

    define_schema(&db).await?;

    tracing::info!(path = %db_dir.display(), "Database connection established");
    Ok(db)
}

/// Idempotent schema definitions, applied on every startup
async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query("DEFINE INDEX IF NOT EXISTS uq_product_slug ON TABLE product COLUMNS slug UNIQUE")
        .await
        .map_err(|e| AppError::database(format!("Failed to define slug index: {e}")))?
        .check()
        .map_err(|e| AppError::database(format!("Failed to define slug index: {e}")))?;
    Ok(())
}
