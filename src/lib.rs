//! Storefront Server - embedded e-commerce backend
//!
//! A single-binary REST backend over an embedded SurrealDB store:
//!
//! - **catalog** (`catalog`): slug generation, media reconciliation and
//!   the filtered/sorted/paginated product listing query builder
//! - **database** (`db`): embedded SurrealDB models and repositories
//! - **media** (`media`): uploaded file storage served under `/uploads`
//! - **HTTP API** (`api`): RESTful product and order endpoints
//!
//! # Module layout
//!
//! ```text
//! src/
//! ├── core/      # config, state, server
//! ├── api/       # HTTP routes and handlers
//! ├── catalog/   # listing queries, slugs, media reconciliation
//! ├── media/     # upload storage
//! ├── db/        # models and repositories
//! └── utils/     # errors, logging
//! ```

pub mod api;
pub mod catalog;
pub mod core;
pub mod db;
pub mod media;
pub mod utils;

pub use crate::core::{Config, Server, ServerState};
pub use utils::logger::init_logger;
pub use utils::{AppError, AppResult};
