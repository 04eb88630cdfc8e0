//! Catalog core logic
//!
//! - [`query`] - filter/sort/pagination query building
//! - [`slug`] - URL-safe slug derivation
//! - [`media`] - media-list reconciliation on update

pub mod media;
pub mod query;
pub mod slug;

pub use media::reconcile_media;
pub use query::{CatalogQuery, ListRequest, total_pages};
pub use slug::slugify;
