//! Product Repository
//!
//! Products are addressed by slug everywhere in the API; the record id
//! stays internal. Listing goes through the catalog query builder so
//! filtering, sorting, and pagination are delegated to the store.

use chrono::Utc;

use super::{BaseRepository, RepoError, RepoResult};
use crate::catalog::CatalogQuery;
use crate::db::models::{Product, ProductPatch, ProductSummary};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const PRODUCT_TABLE: &str = "product";

/// Listing shortcut size (new arrivals / best sellers)
const TOP_LIST_LIMIT: usize = 5;

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

#[derive(serde::Deserialize)]
struct CountRow {
    total: u64,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a new product; the slug must not already exist
    pub async fn create(&self, product: Product) -> RepoResult<Product> {
        if self.find_by_slug(&product.slug).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Product with slug '{}' already exists",
                product.slug
            )));
        }

        let created: Option<Product> = self
            .base
            .db()
            .create(PRODUCT_TABLE)
            .content(product)
            .await?;

        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    pub async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Product>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM product WHERE slug = $slug LIMIT 1")
            .bind(("slug", slug.to_string()))
            .await?;
        let products: Vec<Product> = result.take(0)?;
        Ok(products.into_iter().next())
    }

    /// Apply a partial update to the product addressed by slug
    pub async fn update_by_slug(&self, slug: &str, patch: ProductPatch) -> RepoResult<Product> {
        // A title change may recompute the slug onto another product
        if let Some(new_slug) = &patch.slug
            && new_slug != slug
            && self.find_by_slug(new_slug).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Product with slug '{}' already exists",
                new_slug
            )));
        }

        // Build dynamic SET clauses; only present fields are written
        let mut set_parts: Vec<&str> = vec!["updatedAt = $updatedAt"];

        if patch.title.is_some() { set_parts.push("title = $title"); }
        if patch.slug.is_some() { set_parts.push("slug = $newSlug"); }
        if patch.description.is_some() { set_parts.push("description = $description"); }
        if patch.price.is_some() { set_parts.push("price = $price"); }
        if patch.promotion_percent.is_some() { set_parts.push("promotionPercent = $promotionPercent"); }
        if patch.quantity.is_some() { set_parts.push("quantity = $quantity"); }
        if patch.sold.is_some() { set_parts.push("sold = $sold"); }
        if patch.category.is_some() { set_parts.push("category = $category"); }
        if patch.colors.is_some() { set_parts.push("colors = $colors"); }
        if patch.sizes.is_some() { set_parts.push("sizes = $sizes"); }
        if patch.media.is_some() { set_parts.push("media = $media"); }
        if patch.image.is_some() { set_parts.push("image = $image"); }
        if patch.pdf.is_some() { set_parts.push("pdf = $pdf"); }
        if patch.video.is_some() { set_parts.push("video = $video"); }

        let sql = format!(
            "UPDATE product SET {} WHERE slug = $slug RETURN AFTER",
            set_parts.join(", ")
        );

        let mut query = self
            .base
            .db()
            .query(sql)
            .bind(("slug", slug.to_string()))
            .bind(("updatedAt", Utc::now()));

        if let Some(v) = patch.title { query = query.bind(("title", v)); }
        if let Some(v) = patch.slug { query = query.bind(("newSlug", v)); }
        if let Some(v) = patch.description { query = query.bind(("description", v)); }
        if let Some(v) = patch.price { query = query.bind(("price", v)); }
        if let Some(v) = patch.promotion_percent { query = query.bind(("promotionPercent", v)); }
        if let Some(v) = patch.quantity { query = query.bind(("quantity", v)); }
        if let Some(v) = patch.sold { query = query.bind(("sold", v)); }
        if let Some(v) = patch.category { query = query.bind(("category", v)); }
        if let Some(v) = patch.colors { query = query.bind(("colors", v)); }
        if let Some(v) = patch.sizes { query = query.bind(("sizes", v)); }
        if let Some(v) = patch.media { query = query.bind(("media", v)); }
        if let Some(v) = patch.image { query = query.bind(("image", v)); }
        if let Some(v) = patch.pdf { query = query.bind(("pdf", v)); }
        if let Some(v) = patch.video { query = query.bind(("video", v)); }

        let mut result = query.await?;
        let products: Vec<Product> = result.take(0)?;
        products
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product '{}' not found", slug)))
    }

    /// Delete by slug, returning the deleted record
    pub async fn delete_by_slug(&self, slug: &str) -> RepoResult<Product> {
        let mut result = self
            .base
            .db()
            .query("DELETE product WHERE slug = $slug RETURN BEFORE")
            .bind(("slug", slug.to_string()))
            .await?;
        let deleted: Vec<Product> = result.take(0)?;
        deleted
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product '{}' not found", slug)))
    }

    /// Execute a built catalog query: one page of products plus the
    /// pagination-independent match count
    pub async fn query(&self, query: &CatalogQuery) -> RepoResult<(Vec<Product>, u64)> {
        let mut result = self
            .base
            .db()
            .query(query.select_sql())
            .bind(query.bindings.clone())
            .await?;
        let products: Vec<Product> = result.take(0)?;

        let mut result = self
            .base
            .db()
            .query(query.count_sql())
            .bind(query.bindings.clone())
            .await?;
        let rows: Vec<CountRow> = result.take(0)?;
        let total = rows.first().map(|r| r.total).unwrap_or(0);

        Ok((products, total))
    }

    /// Top products by recency
    pub async fn new_arrivals(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query(format!(
                "SELECT * FROM product ORDER BY createdAt DESC LIMIT {TOP_LIST_LIMIT}"
            ))
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Top products by units sold
    pub async fn best_sellers(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query(format!(
                "SELECT * FROM product ORDER BY sold DESC LIMIT {TOP_LIST_LIMIT}"
            ))
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Title/slug/variant projection of every product
    pub async fn titles(&self) -> RepoResult<Vec<ProductSummary>> {
        let summaries: Vec<ProductSummary> = self
            .base
            .db()
            .query("SELECT title, slug, sizes, colors FROM product")
            .await?
            .take(0)?;
        Ok(summaries)
    }

    /// Flag one product as product of the year, clearing the flag on all
    /// others in the same request.
    ///
    /// The two statements are not one cross-document transaction, but once
    /// both complete at most one product carries the flag; re-running with
    /// the same slug is idempotent.
    pub async fn set_product_of_the_year(&self, slug: &str) -> RepoResult<Product> {
        if self.find_by_slug(slug).await?.is_none() {
            return Err(RepoError::NotFound(format!("Product '{}' not found", slug)));
        }

        let mut result = self
            .base
            .db()
            .query(
                "UPDATE product SET isProductOfTheYear = false \
                   WHERE isProductOfTheYear = true AND slug != $slug; \
                 UPDATE product SET isProductOfTheYear = true \
                   WHERE slug = $slug RETURN AFTER;",
            )
            .bind(("slug", slug.to_string()))
            .await?;

        let updated: Vec<Product> = result.take(1)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product '{}' not found", slug)))
    }

    /// The currently flagged product, if any
    pub async fn get_product_of_the_year(&self) -> RepoResult<Option<Product>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM product WHERE isProductOfTheYear = true LIMIT 1")
            .await?;
        let products: Vec<Product> = result.take(0)?;
        Ok(products.into_iter().next())
    }
}
