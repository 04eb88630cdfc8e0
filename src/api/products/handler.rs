//! Product API Handlers

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::form::ProductForm;
use crate::catalog::{ListRequest, reconcile_media, slugify, total_pages};
use crate::core::ServerState;
use crate::db::models::{MediaItem, Product, ProductPatch, ProductSummary};
use crate::db::repository::ProductRepository;
use crate::media::{MediaStore, UploadKind};
use crate::utils::{AppError, AppResult};

/// Paginated listing envelope
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListResponse {
    pub products: Vec<Product>,
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u64,
}

#[derive(Debug, Serialize)]
pub struct DeletedProductResponse {
    pub message: String,
    pub product: Product,
}

// =============================================================================
// Mutations
// =============================================================================

/// POST /api/product/create - create a product from a multipart form
pub async fn create(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> AppResult<Json<Product>> {
    let form = ProductForm::from_multipart(&mut multipart).await?;

    let title = form.require_text("title")?.to_string();
    let slug = slugify(&title);
    if slug.is_empty() {
        return Err(AppError::validation("title must contain letters or digits"));
    }

    let colors = form.json_field("colors")?.unwrap_or_default();
    let sizes = form.json_field("sizes")?.unwrap_or_default();

    let media = save_media_files(&state.media, &form).await?;
    let image = save_single(&state.media, UploadKind::Image, form.image_file.as_ref()).await?;
    let pdf = save_single(&state.media, UploadKind::Pdf, form.pdf.as_ref()).await?;
    let video = save_single(&state.media, UploadKind::Video, form.video.as_ref()).await?;

    let now = Utc::now();
    let product = Product {
        id: None,
        title,
        slug,
        description: form.text("description").unwrap_or_default().to_string(),
        price: form.f64_field("price")?.unwrap_or(0.0),
        promotion_percent: form.f64_field("promotionPercent")?.unwrap_or(0.0),
        quantity: form.i64_field("quantity")?.unwrap_or(0),
        sold: 0,
        is_product_of_the_year: false,
        image: image.unwrap_or_default(),
        pdf: pdf.unwrap_or_default(),
        video: video.unwrap_or_default(),
        media,
        colors,
        sizes,
        category: form.text("category").unwrap_or_default().to_string(),
        created_at: now,
        updated_at: now,
    };

    let repo = ProductRepository::new(state.db.clone());
    let created = repo.create(product).await?;

    tracing::info!(slug = %created.slug, "Product created");
    Ok(Json(created))
}

/// PUT /api/product/update/:slug - update a product from a multipart form
///
/// Media reconciliation always runs: entries whose id is missing from
/// `existingMediaIds` are removed and their files scheduled for deletion;
/// new uploads are appended to the kept set. A new primary image, pdf or
/// video replaces the prior file. File cleanup is dispatched only after
/// the document write succeeds and can never fail the request.
pub async fn update(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
    mut multipart: Multipart,
) -> AppResult<Json<Product>> {
    let form = ProductForm::from_multipart(&mut multipart).await?;
    let updated = apply_update(&state, &slug, form).await?;

    tracing::info!(slug = %slug, "Product updated");
    Ok(Json(updated))
}

async fn apply_update(state: &ServerState, slug: &str, form: ProductForm) -> AppResult<Product> {
    let repo = ProductRepository::new(state.db.clone());
    let existing = repo
        .find_by_slug(slug)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;

    let keep_ids: Vec<String> = form.json_field("existingMediaIds")?.unwrap_or_default();
    let (kept, removed) = reconcile_media(existing.media.clone(), &keep_ids);
    let mut cleanup: Vec<String> = removed.into_iter().map(|m| m.src).collect();

    let mut media = kept;
    media.extend(save_media_files(&state.media, &form).await?);

    let mut patch = ProductPatch {
        media: Some(media),
        description: form.text("description").map(str::to_string),
        price: form.f64_field("price")?,
        promotion_percent: form.f64_field("promotionPercent")?,
        quantity: form.i64_field("quantity")?,
        category: form.text("category").map(str::to_string),
        colors: form.json_field("colors")?,
        sizes: form.json_field("sizes")?,
        ..Default::default()
    };

    if let Some(title) = form.text("title") {
        let new_slug = slugify(title);
        if new_slug.is_empty() {
            return Err(AppError::validation("title must contain letters or digits"));
        }
        patch.title = Some(title.to_string());
        patch.slug = Some(new_slug);
    }

    if let Some(src) = save_single(&state.media, UploadKind::Image, form.image_file.as_ref()).await? {
        if !existing.image.is_empty() {
            cleanup.push(existing.image.clone());
        }
        patch.image = Some(src);
    }
    if let Some(src) = save_single(&state.media, UploadKind::Pdf, form.pdf.as_ref()).await? {
        if !existing.pdf.is_empty() {
            cleanup.push(existing.pdf.clone());
        }
        patch.pdf = Some(src);
    }
    if let Some(src) = save_single(&state.media, UploadKind::Video, form.video.as_ref()).await? {
        if !existing.video.is_empty() {
            cleanup.push(existing.video.clone());
        }
        patch.video = Some(src);
    }

    let updated = repo.update_by_slug(slug, patch).await?;

    // Fire-and-forget cleanup once the authoritative write is done
    if !cleanup.is_empty() {
        let store = state.media.clone();
        tokio::spawn(async move {
            for path in cleanup {
                store.delete(&path).await;
            }
        });
    }

    Ok(updated)
}

/// DELETE /api/product/:slug - delete a product
///
/// Attached media files and referencing orders are left alone.
pub async fn remove(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DeletedProductResponse>> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo.delete_by_slug(&slug).await?;

    tracing::info!(slug = %slug, "Product deleted");
    Ok(Json(DeletedProductResponse {
        message: "Deleted successfully".to_string(),
        product,
    }))
}

// =============================================================================
// Reads and listings
// =============================================================================

/// GET /api/product/:slug - read a single product
pub async fn read(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;
    Ok(Json(product))
}

/// POST /api/products - filtered, sorted, paginated listing
pub async fn list(
    State(state): State<ServerState>,
    Json(request): Json<ListRequest>,
) -> AppResult<Json<ProductListResponse>> {
    run_listing(&state, request).await
}

/// Body of POST /api/products/search
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub page: Option<Value>,
    #[serde(default)]
    pub items_per_page: Option<Value>,
}

/// POST /api/products/search - case-insensitive title/description match
///
/// An empty query matches everything, same as an unfiltered listing.
pub async fn search(
    State(state): State<ServerState>,
    Json(request): Json<SearchRequest>,
) -> AppResult<Json<ProductListResponse>> {
    run_listing(
        &state,
        ListRequest {
            page: request.page,
            items_per_page: request.items_per_page,
            search_text: request.query,
            ..Default::default()
        },
    )
    .await
}

/// Query string of GET /api/category/:category
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryParams {
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub items_per_page: Option<String>,
}

/// GET /api/category/:category - paginated category listing
pub async fn list_by_category(
    State(state): State<ServerState>,
    Path(category): Path<String>,
    Query(params): Query<CategoryParams>,
) -> AppResult<Json<ProductListResponse>> {
    let mut filters = BTreeMap::new();
    filters.insert("category".to_string(), Value::Array(vec![Value::String(category)]));

    run_listing(
        &state,
        ListRequest {
            page: params.page.map(Value::String),
            items_per_page: params.items_per_page.map(Value::String),
            filters: Some(filters),
            sort: params.sort,
            ..Default::default()
        },
    )
    .await
}

/// GET /api/products/new-arrivals - top 5 by creation time
pub async fn new_arrivals(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.db.clone());
    Ok(Json(repo.new_arrivals().await?))
}

/// GET /api/products/best-sellers - top 5 by units sold
pub async fn best_sellers(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.db.clone());
    Ok(Json(repo.best_sellers().await?))
}

/// GET /api/titles - all products' title/slug/sizes/colors
pub async fn titles(State(state): State<ServerState>) -> AppResult<Json<Vec<ProductSummary>>> {
    let repo = ProductRepository::new(state.db.clone());
    Ok(Json(repo.titles().await?))
}

// =============================================================================
// Product of the year
// =============================================================================

/// PUT /api/product/specialOffre/:slug - flag one product, unflag the rest
pub async fn set_product_of_the_year(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo.set_product_of_the_year(&slug).await?;

    tracing::info!(slug = %slug, "Product of the year set");
    Ok(Json(product))
}

/// GET /api/getProductOfTheYear - the currently flagged product
pub async fn get_product_of_the_year(
    State(state): State<ServerState>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo
        .get_product_of_the_year()
        .await?
        .ok_or_else(|| AppError::not_found("Product of the year"))?;
    Ok(Json(product))
}

// =============================================================================
// Helpers
// =============================================================================

async fn run_listing(
    state: &ServerState,
    request: ListRequest,
) -> AppResult<Json<ProductListResponse>> {
    let query = request.build();
    let repo = ProductRepository::new(state.db.clone());
    let (products, total) = repo.query(&query).await?;

    Ok(Json(ProductListResponse {
        products,
        total,
        total_pages: total_pages(total, query.items_per_page),
        current_page: query.page,
    }))
}

/// Persist every generic media upload, assigning each a stable id
async fn save_media_files(store: &MediaStore, form: &ProductForm) -> AppResult<Vec<MediaItem>> {
    let mut media = Vec::with_capacity(form.media_files.len());
    for upload in &form.media_files {
        let src = store
            .save(UploadKind::Media, &upload.original_name, &upload.bytes)
            .await?;
        media.push(MediaItem {
            id: Uuid::new_v4().to_string(),
            src,
            kind: MediaStore::classify(upload.content_type.as_deref(), &upload.original_name),
            alt: upload.original_name.clone(),
        });
    }
    Ok(media)
}

/// Persist a single optional upload, returning its public path
async fn save_single(
    store: &MediaStore,
    kind: UploadKind,
    upload: Option<&super::form::RawUpload>,
) -> AppResult<Option<String>> {
    match upload {
        Some(up) => Ok(Some(store.save(kind, &up.original_name, &up.bytes).await?)),
        None => Ok(None),
    }
}
