//! Product API module
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/product/create | POST | create (multipart) |
//! | /api/product/update/:slug | PUT | update (multipart) |
//! | /api/product/:slug | GET / DELETE | read / delete by slug |
//! | /api/products | POST | filtered, paginated listing |
//! | /api/products/search | POST | free-text search |
//! | /api/products/new-arrivals | GET | top 5 by recency |
//! | /api/products/best-sellers | GET | top 5 by units sold |
//! | /api/category/:category | GET | category listing |
//! | /api/titles | GET | title/slug/variant projection |
//! | /api/product/specialOffre/:slug | PUT | set product of the year |
//! | /api/getProductOfTheYear | GET | read product of the year |
//! | /api/specialOffre/:slug | GET | read by slug |

mod form;
mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/product/create", post(handler::create))
        .route("/api/product/update/{slug}", put(handler::update))
        .route(
            "/api/product/{slug}",
            get(handler::read).delete(handler::remove),
        )
        .route("/api/products", post(handler::list))
        .route("/api/products/search", post(handler::search))
        .route("/api/products/new-arrivals", get(handler::new_arrivals))
        .route("/api/products/best-sellers", get(handler::best_sellers))
        .route("/api/category/{category}", get(handler::list_by_category))
        .route("/api/titles", get(handler::titles))
        .route(
            "/api/product/specialOffre/{slug}",
            put(handler::set_product_of_the_year),
        )
        .route(
            "/api/getProductOfTheYear",
            get(handler::get_product_of_the_year),
        )
        .route("/api/specialOffre/{slug}", get(handler::read))
}
