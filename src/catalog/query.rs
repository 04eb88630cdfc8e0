//! Catalog Query Builder
//!
//! Translates a client-supplied filter/sort/pagination request into a
//! SurrealQL query plus bound parameters. Filter values are always bound,
//! never interpolated; unknown or malformed filter structures degrade to
//! "no constraint" instead of failing the request.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

/// Default page size when the client sends an invalid or missing value
pub const DEFAULT_ITEMS_PER_PAGE: u64 = 12;

/// Listing request as it arrives on the wire
///
/// `page` and `itemsPerPage` are accepted as numbers or numeric strings;
/// anything else normalizes to the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequest {
    #[serde(default)]
    pub page: Option<Value>,
    #[serde(default)]
    pub items_per_page: Option<Value>,
    /// Filter key -> list of accepted values, or [min, max] for priceRange
    #[serde(default)]
    pub filters: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    pub sort: Option<String>,
    /// Free-text search against title and description
    #[serde(default)]
    pub search_text: Option<String>,
}

/// A built query: WHERE/ORDER fragments plus parameter bindings
#[derive(Debug, Clone)]
pub struct CatalogQuery {
    /// Empty string or "WHERE ..."
    pub where_clause: String,
    pub bindings: BTreeMap<String, Value>,
    pub order_clause: &'static str,
    pub page: u64,
    pub items_per_page: u64,
}

impl ListRequest {
    /// Build the storage query for this request
    pub fn build(&self) -> CatalogQuery {
        let mut clauses: Vec<String> = Vec::new();
        let mut bindings: BTreeMap<String, Value> = BTreeMap::new();

        if let Some(filters) = &self.filters {
            push_filter_clauses(filters, &mut clauses, &mut bindings);
        }

        if let Some(text) = &self.search_text {
            let needle = text.trim().to_lowercase();
            if !needle.is_empty() {
                clauses.push(
                    "(string::lowercase(title) CONTAINS $search \
                     OR string::lowercase(description) CONTAINS $search)"
                        .to_string(),
                );
                bindings.insert("search".to_string(), Value::String(needle));
            }
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };

        CatalogQuery {
            where_clause,
            bindings,
            order_clause: sort_clause(self.sort.as_deref()),
            page: normalize_page(self.page.as_ref()),
            items_per_page: normalize_items_per_page(self.items_per_page.as_ref()),
        }
    }
}

impl CatalogQuery {
    pub fn start(&self) -> u64 {
        // page is client-controlled; saturate instead of overflowing
        self.page.saturating_mul(self.items_per_page)
    }

    /// Paginated SELECT over the product table
    pub fn select_sql(&self) -> String {
        format!(
            "SELECT * FROM product {} ORDER BY {} LIMIT {} START {}",
            self.where_clause,
            self.order_clause,
            self.items_per_page,
            self.start()
        )
    }

    /// Count of all documents matching the filter, independent of pagination
    pub fn count_sql(&self) -> String {
        format!(
            "SELECT count() AS total FROM product {} GROUP ALL",
            self.where_clause
        )
    }
}

/// `totalPages = ceil(total / itemsPerPage)`
pub fn total_pages(total: u64, items_per_page: u64) -> u64 {
    total.div_ceil(items_per_page.max(1))
}

/// Closed sort enumeration; anything unrecognized sorts by recency
fn sort_clause(sort: Option<&str>) -> &'static str {
    match sort {
        Some("best") => "sold DESC",
        Some("Price: Low to High") => "price ASC",
        Some("Price: High to Low") => "price DESC",
        _ => "createdAt DESC",
    }
}

/// Zero-based page; non-numeric or negative values normalize to 0
fn normalize_page(value: Option<&Value>) -> u64 {
    value.and_then(value_as_u64).unwrap_or(0)
}

/// Positive page size; invalid values normalize to the default
fn normalize_items_per_page(value: Option<&Value>) -> u64 {
    match value.and_then(value_as_u64) {
        Some(n) if n > 0 => n,
        _ => DEFAULT_ITEMS_PER_PAGE,
    }
}

fn value_as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_i64().filter(|v| *v >= 0).map(|v| v as u64),
        Value::String(s) => s.trim().parse::<i64>().ok().filter(|v| *v >= 0).map(|v| v as u64),
        _ => None,
    }
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Map a client filter key to its storage field and membership operator.
///
/// `colors.value` is an array projection, so membership runs through
/// ANYINSIDE; scalar fields use INSIDE. Unmapped keys pass through by name
/// when they form a safe identifier.
fn storage_field(key: &str) -> Option<(String, &'static str)> {
    match key {
        "category" => Some(("category".to_string(), "INSIDE")),
        "color" => Some(("colors.value".to_string(), "ANYINSIDE")),
        "brand" => Some(("brand".to_string(), "INSIDE")),
        "size" => Some(("size".to_string(), "INSIDE")),
        other if other.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') && !other.is_empty() => {
            Some((other.to_string(), "INSIDE"))
        }
        _ => None,
    }
}

fn push_filter_clauses(
    filters: &BTreeMap<String, Value>,
    clauses: &mut Vec<String>,
    bindings: &mut BTreeMap<String, Value>,
) {
    let mut param_idx = 0usize;

    for (key, value) in filters {
        if key == "priceRange" {
            // Exactly two numeric elements form an inclusive range; any
            // other arity or shape is ignored.
            if let Value::Array(range) = value
                && range.len() == 2
                && let (Some(min), Some(max)) = (value_as_f64(&range[0]), value_as_f64(&range[1]))
            {
                clauses.push("price >= $priceMin AND price <= $priceMax".to_string());
                bindings.insert("priceMin".to_string(), Value::from(min));
                bindings.insert("priceMax".to_string(), Value::from(max));
            }
            continue;
        }

        let Some((field, op)) = storage_field(key) else {
            continue;
        };

        // Empty-valued filters apply no constraint
        let Value::Array(values) = value else {
            continue;
        };
        if values.is_empty() {
            continue;
        }

        let param = format!("f{}", param_idx);
        param_idx += 1;
        clauses.push(format!("{} {} ${}", field, op, param));
        bindings.insert(param, Value::Array(values.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: serde_json::Value) -> ListRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn defaults_when_empty() {
        let q = ListRequest::default().build();
        assert_eq!(q.where_clause, "");
        assert_eq!(q.order_clause, "createdAt DESC");
        assert_eq!(q.page, 0);
        assert_eq!(q.items_per_page, DEFAULT_ITEMS_PER_PAGE);
        assert_eq!(q.start(), 0);
    }

    #[test]
    fn page_normalization() {
        let q = request(json!({"page": 3, "itemsPerPage": 20})).build();
        assert_eq!((q.page, q.items_per_page, q.start()), (3, 20, 60));

        // numeric strings are accepted
        let q = request(json!({"page": "2", "itemsPerPage": "5"})).build();
        assert_eq!((q.page, q.items_per_page), (2, 5));

        // negative and garbage normalize to defaults
        let q = request(json!({"page": -4, "itemsPerPage": "lots"})).build();
        assert_eq!((q.page, q.items_per_page), (0, DEFAULT_ITEMS_PER_PAGE));

        // zero items per page is invalid
        let q = request(json!({"itemsPerPage": 0})).build();
        assert_eq!(q.items_per_page, DEFAULT_ITEMS_PER_PAGE);
    }

    #[test]
    fn huge_page_saturates_instead_of_overflowing() {
        let q = request(json!({"page": i64::MAX, "itemsPerPage": 12})).build();
        assert_eq!(q.start(), u64::MAX);
        assert!(q.select_sql().contains(&format!("START {}", u64::MAX)));
    }

    #[test]
    fn sort_mapping_is_a_closed_enumeration() {
        assert_eq!(request(json!({"sort": "best"})).build().order_clause, "sold DESC");
        assert_eq!(
            request(json!({"sort": "Price: Low to High"})).build().order_clause,
            "price ASC"
        );
        assert_eq!(
            request(json!({"sort": "Price: High to Low"})).build().order_clause,
            "price DESC"
        );
        assert_eq!(request(json!({"sort": "new"})).build().order_clause, "createdAt DESC");
        assert_eq!(request(json!({"sort": "wat"})).build().order_clause, "createdAt DESC");
    }

    #[test]
    fn known_filters_map_to_storage_fields() {
        let q = request(json!({
            "filters": {
                "category": ["Shoes"],
                "color": ["#fff", "#000"]
            }
        }))
        .build();
        assert_eq!(
            q.where_clause,
            "WHERE category INSIDE $f0 AND colors.value ANYINSIDE $f1"
        );
        assert_eq!(q.bindings["f0"], json!(["Shoes"]));
        assert_eq!(q.bindings["f1"], json!(["#fff", "#000"]));
    }

    #[test]
    fn price_range_requires_exactly_two_numeric_elements() {
        let q = request(json!({"filters": {"priceRange": [10, 50]}})).build();
        assert_eq!(q.where_clause, "WHERE price >= $priceMin AND price <= $priceMax");
        assert_eq!(q.bindings["priceMin"], json!(10.0));
        assert_eq!(q.bindings["priceMax"], json!(50.0));

        // wrong arity is ignored
        let q = request(json!({"filters": {"priceRange": [10]}})).build();
        assert_eq!(q.where_clause, "");
        let q = request(json!({"filters": {"priceRange": [1, 2, 3]}})).build();
        assert_eq!(q.where_clause, "");

        // non-numeric bounds are ignored
        let q = request(json!({"filters": {"priceRange": ["cheap", "expensive"]}})).build();
        assert_eq!(q.where_clause, "");
    }

    #[test]
    fn empty_and_malformed_filters_apply_no_constraint() {
        let q = request(json!({
            "filters": {
                "category": [],
                "brand": "not-a-list",
                "weird key!": ["x"]
            }
        }))
        .build();
        assert_eq!(q.where_clause, "");
        assert!(q.bindings.is_empty());
    }

    #[test]
    fn unmapped_safe_keys_pass_through_by_name() {
        let q = request(json!({"filters": {"material": ["wood"]}})).build();
        assert_eq!(q.where_clause, "WHERE material INSIDE $f0");
    }

    #[test]
    fn empty_search_matches_everything() {
        let q = request(json!({"searchText": "   "})).build();
        assert_eq!(q.where_clause, "");

        let q = request(json!({"searchText": "OAK table"})).build();
        assert!(q.where_clause.contains("string::lowercase(title) CONTAINS $search"));
        assert_eq!(q.bindings["search"], json!("oak table"));
    }

    #[test]
    fn total_pages_is_ceiling_division() {
        assert_eq!(total_pages(0, 12), 0);
        assert_eq!(total_pages(1, 12), 1);
        assert_eq!(total_pages(12, 12), 1);
        assert_eq!(total_pages(13, 12), 2);
        assert_eq!(total_pages(24, 12), 2);
    }
}
