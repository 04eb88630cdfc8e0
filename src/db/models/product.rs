//! Product Model
//!
//! Wire format is camelCase; stored field names follow the wire names so
//! query clauses and API filters address the same fields.

use serde::{Deserialize, Deserializer, Serialize};
use chrono::{DateTime, Utc};
use surrealdb::RecordId;

use super::serde_helpers;

/// Media attachment kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// One entry of a product's media list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaItem {
    /// Stable id used by clients to reference the entry on update
    pub id: String,
    /// Relative storage path, e.g. "/uploads/media/abc-photo.jpg"
    pub src: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    /// Original filename, used as alt text
    #[serde(default)]
    pub alt: String,
}

/// Color variant: display name + value (e.g. hex code)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorOption {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// Size variant with its own price
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeOption {
    #[serde(default)]
    pub name: String,
    /// Clients send this as a number or a numeric string; anything
    /// unparseable normalizes to 0.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: f64,
}

/// Coerce number | numeric string | null to f64, defaulting to 0
fn lenient_f64<'de, D>(d: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(d)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub title: String,
    /// URL-safe unique identifier derived from title
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    /// Promotion percentage (e.g. 15 = 15% off)
    #[serde(default)]
    pub promotion_percent: f64,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub sold: i64,
    /// At most one product carries this flag; see ProductRepository
    #[serde(default)]
    pub is_product_of_the_year: bool,
    /// Primary image relative path ("" when absent)
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub pdf: String,
    #[serde(default)]
    pub video: String,
    #[serde(default)]
    pub media: Vec<MediaItem>,
    #[serde(default)]
    pub colors: Vec<ColorOption>,
    #[serde(default)]
    pub sizes: Vec<SizeOption>,
    #[serde(default)]
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update applied to a stored product
///
/// `None` fields are left untouched; `media` always carries the full
/// reconciled list when present.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub promotion_percent: Option<f64>,
    pub quantity: Option<i64>,
    pub sold: Option<i64>,
    pub category: Option<String>,
    pub colors: Option<Vec<ColorOption>>,
    pub sizes: Option<Vec<SizeOption>>,
    pub media: Option<Vec<MediaItem>>,
    pub image: Option<String>,
    pub pdf: Option<String>,
    pub video: Option<String>,
}

/// Projection returned by GET /api/titles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSummary {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub sizes: Vec<SizeOption>,
    #[serde(default)]
    pub colors: Vec<ColorOption>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_price_accepts_numbers_and_numeric_strings() {
        let sizes: Vec<SizeOption> = serde_json::from_str(
            r#"[{"name":"S","price":10},{"name":"M","price":"12.5"},{"name":"L","price":"n/a"},{"name":"XL"}]"#,
        )
        .unwrap();
        assert_eq!(sizes[0].price, 10.0);
        assert_eq!(sizes[1].price, 12.5);
        assert_eq!(sizes[2].price, 0.0);
        assert_eq!(sizes[3].price, 0.0);
    }

    #[test]
    fn media_kind_uses_wire_name_type() {
        let item: MediaItem =
            serde_json::from_str(r#"{"id":"m1","src":"/uploads/media/a.jpg","type":"image","alt":"a"}"#)
                .unwrap();
        assert_eq!(item.kind, MediaKind::Image);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "image");
    }
}
