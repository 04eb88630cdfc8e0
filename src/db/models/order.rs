//! Order Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

use super::serde_helpers;

/// Order lifecycle states
///
/// `Cancelled` is terminal; the other states describe fulfilment progress.
/// Any enumerated value may be written directly; values outside the
/// enumeration are rejected at deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cod,
    Card,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cod
    }
}

/// Customer block, all fields required
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[validate(length(min = 1, message = "fullName must not be empty"))]
    pub full_name: String,
    #[validate(length(min = 1, message = "phone must not be empty"))]
    pub phone: String,
    #[validate(length(min = 1, message = "address must not be empty"))]
    pub address: String,
}

/// One purchased line item
///
/// `product_id` references a product without enforced referential
/// integrity; deleting the product leaves the reference dangling.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[validate(length(min = 1, message = "productId must not be empty"))]
    pub product_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub selected_size: String,
    #[serde(default)]
    pub selected_color: String,
}

fn default_quantity() -> i64 {
    1
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub customer: Customer,
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub shipping: f64,
    pub subtotal: f64,
    pub total: f64,
    #[serde(default)]
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creation payload, validated at the boundary
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    #[validate(nested)]
    pub customer: Customer,
    #[validate(length(min = 1, message = "items must not be empty"), nested)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub shipping: f64,
    pub subtotal: f64,
    pub total: f64,
}

/// Body of PUT /api/order/:id/status
#[derive(Debug, Clone, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_outside_enumeration_is_rejected() {
        let ok: Result<OrderStatusUpdate, _> = serde_json::from_str(r#"{"status":"shipped"}"#);
        assert!(ok.is_ok());
        let bad: Result<OrderStatusUpdate, _> = serde_json::from_str(r#"{"status":"teleported"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn create_defaults_to_cod_and_quantity_one() {
        let payload: OrderCreate = serde_json::from_str(
            r#"{
                "customer": {"fullName": "A B", "phone": "1", "address": "X"},
                "items": [{"productId": "product:p1", "name": "Chair", "price": 10}],
                "subtotal": 10,
                "total": 10
            }"#,
        )
        .unwrap();
        assert_eq!(payload.payment_method, PaymentMethod::Cod);
        assert_eq!(payload.items[0].quantity, 1);
        assert_eq!(payload.shipping, 0.0);
    }

    #[test]
    fn create_rejects_empty_customer_fields_and_items() {
        use validator::Validate;

        let payload: OrderCreate = serde_json::from_str(
            r#"{
                "customer": {"fullName": "", "phone": "1", "address": "X"},
                "items": [],
                "subtotal": 0,
                "total": 0
            }"#,
        )
        .unwrap();
        let err = payload.validate().unwrap_err();
        let rendered = err.to_string();
        assert!(rendered.contains("fullName") || rendered.contains("customer"));
        assert!(rendered.contains("items"));
    }
}
