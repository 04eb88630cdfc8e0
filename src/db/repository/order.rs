//! Order Repository

use chrono::Utc;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Order, OrderCreate, OrderStatus};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const ORDER_TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist a new order with the default initial status
    pub async fn create(&self, data: OrderCreate) -> RepoResult<Order> {
        let now = Utc::now();
        let order = Order {
            id: None,
            customer: data.customer,
            items: data.items,
            payment_method: data.payment_method,
            shipping: data.shipping,
            subtotal: data.subtotal,
            total: data.total,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        let created: Option<Order> = self.base.db().create(ORDER_TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let order: Option<Order> = self
            .base
            .db()
            .select((ORDER_TABLE, strip_table_prefix(id)))
            .await?;
        Ok(order)
    }

    /// All orders, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY createdAt DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Set the status field; updating a missing order is a not-found
    /// outcome and writes nothing.
    pub async fn update_status(&self, id: &str, status: OrderStatus) -> RepoResult<Order> {
        let record = surrealdb::RecordId::from_table_key(ORDER_TABLE, strip_table_prefix(id));
        let mut result = self
            .base
            .db()
            .query("UPDATE $order SET status = $status, updatedAt = $updatedAt RETURN AFTER")
            .bind(("order", record))
            .bind(("status", status))
            .bind(("updatedAt", Utc::now()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order '{}' not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let deleted: Option<Order> = self
            .base
            .db()
            .delete((ORDER_TABLE, strip_table_prefix(id)))
            .await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("Order '{}' not found", id)));
        }
        Ok(())
    }
}

/// Ids arrive either as the bare key or as "order:key"
fn strip_table_prefix(id: &str) -> &str {
    id.strip_prefix("order:").unwrap_or(id)
}
