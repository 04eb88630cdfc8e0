//! Order repository integration tests against an embedded RocksDB store

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use storefront_server::db;
use storefront_server::db::models::{Customer, OrderCreate, OrderItem, OrderStatus, PaymentMethod};
use storefront_server::db::repository::{OrderRepository, RepoError};

async fn open_db(tmp: &tempfile::TempDir) -> Surreal<Db> {
    db::connect(tmp.path()).await.unwrap()
}

fn order_payload(name: &str) -> OrderCreate {
    OrderCreate {
        customer: Customer {
            full_name: name.to_string(),
            phone: "0600000000".to_string(),
            address: "1 Main St".to_string(),
        },
        items: vec![OrderItem {
            product_id: "product:p1".to_string(),
            name: "Oak Table".to_string(),
            price: 120.0,
            quantity: 2,
            image: String::new(),
            selected_size: "L".to_string(),
            selected_color: "#000".to_string(),
        }],
        payment_method: PaymentMethod::Cod,
        shipping: 10.0,
        subtotal: 240.0,
        total: 250.0,
    }
}

fn key_of(order: &storefront_server::db::models::Order) -> String {
    order.id.as_ref().unwrap().key().to_string()
}

#[tokio::test]
async fn create_starts_pending_and_reads_back() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = OrderRepository::new(open_db(&tmp).await);

    let created = repo.create(order_payload("Alice")).await.unwrap();
    assert_eq!(created.status, OrderStatus::Pending);
    assert!(created.id.is_some());

    let found = repo.find_by_id(&key_of(&created)).await.unwrap().unwrap();
    assert_eq!(found.customer.full_name, "Alice");
    assert_eq!(found.items[0].quantity, 2);
    assert_eq!(found.total, 250.0);
}

#[tokio::test]
async fn find_accepts_table_prefixed_ids() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = OrderRepository::new(open_db(&tmp).await);

    let created = repo.create(order_payload("Bob")).await.unwrap();
    let prefixed = format!("order:{}", key_of(&created));

    let found = repo.find_by_id(&prefixed).await.unwrap();
    assert!(found.is_some());
}

#[tokio::test]
async fn list_returns_newest_first() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = OrderRepository::new(open_db(&tmp).await);

    repo.create(order_payload("First")).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    repo.create(order_payload("Second")).await.unwrap();

    let orders = repo.find_all().await.unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].customer.full_name, "Second");
    assert!(orders[0].created_at >= orders[1].created_at);
}

#[tokio::test]
async fn update_status_writes_and_bumps_updated_at() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = OrderRepository::new(open_db(&tmp).await);

    let created = repo.create(order_payload("Carol")).await.unwrap();
    let updated = repo
        .update_status(&key_of(&created), OrderStatus::Shipped)
        .await
        .unwrap();
    assert_eq!(updated.status, OrderStatus::Shipped);
    assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
async fn update_status_of_missing_order_is_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = OrderRepository::new(open_db(&tmp).await);

    let err = repo
        .update_status("nope", OrderStatus::Confirmed)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[tokio::test]
async fn delete_removes_the_order() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = OrderRepository::new(open_db(&tmp).await);

    let created = repo.create(order_payload("Dave")).await.unwrap();
    let key = key_of(&created);

    repo.delete(&key).await.unwrap();
    assert!(repo.find_by_id(&key).await.unwrap().is_none());

    let err = repo.delete(&key).await.unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}
