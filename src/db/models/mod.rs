//! Data model definitions shared by repositories and API handlers

pub mod order;
pub mod product;
pub mod serde_helpers;

pub use order::{Customer, Order, OrderCreate, OrderItem, OrderStatus, OrderStatusUpdate, PaymentMethod};
pub use product::{ColorOption, MediaItem, MediaKind, Product, ProductPatch, ProductSummary, SizeOption};
