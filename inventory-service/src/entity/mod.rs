//! Domain entities
//!
//! Plain records shared by the repository and service layers. Every entity
//! embeds [`Base`] by value: identifier, timestamps, and the soft-delete
//! marker. An id of 0 means "not yet persisted".

mod status;

pub use status::ReservationStatus;

use chrono::{DateTime, Utc};

/// Fields common to every persisted entity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Base {
    /// Server-assigned identifier; 0 until persisted
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker; `None` means the row is live
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A catalogue product with available stock
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Product {
    pub base: Base,
    /// Unique business key
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub stock: i32,
    pub price: f64,
}

/// A stock reservation against a product, tied to an order
///
/// Reservations are an audit-relevant ledger: they are never deleted, only
/// moved through the status state machine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reservation {
    pub base: Base,
    pub product_id: i64,
    pub order_id: i64,
    pub quantity: i32,
    pub status: ReservationStatus,
    /// Eagerly-loaded product association; read-only, never written back
    pub product: Option<Product>,
}
