//! Product model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use inventory_core::{Price, ProductId};

/// A product.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Non-negative price with two fractional digits.
    pub price: Price,
    /// Optional free-text description.
    pub description: Option<String>,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}
