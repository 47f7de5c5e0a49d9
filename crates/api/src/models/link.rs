//! User-product link models.

use chrono::{DateTime, Utc};
use serde::Serialize;

use inventory_core::{Email, LinkId, Price, ProductId, UserId};

use super::product::Product;
use super::user::User;

/// A pivot row joined with display fields from both endpoints.
///
/// This is what link listings and link creation return, so the front end can
/// render a row without two extra lookups.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct LinkRow {
    /// Unique link ID.
    pub id: LinkId,
    /// Linked user.
    pub user_id: UserId,
    /// Linked product.
    pub product_id: ProductId,
    /// User display name.
    pub user_name: String,
    /// User email.
    pub user_email: Email,
    /// Product display name.
    pub product_name: String,
    /// Product price at display time.
    pub product_price: Price,
    /// When the link was created.
    pub created_at: DateTime<Utc>,
}

/// A user together with the products linked to them.
#[derive(Debug, Clone, Serialize)]
pub struct UserProducts {
    pub user: User,
    pub products: Vec<Product>,
}

/// A product together with the users linked to it.
#[derive(Debug, Clone, Serialize)]
pub struct ProductUsers {
    pub product: Product,
    pub users: Vec<User>,
}
