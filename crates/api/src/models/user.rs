//! User model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use inventory_core::{Email, NationalId, UserId};

use super::product::Product;

/// A registered user.
///
/// The stored credential hash is deliberately absent: it is written at the
/// persistence boundary and never read back into API types.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// National id number (CPF).
    pub national_id: NationalId,
    /// Email address, unique across users.
    pub email: Email,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A user together with their linked products.
///
/// This is the shape of the cached "full user list" artifact.
#[derive(Debug, Clone, Serialize)]
pub struct UserWithProducts {
    #[serde(flatten)]
    pub user: User,
    pub products: Vec<Product>,
}
