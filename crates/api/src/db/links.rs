//! User-product link repository (the Relation Manager's store access).

use sqlx::PgPool;

use inventory_core::{LinkId, ProductId, UserId};

use super::RepositoryError;
use crate::models::link::LinkRow;
use crate::models::product::Product;
use crate::models::user::User;

const LINK_ROW_SELECT: &str = "SELECT up.id, up.user_id, up.product_id,
            u.name AS user_name, u.email AS user_email,
            p.name AS product_name, p.price AS product_price,
            up.created_at
     FROM user_product up
     JOIN users u ON u.id = up.user_id
     JOIN products p ON p.id = up.product_id";

/// Repository for user-product link operations.
pub struct LinkRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LinkRepository<'a> {
    /// Create a new link repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all links joined with user/product display fields, in insertion
    /// order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<LinkRow>, RepositoryError> {
        let links = sqlx::query_as::<_, LinkRow>(&format!("{LINK_ROW_SELECT} ORDER BY up.id"))
            .fetch_all(self.pool)
            .await?;

        Ok(links)
    }

    /// Get one link joined with display fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: LinkId) -> Result<Option<LinkRow>, RepositoryError> {
        let link = sqlx::query_as::<_, LinkRow>(&format!("{LINK_ROW_SELECT} WHERE up.id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(link)
    }

    /// Create a link between a user and a product.
    ///
    /// Referential existence is the caller's pre-check; the pivot's unique
    /// constraint is the last line of defense against racing duplicates.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the pair already exists and
    /// `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<LinkId, RepositoryError> {
        let id = sqlx::query_scalar::<_, LinkId>(
            "INSERT INTO user_product (user_id, product_id) VALUES ($1, $2) RETURNING id",
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            RepositoryError::from_unique_violation(e, "user is already linked to this product")
        })?;

        Ok(id)
    }

    /// Delete a link by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the link does not exist and
    /// `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: LinkId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM user_product WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Whether a link already exists for this (user, product) pair.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn pair_exists(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM user_product WHERE user_id = $1 AND product_id = $2)",
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    /// Number of links anchored on a user. The user-deletion guard.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_for_user(&self, user_id: UserId) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM user_product WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Products linked to a user, via an explicit pivot join.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn products_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT p.id, p.name, p.price, p.description, p.created_at, p.updated_at
             FROM user_product up
             JOIN products p ON p.id = up.product_id
             WHERE up.user_id = $1",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Users linked to a product, via an explicit pivot join.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn users_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<User>, RepositoryError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT u.id, u.name, u.national_id, u.email, u.created_at, u.updated_at
             FROM user_product up
             JOIN users u ON u.id = up.user_id
             WHERE up.product_id = $1",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }
}
