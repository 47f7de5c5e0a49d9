//! Report Engine: three read-only aggregate views over the store.
//!
//! Each report is a pure function of current data; nothing here touches the
//! List Cache.

use rust_decimal::Decimal;
use sqlx::PgPool;

use super::RepositoryError;
use crate::models::report::{PriceBandCount, UserMaxPriceRow, UserProductCountRow, count_by_band};

/// Repository for the aggregate reports.
pub struct ReportRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReportRepository<'a> {
    /// Create a new report repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every user ranked by linked-product count, descending.
    ///
    /// Left-join semantics: users with zero products appear with a count of
    /// zero. Ties are broken by user id so a given snapshot always ranks the
    /// same way.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn users_ranked_by_product_count(
        &self,
    ) -> Result<Vec<UserProductCountRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserProductCountRow>(
            "SELECT u.id AS user_id, u.name, u.email,
                    COUNT(up.product_id) AS total_products
             FROM users u
             LEFT JOIN user_product up ON u.id = up.user_id
             GROUP BY u.id, u.name, u.email
             ORDER BY total_products DESC, u.id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// For each user with at least one product, the product(s) at that
    /// user's maximum price, descending by price.
    ///
    /// Inner-join semantics: users without products are excluded. A price
    /// tie at a user's maximum emits one row per tied product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn most_expensive_product_per_user(
        &self,
    ) -> Result<Vec<UserMaxPriceRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserMaxPriceRow>(
            "SELECT u.id AS user_id, u.name AS user_name,
                    p.id AS product_id, p.name AS product_name, p.price
             FROM users u
             JOIN user_product up ON u.id = up.user_id
             JOIN products p ON up.product_id = p.id
             JOIN (
                 SELECT up2.user_id, MAX(p2.price) AS max_price
                 FROM user_product up2
                 JOIN products p2 ON up2.product_id = p2.id
                 GROUP BY up2.user_id
             ) max_prices
               ON u.id = max_prices.user_id AND p.price = max_prices.max_price
             ORDER BY p.price DESC, u.id, p.id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Product counts per fixed price band, empty bands omitted.
    ///
    /// Prices are fetched raw and partitioned by [`count_by_band`], keeping
    /// the bucketing logic in one testable place.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn product_count_by_price_band(
        &self,
    ) -> Result<Vec<PriceBandCount>, RepositoryError> {
        let prices = sqlx::query_scalar::<_, Decimal>("SELECT price FROM products")
            .fetch_all(self.pool)
            .await?;

        Ok(count_by_band(prices))
    }
}
