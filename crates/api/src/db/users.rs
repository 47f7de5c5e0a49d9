//! User repository.

use std::collections::HashMap;

use sqlx::PgPool;

use inventory_core::{Email, NationalId, UserId};

use super::RepositoryError;
use crate::models::product::Product;
use crate::models::user::{User, UserWithProducts};

const USER_COLUMNS: &str = "id, name, national_id, email, created_at, updated_at";

/// Fields for creating a user. The credential arrives already hashed.
pub struct NewUser {
    pub name: String,
    pub national_id: NationalId,
    pub email: Email,
    pub password_hash: String,
}

/// Partial update; `None` fields are left untouched.
#[derive(Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub national_id: Option<NationalId>,
    pub email: Option<Email>,
    pub password_hash: Option<String>,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Get a user by ID together with their linked products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_with_products(
        &self,
        id: UserId,
    ) -> Result<Option<UserWithProducts>, RepositoryError> {
        let Some(user) = self.get(id).await? else {
            return Ok(None);
        };

        let products = sqlx::query_as::<_, Product>(
            "SELECT p.id, p.name, p.price, p.description, p.created_at, p.updated_at
             FROM user_product up
             JOIN products p ON p.id = up.product_id
             WHERE up.user_id = $1
             ORDER BY up.id",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(Some(UserWithProducts { user, products }))
    }

    /// List every user with their linked products.
    ///
    /// Products are gathered with one explicit pivot join and grouped in
    /// memory, so the whole listing costs two queries regardless of user
    /// count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_with_products(&self) -> Result<Vec<UserWithProducts>, RepositoryError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;

        let rows = sqlx::query_as::<_, LinkedProductRow>(
            "SELECT up.user_id, p.id, p.name, p.price, p.description, p.created_at, p.updated_at
             FROM user_product up
             JOIN products p ON p.id = up.product_id
             ORDER BY up.user_id, up.id",
        )
        .fetch_all(self.pool)
        .await?;

        let mut by_user: HashMap<UserId, Vec<Product>> = HashMap::with_capacity(users.len());
        for row in rows {
            by_user.entry(row.user_id).or_default().push(row.product);
        }

        Ok(users
            .into_iter()
            .map(|user| {
                let products = by_user.remove(&user.id).unwrap_or_default();
                UserWithProducts { user, products }
            })
            .collect())
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email or national id is
    /// already taken (unique-constraint backstop behind the explicit
    /// validation pre-check). Returns `RepositoryError::Database` for other
    /// database errors.
    pub async fn create(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, national_id, email, password_hash)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(new_user.name)
        .bind(new_user.national_id)
        .bind(new_user.email)
        .bind(new_user.password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_unique_violation(e, "email or national id already registered"))?;

        Ok(user)
    }

    /// Apply a partial update to a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist,
    /// `RepositoryError::Conflict` on a unique-constraint violation, and
    /// `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: UserId,
        changes: UserChanges,
    ) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET name = COALESCE($2, name),
                 national_id = COALESCE($3, national_id),
                 email = COALESCE($4, email),
                 password_hash = COALESCE($5, password_hash),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(changes.name)
        .bind(changes.national_id)
        .bind(changes.email)
        .bind(changes.password_hash)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::from_unique_violation(e, "email or national id already registered"))?;

        user.ok_or(RepositoryError::NotFound)
    }

    /// Delete a user.
    ///
    /// The caller is responsible for the linked-product guard; this method
    /// only removes the row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist and
    /// `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: UserId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Whether a user with this ID exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(&self, id: UserId) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(self.pool)
            .await?;

        Ok(exists)
    }

    /// Whether this email is taken by a user other than `exclude`.
    ///
    /// Passing `Some(id)` excludes that user from the check, preserving
    /// update semantics where a record may keep its own email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn email_taken(
        &self,
        email: &Email,
        exclude: Option<UserId>,
    ) -> Result<bool, RepositoryError> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND id <> COALESCE($2, -1))",
        )
        .bind(email)
        .bind(exclude)
        .fetch_one(self.pool)
        .await?;

        Ok(taken)
    }

    /// Whether this national id is taken by a user other than `exclude`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn national_id_taken(
        &self,
        national_id: &NationalId,
        exclude: Option<UserId>,
    ) -> Result<bool, RepositoryError> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE national_id = $1 AND id <> COALESCE($2, -1))",
        )
        .bind(national_id)
        .bind(exclude)
        .fetch_one(self.pool)
        .await?;

        Ok(taken)
    }
}

/// A product row tagged with the user it is linked to.
#[derive(sqlx::FromRow)]
struct LinkedProductRow {
    user_id: UserId,
    #[sqlx(flatten)]
    product: Product,
}
