//! Seed command: sample users, products and links for a fresh database.
//!
//! Inserts run through the same repositories the API uses, so the credential
//! hash and validation-adjacent invariants match production writes. Meant for
//! a fresh database: rerunning against seeded data fails on the unique
//! constraints.

use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use tracing::info;

use inventory_api::db::RepositoryError;
use inventory_api::db::links::LinkRepository;
use inventory_api::db::products::{NewProduct, ProductRepository};
use inventory_api::db::users::{NewUser, UserRepository};
use inventory_api::services::credential::{CredentialError, hash_password};
use inventory_core::{Email, NationalId, Price, PriceError};

/// Every seeded user gets this credential.
const SEED_PASSWORD: &str = "123456";

/// Errors from the seed command.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    #[error("Invalid seed data: {0}")]
    InvalidData(String),
}

impl From<PriceError> for SeedError {
    fn from(e: PriceError) -> Self {
        Self::InvalidData(e.to_string())
    }
}

/// Seed the database.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails,
/// or an insert is rejected (including unique violations on rerun).
pub async fn run() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url =
        super::database_url().ok_or(SeedError::MissingEnvVar("INVENTORY_DATABASE_URL"))?;
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    let user_ids = seed_users(&pool).await?;
    let product_ids = seed_products(&pool).await?;
    seed_links(&pool, &user_ids, &product_ids).await?;

    Ok(())
}

async fn seed_users(pool: &PgPool) -> Result<Vec<inventory_core::UserId>, SeedError> {
    let repo = UserRepository::new(pool);

    let fixed = [
        ("João Silva", "123.456.789-01", "joao@example.com"),
        ("Maria Santos", "987.654.321-00", "maria@example.com"),
        ("Pedro Oliveira", "111.222.333-44", "pedro@example.com"),
    ];

    let mut ids = Vec::with_capacity(fixed.len());
    for (name, national_id, email) in fixed {
        let user = repo
            .create(NewUser {
                name: name.to_owned(),
                national_id: NationalId::parse(national_id)
                    .map_err(|e| SeedError::InvalidData(e.to_string()))?,
                email: Email::parse(email).map_err(|e| SeedError::InvalidData(e.to_string()))?,
                password_hash: hash_password(SEED_PASSWORD)?,
            })
            .await?;
        ids.push(user.id);
    }

    info!("{} users created", ids.len());
    Ok(ids)
}

async fn seed_products(pool: &PgPool) -> Result<Vec<inventory_core::ProductId>, SeedError> {
    let repo = ProductRepository::new(pool);

    let fixed = [
        (
            "Notebook Dell Inspiron",
            "2999.99",
            "Notebook com processador Intel i5, 8GB RAM, 256GB SSD",
        ),
        (
            "Mouse Wireless Logitech",
            "89.90",
            "Mouse sem fio com sensor óptico de alta precisão",
        ),
        (
            "Teclado Mecânico RGB",
            "299.99",
            "Teclado mecânico com switches Cherry MX Blue",
        ),
        (
            "Monitor LG 24\"",
            "599.99",
            "Monitor Full HD com painel IPS",
        ),
        (
            "Webcam HD 1080p",
            "199.99",
            "Webcam com resolução Full HD e microfone integrado",
        ),
    ];

    let mut ids = Vec::with_capacity(fixed.len());
    for (name, price, description) in fixed {
        let amount = price
            .parse::<Decimal>()
            .map_err(|e| SeedError::InvalidData(e.to_string()))?;
        let product = repo
            .create(NewProduct {
                name: name.to_owned(),
                price: Price::new(amount)?,
                description: Some(description.to_owned()),
            })
            .await?;
        ids.push(product.id);
    }

    info!("{} products created", ids.len());
    Ok(ids)
}

async fn seed_links(
    pool: &PgPool,
    user_ids: &[inventory_core::UserId],
    product_ids: &[inventory_core::ProductId],
) -> Result<(), SeedError> {
    let repo = LinkRepository::new(pool);

    // (user index, product index) pairs; every user gets at least one link
    // and product counts stay uneven so the reports have something to rank
    let pairs = [(0, 0), (0, 1), (1, 0), (1, 2), (1, 3), (1, 4), (2, 4)];

    let mut count = 0;
    for (user_idx, product_idx) in pairs {
        let (Some(&user_id), Some(&product_id)) =
            (user_ids.get(user_idx), product_ids.get(product_idx))
        else {
            continue;
        };
        repo.create(user_id, product_id).await?;
        count += 1;
    }

    info!("{count} user-product links created");
    Ok(())
}
