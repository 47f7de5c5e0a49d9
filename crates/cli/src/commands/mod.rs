//! CLI subcommands.

pub mod migrate;
pub mod seed;

use secrecy::SecretString;

/// Database URL from `INVENTORY_DATABASE_URL`, falling back to
/// `DATABASE_URL`.
pub(crate) fn database_url() -> Option<SecretString> {
    std::env::var("INVENTORY_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .map(SecretString::from)
}
