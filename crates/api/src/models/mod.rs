//! Domain models serialized in API responses.

pub mod link;
pub mod product;
pub mod report;
pub mod user;

pub use link::{LinkRow, ProductUsers, UserProducts};
pub use product::Product;
pub use report::{PriceBand, PriceBandCount, UserMaxPriceRow, UserProductCountRow, count_by_band};
pub use user::{User, UserWithProducts};
