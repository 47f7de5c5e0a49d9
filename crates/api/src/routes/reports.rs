//! Report routes.
//!
//! Thin wrappers over the Report Engine: each handler runs one stateless
//! aggregate and wraps the rows. Store failures propagate as masked 500s
//! through `ApiError`.

use axum::extract::State;

use crate::db::reports::ReportRepository;
use crate::error::Result;
use crate::models::report::{PriceBandCount, UserMaxPriceRow, UserProductCountRow};
use crate::response::ApiResponse;
use crate::state::AppState;

/// Users ranked by linked-product count, descending; zero-product users
/// included.
///
/// # Errors
///
/// Returns `ApiError` if the underlying query fails.
pub async fn users_ranked_by_product_count(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<UserProductCountRow>>> {
    let rows = ReportRepository::new(state.pool())
        .users_ranked_by_product_count()
        .await?;
    Ok(ApiResponse::data(rows))
}

/// The most expensive product(s) per user, descending by price; price ties
/// for a user emit one row per tied product.
///
/// # Errors
///
/// Returns `ApiError` if the underlying query fails.
pub async fn most_expensive_product_per_user(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<UserMaxPriceRow>>> {
    let rows = ReportRepository::new(state.pool())
        .most_expensive_product_per_user()
        .await?;
    Ok(ApiResponse::data(rows))
}

/// Product counts per fixed price band, empty bands omitted.
///
/// # Errors
///
/// Returns `ApiError` if the underlying query fails.
pub async fn product_count_by_price_band(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<PriceBandCount>>> {
    let rows = ReportRepository::new(state.pool())
        .product_count_by_price_band()
        .await?;
    Ok(ApiResponse::data(rows))
}
