//! Link routes: the Relation Manager's REST surface.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::Response;
use serde::Deserialize;

use inventory_core::{LinkId, ProductId, UserId};

use crate::db::RepositoryError;
use crate::db::links::LinkRepository;
use crate::db::products::ProductRepository;
use crate::db::users::UserRepository;
use crate::error::{ApiError, FieldErrors, Result, push_field_error};
use crate::models::link::{LinkRow, ProductUsers, UserProducts};
use crate::response::{ApiResponse, created};
use crate::state::AppState;

/// Request body for linking a user to a product.
#[derive(Debug, Deserialize)]
pub struct CreateLinkRequest {
    pub user_id: Option<i32>,
    pub product_id: Option<i32>,
}

/// List all links with display fields.
///
/// # Errors
///
/// Returns `ApiError` if the underlying query fails.
pub async fn index(State(state): State<AppState>) -> Result<ApiResponse<Vec<LinkRow>>> {
    let links = LinkRepository::new(state.pool()).list().await?;
    Ok(ApiResponse::data(links))
}

/// Link a user to a product.
///
/// # Errors
///
/// Returns `ApiError::Validation` when ids are missing,
/// `ApiError::NotFound` when either endpoint does not exist, and
/// `ApiError::Conflict` when the pair is already linked.
pub async fn store(
    State(state): State<AppState>,
    Json(req): Json<CreateLinkRequest>,
) -> Result<Response> {
    let mut errors = FieldErrors::new();
    if req.user_id.is_none() {
        push_field_error(&mut errors, "user_id", "The user field is required.");
    }
    if req.product_id.is_none() {
        push_field_error(&mut errors, "product_id", "The product field is required.");
    }
    let (Some(user_id), Some(product_id)) = (req.user_id, req.product_id) else {
        return Err(ApiError::Validation(errors));
    };

    let user_id = UserId::new(user_id);
    let product_id = ProductId::new(product_id);

    if !UserRepository::new(state.pool()).exists(user_id).await? {
        return Err(ApiError::user_not_found(user_id.as_i32()));
    }
    if !ProductRepository::new(state.pool())
        .exists(product_id)
        .await?
    {
        return Err(ApiError::product_not_found(product_id.as_i32()));
    }

    let links = LinkRepository::new(state.pool());
    if links.pair_exists(user_id, product_id).await? {
        return Err(ApiError::Conflict {
            message: "Link already exists".to_owned(),
            details: "This user is already linked to this product.".to_owned(),
        });
    }

    let id = links.create(user_id, product_id).await?;
    let link = links
        .get(id)
        .await?
        .ok_or_else(|| ApiError::link_not_found(id.as_i32()))?;

    Ok(created(
        ApiResponse::data(link)
            .with_message("User linked to product successfully")
            .with_details("The link was created in the system"),
    ))
}

/// Unlink a user from a product by link id.
///
/// # Errors
///
/// Returns `ApiError::NotFound` if the link does not exist; a repeated call
/// for an already-deleted id fails the same way.
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<()>> {
    match LinkRepository::new(state.pool()).delete(LinkId::new(id)).await {
        Ok(()) => Ok(ApiResponse::message("Link removed successfully")
            .with_details("The user was unlinked from the product")),
        Err(RepositoryError::NotFound) => Err(ApiError::link_not_found(id)),
        Err(e) => Err(e.into()),
    }
}

/// Products linked to a user, with the user itself as the anchor.
///
/// # Errors
///
/// Returns `ApiError::NotFound` if the user does not exist.
pub async fn products_for_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<UserProducts>> {
    let user_id = UserId::new(id);

    let user = UserRepository::new(state.pool())
        .get(user_id)
        .await?
        .ok_or_else(|| ApiError::user_not_found(id))?;

    let products = LinkRepository::new(state.pool())
        .products_for_user(user_id)
        .await?;

    Ok(ApiResponse::data(UserProducts { user, products }))
}

/// Users linked to a product, with the product itself as the anchor.
///
/// # Errors
///
/// Returns `ApiError::NotFound` if the product does not exist.
pub async fn users_for_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<ProductUsers>> {
    let product_id = ProductId::new(id);

    let product = ProductRepository::new(state.pool())
        .get(product_id)
        .await?
        .ok_or_else(|| ApiError::product_not_found(id))?;

    let users = LinkRepository::new(state.pool())
        .users_for_product(product_id)
        .await?;

    Ok(ApiResponse::data(ProductUsers { product, users }))
}
