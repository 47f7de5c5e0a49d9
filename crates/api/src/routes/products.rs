//! Product routes: plain CRUD.
//!
//! Product mutations do not touch the List Cache; only user mutations
//! invalidate the cached list.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::Response;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

use inventory_core::{Price, ProductId};

use crate::db::RepositoryError;
use crate::db::products::{NewProduct, ProductChanges, ProductRepository};
use crate::error::{ApiError, FieldErrors, Result, push_field_error};
use crate::models::product::Product;
use crate::response::{ApiResponse, created};
use crate::state::AppState;

const MAX_NAME_LENGTH: usize = 255;

/// Request body for creating a product.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
}

/// Request body for partially updating a product.
///
/// `description` distinguishes "absent" (leave alone) from "null" (clear),
/// hence the double `Option`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

fn double_option<'de, D>(deserializer: D) -> std::result::Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// List all products.
///
/// # Errors
///
/// Returns `ApiError` if the underlying query fails.
pub async fn index(State(state): State<AppState>) -> Result<ApiResponse<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).list().await?;
    Ok(ApiResponse::data(products))
}

/// Show one product.
///
/// # Errors
///
/// Returns `ApiError::NotFound` if the product does not exist.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<Product>> {
    let product = ProductRepository::new(state.pool())
        .get(ProductId::new(id))
        .await?
        .ok_or_else(|| ApiError::product_not_found(id))?;

    Ok(ApiResponse::data(product))
}

/// Create a product.
///
/// # Errors
///
/// Returns `ApiError::Validation` with a field-level error map when input is
/// invalid.
pub async fn store(
    State(state): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> Result<Response> {
    let mut errors = FieldErrors::new();

    let name = validate_name(req.name.as_deref(), &mut errors);
    let price = validate_price(req.price, &mut errors);

    let (Some(name), Some(price)) = (name, price) else {
        return Err(ApiError::Validation(errors));
    };

    let product = ProductRepository::new(state.pool())
        .create(NewProduct {
            name,
            price,
            description: req.description,
        })
        .await?;

    Ok(created(
        ApiResponse::data(product)
            .with_message("Product created successfully")
            .with_details("The product was created in the system"),
    ))
}

/// Partially update a product.
///
/// # Errors
///
/// Returns `ApiError::NotFound` if the product does not exist and
/// `ApiError::Validation` when a provided field is invalid.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<ApiResponse<Product>> {
    let repo = ProductRepository::new(state.pool());
    let product_id = ProductId::new(id);

    if !repo.exists(product_id).await? {
        return Err(ApiError::product_not_found(id));
    }

    let mut errors = FieldErrors::new();
    let mut changes = ProductChanges {
        description: req.description,
        ..ProductChanges::default()
    };

    if let Some(raw) = req.name {
        changes.name = validate_name(Some(&raw), &mut errors);
    }

    if req.price.is_some() {
        changes.price = validate_price(req.price, &mut errors);
    }

    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let product = repo.update(product_id, changes).await?;

    Ok(ApiResponse::data(product)
        .with_message("Product updated successfully")
        .with_details("The product's information was updated in the system"))
}

/// Delete a product. The store cascades removal of its links in the same
/// statement.
///
/// # Errors
///
/// Returns `ApiError::NotFound` if the product does not exist.
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<()>> {
    match ProductRepository::new(state.pool())
        .delete(ProductId::new(id))
        .await
    {
        Ok(()) => Ok(ApiResponse::message("Product deleted successfully")
            .with_details("The product was permanently removed from the system")),
        Err(RepositoryError::NotFound) => Err(ApiError::product_not_found(id)),
        Err(e) => Err(e.into()),
    }
}

// =============================================================================
// Validation
// =============================================================================

fn validate_name(value: Option<&str>, errors: &mut FieldErrors) -> Option<String> {
    let name = value.map(str::trim).unwrap_or_default();

    if name.is_empty() {
        push_field_error(errors, "name", "The name field is required.");
        return None;
    }

    if name.len() > MAX_NAME_LENGTH {
        push_field_error(
            errors,
            "name",
            "The name may not be longer than 255 characters.",
        );
        return None;
    }

    Some(name.to_owned())
}

fn validate_price(value: Option<f64>, errors: &mut FieldErrors) -> Option<Price> {
    let Some(raw) = value else {
        push_field_error(errors, "price", "The price field is required.");
        return None;
    };

    let Ok(amount) = Decimal::try_from(raw) else {
        push_field_error(errors, "price", "The price must be a number.");
        return None;
    };

    match Price::new(amount) {
        Ok(price) => Some(price),
        Err(_) => {
            push_field_error(
                errors,
                "price",
                "The price must be greater than or equal to zero.",
            );
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_price_required() {
        let mut errors = FieldErrors::new();
        assert!(validate_price(None, &mut errors).is_none());
        assert_eq!(errors["price"][0], "The price field is required.");
    }

    #[test]
    fn test_validate_price_rejects_negative() {
        let mut errors = FieldErrors::new();
        assert!(validate_price(Some(-1.0), &mut errors).is_none());
        assert_eq!(
            errors["price"][0],
            "The price must be greater than or equal to zero."
        );
    }

    #[test]
    fn test_validate_price_rejects_non_finite() {
        let mut errors = FieldErrors::new();
        assert!(validate_price(Some(f64::NAN), &mut errors).is_none());
        assert_eq!(errors["price"][0], "The price must be a number.");
    }

    #[test]
    fn test_validate_price_accepts_zero_and_rounds() {
        let mut errors = FieldErrors::new();
        assert!(validate_price(Some(0.0), &mut errors).is_some());

        let price = validate_price(Some(89.9), &mut errors).unwrap();
        assert_eq!(price.to_string(), "89.90");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_update_request_distinguishes_absent_and_null_description() {
        let absent: UpdateProductRequest = serde_json::from_str(r#"{"name": "Mouse"}"#).unwrap();
        assert_eq!(absent.description, None);

        let cleared: UpdateProductRequest =
            serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(cleared.description, Some(None));

        let set: UpdateProductRequest =
            serde_json::from_str(r#"{"description": "Wireless"}"#).unwrap();
        assert_eq!(set.description, Some(Some("Wireless".to_owned())));
    }
}
