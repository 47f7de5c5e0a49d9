//! User routes: CRUD plus the cached list view.
//!
//! Every mutation invalidates the user-list cache entry before the response
//! is returned, so a follow-up list read never sees stale membership.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::response::Response;
use serde::Deserialize;

use inventory_core::{Email, NationalId, UserId};

use crate::cache::{CacheKey, CachedValue};
use crate::db::links::LinkRepository;
use crate::db::users::{NewUser, UserChanges, UserRepository};
use crate::error::{ApiError, FieldErrors, Result, push_field_error};
use crate::models::user::{User, UserWithProducts};
use crate::response::{ApiResponse, created};
use crate::services::credential::{MIN_PASSWORD_LENGTH, hash_password};
use crate::state::AppState;

const MAX_NAME_LENGTH: usize = 255;

/// Request body for creating a user.
///
/// Every field is optional at the serde level so that missing fields surface
/// in the validation error map instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub national_id: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for partially updating a user. Absent fields are untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub national_id: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// List every user with their products, served from the List Cache.
///
/// # Errors
///
/// Returns `ApiError` if the underlying query fails.
pub async fn index(
    State(state): State<AppState>,
) -> Result<ApiResponse<Arc<Vec<UserWithProducts>>>> {
    let was_cached = state.cache().contains(&CacheKey::UserList);

    let value = state
        .cache()
        .get_or_compute(CacheKey::UserList, async {
            let users = UserRepository::new(state.pool()).list_with_products().await?;
            Ok(CachedValue::UserList(Arc::new(users)))
        })
        .await?;

    let CachedValue::UserList(users) = value;

    Ok(ApiResponse::data(users)
        .with_cache_info(was_cached, state.config().cache_ttl.as_secs()))
}

/// Show one user with their products.
///
/// # Errors
///
/// Returns `ApiError::NotFound` if the user does not exist.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<UserWithProducts>> {
    let user = UserRepository::new(state.pool())
        .get_with_products(UserId::new(id))
        .await?
        .ok_or_else(|| ApiError::user_not_found(id))?;

    Ok(ApiResponse::data(user))
}

/// Create a user.
///
/// # Errors
///
/// Returns `ApiError::Validation` with a field-level error map when input is
/// invalid or a unique field is taken.
pub async fn store(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Response> {
    let new_user = validate_create(&state, req).await?;

    let user = UserRepository::new(state.pool()).create(new_user).await?;
    state.cache().invalidate(&CacheKey::UserList).await;

    Ok(created(
        ApiResponse::data(user)
            .with_message("User created successfully")
            .with_details("The user was created and is available in the system"),
    ))
}

/// Partially update a user.
///
/// # Errors
///
/// Returns `ApiError::NotFound` if the user does not exist and
/// `ApiError::Validation` when a provided field is invalid.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<ApiResponse<User>> {
    let user_id = UserId::new(id);
    let repo = UserRepository::new(state.pool());

    if !repo.exists(user_id).await? {
        return Err(ApiError::user_not_found(id));
    }

    let changes = validate_update(&state, user_id, req).await?;

    let user = repo.update(user_id, changes).await?;
    state.cache().invalidate(&CacheKey::UserList).await;

    Ok(ApiResponse::data(user)
        .with_message("User updated successfully")
        .with_details("The user's information was updated in the system"))
}

/// Delete a user. Blocked while any product link exists.
///
/// # Errors
///
/// Returns `ApiError::NotFound` if the user does not exist and
/// `ApiError::Conflict` while links remain.
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<()>> {
    let user_id = UserId::new(id);
    let users = UserRepository::new(state.pool());

    if !users.exists(user_id).await? {
        return Err(ApiError::user_not_found(id));
    }

    let linked = LinkRepository::new(state.pool())
        .count_for_user(user_id)
        .await?;
    if linked > 0 {
        return Err(ApiError::Conflict {
            message: "Cannot delete user".to_owned(),
            details: "This user has linked products. Remove the links first.".to_owned(),
        });
    }

    users.delete(user_id).await?;
    state.cache().invalidate(&CacheKey::UserList).await;

    Ok(ApiResponse::message("User deleted successfully")
        .with_details("The user was permanently removed from the system"))
}

// =============================================================================
// Validation
// =============================================================================

async fn validate_create(state: &AppState, req: CreateUserRequest) -> Result<NewUser> {
    let mut errors = FieldErrors::new();
    let repo = UserRepository::new(state.pool());

    let name = validate_name(req.name.as_deref(), &mut errors);
    let national_id = validate_national_id(req.national_id.as_deref(), &mut errors);
    let email = validate_email(req.email.as_deref(), &mut errors);
    let password = validate_password(req.password.as_deref(), &mut errors);

    if let Some(ref national_id) = national_id
        && repo.national_id_taken(national_id, None).await?
    {
        push_field_error(
            &mut errors,
            "national_id",
            "This national id is already registered.",
        );
    }

    if let Some(ref email) = email
        && repo.email_taken(email, None).await?
    {
        push_field_error(&mut errors, "email", "This email is already registered.");
    }

    if errors.is_empty()
        && let (Some(name), Some(national_id), Some(email), Some(password)) =
            (name, national_id, email, password)
    {
        return Ok(NewUser {
            name,
            national_id,
            email,
            password_hash: hash_password(&password)?,
        });
    }

    Err(ApiError::Validation(errors))
}

async fn validate_update(
    state: &AppState,
    id: UserId,
    req: UpdateUserRequest,
) -> Result<UserChanges> {
    let mut errors = FieldErrors::new();
    let repo = UserRepository::new(state.pool());
    let mut changes = UserChanges::default();

    if let Some(raw) = req.name {
        changes.name = validate_name(Some(&raw), &mut errors);
    }

    if let Some(raw) = req.national_id
        && let Some(national_id) = validate_national_id(Some(&raw), &mut errors)
    {
        // Uniqueness excludes the record's own id on update
        if repo.national_id_taken(&national_id, Some(id)).await? {
            push_field_error(
                &mut errors,
                "national_id",
                "This national id is already registered.",
            );
        } else {
            changes.national_id = Some(national_id);
        }
    }

    if let Some(raw) = req.email
        && let Some(email) = validate_email(Some(&raw), &mut errors)
    {
        if repo.email_taken(&email, Some(id)).await? {
            push_field_error(&mut errors, "email", "This email is already registered.");
        } else {
            changes.email = Some(email);
        }
    }

    if let Some(raw) = req.password
        && let Some(password) = validate_password(Some(&raw), &mut errors)
    {
        changes.password_hash = Some(hash_password(&password)?);
    }

    if errors.is_empty() {
        Ok(changes)
    } else {
        Err(ApiError::Validation(errors))
    }
}

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

fn validate_national_id(value: Option<&str>, errors: &mut FieldErrors) -> Option<NationalId> {
    let raw = value.map(str::trim).unwrap_or_default();

    match NationalId::parse(raw) {
        Ok(national_id) => Some(national_id),
        Err(inventory_core::NationalIdError::Empty) => {
            push_field_error(errors, "national_id", "The national id field is required.");
            None
        }
        Err(inventory_core::NationalIdError::TooLong { .. }) => {
            push_field_error(
                errors,
                "national_id",
                "The national id may not be longer than 14 characters.",
            );
            None
        }
    }
}

fn validate_email(value: Option<&str>, errors: &mut FieldErrors) -> Option<Email> {
    let raw = value.map(str::trim).unwrap_or_default();

    if raw.is_empty() {
        push_field_error(errors, "email", "The email field is required.");
        return None;
    }

    match Email::parse(raw) {
        Ok(email) => Some(email),
        Err(_) => {
            push_field_error(errors, "email", "The email must be a valid email address.");
            None
        }
    }
}

fn validate_password(value: Option<&str>, errors: &mut FieldErrors) -> Option<String> {
    let Some(password) = value else {
        push_field_error(errors, "password", "The password field is required.");
        return None;
    };

    if password.is_empty() {
        push_field_error(errors, "password", "The password field is required.");
        return None;
    }

    if password.len() < MIN_PASSWORD_LENGTH {
        push_field_error(
            errors,
            "password",
            "The password must be at least 6 characters.",
        );
        return None;
    }

    Some(password.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name_required() {
        let mut errors = FieldErrors::new();
        assert!(validate_name(None, &mut errors).is_none());
        assert!(validate_name(Some("   "), &mut errors).is_none());
        assert_eq!(errors["name"].len(), 2);
        assert_eq!(errors["name"][0], "The name field is required.");
    }

    #[test]
    fn test_validate_name_max_length() {
        let mut errors = FieldErrors::new();
        let long = "a".repeat(256);
        assert!(validate_name(Some(&long), &mut errors).is_none());
        assert_eq!(
            errors["name"][0],
            "The name may not be longer than 255 characters."
        );

        let mut errors = FieldErrors::new();
        let max = "a".repeat(255);
        assert_eq!(validate_name(Some(&max), &mut errors), Some(max));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_validate_national_id_messages() {
        let mut errors = FieldErrors::new();
        assert!(validate_national_id(Some(""), &mut errors).is_none());
        assert!(validate_national_id(Some("123.456.789-01-99"), &mut errors).is_none());
        assert_eq!(errors["national_id"][0], "The national id field is required.");
        assert_eq!(
            errors["national_id"][1],
            "The national id may not be longer than 14 characters."
        );
    }

    #[test]
    fn test_validate_email_messages() {
        let mut errors = FieldErrors::new();
        assert!(validate_email(None, &mut errors).is_none());
        assert!(validate_email(Some("not-an-email"), &mut errors).is_none());
        assert_eq!(errors["email"][0], "The email field is required.");
        assert_eq!(
            errors["email"][1],
            "The email must be a valid email address."
        );

        let mut errors = FieldErrors::new();
        assert!(validate_email(Some("joao@example.com"), &mut errors).is_some());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_validate_password_minimum_length() {
        let mut errors = FieldErrors::new();
        assert!(validate_password(Some("12345"), &mut errors).is_none());
        assert_eq!(
            errors["password"][0],
            "The password must be at least 6 characters."
        );

        let mut errors = FieldErrors::new();
        assert_eq!(
            validate_password(Some("123456"), &mut errors),
            Some("123456".to_owned())
        );
        assert!(errors.is_empty());
    }
}
