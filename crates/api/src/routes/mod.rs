//! HTTP route handlers for the REST surface.
//!
//! # Route Structure
//!
//! ```text
//! # Users
//! GET    /usuarios                - User list with nested products (cached)
//! POST   /usuarios                - Create user
//! GET    /usuarios/{id}           - User detail
//! PUT    /usuarios/{id}           - Partial update
//! DELETE /usuarios/{id}           - Delete (blocked while links exist)
//!
//! # Products
//! GET    /produtos                - Product list
//! POST   /produtos                - Create product
//! GET    /produtos/{id}           - Product detail
//! PUT    /produtos/{id}           - Partial update
//! DELETE /produtos/{id}           - Delete (cascades link removal)
//!
//! # Links
//! GET    /relacionamentos                          - All links with display fields
//! POST   /relacionamentos                          - Link a user to a product
//! DELETE /relacionamentos/{id}                     - Unlink
//! GET    /relacionamentos/usuario/{id}/produtos    - Products linked to a user
//! GET    /relacionamentos/produto/{id}/usuarios    - Users linked to a product
//!
//! # Reports
//! GET /relatorios/usuarios-mais-produtos           - Users ranked by product count
//! GET /relatorios/produto-mais-caro-por-usuario    - Most expensive product per user
//! GET /relatorios/produtos-por-faixa-preco         - Product count per price band
//! ```

pub mod links;
pub mod products;
pub mod reports;
pub mod users;

use axum::{
    Router,
    routing::{delete, get},
};

use crate::state::AppState;

/// Assemble the full application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/usuarios", user_routes())
        .nest("/produtos", product_routes())
        .nest("/relacionamentos", link_routes())
        .nest("/relatorios", report_routes())
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::index).post(users::store))
        .route(
            "/{id}",
            get(users::show).put(users::update).delete(users::destroy),
        )
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::store))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
}

/// Create the link routes router.
pub fn link_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(links::index).post(links::store))
        .route("/{id}", delete(links::destroy))
        .route("/usuario/{id}/produtos", get(links::products_for_user))
        .route("/produto/{id}/usuarios", get(links::users_for_product))
}

/// Create the report routes router.
pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/usuarios-mais-produtos",
            get(reports::users_ranked_by_product_count),
        )
        .route(
            "/produto-mais-caro-por-usuario",
            get(reports::most_expensive_product_per_user),
        )
        .route(
            "/produtos-por-faixa-preco",
            get(reports::product_count_by_price_band),
        )
}
