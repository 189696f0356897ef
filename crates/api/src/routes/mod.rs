//! HTTP route handlers.
//!
//! # Route Structure
//!
//! All routes below are nested under the configured path prefix
//! (default `/tu-sport`). The `/media` static mount lives at the root.
//!
//! ```text
//! # Public storefront
//! POST   /api-rest/users/register          - Register user
//! POST   /api-rest/users/login             - Login user
//! GET    /api-rest/users                   - Current user (user token; re-mints the token)
//! GET    /api-rest/products                - Catalog browse (active, in stock)
//! GET    /api-rest/products/{id}           - Product detail
//! GET    /api-rest/cart                    - Cart view (user token; lazily creates)
//! POST   /api-rest/cartproduct/{id}        - Add one unit of a (size, color) variant
//! DELETE /api-rest/cartproduct/{id}        - Remove one unit / delete the line
//!
//! # Admin
//! POST   /admin/api-rest/users/login       - Admin login
//! POST   /admin/api-rest/users/register    - Register admin (admin token)
//! GET    /admin/api-rest/categories        - List categories
//! POST   /admin/api-rest/config/categories - Create category
//! GET/PUT/DELETE /admin/api-rest/config/categories/{id}
//! GET/POST /admin/api-rest/config/categorysubcategories/{id}
//! DELETE /admin/api-rest/config/categorysubcategories/{id}/{id_subcategory}
//! GET    /admin/api-rest/subcategories     - List subcategories
//! POST   /admin/api-rest/config/subcategories
//! GET/PUT/DELETE /admin/api-rest/config/subcategories/{id}
//! GET/POST /admin/api-rest/config/products
//! GET    /admin/api-rest/config/products/filter/{name}
//! GET/PUT/DELETE /admin/api-rest/config/products/{id}
//! GET    /admin/api-rest/config/products/{id}/images
//! POST   /admin/api-rest/config/products/{id}/thumbnail        (multipart)
//! PUT    /admin/api-rest/config/products/{id}/edit/thumbnail   (multipart)
//! PUT    /admin/api-rest/config/products/{id}/edit/images/{number} (multipart)
//! ```

pub mod admin;
pub mod cart;
pub mod products;
pub mod users;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the full application router (mounted under the path prefix).
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api-rest", public_routes())
        .nest("/admin/api-rest", admin_routes())
}

/// Public storefront routes.
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(users::register))
        .route("/users/login", post(users::login))
        .route("/users", get(users::current))
        .route("/products", get(products::list))
        .route("/products/{id}", get(products::detail))
        .route("/cart", get(cart::view))
        .route("/cartproduct/{id}", post(cart::add).delete(cart::remove))
}

/// Admin routes. Every handler except login carries the admin guard.
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users/login", post(admin::users::login))
        .route("/users/register", post(admin::users::register))
        .route("/categories", get(admin::categories::list))
        .route("/config/categories", post(admin::categories::create))
        .route(
            "/config/categories/{id}",
            get(admin::categories::detail)
                .put(admin::categories::update)
                .delete(admin::categories::delete),
        )
        .route(
            "/config/categorysubcategories/{id}",
            get(admin::categories::linked_subcategories).post(admin::categories::link_subcategory),
        )
        .route(
            "/config/categorysubcategories/{id}/{id_subcategory}",
            axum::routing::delete(admin::categories::unlink_subcategory),
        )
        .route("/subcategories", get(admin::subcategories::list))
        .route("/config/subcategories", post(admin::subcategories::create))
        .route(
            "/config/subcategories/{id}",
            get(admin::subcategories::detail)
                .put(admin::subcategories::update)
                .delete(admin::subcategories::delete),
        )
        .route(
            "/config/products",
            get(admin::products::list).post(admin::products::create),
        )
        .route(
            "/config/products/filter/{name}",
            get(admin::products::filter),
        )
        .route(
            "/config/products/{id}",
            get(admin::products::detail)
                .put(admin::products::update)
                .delete(admin::products::delete),
        )
        .route("/config/products/{id}/images", get(admin::products::images))
        .route(
            "/config/products/{id}/thumbnail",
            post(admin::products::upload_thumbnail),
        )
        .route(
            "/config/products/{id}/edit/thumbnail",
            put(admin::products::upload_thumbnail),
        )
        .route(
            "/config/products/{id}/edit/images/{number}",
            put(admin::products::upload_image),
        )
        // Multipart uploads need headroom above the 5 MiB image ceiling
        .layer(axum::extract::DefaultBodyLimit::max(
            crate::services::upload::MAX_IMAGE_BYTES + 64 * 1024,
        ))
}
