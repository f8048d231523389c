//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod audit;
pub mod auth;
pub mod clients;
pub mod dashboard;
pub mod health;
pub mod inventory;
pub mod prescriptions;
pub mod providers;
pub mod reports;
pub mod roles;
pub mod sales;
pub mod users;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(inventory::routes())
        .merge(sales::routes())
        .merge(prescriptions::routes())
        .merge(clients::routes())
        .merge(providers::routes())
        .merge(roles::routes())
        .merge(users::routes())
        .merge(audit::routes())
        .merge(dashboard::routes())
        .merge(reports::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}
