//! HTTP API layer for ArtiLink.
//!
//! - **Endpoints**: accounts, onboarding, posts, questions and votes,
//!   artworks, following
//! - **Extractors**: authentication and JSON/query parsing that report
//!   failures in the common error shape
//! - **Middleware**: bearer-token session resolution
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

use axum::{Router, middleware::from_fn_with_state};

pub use endpoints::router;
pub use middleware::AppState;

/// The API mounted under `/api` with session resolution applied.
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", router())
        .layer(from_fn_with_state(state.clone(), middleware::auth_middleware))
        .with_state(state)
}
