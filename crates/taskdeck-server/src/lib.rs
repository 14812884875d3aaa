//! HTTP API layer for taskdeck.
//!
//! Stateless adapter between HTTP and the task store: handlers extract and
//! type-check inputs, invoke the store, and map results to status codes and
//! JSON bodies. The store instance is constructed at startup and handed to
//! the router explicitly; there is no ambient global state.

pub mod error;
pub mod handlers;

use axum::Router;
use axum::routing::{get, put};
use std::sync::Arc;
use taskdeck_core::TaskStore;
use tower_http::cors::{Any, CorsLayer};

/// Shared application state.
pub struct AppState {
    /// The task store; the only durable resource.
    pub store: Arc<dyn TaskStore>,
}

/// Build the application router.
///
/// Task routes are served at both `/tasks` and `/api/tasks` so deployed
/// clients can use either prefix. Cross-origin requests are permitted
/// from any origin.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let tasks = Router::new()
        .route(
            "/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route(
            "/tasks/{id}",
            put(handlers::update_task).delete(handlers::delete_task),
        );

    Router::new()
        .merge(tasks.clone())
        .nest("/api", tasks)
        .fallback(handlers::route_not_found)
        .layer(cors)
        .with_state(state)
}
