//! REST adapter (axum)

mod health;
mod products;
mod response;

pub use response::{Envelope, PageEnvelope, Pagination};

use axum::{
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};

use crate::config::Config;
use crate::repository::Repository;
use crate::service::Service;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Service,
    pub repo: Repository,
}

/// Build the HTTP router with all routes and middleware
pub fn router(state: AppState, config: &Config) -> Router {
    let api_v1 = Router::new()
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/{id}",
            get(products::get_product).put(products::update_product),
        );

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::readiness))
        .nest("/api/v1", api_v1)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(config.timeout()))
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive()),
        )
}
