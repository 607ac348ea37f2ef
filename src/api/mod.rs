//! HTTP API server

use axum::{routing::get, Router};

use crate::config::ServiceProfile;
use crate::types::{Delivery, Order, Pizza};

pub mod collections;
pub mod handlers;
pub mod middleware;
pub mod state;

pub use middleware::Interceptor;
pub use state::AppState;

/// Build the router for the state's profile, wrapped in `interceptors`
/// (first entry outermost)
pub fn create_router(state: AppState, interceptors: &[Interceptor]) -> Router {
    let routes = match state.profile {
        ServiceProfile::Api => api_routes(),
        ServiceProfile::Health => Router::new().route("/status", get(handlers::status)),
        ServiceProfile::Home => Router::new().route("/", get(handlers::home_page)),
    };

    middleware::apply(routes.with_state(state), interceptors)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::hello))
        .route("/status", get(handlers::status))
        .route(
            "/posts",
            get(handlers::list_posts).post(handlers::echo_post),
        )
        .route("/posts/:id", get(handlers::get_post))
        .nest("/pizzas", collections::router::<Pizza>())
        .nest("/orders", collections::router::<Order>())
        .nest("/deliveries", collections::router::<Delivery>())
}
