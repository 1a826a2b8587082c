use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod admin;
pub mod basket;
pub mod booking;
pub mod error;
pub mod session;
pub mod shows;
pub mod state;
pub mod stripe;
pub mod webhooks;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    Router::new()
        .route("/v1/shows", get(shows::list_shows))
        .route("/v1/shows/{show_id}/seats", get(shows::list_seats))
        .route("/v1/shows/{show_id}/availability", get(booking::availability))
        .route("/v1/shows/{show_id}/selection", post(booking::submit_selection))
        .route("/v1/basket", get(basket::get_basket))
        .route(
            "/v1/basket/shows/{show_id}/seats/{seat_id}",
            axum::routing::delete(basket::remove_seat),
        )
        .route(
            "/v1/basket/shows/{show_id}/seats/{seat_id}/child-on-lap",
            axum::routing::put(basket::set_child_on_lap),
        )
        .route("/v1/basket/checkout", post(basket::begin_checkout))
        .route("/v1/webhooks/stripe", post(webhooks::handle_stripe_webhook))
        .route(
            "/v1/admin/session",
            post(admin::login).delete(admin::logout),
        )
        .route(
            "/v1/shows/{show_id}/admin/seats",
            post(admin::set_seat_statuses),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
