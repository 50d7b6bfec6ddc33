use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use super::handlers::{self, admin, auth, hotels, payments, recommendations, reservations};
use super::AppState;
use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    // Versioned API routes
    let api = Router::new()
        // Recommendations
        .route("/recommendations", get(recommendations::recommend))
        .route(
            "/admin/recommendations/reload",
            post(recommendations::reload),
        )
        // Accounts
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        // Hotels
        .route("/hotels", get(hotels::list_hotels))
        .route("/hotels/:id", get(hotels::get_hotel))
        // Reservations and payments
        .route(
            "/reservations/check-availability",
            post(reservations::check_availability),
        )
        .route(
            "/reservations",
            get(reservations::my_reservations).post(reservations::create_reservation),
        )
        .route("/payments", post(payments::pay))
        // Admin
        .route(
            "/admin/hotels",
            get(hotels::admin_list_hotels).post(hotels::create_hotel),
        )
        .route(
            "/admin/hotels/:id",
            get(hotels::admin_get_hotel)
                .put(hotels::update_hotel)
                .delete(hotels::delete_hotel),
        )
        .route("/admin/users", get(admin::list_users))
        .route(
            "/admin/users/:id",
            get(admin::get_user)
                .put(admin::update_user)
                .delete(admin::delete_user),
        )
        .route("/admin/reservations", get(reservations::list_reservations))
        .route(
            "/admin/reservations/:id",
            get(reservations::get_reservation).delete(reservations::delete_reservation),
        )
        .route(
            "/admin/reservations/:id/status",
            put(reservations::update_status),
        )
        .route("/admin/payments", get(payments::list_payments))
        .route("/admin/payments/:id", get(payments::get_payment))
        .route("/admin/payments/:id/status", put(payments::update_status))
        .route("/admin/payments/:id/refund", post(payments::refund))
        .route("/admin/dashboard/stats", get(admin::dashboard_stats));

    // Health check stays outside the versioned prefix
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api)
        // ServiceBuilder runs these top to bottom
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(TimeoutLayer::new(timeout))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
