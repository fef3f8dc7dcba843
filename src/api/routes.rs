use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::api::handlers::{self, AppState};
use crate::store::Store;

pub fn create_router<S: Store + 'static>() -> Router<AppState<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Orders
        .route("/orders", get(handlers::list_orders::<S>))
        .route("/orders", post(handlers::create_order::<S>))
        .route("/orders/:order_id", get(handlers::get_order::<S>))
        .route("/orders/:order_id/badges", put(handlers::set_badges::<S>))
        // Change requests
        .route(
            "/orders/:order_id/change-requests",
            post(handlers::open_change_request::<S>),
        )
        .route(
            "/orders/:order_id/change-requests/:request_id/approve",
            post(handlers::approve_change_request::<S>),
        )
        .route(
            "/orders/:order_id/change-requests/:request_id/decline",
            post(handlers::decline_change_request::<S>),
        )
        // Revisions
        .route(
            "/orders/:order_id/revisions",
            post(handlers::add_revision::<S>),
        )
        .route(
            "/orders/:order_id/revisions/default",
            put(handlers::set_default_revision::<S>),
        )
        // Branches and history
        .route(
            "/orders/:order_id/branches",
            post(handlers::create_branch::<S>),
        )
        .route(
            "/orders/:order_id/branches/:branch",
            delete(handlers::delete_branch::<S>),
        )
        .route(
            "/orders/:order_id/default-branch",
            put(handlers::set_default_branch::<S>),
        )
        .route(
            "/orders/:order_id/branches/:branch/commits",
            post(handlers::commit::<S>),
        )
        .route(
            "/orders/:order_id/branches/:branch/rollback",
            post(handlers::rollback::<S>),
        )
        // Redo flags
        .route(
            "/orders/:order_id/redo-flags",
            post(handlers::add_redo_flag::<S>),
        )
        .route(
            "/orders/:order_id/redo-flags/:station",
            delete(handlers::clear_redo_flag::<S>),
        )
        // Stage intents
        .route(
            "/orders/:order_id/stations/:station/rework",
            post(handlers::send_to_rework::<S>),
        )
        .route(
            "/orders/:order_id/stations/:station/stage",
            post(handlers::apply_stage::<S>),
        )
        .route(
            "/orders/:order_id/loading-date",
            put(handlers::set_loading_date::<S>),
        )
        // Notifications
        .route(
            "/notifications",
            get(handlers::recent_notifications::<S>),
        )
        .layer(CorsLayer::permissive())
}
