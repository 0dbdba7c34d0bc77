// /lf-gaming-store/services/store-api/src/api/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};

use super::handlers;
use crate::middleware::admin::admin_auth_middleware;
use crate::AppState;

/// Create semua routes untuk storefront API
pub fn create_routes(state: AppState) -> Router<AppState> {
    // Admin routes di belakang token guard
    let admin_routes = Router::new()
        .route("/api/admin/orders", get(handlers::admin_list_orders))
        .route(
            "/api/admin/orders/{id}/items",
            get(handlers::admin_list_order_items),
        )
        .route(
            "/api/admin/orders/{id}/items/{item_id}/pin",
            put(handlers::admin_set_item_pin),
        )
        .route(
            "/api/admin/orders/{id}/complete",
            put(handlers::admin_complete_order),
        )
        .route(
            "/api/admin/orders/{id}/cancel",
            put(handlers::admin_cancel_order),
        )
        .route(
            "/api/admin/orders/{id}/refund",
            put(handlers::admin_refund_order),
        )
        .route("/api/admin/wallet", put(handlers::admin_set_wallet_balance))
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            admin_auth_middleware,
        ));

    Router::new()
        // Auth
        .route("/api/register", post(handlers::register))
        .route("/api/login", post(handlers::login))
        // Katalog (read-only)
        .route("/api/games", get(handlers::list_games))
        .route("/api/regions", get(handlers::list_regions))
        .route("/api/packages", get(handlers::list_packages))
        // Wallet
        .route("/api/wallet", get(handlers::get_wallet))
        .route("/api/wallet/topup", post(handlers::topup_wallet))
        // Orders
        .route("/api/orders", post(handlers::create_order))
        .route("/api/orders", get(handlers::list_orders))
        .merge(admin_routes)
}
