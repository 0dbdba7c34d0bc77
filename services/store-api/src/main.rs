// /lf-gaming-store/services/store-api/src/main.rs

mod api;
mod core;
mod middleware;
mod models;
mod repository;
mod utils;

use axum::Router;
use std::{env, sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

use crate::{
    api::routes,
    core::{ipay88::IPay88Client, order::OrderWorkflow, wallet::WalletLedger},
    repository::Repository,
};

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<Repository>,
    pub wallet_ledger: Arc<WalletLedger>,
    pub order_workflow: Arc<OrderWorkflow>,
    pub admin_token: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    utils::logger::init_logger();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Setup database
    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://store.db".to_string());

    let repository = Arc::new(Repository::connect(&database_url).await?);
    repository.migrate().await?;

    // Test database connection
    sqlx::query("SELECT 1")
        .fetch_one(repository.get_pool())
        .await
        .expect("Gagal ping database");

    info!("✅ Database berhasil terkoneksi: {}", database_url);

    let admin_token =
        env::var("ADMIN_API_TOKEN").expect("ADMIN_API_TOKEN harus di-set di environment");

    // Initialize core services
    let wallet_ledger = Arc::new(WalletLedger::new(repository.clone()));
    let order_workflow = Arc::new(OrderWorkflow::new(
        repository.clone(),
        wallet_ledger.clone(),
        IPay88Client::from_env(),
    ));

    // Create application state
    let app_state = AppState {
        repository,
        wallet_ledger,
        order_workflow,
        admin_token,
    };

    // Setup CORS
    let cors = utils::cors::create_cors_layer();

    // Build application dengan middleware stack
    let app = Router::new()
        // Mount API routes (admin guard sudah terpasang di dalamnya)
        .merge(routes::create_routes(app_state.clone()))
        // Health check endpoint
        .route("/health", axum::routing::get(health_check))
        .with_state(app_state)
        .layer(
            ServiceBuilder::new()
                // Request tracing (paling luar)
                .layer(TraceLayer::new_for_http())
                // Timeout protection
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                // CORS handling
                .layer(cors),
        );

    // Server configuration
    let port = env::var("SERVER_PORT").unwrap_or_else(|_| "8787".to_string());
    let bind_address = format!("0.0.0.0:{}", port);

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("🚀 Store API berjalan di {}", bind_address);

    axum::serve(listener, app).await.map_err(|e| e.into())
}

// Health check endpoint
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "service": "store-api",
        "status": "healthy",
        "timestamp": chrono::Utc::now(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
