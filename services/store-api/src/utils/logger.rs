// /lf-gaming-store/services/store-api/src/utils/logger.rs

/// Logger initialization
pub fn init_logger() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("store_api=debug".parse().unwrap())
                .add_directive("tower_http=debug".parse().unwrap()),
        )
        .with_target(true)
        .with_line_number(true)
        .init();
}
