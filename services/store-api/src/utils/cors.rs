// /lf-gaming-store/services/store-api/src/utils/cors.rs

use axum::http::{header, HeaderValue, Method};
use std::env;
use tower_http::cors::CorsLayer;

/// Setup CORS layer untuk storefront API.
/// Allow-list origin datang dari konfigurasi, bukan state milik core.
pub fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(parse_allowed_origins())
        .allow_methods(get_allowed_methods())
        .allow_headers(get_allowed_headers())
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(600))
}

/// Parse origins dari environment variable
fn parse_allowed_origins() -> Vec<HeaderValue> {
    let origins_str = env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| {
        "https://lelefongaming.com,https://www.lelefongaming.com,https://lelefon-gaming-store.pages.dev"
            .to_string()
    });

    origins_str
        .split(',')
        .filter_map(|origin| {
            let trimmed = origin.trim();
            match trimmed.parse::<HeaderValue>() {
                Ok(header) => {
                    tracing::debug!("CORS origin registered: {}", trimmed);
                    Some(header)
                }
                Err(e) => {
                    tracing::warn!("Invalid origin format '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}

/// Daftar HTTP methods yang diperbolehkan
fn get_allowed_methods() -> Vec<Method> {
    vec![
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ]
}

/// Daftar headers yang diizinkan (explicit list required untuk credentials)
fn get_allowed_headers() -> Vec<header::HeaderName> {
    vec![
        header::AUTHORIZATION,
        header::CONTENT_TYPE,
        header::ACCEPT,
        header::ORIGIN,
        header::HeaderName::from_static("x-admin-token"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins() {
        env::set_var(
            "ALLOWED_ORIGINS",
            "http://localhost:8080,http://localhost:3000",
        );
        assert_eq!(parse_allowed_origins().len(), 2);

        // Origin yang tidak valid di-skip, bukan bikin panic
        env::set_var("ALLOWED_ORIGINS", "http://localhost:8080,\u{7f}invalid");
        assert_eq!(parse_allowed_origins().len(), 1);

        env::remove_var("ALLOWED_ORIGINS");
    }
}
