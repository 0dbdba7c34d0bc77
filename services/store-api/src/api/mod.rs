// /lf-gaming-store/services/store-api/src/api/mod.rs

pub mod handlers;
pub mod routes;
