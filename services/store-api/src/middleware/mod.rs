// /lf-gaming-store/services/store-api/src/middleware/mod.rs

pub mod admin;
