// /lf-gaming-store/services/store-api/src/core/mod.rs

pub mod ipay88;
pub mod order;
pub mod wallet;
