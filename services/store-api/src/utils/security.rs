// /lf-gaming-store/services/store-api/src/utils/security.rs
// Password hashing untuk register/login.
// Skema Base64 reversible dari versi lama sengaja TIDAK dibawa ke sini.

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::utils::error::{AppError, AppResult};

/// Hash password dengan Argon2 default params
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Database(format!("Password hashing gagal: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Verifikasi password terhadap hash PHC string dari database
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
