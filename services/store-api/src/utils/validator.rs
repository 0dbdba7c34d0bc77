// /lf-gaming-store/services/store-api/src/utils/validator.rs

use crate::models::{cents_from_amount, Cents};
use crate::utils::error::{AppError, AppResult};

/// Normalisasi email: trim + lowercase.
/// Semua lookup user dan wallet memakai bentuk ini.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validasi email format basic
pub fn validate_email_basic(email: &str) -> AppResult<()> {
    if !email.contains('@') || !email.contains('.') || email.len() < 5 {
        return Err(AppError::Validation("Format email tidak valid".to_string()));
    }

    if email.len() > 255 {
        return Err(AppError::Validation(
            "Email terlalu panjang (max 255 karakter)".to_string(),
        ));
    }

    Ok(())
}

/// Validasi amount desimal dari request dan konversi ke cents.
/// Harus finite dan lebih besar dari 0.
pub fn validate_positive_amount(amount: f64, field_name: &str) -> AppResult<Cents> {
    let cents = cents_from_amount(amount)
        .ok_or_else(|| AppError::Validation(format!("{} bukan angka yang valid", field_name)))?;

    if cents <= 0 {
        return Err(AppError::Validation(format!(
            "{} harus lebih besar dari 0",
            field_name
        )));
    }

    Ok(cents)
}

/// Validasi amount yang boleh nol (dipakai admin override saldo)
pub fn validate_non_negative_amount(amount: f64, field_name: &str) -> AppResult<Cents> {
    let cents = cents_from_amount(amount)
        .ok_or_else(|| AppError::Validation(format!("{} bukan angka yang valid", field_name)))?;

    if cents < 0 {
        return Err(AppError::Validation(format!(
            "{} tidak boleh negatif",
            field_name
        )));
    }

    Ok(cents)
}

/// Validasi string tidak kosong dan dalam batas panjang
pub fn validate_string_length(
    value: &str,
    field_name: &str,
    min_len: usize,
    max_len: usize,
) -> AppResult<()> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(AppError::Validation(format!(
            "{} tidak boleh kosong",
            field_name
        )));
    }

    if trimmed.len() < min_len {
        return Err(AppError::Validation(format!(
            "{} minimal {} karakter",
            field_name, min_len
        )));
    }

    if trimmed.len() > max_len {
        return Err(AppError::Validation(format!(
            "{} maksimal {} karakter",
            field_name, max_len
        )));
    }

    Ok(())
}
