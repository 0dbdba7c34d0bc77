// /lf-gaming-store/services/store-api/src/core/ipay88.rs

use rand::Rng;

use crate::models::{format_cents, Cents};

/// Client simulasi untuk gateway iPay88. Tidak ada request keluar:
/// checkout hanya menghasilkan redirect URL placeholder yang dipakai
/// frontend, dan status order menunggu konfirmasi manual admin.
pub struct IPay88Client {
    merchant_code: String,
    entry_url: String,
}

/// Hasil checkout simulasi untuk satu order
pub struct CheckoutSession {
    pub ref_no: String,
    pub payment_url: String,
}

impl IPay88Client {
    /// Ambil konfigurasi dari environment dengan default sandbox
    pub fn from_env() -> Self {
        Self {
            merchant_code: std::env::var("IPAY88_MERCHANT_CODE")
                .unwrap_or_else(|_| "M00000".to_string()),
            entry_url: std::env::var("IPAY88_ENTRY_URL").unwrap_or_else(|_| {
                "https://payment.ipay88.com.my/epayment/entry.asp".to_string()
            }),
        }
    }

    /// Bikin checkout session untuk satu order. RefNo = order id,
    /// token acak menggantikan signature gateway yang asli.
    pub fn create_checkout(&self, order_id: &str, total: Cents) -> CheckoutSession {
        let token: u64 = rand::rng().random();

        let payment_url = format!(
            "{}?MerchantCode={}&RefNo={}&Amount={}&Signature={:016x}",
            self.entry_url,
            self.merchant_code,
            order_id,
            format_cents(total),
            token
        );

        CheckoutSession {
            ref_no: order_id.to_string(),
            payment_url,
        }
    }
}
