// /lf-gaming-store/services/store-api/src/core/wallet.rs

use std::sync::Arc;

use crate::models::Cents;
use crate::repository::Repository;
use crate::utils::error::{AppError, AppResult};

/// Satu-satunya pemilik saldo wallet per akun (email yang sudah
/// dinormalisasi). Semua mutasi saldo di sistem lewat service ini.
pub struct WalletLedger {
    repository: Arc<Repository>,
}

impl WalletLedger {
    /// Create new wallet ledger
    pub fn new(repository: Arc<Repository>) -> Self {
        Self { repository }
    }

    /// Pastikan baris wallet ada (saldo awal 0). Aman dipanggil berulang.
    pub async fn ensure(&self, email: &str) -> AppResult<()> {
        self.repository.wallet().ensure(email).await
    }

    /// Baca saldo. Wallet yang belum ada dibaca sebagai 0 dan TIDAK
    /// dibuat di sini; pembuatan baris hanya lewat ensure/credit/debit.
    pub async fn balance(&self, email: &str) -> AppResult<Cents> {
        Ok(self.repository.wallet().balance(email).await?.unwrap_or(0))
    }

    /// Tambah saldo. Amount harus positif. Return saldo baru.
    pub async fn credit(&self, email: &str, amount: Cents) -> AppResult<Cents> {
        if amount <= 0 {
            return Err(AppError::Validation(
                "Amount credit harus lebih besar dari 0".to_string(),
            ));
        }

        self.repository.wallet().ensure(email).await?;

        self.repository
            .wallet()
            .credit(email, amount)
            .await?
            .ok_or_else(|| AppError::Database("Wallet hilang setelah ensure".to_string()))
    }

    /// Potong saldo. Amount harus positif; kalau saldo kurang, gagal
    /// dengan InsufficientFunds berisi saldo sekarang dan tidak ada
    /// mutasi. Check-and-decrement terjadi dalam satu conditional
    /// update, jadi dua debit bersamaan tidak bisa sama-sama lolos.
    pub async fn debit(&self, email: &str, amount: Cents) -> AppResult<Cents> {
        if amount <= 0 {
            return Err(AppError::Validation(
                "Amount debit harus lebih besar dari 0".to_string(),
            ));
        }

        self.repository.wallet().ensure(email).await?;

        match self.repository.wallet().try_debit(email, amount).await? {
            Some(new_balance) => Ok(new_balance),
            None => {
                let balance = self.balance(email).await?;
                Err(AppError::InsufficientFunds { balance })
            }
        }
    }

    /// Override saldo tanpa guard (admin tooling). Wallet dibuat dulu
    /// kalau belum ada supaya override selalu berhasil.
    pub async fn set_balance(&self, email: &str, amount: Cents) -> AppResult<()> {
        self.repository.wallet().ensure(email).await?;
        self.repository.wallet().set_balance(email, amount).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::test_repository;

    const EMAIL: &str = "buyer@example.com";

    async fn test_ledger() -> (Arc<WalletLedger>, Arc<Repository>, tempfile::TempDir) {
        let (repository, dir) = test_repository().await;
        let ledger = Arc::new(WalletLedger::new(repository.clone()));
        (ledger, repository, dir)
    }

    #[tokio::test]
    async fn test_balance_absent_is_zero_without_creating_row() {
        let (ledger, repository, _dir) = test_ledger().await;

        assert_eq!(ledger.balance(EMAIL).await.unwrap(), 0);
        // Baca saldo tidak boleh membuat baris wallet
        assert_eq!(repository.wallet().balance(EMAIL).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_ensure_is_idempotent() {
        let (ledger, repository, _dir) = test_ledger().await;

        ledger.ensure(EMAIL).await.unwrap();
        ledger.ensure(EMAIL).await.unwrap();

        assert_eq!(repository.wallet().balance(EMAIL).await.unwrap(), Some(0));
    }

    #[tokio::test]
    async fn test_credit_creates_wallet_and_returns_new_balance() {
        let (ledger, _repository, _dir) = test_ledger().await;

        assert_eq!(ledger.credit(EMAIL, 5_000).await.unwrap(), 5_000);
        assert_eq!(ledger.credit(EMAIL, 2_500).await.unwrap(), 7_500);
    }

    #[tokio::test]
    async fn test_debit_guard_leaves_balance_unchanged() {
        let (ledger, _repository, _dir) = test_ledger().await;

        ledger.credit(EMAIL, 3_000).await.unwrap();

        let err = ledger.debit(EMAIL, 5_000).await.unwrap_err();
        assert!(matches!(err, AppError::InsufficientFunds { balance: 3_000 }));
        assert_eq!(ledger.balance(EMAIL).await.unwrap(), 3_000);
    }

    #[tokio::test]
    async fn test_credit_debit_roundtrip_restores_balance() {
        let (ledger, _repository, _dir) = test_ledger().await;

        ledger.credit(EMAIL, 10_000).await.unwrap();
        ledger.credit(EMAIL, 4_200).await.unwrap();
        assert_eq!(ledger.debit(EMAIL, 4_200).await.unwrap(), 10_000);
    }

    #[tokio::test]
    async fn test_rejects_non_positive_amounts() {
        let (ledger, _repository, _dir) = test_ledger().await;

        assert!(matches!(
            ledger.credit(EMAIL, 0).await.unwrap_err(),
            AppError::Validation(_)
        ));
        assert!(matches!(
            ledger.debit(EMAIL, -100).await.unwrap_err(),
            AppError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_set_balance_overrides_without_guard() {
        let (ledger, _repository, _dir) = test_ledger().await;

        ledger.set_balance(EMAIL, 123_45).await.unwrap();
        assert_eq!(ledger.balance(EMAIL).await.unwrap(), 123_45);

        ledger.set_balance(EMAIL, 0).await.unwrap();
        assert_eq!(ledger.balance(EMAIL).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_debits_exactly_one_wins() {
        let (ledger, _repository, _dir) = test_ledger().await;

        ledger.credit(EMAIL, 10_000).await.unwrap();

        let l1 = ledger.clone();
        let l2 = ledger.clone();
        let (a, b) = tokio::join!(
            tokio::spawn(async move { l1.debit(EMAIL, 8_000).await }),
            tokio::spawn(async move { l2.debit(EMAIL, 8_000).await }),
        );
        let results = [a.unwrap(), b.unwrap()];

        let wins = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(wins, 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(AppError::InsufficientFunds { balance: 2_000 }))));
        assert_eq!(ledger.balance(EMAIL).await.unwrap(), 2_000);
    }
}
