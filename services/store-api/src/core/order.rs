// /lf-gaming-store/services/store-api/src/core/order.rs

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::ipay88::IPay88Client;
use crate::core::wallet::WalletLedger;
use crate::models::{
    cents_from_amount, Cents, CreateOrderRequest, NewOrderItem, Order, OrderItem, OrderStatus,
    PaymentMethod,
};
use crate::repository::Repository;
use crate::utils::error::{AppError, AppResult};
use crate::utils::validator::{
    normalize_email, validate_email_basic, validate_positive_amount, validate_string_length,
};
use crate::utils::ADMIN_ORDERS_CAP;

/// Hasil pembuatan order
#[derive(Debug)]
pub struct CreatedOrder {
    pub order_id: String,
    /// Redirect URL gateway; hanya ada untuk metode iPay88
    pub payment_url: Option<String>,
}

/// Service yang memegang pembuatan order dan state machine fulfillment:
///
///   Pending Payment -> Processing -> { Completed, Cancelled }
///   Cancelled -> Refunded
///
/// Completed dan Refunded terminal. Refund wajib lewat Cancelled dulu.
/// Semua transisi dieksekusi sebagai conditional update supaya dua
/// admin yang menekan tombol bersamaan tidak bisa dobel efek.
pub struct OrderWorkflow {
    repository: Arc<Repository>,
    ledger: Arc<WalletLedger>,
    gateway: IPay88Client,
}

impl OrderWorkflow {
    /// Create new order workflow
    pub fn new(
        repository: Arc<Repository>,
        ledger: Arc<WalletLedger>,
        gateway: IPay88Client,
    ) -> Self {
        Self {
            repository,
            ledger,
            gateway,
        }
    }

    /// Buat order baru dari cart.
    ///
    /// Untuk metode wallet urutannya penting: debit dulu, baru tulis
    /// order. Debit yang gagal berarti TIDAK ada order yang tercipta.
    /// Sebaliknya kalau penulisan order gagal setelah debit sukses,
    /// store tidak punya transaksi lintas-statement untuk rollback;
    /// kejadian itu dicatat sebagai event rekonsiliasi.
    pub async fn create_order(&self, request: CreateOrderRequest) -> AppResult<CreatedOrder> {
        let email = normalize_email(&request.email);
        validate_email_basic(&email)?;

        if request.items.is_empty() {
            return Err(AppError::Validation(
                "Order harus memiliki minimal satu item".to_string(),
            ));
        }

        let method = PaymentMethod::from_db_str(&request.payment_method).ok_or_else(|| {
            AppError::Validation(format!(
                "Metode pembayaran '{}' tidak didukung",
                request.payment_method
            ))
        })?;

        let total_cents = validate_positive_amount(request.total, "total")?;
        let items = self.collect_items(&request, total_cents)?;

        let order_id = format!("ORD-{}", Uuid::new_v4());

        let (status, payment_url) = match method {
            PaymentMethod::Wallet => {
                self.ledger.debit(&email, total_cents).await?;
                (OrderStatus::Processing, None)
            }
            PaymentMethod::IPay88 => {
                let session = self.gateway.create_checkout(&order_id, total_cents);
                (OrderStatus::PendingPayment, Some(session.payment_url))
            }
        };

        let order = Order {
            id: order_id.clone(),
            user_email: email.clone(),
            total_cents,
            payment_method: method,
            status,
            created_at: Utc::now(),
        };

        if let Err(e) = self
            .repository
            .order()
            .insert_order_with_items(&order, &items)
            .await
        {
            if method == PaymentMethod::Wallet {
                // Partial failure yang tidak bisa di-rollback: wallet sudah
                // terpotong tapi order tidak tertulis. Wajib tercatat lengkap
                // untuk rekonsiliasi manual.
                tracing::error!(
                    user_email = %email,
                    amount_cents = total_cents,
                    order_id = %order_id,
                    "Wallet sudah didebit tetapi penulisan order gagal; perlu rekonsiliasi"
                );
            }
            return Err(e);
        }

        tracing::info!(
            "Order {} dibuat untuk {} via {}",
            order_id,
            email,
            method.to_db_string()
        );

        Ok(CreatedOrder {
            order_id,
            payment_url,
        })
    }

    /// Validasi item request + cross-check total terhadap jumlah subtotal
    fn collect_items(
        &self,
        request: &CreateOrderRequest,
        total_cents: Cents,
    ) -> AppResult<Vec<NewOrderItem>> {
        let mut items = Vec::with_capacity(request.items.len());
        let mut subtotal: Cents = 0;

        for item in &request.items {
            validate_string_length(&item.game_name, "game_name", 1, 255)?;
            validate_string_length(&item.package_label, "package_label", 1, 255)?;

            if item.quantity < 1 {
                return Err(AppError::Validation(
                    "Quantity item minimal 1".to_string(),
                ));
            }

            let price_cents = cents_from_amount(item.price)
                .filter(|cents| *cents >= 0)
                .ok_or_else(|| AppError::Validation("Harga item tidak valid".to_string()))?;

            subtotal = price_cents
                .checked_mul(item.quantity)
                .and_then(|line| subtotal.checked_add(line))
                .ok_or_else(|| AppError::Validation("Total order melampaui batas".to_string()))?;

            items.push(NewOrderItem {
                game_name: item.game_name.trim().to_string(),
                package_label: item.package_label.trim().to_string(),
                quantity: item.quantity,
                // Harga di-lock dari request saat checkout, bukan dibaca
                // ulang dari katalog live
                price_cents,
                uid: item.uid.clone(),
            });
        }

        if subtotal != total_cents {
            return Err(AppError::Validation(
                "Total order tidak sama dengan jumlah subtotal item".to_string(),
            ));
        }

        Ok(items)
    }

    /// Tandai order selesai. Hanya valid dari Processing.
    pub async fn complete(&self, order_id: &str) -> AppResult<OrderStatus> {
        let rows = self
            .repository
            .order()
            .transition(order_id, &[OrderStatus::Processing], OrderStatus::Completed)
            .await?;

        if rows == 1 {
            tracing::info!("Order {} selesai", order_id);
            return Ok(OrderStatus::Completed);
        }

        let order = self.find_order(order_id).await?;
        Err(AppError::InvalidTransition {
            from: order.status.to_db_string().to_string(),
            action: "complete".to_string(),
        })
    }

    /// Batalkan order. Valid dari semua status non-terminal; mengulang
    /// cancel di order yang sudah Cancelled/Refunded sukses tanpa mutasi.
    pub async fn cancel(&self, order_id: &str) -> AppResult<OrderStatus> {
        let rows = self
            .repository
            .order()
            .transition(
                order_id,
                &[OrderStatus::PendingPayment, OrderStatus::Processing],
                OrderStatus::Cancelled,
            )
            .await?;

        if rows == 1 {
            tracing::info!("Order {} dibatalkan", order_id);
            return Ok(OrderStatus::Cancelled);
        }

        let order = self.find_order(order_id).await?;
        match order.status {
            OrderStatus::Cancelled | OrderStatus::Refunded => Ok(order.status),
            _ => Err(AppError::InvalidTransition {
                from: order.status.to_db_string().to_string(),
                action: "cancel".to_string(),
            }),
        }
    }

    /// Refund order yang sudah Cancelled. Untuk metode wallet, saldo
    /// dikembalikan MAKSIMAL sekali: kredit hanya bisa dicapai lewat
    /// conditional update Cancelled -> Refunded yang cuma bisa dimenangkan
    /// satu request. Mengulang refund di order Refunded sukses tanpa
    /// kredit kedua.
    pub async fn refund(&self, order_id: &str) -> AppResult<OrderStatus> {
        // Pre-read untuk metode & nominal; keputusan siapa yang boleh
        // mengkredit tetap di conditional update di bawah
        let order = self.find_order(order_id).await?;

        let rows = self
            .repository
            .order()
            .transition(order_id, &[OrderStatus::Cancelled], OrderStatus::Refunded)
            .await?;

        if rows == 1 {
            if order.payment_method == PaymentMethod::Wallet {
                if let Err(e) = self
                    .ledger
                    .credit(&order.user_email, order.total_cents)
                    .await
                {
                    // Status sudah terlanjur Refunded tapi saldo belum
                    // kembali: event rekonsiliasi, jangan ditelan
                    tracing::error!(
                        user_email = %order.user_email,
                        amount_cents = order.total_cents,
                        order_id = %order_id,
                        "Order sudah ditandai Refunded tetapi kredit wallet gagal; perlu rekonsiliasi"
                    );
                    return Err(e);
                }
            }
            tracing::info!("Order {} di-refund", order_id);
            return Ok(OrderStatus::Refunded);
        }

        let order = self.find_order(order_id).await?;
        match order.status {
            OrderStatus::Refunded => Ok(OrderStatus::Refunded),
            _ => Err(AppError::InvalidTransition {
                from: order.status.to_db_string().to_string(),
                action: "refund".to_string(),
            }),
        }
    }

    /// Admin mengisi PIN/kode redeem satu item. Dibatasi ke order yang
    /// sedang Processing atau sudah Completed.
    pub async fn set_item_pin(&self, order_id: &str, item_id: i64, pin: &str) -> AppResult<()> {
        validate_string_length(pin, "pin", 1, 255)?;

        let order = self.find_order(order_id).await?;
        if !matches!(
            order.status,
            OrderStatus::Processing | OrderStatus::Completed
        ) {
            return Err(AppError::Conflict(format!(
                "PIN hanya bisa diisi saat order Processing atau Completed (sekarang {})",
                order.status.to_db_string()
            )));
        }

        let rows = self
            .repository
            .order()
            .set_item_pin(order_id, item_id, pin.trim())
            .await?;

        if rows == 0 {
            return Err(AppError::NotFound("Item order tidak ditemukan".to_string()));
        }

        tracing::info!("PIN diisi untuk item {} order {}", item_id, order_id);
        Ok(())
    }

    /// Orders milik satu user, terbaru dulu
    pub async fn list_orders(&self, email: &str) -> AppResult<Vec<Order>> {
        self.repository
            .order()
            .list_by_email(&normalize_email(email))
            .await
    }

    /// Orders terbaru untuk admin, dibatasi cap
    pub async fn admin_recent_orders(&self) -> AppResult<Vec<Order>> {
        self.repository.order().list_recent(ADMIN_ORDERS_CAP).await
    }

    /// Item dari satu order; order id yang tidak dikenal jadi NotFound
    pub async fn order_items(&self, order_id: &str) -> AppResult<Vec<OrderItem>> {
        self.find_order(order_id).await?;
        self.repository.order().list_items(order_id).await
    }

    async fn find_order(&self, order_id: &str) -> AppResult<Order> {
        self.repository
            .order()
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Order tidak ditemukan".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderItemRequest;
    use crate::repository::test_support::test_repository;

    const EMAIL: &str = "buyer@example.com";

    async fn test_workflow() -> (
        Arc<OrderWorkflow>,
        Arc<WalletLedger>,
        tempfile::TempDir,
    ) {
        let (repository, dir) = test_repository().await;
        let ledger = Arc::new(WalletLedger::new(repository.clone()));
        let workflow = Arc::new(OrderWorkflow::new(
            repository,
            ledger.clone(),
            IPay88Client::from_env(),
        ));
        (workflow, ledger, dir)
    }

    fn single_item_request(email: &str, method: &str, price: f64, quantity: i64) -> CreateOrderRequest {
        CreateOrderRequest {
            email: email.to_string(),
            items: vec![OrderItemRequest {
                game_name: "Mobile Legends".to_string(),
                package_label: "86 Diamonds".to_string(),
                quantity,
                price,
                uid: Some("123456789".to_string()),
            }],
            total: price * quantity as f64,
            payment_method: method.to_string(),
        }
    }

    #[tokio::test]
    async fn test_wallet_order_rejected_when_funds_short() {
        let (workflow, ledger, _dir) = test_workflow().await;

        ledger.credit(EMAIL, 3_000).await.unwrap();

        let err = workflow
            .create_order(single_item_request(EMAIL, "LF Wallet", 50.0, 1))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InsufficientFunds { balance: 3_000 }));
        // Tidak boleh ada order yang tertulis dan saldo tidak berubah
        assert!(workflow.list_orders(EMAIL).await.unwrap().is_empty());
        assert_eq!(ledger.balance(EMAIL).await.unwrap(), 3_000);
    }

    #[tokio::test]
    async fn test_wallet_order_debits_and_starts_processing() {
        let (workflow, ledger, _dir) = test_workflow().await;

        ledger.credit(EMAIL, 10_000).await.unwrap();

        let created = workflow
            .create_order(single_item_request(EMAIL, "LF Wallet", 50.0, 1))
            .await
            .unwrap();

        assert!(created.order_id.starts_with("ORD-"));
        assert!(created.payment_url.is_none());
        assert_eq!(ledger.balance(EMAIL).await.unwrap(), 5_000);

        let orders = workflow.list_orders(EMAIL).await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].status, OrderStatus::Processing);
        assert_eq!(orders[0].total_cents, 5_000);
        assert_eq!(orders[0].payment_method, PaymentMethod::Wallet);
    }

    #[tokio::test]
    async fn test_ipay88_order_pends_without_touching_wallet() {
        let (workflow, ledger, _dir) = test_workflow().await;

        let created = workflow
            .create_order(single_item_request(EMAIL, "iPay88", 25.0, 2))
            .await
            .unwrap();

        let url = created.payment_url.expect("iPay88 harus dapat payment_url");
        assert!(url.contains(&created.order_id));

        let orders = workflow.list_orders(EMAIL).await.unwrap();
        assert_eq!(orders[0].status, OrderStatus::PendingPayment);
        // Metode gateway tidak menyentuh wallet sama sekali
        assert_eq!(ledger.balance(EMAIL).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_order_items_locked_at_submitted_prices() {
        let (workflow, _ledger, _dir) = test_workflow().await;

        let request = CreateOrderRequest {
            email: EMAIL.to_string(),
            items: vec![
                OrderItemRequest {
                    game_name: "Mobile Legends".to_string(),
                    package_label: "86 Diamonds".to_string(),
                    quantity: 2,
                    price: 10.50,
                    uid: Some("123456789".to_string()),
                },
                OrderItemRequest {
                    game_name: "Genshin Impact".to_string(),
                    package_label: "Blessing of the Welkin Moon".to_string(),
                    quantity: 1,
                    price: 19.90,
                    uid: None,
                },
            ],
            total: 40.90,
            payment_method: "iPay88".to_string(),
        };

        let created = workflow.create_order(request).await.unwrap();
        let items = workflow.order_items(&created.order_id).await.unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].price_cents, 1_050);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].uid.as_deref(), Some("123456789"));
        assert_eq!(items[1].price_cents, 1_990);
        assert!(items.iter().all(|item| item.pin.is_none()));
    }

    #[tokio::test]
    async fn test_create_order_validation_failures() {
        let (workflow, _ledger, _dir) = test_workflow().await;

        // Items kosong
        let mut request = single_item_request(EMAIL, "LF Wallet", 50.0, 1);
        request.items.clear();
        assert!(matches!(
            workflow.create_order(request).await.unwrap_err(),
            AppError::Validation(_)
        ));

        // Metode tidak dikenal
        let request = single_item_request(EMAIL, "paypal", 50.0, 1);
        assert!(matches!(
            workflow.create_order(request).await.unwrap_err(),
            AppError::Validation(_)
        ));

        // Total tidak cocok dengan subtotal item
        let mut request = single_item_request(EMAIL, "LF Wallet", 50.0, 1);
        request.total = 45.0;
        assert!(matches!(
            workflow.create_order(request).await.unwrap_err(),
            AppError::Validation(_)
        ));

        // Quantity nol
        let request = single_item_request(EMAIL, "LF Wallet", 50.0, 0);
        assert!(matches!(
            workflow.create_order(request).await.unwrap_err(),
            AppError::Validation(_)
        ));

        // Email rusak
        let request = single_item_request("bukan-email", "LF Wallet", 50.0, 1);
        assert!(matches!(
            workflow.create_order(request).await.unwrap_err(),
            AppError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_cancel_then_refund_restores_wallet() {
        let (workflow, ledger, _dir) = test_workflow().await;

        ledger.credit(EMAIL, 10_000).await.unwrap();
        let created = workflow
            .create_order(single_item_request(EMAIL, "LF Wallet", 50.0, 1))
            .await
            .unwrap();
        assert_eq!(ledger.balance(EMAIL).await.unwrap(), 5_000);

        assert_eq!(
            workflow.cancel(&created.order_id).await.unwrap(),
            OrderStatus::Cancelled
        );
        assert_eq!(
            workflow.refund(&created.order_id).await.unwrap(),
            OrderStatus::Refunded
        );
        assert_eq!(ledger.balance(EMAIL).await.unwrap(), 10_000);
    }

    #[tokio::test]
    async fn test_refund_is_idempotent_with_single_credit() {
        let (workflow, ledger, _dir) = test_workflow().await;

        ledger.credit(EMAIL, 10_000).await.unwrap();
        let created = workflow
            .create_order(single_item_request(EMAIL, "LF Wallet", 50.0, 1))
            .await
            .unwrap();

        workflow.cancel(&created.order_id).await.unwrap();
        workflow.refund(&created.order_id).await.unwrap();

        // Refund kedua: sukses tanpa kredit kedua
        assert_eq!(
            workflow.refund(&created.order_id).await.unwrap(),
            OrderStatus::Refunded
        );
        assert_eq!(ledger.balance(EMAIL).await.unwrap(), 10_000);
    }

    #[tokio::test]
    async fn test_refund_requires_cancelled_first() {
        let (workflow, ledger, _dir) = test_workflow().await;

        ledger.credit(EMAIL, 10_000).await.unwrap();
        let created = workflow
            .create_order(single_item_request(EMAIL, "LF Wallet", 50.0, 1))
            .await
            .unwrap();

        // Masih Processing: refund langsung ditolak
        let err = workflow.refund(&created.order_id).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidTransition { ref from, .. } if from == "Processing"
        ));
        assert_eq!(ledger.balance(EMAIL).await.unwrap(), 5_000);
    }

    #[tokio::test]
    async fn test_complete_only_from_processing() {
        let (workflow, ledger, _dir) = test_workflow().await;

        ledger.credit(EMAIL, 10_000).await.unwrap();
        let created = workflow
            .create_order(single_item_request(EMAIL, "LF Wallet", 50.0, 1))
            .await
            .unwrap();

        assert_eq!(
            workflow.complete(&created.order_id).await.unwrap(),
            OrderStatus::Completed
        );

        // Completed itu terminal: complete ulang dan cancel ditolak
        assert!(matches!(
            workflow.complete(&created.order_id).await.unwrap_err(),
            AppError::InvalidTransition { .. }
        ));
        assert!(matches!(
            workflow.cancel(&created.order_id).await.unwrap_err(),
            AppError::InvalidTransition { .. }
        ));
    }

    #[tokio::test]
    async fn test_cancel_is_idempotent() {
        let (workflow, _ledger, _dir) = test_workflow().await;

        let created = workflow
            .create_order(single_item_request(EMAIL, "iPay88", 25.0, 1))
            .await
            .unwrap();

        assert_eq!(
            workflow.cancel(&created.order_id).await.unwrap(),
            OrderStatus::Cancelled
        );
        assert_eq!(
            workflow.cancel(&created.order_id).await.unwrap(),
            OrderStatus::Cancelled
        );
    }

    #[tokio::test]
    async fn test_ipay88_refund_skips_wallet_credit() {
        let (workflow, ledger, _dir) = test_workflow().await;

        let created = workflow
            .create_order(single_item_request(EMAIL, "iPay88", 25.0, 1))
            .await
            .unwrap();

        workflow.cancel(&created.order_id).await.unwrap();
        workflow.refund(&created.order_id).await.unwrap();

        // Refund order gateway tidak mengkredit wallet
        assert_eq!(ledger.balance(EMAIL).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_set_item_pin_rules() {
        let (workflow, ledger, _dir) = test_workflow().await;

        ledger.credit(EMAIL, 10_000).await.unwrap();
        let created = workflow
            .create_order(single_item_request(EMAIL, "LF Wallet", 50.0, 1))
            .await
            .unwrap();
        let items = workflow.order_items(&created.order_id).await.unwrap();
        let item_id = items[0].id;

        // Processing: boleh diisi dan overwrite
        workflow
            .set_item_pin(&created.order_id, item_id, "CARD-1111-2222")
            .await
            .unwrap();
        workflow
            .set_item_pin(&created.order_id, item_id, "CARD-3333-4444")
            .await
            .unwrap();

        let items = workflow.order_items(&created.order_id).await.unwrap();
        assert_eq!(items[0].pin.as_deref(), Some("CARD-3333-4444"));

        // Item id asing di order yang valid
        assert!(matches!(
            workflow
                .set_item_pin(&created.order_id, item_id + 99, "X")
                .await
                .unwrap_err(),
            AppError::NotFound(_)
        ));

        // Setelah cancel, pengisian PIN ditolak
        workflow.cancel(&created.order_id).await.unwrap();
        assert!(matches!(
            workflow
                .set_item_pin(&created.order_id, item_id, "CARD-5555")
                .await
                .unwrap_err(),
            AppError::Conflict(_)
        ));
    }

    #[tokio::test]
    async fn test_unknown_order_is_not_found() {
        let (workflow, _ledger, _dir) = test_workflow().await;

        for result in [
            workflow.complete("ORD-tidak-ada").await,
            workflow.cancel("ORD-tidak-ada").await,
            workflow.refund("ORD-tidak-ada").await,
        ] {
            assert!(matches!(result.unwrap_err(), AppError::NotFound(_)));
        }

        assert!(matches!(
            workflow.order_items("ORD-tidak-ada").await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_user_orders_listed_newest_first() {
        let (workflow, ledger, _dir) = test_workflow().await;

        ledger.credit(EMAIL, 20_000).await.unwrap();
        let first = workflow
            .create_order(single_item_request(EMAIL, "LF Wallet", 50.0, 1))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = workflow
            .create_order(single_item_request(EMAIL, "LF Wallet", 50.0, 1))
            .await
            .unwrap();

        let orders = workflow.list_orders(EMAIL).await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].id, second.order_id);
        assert_eq!(orders[1].id, first.order_id);

        // Email query dinormalisasi seperti saat order dibuat
        let orders = workflow.list_orders(" Buyer@Example.COM ").await.unwrap();
        assert_eq!(orders.len(), 2);
    }
}
