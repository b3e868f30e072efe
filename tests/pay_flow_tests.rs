mod common;

use async_trait::async_trait;
use common::{PRODUCTION_CHAIN, address, harness, profile, tokens};
use handlepay::application::controller::PayOutcome;
use handlepay::application::session::Phase;
use handlepay::domain::amount::{Balance, NativeAmount};
use handlepay::domain::notification::Severity;
use handlepay::domain::payment::PayRejection;
use handlepay::domain::ports::{TransferReceipt, Wallet};
use handlepay::domain::profile::{Address, TransactionHash};
use handlepay::error::Result;
use handlepay::infrastructure::in_memory::{InMemoryProfileDirectory, InMemoryWallet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

/// Connected wallet with a fixed balance whose transfers return a fixed hash,
/// optionally parking until released.
#[derive(Clone)]
struct ScriptedWallet {
    balance: NativeAmount,
    hash: String,
    transfers: Arc<Mutex<Vec<(Address, NativeAmount)>>>,
    started: Arc<Notify>,
    release: Option<Arc<Notify>>,
}

impl ScriptedWallet {
    fn new(balance: &str, hash: &str) -> Self {
        Self {
            balance: tokens(balance),
            hash: hash.to_string(),
            transfers: Arc::default(),
            started: Arc::new(Notify::new()),
            release: None,
        }
    }

    fn parked(mut self) -> Self {
        self.release = Some(Arc::new(Notify::new()));
        self
    }

    fn transfer_count(&self) -> usize {
        self.transfers.lock().unwrap().len()
    }
}

#[async_trait]
impl Wallet for ScriptedWallet {
    async fn connect(&self) -> Result<()> {
        Ok(())
    }

    async fn connected_address(&self) -> Result<Option<Address>> {
        Ok(Some(address("f0")))
    }

    async fn network_mismatch(&self, _target_chain_id: u64) -> Result<bool> {
        Ok(false)
    }

    async fn switch_network(&self, _target_chain_id: u64) -> Result<()> {
        Ok(())
    }

    async fn read_balance(&self) -> Result<Option<Balance>> {
        Ok(Some(Balance::new(self.balance, 18, "ETH")))
    }

    async fn transfer(&self, to: &Address, amount: NativeAmount) -> Result<TransferReceipt> {
        self.transfers.lock().unwrap().push((to.clone(), amount));
        self.started.notify_one();
        if let Some(release) = &self.release {
            release.notified().await;
        }
        Ok(TransferReceipt {
            transaction_hash: TransactionHash(self.hash.clone()),
        })
    }
}

#[tokio::test]
async fn test_insufficient_balance_scenario() {
    let wallet = ScriptedWallet::new("1.0", "0xabc");
    let h = harness(wallet.clone(), InMemoryProfileDirectory::default());
    h.controller.sync_wallet().await.unwrap();

    h.controller.select_profile(profile("alice.lens", "a1")).await;
    h.controller.set_amount("2.0").await;

    let outcome = h.controller.pay().await.unwrap();
    assert_eq!(outcome, PayOutcome::Rejected(PayRejection::InsufficientBalance));
    assert_eq!(wallet.transfer_count(), 0);

    let notifications = h.notifier.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].title, "Insufficient Balance.");
    assert_eq!(notifications[0].severity, Severity::Error);
}

#[tokio::test]
async fn test_successful_payment_scenario() {
    let wallet = ScriptedWallet::new("1.0", "0xabc");
    let h = harness(wallet.clone(), InMemoryProfileDirectory::default());
    h.controller.sync_wallet().await.unwrap();

    h.controller.set_search_text("alice").await;
    h.controller.select_profile(profile("alice.lens", "a1")).await;
    h.controller.set_amount("0.5").await;

    let outcome = h.controller.pay().await.unwrap();
    assert_eq!(
        outcome,
        PayOutcome::Sent {
            transaction_hash: TransactionHash("0xabc".to_string())
        }
    );

    let transfers = wallet.transfers.lock().unwrap().clone();
    assert_eq!(transfers, vec![(address("a1"), tokens("0.5"))]);

    let notifications = h.notifier.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].severity, Severity::Success);
    assert!(notifications[0].description.as_deref().unwrap().contains("0xabc"));

    assert_eq!(h.controller.search_text().await, "");
    assert_eq!(h.controller.selected_profile().await, None);
    assert_eq!(h.controller.amount_text().await, "");
    assert_eq!(h.controller.phase().await, Phase::Browsing);
}

#[tokio::test]
async fn test_no_profile_selected() {
    let wallet = ScriptedWallet::new("1.0", "0xabc");
    let h = harness(wallet.clone(), InMemoryProfileDirectory::default());
    h.controller.sync_wallet().await.unwrap();

    for amount in ["0.5", "garbage", "5000"] {
        h.controller.set_amount(amount).await;
        let outcome = h.controller.pay().await.unwrap();
        assert_eq!(outcome, PayOutcome::Rejected(PayRejection::NoProfileSelected));
    }

    assert_eq!(wallet.transfer_count(), 0);
    assert!(
        h.notifier
            .notifications()
            .iter()
            .all(|n| n.title == "Invalid Profile selected.")
    );
}

#[tokio::test]
async fn test_invalid_amounts_never_reach_wallet() {
    let wallet = ScriptedWallet::new("1.0", "0xabc");
    let h = harness(wallet.clone(), InMemoryProfileDirectory::default());
    h.controller.sync_wallet().await.unwrap();
    h.controller.select_profile(profile("alice.lens", "a1")).await;

    for amount in ["", "abc", "0", "-1", "0.5.1", "1e3x"] {
        h.controller.set_amount(amount).await;
        let outcome = h.controller.pay().await.unwrap();
        assert_eq!(
            outcome,
            PayOutcome::Rejected(PayRejection::InvalidAmount),
            "amount {amount:?}"
        );
    }
    assert_eq!(wallet.transfer_count(), 0);
    assert_eq!(h.notifier.notifications().len(), 6);
}

#[tokio::test]
async fn test_rejection_clears_in_progress_flag() {
    let wallet = ScriptedWallet::new("1.0", "0xabc");
    let h = harness(wallet.clone(), InMemoryProfileDirectory::default());
    h.controller.sync_wallet().await.unwrap();
    h.controller.select_profile(profile("alice.lens", "a1")).await;

    h.controller.set_amount("nope").await;
    h.controller.pay().await.unwrap();
    assert_eq!(h.controller.phase().await, Phase::ReviewingPayment);

    // A corrected amount goes straight through instead of reporting InFlight.
    h.controller.set_amount("0.1").await;
    let outcome = h.controller.pay().await.unwrap();
    assert!(matches!(outcome, PayOutcome::Sent { .. }));
}

#[tokio::test]
async fn test_failed_transfer_preserves_state() {
    let wallet = InMemoryWallet::connected(address("f0"), PRODUCTION_CHAIN, tokens("1"));
    wallet.fail_transfers(true).await;
    let h = harness(wallet.clone(), InMemoryProfileDirectory::default());
    h.controller.sync_wallet().await.unwrap();

    let bob = profile("bob.lens", "b2");
    h.controller.set_search_text("bob").await;
    h.controller.select_profile(bob.clone()).await;
    h.controller.set_amount("0.25").await;

    let outcome = h.controller.pay().await.unwrap();
    assert!(matches!(outcome, PayOutcome::Failed { .. }));

    let notifications = h.notifier.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].severity, Severity::Error);
    assert_eq!(notifications[0].title, "Something went wrong");

    assert_eq!(h.controller.search_text().await, "bob");
    assert_eq!(h.controller.selected_profile().await, Some(bob));
    assert_eq!(h.controller.amount_text().await, "0.25");
    assert_eq!(h.controller.phase().await, Phase::ReviewingPayment);

    // Retry once the wallet cooperates.
    wallet.fail_transfers(false).await;
    let outcome = h.controller.pay().await.unwrap();
    assert!(matches!(outcome, PayOutcome::Sent { .. }));
    assert_eq!(wallet.transfers().await, vec![(address("b2"), tokens("0.25"))]);
}

#[tokio::test]
async fn test_balance_refreshes_after_payment() {
    let wallet = InMemoryWallet::connected(address("f0"), PRODUCTION_CHAIN, tokens("1"));
    let h = harness(wallet, InMemoryProfileDirectory::default());
    h.controller.sync_wallet().await.unwrap();

    h.controller.select_profile(profile("bob.lens", "b2")).await;
    h.controller.set_amount("0.4").await;
    h.controller.pay().await.unwrap();

    let balance = h.controller.balance().await.unwrap();
    assert_eq!(balance.display_value, "0.6");

    // The new balance is what later payments are checked against.
    h.controller.select_profile(profile("bob.lens", "b2")).await;
    h.controller.set_amount("0.7").await;
    assert_eq!(
        h.controller.pay().await.unwrap(),
        PayOutcome::Rejected(PayRejection::InsufficientBalance)
    );
}

#[tokio::test]
async fn test_duplicate_submission_is_refused() {
    let wallet = ScriptedWallet::new("1.0", "0xabc").parked();
    let release = wallet.release.clone().unwrap();
    let started = wallet.started.clone();
    let h = harness(wallet.clone(), InMemoryProfileDirectory::default());
    h.controller.sync_wallet().await.unwrap();
    h.controller.select_profile(profile("alice.lens", "a1")).await;
    h.controller.set_amount("0.5").await;

    let first = h.controller.pay();
    let second = async {
        started.notified().await;
        let phase = h.controller.phase().await;
        let outcome = h.controller.pay().await.unwrap();
        release.notify_one();
        (phase, outcome)
    };

    let (first, (phase, second)) = tokio::join!(first, second);
    assert_eq!(phase, Phase::Submitting);
    assert_eq!(second, PayOutcome::InFlight);
    assert!(matches!(first.unwrap(), PayOutcome::Sent { .. }));
    assert_eq!(wallet.transfer_count(), 1);
    assert_eq!(h.notifier.notifications().len(), 1);
}

#[tokio::test]
async fn test_back_returns_to_browsing() {
    let wallet = ScriptedWallet::new("1.0", "0xabc");
    let h = harness(wallet, InMemoryProfileDirectory::default());
    h.controller.sync_wallet().await.unwrap();

    h.controller.select_profile(profile("alice.lens", "a1")).await;
    assert_eq!(h.controller.phase().await, Phase::ReviewingPayment);

    h.controller.back().await;
    assert_eq!(h.controller.phase().await, Phase::Browsing);
    assert_eq!(
        h.controller.pay().await.unwrap(),
        PayOutcome::Rejected(PayRejection::NoProfileSelected)
    );
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_payment_releases_in_progress_flag() {
    // The transfer never completes, so the caller gives up on it.
    let wallet = ScriptedWallet::new("1.0", "0xabc").parked();
    let h = harness(wallet.clone(), InMemoryProfileDirectory::default());
    h.controller.sync_wallet().await.unwrap();
    h.controller.select_profile(profile("alice.lens", "a1")).await;
    h.controller.set_amount("0.5").await;

    let abandoned = tokio::time::timeout(Duration::from_secs(1), h.controller.pay()).await;
    assert!(abandoned.is_err());
    assert_eq!(wallet.transfer_count(), 1);
    assert_eq!(h.controller.phase().await, Phase::ReviewingPayment);

    h.controller.set_amount("nope").await;
    assert_eq!(
        h.controller.pay().await.unwrap(),
        PayOutcome::Rejected(PayRejection::InvalidAmount)
    );
}
