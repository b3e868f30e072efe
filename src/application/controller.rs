use super::session::{Gate, Phase, SearchStatus, SearchView, SessionState};
use crate::config::Config;
use crate::domain::amount::Balance;
use crate::domain::notification::Notification;
use crate::domain::payment::{PayRejection, PaymentRequest};
use crate::domain::ports::{NotifierBox, ProfileSearchBox, WalletBox};
use crate::domain::profile::{Profile, TransactionHash};
use crate::error::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// How a pay action ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayOutcome {
    /// The transfer went through; selection, amount and search were cleared.
    Sent { transaction_hash: TransactionHash },
    /// A local precondition failed; the wallet was never contacted.
    Rejected(PayRejection),
    /// The wallet reported an error; selection and amount are kept for a retry.
    Failed { reason: String },
    /// Another payment from this session is still being submitted.
    InFlight,
    /// The payment UI is withheld behind a connect or switch prompt.
    Withheld(Gate),
}

/// Holds the in-progress flag for one pay action. Dropping it lowers the flag,
/// including when the `pay` future is cancelled mid-transfer.
struct SubmissionGuard<'a> {
    submitting: &'a AtomicBool,
}

impl<'a> SubmissionGuard<'a> {
    fn acquire(submitting: &'a AtomicBool) -> Option<Self> {
        submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { submitting })
    }
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        self.submitting.store(false, Ordering::Release);
    }
}

/// Drives one page session: wallet gating, debounced profile search and the
/// pay action.
///
/// Collaborators are injected at construction. All state sits behind an
/// `RwLock` and every method takes `&self`, so the view can be read while a
/// search or transfer is being awaited.
pub struct PaymentFlowController {
    config: Config,
    wallet: WalletBox,
    search: ProfileSearchBox,
    notifier: NotifierBox,
    state: RwLock<SessionState>,
    submitting: AtomicBool,
}

impl PaymentFlowController {
    /// Creates a controller for a fresh session.
    ///
    /// # Arguments
    ///
    /// * `config` - Resolved environment; fixes the target chain for the session.
    /// * `wallet` - Wallet and chain collaborator.
    /// * `search` - Profile search collaborator.
    /// * `notifier` - Sink for user-facing notifications.
    pub fn new(
        config: Config,
        wallet: WalletBox,
        search: ProfileSearchBox,
        notifier: NotifierBox,
    ) -> Self {
        Self {
            state: RwLock::new(SessionState::new(config.search_debounce)),
            config,
            wallet,
            search,
            notifier,
            submitting: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Re-reads address, network and balance from the wallet.
    pub async fn sync_wallet(&self) -> Result<Gate> {
        let address = self.wallet.connected_address().await?;
        let (network_mismatch, balance) = if address.is_some() {
            let mismatch = self
                .wallet
                .network_mismatch(self.config.chain.chain_id)
                .await?;
            (mismatch, self.wallet.read_balance().await?)
        } else {
            (false, None)
        };

        let mut state = self.state.write().await;
        state.address = address;
        state.network_mismatch = network_mismatch;
        state.balance = balance;
        Ok(state.gate(self.config.chain.chain_id))
    }

    pub async fn connect_wallet(&self) -> Result<Gate> {
        self.wallet.connect().await?;
        let gate = self.sync_wallet().await?;
        info!(?gate, "wallet connected");
        Ok(gate)
    }

    /// Asks the wallet to move to the session's target chain.
    pub async fn switch_network(&self) -> Result<Gate> {
        let chain_id = self.config.chain.chain_id;
        info!(chain_id, chain = self.config.chain.name, "requesting network switch");
        self.wallet.switch_network(chain_id).await?;
        self.sync_wallet().await
    }

    pub async fn gate(&self) -> Gate {
        self.state.read().await.gate(self.config.chain.chain_id)
    }

    pub async fn balance(&self) -> Option<Balance> {
        self.state.read().await.balance.clone()
    }

    pub async fn phase(&self) -> Phase {
        let state = self.state.read().await;
        state.phase(self.submitting.load(Ordering::Acquire))
    }

    pub async fn set_search_text(&self, text: impl Into<String>) {
        self.state.write().await.set_search_text(text.into());
    }

    pub async fn search_text(&self) -> String {
        self.state.read().await.search_text.clone()
    }

    /// The lagged search text; this is what gets sent to the search collaborator.
    pub async fn debounced_query(&self) -> String {
        self.state.write().await.debounced_search.value().clone()
    }

    /// Sleeps until the search text has been quiet for the full debounce window.
    pub async fn wait_for_quiet(&self) {
        loop {
            let deadline = self.state.read().await.debounced_search.deadline();
            match deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => return,
            }
            // A keystroke during the sleep pushes the deadline out again.
            let mut state = self.state.write().await;
            state.debounced_search.value();
            if state.debounced_search.deadline().is_none() {
                return;
            }
        }
    }

    /// Sends the debounced query to the search collaborator if it changed.
    ///
    /// Results for a query that was superseded while in flight are dropped.
    pub async fn refresh_search(&self) -> Result<SearchView> {
        let query = {
            let mut state = self.state.write().await;
            let query = state.debounced_search.value().trim().to_string();
            if query.is_empty() {
                state.search = SearchStatus::Idle;
                return Ok(SearchView::Idle);
            }
            match &state.search {
                SearchStatus::Loaded { query: loaded, .. }
                | SearchStatus::Loading { query: loaded }
                    if *loaded == query =>
                {
                    return Ok(state.search_view());
                }
                _ => {}
            }
            state.search = SearchStatus::Loading {
                query: query.clone(),
            };
            query
        };

        debug!(%query, "searching profiles");
        let result = self.search.search(&query).await;

        let mut state = self.state.write().await;
        let still_current =
            matches!(&state.search, SearchStatus::Loading { query: pending } if *pending == query);
        match result {
            Ok(profiles) if still_current => {
                debug!(%query, count = profiles.len(), "search results");
                state.search = SearchStatus::Loaded { query, profiles };
            }
            Ok(_) => debug!(%query, "discarding superseded search results"),
            Err(e) => {
                warn!(%query, error = %e, "profile search failed");
                if still_current {
                    state.search = SearchStatus::Idle;
                }
                return Err(e);
            }
        }
        Ok(state.search_view())
    }

    pub async fn search_view(&self) -> SearchView {
        self.state.read().await.search_view()
    }

    pub async fn select_profile(&self, profile: Profile) {
        debug!(handle = %profile.handle, "profile selected");
        self.state.write().await.selected = Some(profile);
    }

    pub async fn selected_profile(&self) -> Option<Profile> {
        self.state.read().await.selected.clone()
    }

    /// Returns from payment review to the search results.
    pub async fn back(&self) {
        self.state.write().await.selected = None;
    }

    pub async fn set_amount(&self, text: impl Into<String>) {
        self.state.write().await.amount_text = text.into();
    }

    pub async fn amount_text(&self) -> String {
        self.state.read().await.amount_text.clone()
    }

    /// Validates the current selection and amount, then submits the transfer.
    ///
    /// Every outcome except `InFlight` and `Withheld` produces exactly one
    /// notification. The in-progress flag is down again once this returns or
    /// its future is dropped.
    pub async fn pay(&self) -> Result<PayOutcome> {
        let (_guard, request) = {
            let state = self.state.read().await;
            let gate = state.gate(self.config.chain.chain_id);
            if gate != Gate::Ready {
                return Ok(PayOutcome::Withheld(gate));
            }
            let Some(guard) = SubmissionGuard::acquire(&self.submitting) else {
                return Ok(PayOutcome::InFlight);
            };
            let request = PaymentRequest::validate(
                state.selected.as_ref(),
                &state.amount_text,
                state.balance.as_ref(),
                self.config.chain.native_decimals,
            );
            (guard, request)
        };

        let outcome = match request {
            Ok(request) => self.submit(request).await,
            Err(rejection) => {
                debug!(%rejection, "payment rejected");
                self.notifier.notify(Notification::error(rejection.to_string()));
                PayOutcome::Rejected(rejection)
            }
        };

        Ok(outcome)
    }

    async fn submit(&self, request: PaymentRequest) -> PayOutcome {
        let decimals = self.config.chain.native_decimals;
        info!(
            recipient = %request.recipient,
            amount = %request.amount.format_units(decimals),
            "submitting transfer"
        );

        match self.wallet.transfer(&request.recipient, request.amount).await {
            Ok(receipt) => {
                let transaction_hash = receipt.transaction_hash;
                info!(%transaction_hash, "transfer confirmed");
                self.notifier.notify(
                    Notification::success("Payment sent")
                        .with_description(format!("Transaction hash: {transaction_hash}")),
                );
                self.state.write().await.clear_payment();
                if let Err(e) = self.sync_wallet().await {
                    warn!(error = %e, "failed to refresh wallet after transfer");
                }
                PayOutcome::Sent { transaction_hash }
            }
            Err(e) => {
                warn!(error = %e, "transfer failed");
                self.notifier.notify(
                    Notification::error("Something went wrong")
                        .with_description("The transaction could not be completed. Please try again."),
                );
                PayOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
