use crate::domain::amount::{Balance, NativeAmount};
use crate::domain::notification::Notification;
use crate::domain::ports::{Notifier, ProfileSearch, TransferReceipt, Wallet};
use crate::domain::profile::{Address, Profile, TransactionHash};
use crate::error::{PayError, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct WalletState {
    connectable: Option<Address>,
    connected: bool,
    chain_id: u64,
    balance: NativeAmount,
    decimals: u32,
    symbol: String,
    fail_transfers: bool,
    nonce: u64,
    transfers: Vec<(Address, NativeAmount)>,
    switch_requests: Vec<u64>,
}

/// Initial conditions for an [`InMemoryWallet`].
#[derive(Debug, Clone)]
pub struct WalletSetup {
    /// The account a `connect` exposes; `None` makes `connect` fail.
    pub address: Option<Address>,
    pub connected: bool,
    pub chain_id: u64,
    pub balance: NativeAmount,
    pub symbol: String,
    pub fail_transfers: bool,
}

/// A scripted wallet that keeps its chain state in memory.
///
/// `Clone` shares the underlying state, so tests can keep a handle for
/// inspection after boxing one into the controller.
#[derive(Clone)]
pub struct InMemoryWallet {
    state: Arc<RwLock<WalletState>>,
}

impl InMemoryWallet {
    pub fn from_setup(setup: WalletSetup) -> Self {
        Self {
            state: Arc::new(RwLock::new(WalletState {
                connectable: setup.address,
                connected: setup.connected,
                chain_id: setup.chain_id,
                balance: setup.balance,
                decimals: 18,
                symbol: setup.symbol,
                fail_transfers: setup.fail_transfers,
                nonce: 0,
                transfers: Vec::new(),
                switch_requests: Vec::new(),
            })),
        }
    }

    /// Creates a disconnected wallet on `chain_id`.
    pub fn new(address: Option<Address>, chain_id: u64, balance: NativeAmount) -> Self {
        Self::from_setup(WalletSetup {
            address,
            connected: false,
            chain_id,
            balance,
            symbol: "MATIC".to_string(),
            fail_transfers: false,
        })
    }

    /// Creates a wallet that is already connected.
    pub fn connected(address: Address, chain_id: u64, balance: NativeAmount) -> Self {
        Self::from_setup(WalletSetup {
            address: Some(address),
            connected: true,
            chain_id,
            balance,
            symbol: "MATIC".to_string(),
            fail_transfers: false,
        })
    }

    /// Makes every subsequent transfer fail as if the user rejected signing.
    pub async fn fail_transfers(&self, fail: bool) {
        self.state.write().await.fail_transfers = fail;
    }

    pub async fn transfers(&self) -> Vec<(Address, NativeAmount)> {
        self.state.read().await.transfers.clone()
    }

    pub async fn switch_requests(&self) -> Vec<u64> {
        self.state.read().await.switch_requests.clone()
    }

    pub async fn chain_id(&self) -> u64 {
        self.state.read().await.chain_id
    }
}

#[async_trait]
impl Wallet for InMemoryWallet {
    async fn connect(&self) -> Result<()> {
        let mut state = self.state.write().await;
        if state.connectable.is_none() {
            return Err(PayError::WalletError("connection rejected".to_string()));
        }
        state.connected = true;
        Ok(())
    }

    async fn connected_address(&self) -> Result<Option<Address>> {
        let state = self.state.read().await;
        Ok(state.connectable.clone().filter(|_| state.connected))
    }

    async fn network_mismatch(&self, target_chain_id: u64) -> Result<bool> {
        Ok(self.state.read().await.chain_id != target_chain_id)
    }

    async fn switch_network(&self, target_chain_id: u64) -> Result<()> {
        let mut state = self.state.write().await;
        state.switch_requests.push(target_chain_id);
        state.chain_id = target_chain_id;
        Ok(())
    }

    async fn read_balance(&self) -> Result<Option<Balance>> {
        let state = self.state.read().await;
        if !state.connected {
            return Ok(None);
        }
        Ok(Some(Balance::new(state.balance, state.decimals, state.symbol.clone())))
    }

    async fn transfer(&self, to: &Address, amount: NativeAmount) -> Result<TransferReceipt> {
        let mut state = self.state.write().await;
        if !state.connected {
            return Err(PayError::TransferError("wallet not connected".to_string()));
        }
        if state.fail_transfers {
            return Err(PayError::TransferError(
                "user rejected the request".to_string(),
            ));
        }
        let remaining = state
            .balance
            .checked_sub(amount)
            .ok_or_else(|| PayError::TransferError("insufficient funds for transfer".to_string()))?;

        state.balance = remaining;
        state.nonce += 1;
        state.transfers.push((to.clone(), amount));
        Ok(TransferReceipt {
            transaction_hash: TransactionHash(format!("0x{:064x}", state.nonce)),
        })
    }
}

/// Profile search over a fixed list, matching handles case-insensitively.
#[derive(Default, Clone)]
pub struct InMemoryProfileDirectory {
    profiles: Arc<Vec<Profile>>,
    queries: Arc<RwLock<Vec<String>>>,
}

impl InMemoryProfileDirectory {
    pub fn new(profiles: Vec<Profile>) -> Self {
        Self {
            profiles: Arc::new(profiles),
            queries: Arc::default(),
        }
    }

    /// Every query received so far, in order.
    pub async fn queries(&self) -> Vec<String> {
        self.queries.read().await.clone()
    }
}

#[async_trait]
impl ProfileSearch for InMemoryProfileDirectory {
    async fn search(&self, query: &str) -> Result<Vec<Profile>> {
        self.queries.write().await.push(query.to_string());
        let needle = query.to_lowercase();
        Ok(self
            .profiles
            .iter()
            .filter(|profile| profile.handle.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }
}

/// Keeps every notification it receives.
#[derive(Default, Clone)]
pub struct RecordingNotifier {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}
