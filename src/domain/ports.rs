use super::amount::{Balance, NativeAmount};
use super::notification::Notification;
use super::profile::{Address, Profile, TransactionHash};
use crate::error::Result;
use async_trait::async_trait;

/// What the chain collaborator hands back once a transfer is mined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    pub transaction_hash: TransactionHash,
}

/// Wallet and chain access. Signing and broadcasting live behind this seam.
#[async_trait]
pub trait Wallet: Send + Sync {
    /// Asks the user's wallet to connect.
    async fn connect(&self) -> Result<()>;
    async fn connected_address(&self) -> Result<Option<Address>>;
    async fn network_mismatch(&self, target_chain_id: u64) -> Result<bool>;
    async fn switch_network(&self, target_chain_id: u64) -> Result<()>;
    /// `None` while the balance is still loading.
    async fn read_balance(&self) -> Result<Option<Balance>>;
    async fn transfer(&self, to: &Address, amount: NativeAmount) -> Result<TransferReceipt>;
}

#[async_trait]
pub trait ProfileSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<Profile>>;
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

pub type WalletBox = Box<dyn Wallet>;
pub type ProfileSearchBox = Box<dyn ProfileSearch>;
pub type NotifierBox = Box<dyn Notifier>;
