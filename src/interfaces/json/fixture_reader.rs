use crate::domain::amount::NativeAmount;
use crate::domain::profile::{Address, Profile};
use crate::error::{PayError, Result};
use crate::infrastructure::in_memory::{InMemoryProfileDirectory, InMemoryWallet, WalletSetup};
use serde::Deserialize;
use std::io::Read;

fn default_symbol() -> String {
    "MATIC".to_string()
}

/// Wallet half of a session fixture. `balance` is a decimal string.
#[derive(Debug, Clone, Deserialize)]
pub struct WalletFixture {
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub connected: bool,
    pub chain_id: u64,
    pub balance: String,
    #[serde(default = "default_symbol")]
    pub symbol: String,
    #[serde(default)]
    pub fail_transfers: bool,
}

/// A scripted session: the user's wallet and the profiles search can find.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionFixture {
    pub wallet: WalletFixture,
    #[serde(default)]
    pub profiles: Vec<Profile>,
}

impl SessionFixture {
    /// Builds the in-memory collaborators this fixture describes.
    pub fn into_collaborators(
        self,
        decimals: u32,
    ) -> Result<(InMemoryWallet, InMemoryProfileDirectory)> {
        let balance = NativeAmount::parse_units(&self.wallet.balance, decimals).ok_or_else(|| {
            PayError::ValidationError(format!(
                "fixture balance {:?} is not a non-negative decimal",
                self.wallet.balance
            ))
        })?;

        let wallet = InMemoryWallet::from_setup(WalletSetup {
            address: self.wallet.address,
            connected: self.wallet.connected,
            chain_id: self.wallet.chain_id,
            balance,
            symbol: self.wallet.symbol,
            fail_transfers: self.wallet.fail_transfers,
        });
        Ok((wallet, InMemoryProfileDirectory::new(self.profiles)))
    }
}

/// Reads a session fixture from any `Read` source (e.g. File, Stdin).
pub struct FixtureReader<R: Read> {
    source: R,
}

impl<R: Read> FixtureReader<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    pub fn read(self) -> Result<SessionFixture> {
        serde_json::from_reader(self.source).map_err(PayError::from)
    }
}
