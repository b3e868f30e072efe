use thiserror::Error;

#[derive(Error, Debug)]
pub enum PayError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Wallet error: {0}")]
    WalletError(String),
    #[error("Search error: {0}")]
    SearchError(String),
    #[error("Transfer error: {0}")]
    TransferError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, PayError>;
