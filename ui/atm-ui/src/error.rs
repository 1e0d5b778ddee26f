//! Error type shared by the provider, contract and controller layers.

use alloy_primitives::TxHash;
use thiserror::Error;

/// EIP-1193 "user rejected request".
pub const CODE_USER_REJECTED: i64 = 4001;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AtmError {
    #[error("A wallet provider is required to connect")]
    WalletMissing,
    #[error("No account connected")]
    NoAccount,
    #[error("Wallet returned no accounts")]
    NoAccounts,
    #[error("Request rejected in wallet: {0}")]
    UserRejected(String),
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("Malformed response: {0}")]
    Decode(String),
    #[error("Transaction {0} reverted")]
    Reverted(TxHash),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Contract artifact: {0}")]
    Artifact(String),
}

impl AtmError {
    /// Maps a JSON-RPC error object, singling out wallet-side denials.
    pub fn from_rpc(code: i64, message: String) -> Self {
        if code == CODE_USER_REJECTED {
            Self::UserRejected(message)
        } else {
            Self::Rpc { code, message }
        }
    }
}

impl From<reqwest::Error> for AtmError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.to_string())
    }
}

impl From<serde_json::Error> for AtmError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

impl From<alloy_sol_types::Error> for AtmError {
    fn from(e: alloy_sol_types::Error) -> Self {
        Self::Decode(e.to_string())
    }
}
