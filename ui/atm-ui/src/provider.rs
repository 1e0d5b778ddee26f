//! Wallet provider boundary: the trait the controller talks to, and a
//! JSON-RPC implementation for EIP-1193 style endpoints.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use alloy_primitives::{Address, Bytes, TxHash, U64};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::error::AtmError;

const CODE_METHOD_NOT_FOUND: i64 = -32601;
const CODE_METHOD_NOT_SUPPORTED: i64 = -32004;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Call or transaction sent to the provider. Gas and nonce are left to the wallet.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransactionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    pub to: Address,
    pub data: Bytes,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: TxHash,
    #[serde(default)]
    pub block_number: Option<U64>,
    /// Absent on pre-Byzantium chains.
    #[serde(default)]
    pub status: Option<U64>,
}

impl TransactionReceipt {
    pub fn succeeded(&self) -> bool {
        self.status.map_or(true, |s| s != U64::ZERO)
    }
}

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Accounts already authorized for this client, without prompting.
    async fn list_accounts(&self) -> Result<Vec<Address>, AtmError>;

    /// Ask the user to authorize accounts. May wait on the wallet UI.
    async fn request_accounts(&self) -> Result<Vec<Address>, AtmError>;

    /// Read-only call against the latest block.
    async fn call(&self, tx: &TransactionRequest) -> Result<Bytes, AtmError>;

    /// Sign and submit; returns once the wallet has accepted the transaction.
    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<TxHash, AtmError>;

    /// `None` while the transaction is still pending.
    async fn transaction_receipt(&self, hash: TxHash)
        -> Result<Option<TransactionReceipt>, AtmError>;
}

// ---------------------------------------------------------------------------
// JSON-RPC provider
// ---------------------------------------------------------------------------

static RPC_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    result: Option<Value>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// Wallet reached over HTTP JSON-RPC (a dev node or a wallet bridge).
#[derive(Clone)]
pub struct RpcWallet {
    url: String,
    client: reqwest::Client,
}

impl fmt::Debug for RpcWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcWallet").field("url", &self.url).finish()
    }
}

impl RpcWallet {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }

    #[cfg(test)]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Probe the endpoint. Any failure is treated as "no wallet installed".
    pub async fn detect(url: &str) -> Option<Self> {
        let wallet = Self::new(url);
        match wallet.request::<String>("web3_clientVersion", json!([])).await {
            Ok(version) => {
                info!(url, %version, "wallet provider detected");
                Some(wallet)
            }
            Err(e) => {
                info!(url, error = %e, "no wallet provider");
                None
            }
        }
    }

    async fn request<R: DeserializeOwned>(&self, method: &str, params: Value) -> Result<R, AtmError> {
        let id = RPC_ID.fetch_add(1, Ordering::Relaxed);
        let payload = JsonRpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };
        debug!(id, method, "rpc request");

        let response = self.client.post(&self.url).json(&payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AtmError::Http(format!("HTTP {status} from {}", self.url)));
        }

        let body: JsonRpcResponse = response.json().await?;
        if let Some(error) = body.error {
            return Err(AtmError::from_rpc(error.code, error.message));
        }
        Ok(serde_json::from_value(body.result.unwrap_or(Value::Null))?)
    }
}

#[async_trait]
impl WalletProvider for RpcWallet {
    async fn list_accounts(&self) -> Result<Vec<Address>, AtmError> {
        self.request("eth_accounts", json!([])).await
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, AtmError> {
        match self.request("eth_requestAccounts", json!([])).await {
            // Plain nodes expose their unlocked accounts without an approval step.
            Err(AtmError::Rpc { code, .. })
                if code == CODE_METHOD_NOT_FOUND || code == CODE_METHOD_NOT_SUPPORTED =>
            {
                debug!(code, "eth_requestAccounts unsupported, using eth_accounts");
                self.list_accounts().await
            }
            other => other,
        }
    }

    async fn call(&self, tx: &TransactionRequest) -> Result<Bytes, AtmError> {
        self.request("eth_call", json!([tx, "latest"])).await
    }

    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<TxHash, AtmError> {
        self.request("eth_sendTransaction", json!([tx])).await
    }

    async fn transaction_receipt(
        &self,
        hash: TxHash,
    ) -> Result<Option<TransactionReceipt>, AtmError> {
        self.request("eth_getTransactionReceipt", json!([hash])).await
    }
}
