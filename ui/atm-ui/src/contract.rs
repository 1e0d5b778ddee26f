//! ATM contract bindings: calldata via `sol!`, interface checked against the
//! bundled Hardhat artifact, and receipt polling for submitted calls.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use alloy_json_abi::JsonAbi;
use alloy_primitives::{Address, TxHash, U256};
use alloy_sol_types::{sol, SolCall};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::AtmError;
use crate::provider::{TransactionReceipt, TransactionRequest, WalletProvider};

sol! {
    interface IAssessment {
        function getBalance() external view returns (uint256);
        function deposit(uint256 amount) external;
        function withdraw(uint256 amount) external;
        function increaseBalance(uint256 amount) external;
        function decreaseBalance(uint256 amount) external;
    }
}

const BUNDLED_ARTIFACT: &str =
    include_str!("../artifacts/contracts/Assessment.sol/Assessment.json");

// ---------------------------------------------------------------------------
// Interface descriptor
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HardhatArtifact {
    contract_name: String,
    abi: JsonAbi,
}

/// Contract name from the build artifact, whose ABI was verified to declare
/// every function this client calls.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractInterface {
    name: String,
}

fn required_functions() -> [(&'static str, &'static str, [u8; 4]); 5] {
    use IAssessment::*;
    [
        ("getBalance", getBalanceCall::SIGNATURE, getBalanceCall::SELECTOR),
        ("deposit", depositCall::SIGNATURE, depositCall::SELECTOR),
        ("withdraw", withdrawCall::SIGNATURE, withdrawCall::SELECTOR),
        ("increaseBalance", increaseBalanceCall::SIGNATURE, increaseBalanceCall::SELECTOR),
        ("decreaseBalance", decreaseBalanceCall::SIGNATURE, decreaseBalanceCall::SELECTOR),
    ]
}

impl ContractInterface {
    pub fn bundled() -> Result<Self, AtmError> {
        Self::from_artifact(BUNDLED_ARTIFACT)
    }

    pub fn from_artifact(json: &str) -> Result<Self, AtmError> {
        let artifact: HardhatArtifact =
            serde_json::from_str(json).map_err(|e| AtmError::Artifact(e.to_string()))?;

        for (name, signature, selector) in required_functions() {
            let declared = artifact
                .abi
                .function(name)
                .map_or(false, |overloads| overloads.iter().any(|f| f.selector().0 == selector));
            if !declared {
                return Err(AtmError::Artifact(format!(
                    "{} does not declare {signature}",
                    artifact.contract_name
                )));
            }
        }

        Ok(Self {
            name: artifact.contract_name,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

// ---------------------------------------------------------------------------
// Contract handle
// ---------------------------------------------------------------------------

/// Deployed contract bound to a signer. Only built once an account is known,
/// which is why `signer` is not optional.
#[derive(Clone)]
pub struct ContractHandle {
    provider: Arc<dyn WalletProvider>,
    signer: Address,
    address: Address,
    interface: Arc<ContractInterface>,
    poll_interval: Duration,
}

impl fmt::Debug for ContractHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractHandle")
            .field("contract", &self.interface.name())
            .field("address", &self.address)
            .field("signer", &self.signer)
            .finish()
    }
}

impl ContractHandle {
    pub fn new(
        provider: Arc<dyn WalletProvider>,
        signer: Address,
        address: Address,
        interface: Arc<ContractInterface>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            provider,
            signer,
            address,
            interface,
            poll_interval,
        }
    }

    pub fn signer(&self) -> Address {
        self.signer
    }

    pub fn address(&self) -> Address {
        self.address
    }

    fn request<C: SolCall>(&self, call: &C) -> TransactionRequest {
        TransactionRequest {
            from: Some(self.signer),
            to: self.address,
            data: call.abi_encode().into(),
        }
    }

    /// Balance held by the contract, in base units.
    pub async fn get_balance(&self) -> Result<U256, AtmError> {
        let data = self
            .provider
            .call(&self.request(&IAssessment::getBalanceCall {}))
            .await?;
        let decoded = IAssessment::getBalanceCall::abi_decode_returns(&data, true)?;
        Ok(decoded._0)
    }

    pub async fn deposit(&self, amount: U256) -> Result<PendingTransaction, AtmError> {
        self.submit(IAssessment::depositCall { amount }).await
    }

    pub async fn withdraw(&self, amount: U256) -> Result<PendingTransaction, AtmError> {
        self.submit(IAssessment::withdrawCall { amount }).await
    }

    pub async fn increase_balance(&self, amount: U256) -> Result<PendingTransaction, AtmError> {
        self.submit(IAssessment::increaseBalanceCall { amount }).await
    }

    pub async fn decrease_balance(&self, amount: U256) -> Result<PendingTransaction, AtmError> {
        self.submit(IAssessment::decreaseBalanceCall { amount }).await
    }

    async fn submit<C: SolCall>(&self, call: C) -> Result<PendingTransaction, AtmError> {
        let hash = self.provider.send_transaction(&self.request(&call)).await?;
        info!(method = C::SIGNATURE, %hash, "transaction submitted");
        Ok(PendingTransaction {
            hash,
            provider: Arc::clone(&self.provider),
            poll_interval: self.poll_interval,
        })
    }
}

// ---------------------------------------------------------------------------
// Pending transaction
// ---------------------------------------------------------------------------

pub struct PendingTransaction {
    hash: TxHash,
    provider: Arc<dyn WalletProvider>,
    poll_interval: Duration,
}

impl PendingTransaction {
    pub fn hash(&self) -> TxHash {
        self.hash
    }

    /// Waits for inclusion. There is no deadline: an unmined transaction keeps
    /// the caller waiting.
    pub async fn confirmed(self) -> Result<TransactionReceipt, AtmError> {
        loop {
            if let Some(receipt) = self.provider.transaction_receipt(self.hash).await? {
                if !receipt.succeeded() {
                    return Err(AtmError::Reverted(self.hash));
                }
                info!(hash = %self.hash, block = ?receipt.block_number, "transaction confirmed");
                return Ok(receipt);
            }
            debug!(hash = %self.hash, "receipt pending");
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
