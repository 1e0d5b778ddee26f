//! Build-time configuration. Nothing here is read from the runtime environment.

use std::time::Duration;

use alloy_primitives::Address;

use crate::error::AtmError;

pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
pub const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Fixed amount, in display units, moved by the Deposit and Withdraw buttons.
/// This is 1 ETH (10^18 wei), not the literal `1` wei of a bare `deposit(1)`.
pub const FIXED_ACTION_AMOUNT: &str = "1";

#[derive(Clone, Debug, PartialEq)]
pub struct AtmConfig {
    pub rpc_url: String,
    pub contract_address: Address,
    pub receipt_poll_interval: Duration,
}

impl AtmConfig {
    /// Configuration compiled into the binary, with `ATM_RPC_URL` and
    /// `ATM_CONTRACT_ADDRESS` overrides taken at build time.
    pub fn bundled() -> Result<Self, AtmError> {
        Self::from_parts(
            option_env!("ATM_RPC_URL").unwrap_or(DEFAULT_RPC_URL),
            option_env!("ATM_CONTRACT_ADDRESS").unwrap_or(DEFAULT_CONTRACT_ADDRESS),
        )
    }

    pub fn from_parts(rpc_url: &str, contract_address: &str) -> Result<Self, AtmError> {
        if rpc_url.trim().is_empty() {
            return Err(AtmError::Config("empty RPC url".into()));
        }
        let contract_address = contract_address
            .parse::<Address>()
            .map_err(|e| AtmError::Config(format!("contract address {contract_address:?}: {e}")))?;

        Ok(Self {
            rpc_url: rpc_url.to_string(),
            contract_address,
            receipt_poll_interval: RECEIPT_POLL_INTERVAL,
        })
    }
}
