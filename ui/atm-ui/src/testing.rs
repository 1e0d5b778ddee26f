//! In-memory wallet and contract used by the unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use alloy_primitives::{keccak256, Address, Bytes, TxHash, U256, U64};
use alloy_sol_types::SolInterface;
use async_trait::async_trait;

use crate::contract::IAssessment::IAssessmentCalls;
use crate::error::AtmError;
use crate::provider::{TransactionReceipt, TransactionRequest, WalletProvider};

#[derive(Default)]
struct Inner {
    authorized: Vec<Address>,
    approvable: Vec<Address>,
    deny_requests: bool,
    fail_list: bool,
    balance: U256,
    requests: usize,
    calls: usize,
    submitted: Vec<(&'static str, U256)>,
    receipts: HashMap<TxHash, TransactionReceipt>,
    pending_polls: usize,
    failing_reads: usize,
    polls: usize,
    nonce: u64,
}

/// Wallet that executes the ATM contract itself. `withdraw` and
/// `decreaseBalance` revert when the balance would go negative.
#[derive(Default)]
pub struct FakeWallet {
    inner: Mutex<Inner>,
}

impl FakeWallet {
    pub fn with_balance(balance: U256) -> Self {
        let wallet = Self::default();
        wallet.inner.lock().unwrap().balance = balance;
        wallet
    }

    /// Accounts handed out once the user approves a request.
    pub fn approving(self, accounts: Vec<Address>) -> Self {
        self.inner.lock().unwrap().approvable = accounts;
        self
    }

    /// Accounts visible to the silent query, as if approved in an earlier session.
    pub fn pre_authorized(self, accounts: Vec<Address>) -> Self {
        self.inner.lock().unwrap().authorized = accounts;
        self
    }

    pub fn denying(self) -> Self {
        self.inner.lock().unwrap().deny_requests = true;
        self
    }

    pub fn failing_silent_query(self) -> Self {
        self.inner.lock().unwrap().fail_list = true;
        self
    }

    pub fn set_pending_polls(&self, polls: usize) {
        self.inner.lock().unwrap().pending_polls = polls;
    }

    /// The next `reads` balance reads fail as if the node were unreachable.
    pub fn fail_reads(&self, reads: usize) {
        self.inner.lock().unwrap().failing_reads = reads;
    }

    pub fn set_balance(&self, balance: U256) {
        self.inner.lock().unwrap().balance = balance;
    }

    pub fn balance(&self) -> U256 {
        self.inner.lock().unwrap().balance
    }

    pub fn authorization_requests(&self) -> usize {
        self.inner.lock().unwrap().requests
    }

    pub fn read_calls(&self) -> usize {
        self.inner.lock().unwrap().calls
    }

    pub fn submitted(&self) -> Vec<(&'static str, U256)> {
        self.inner.lock().unwrap().submitted.clone()
    }

    pub fn receipt_polls(&self) -> usize {
        self.inner.lock().unwrap().polls
    }
}

fn decode(data: &Bytes) -> Result<IAssessmentCalls, AtmError> {
    Ok(IAssessmentCalls::abi_decode(data, true)?)
}

#[async_trait]
impl WalletProvider for FakeWallet {
    async fn list_accounts(&self) -> Result<Vec<Address>, AtmError> {
        let inner = self.inner.lock().unwrap();
        if inner.fail_list {
            return Err(AtmError::Http("connection refused".into()));
        }
        Ok(inner.authorized.clone())
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, AtmError> {
        let mut inner = self.inner.lock().unwrap();
        inner.requests += 1;
        if inner.deny_requests {
            return Err(AtmError::UserRejected("User rejected the request.".into()));
        }
        inner.authorized = inner.approvable.clone();
        Ok(inner.authorized.clone())
    }

    async fn call(&self, tx: &TransactionRequest) -> Result<Bytes, AtmError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls += 1;
        if inner.failing_reads > 0 {
            inner.failing_reads -= 1;
            return Err(AtmError::Http("connection reset".into()));
        }
        match decode(&tx.data)? {
            IAssessmentCalls::getBalance(_) => Ok(inner.balance.to_be_bytes::<32>().to_vec().into()),
            _ => Err(AtmError::Rpc {
                code: -32000,
                message: "state-changing call used as read".into(),
            }),
        }
    }

    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<TxHash, AtmError> {
        let mut inner = self.inner.lock().unwrap();
        let (method, amount, next) = match decode(&tx.data)? {
            IAssessmentCalls::deposit(c) => ("deposit", c.amount, inner.balance.checked_add(c.amount)),
            IAssessmentCalls::increaseBalance(c) => {
                ("increaseBalance", c.amount, inner.balance.checked_add(c.amount))
            }
            IAssessmentCalls::withdraw(c) => ("withdraw", c.amount, inner.balance.checked_sub(c.amount)),
            IAssessmentCalls::decreaseBalance(c) => {
                ("decreaseBalance", c.amount, inner.balance.checked_sub(c.amount))
            }
            IAssessmentCalls::getBalance(_) => ("getBalance", U256::ZERO, Some(inner.balance)),
        };
        inner.submitted.push((method, amount));

        inner.nonce += 1;
        let hash = keccak256(inner.nonce.to_be_bytes());
        let status = match next {
            Some(balance) => {
                inner.balance = balance;
                U64::from(1)
            }
            None => U64::ZERO,
        };
        let block_number = Some(U64::from(inner.nonce));
        inner.receipts.insert(
            hash,
            TransactionReceipt {
                transaction_hash: hash,
                block_number,
                status: Some(status),
            },
        );
        Ok(hash)
    }

    async fn transaction_receipt(
        &self,
        hash: TxHash,
    ) -> Result<Option<TransactionReceipt>, AtmError> {
        let mut inner = self.inner.lock().unwrap();
        inner.polls += 1;
        if inner.pending_polls > 0 {
            inner.pending_polls -= 1;
            return Ok(None);
        }
        Ok(inner.receipts.get(&hash).cloned())
    }
}
