//! Mock ledger for testing without network calls.

use super::{AccountSource, FetchError, TokenBalanceSource, MAX_ACCOUNT_BATCH};
use crate::domain::{Decimal, Pubkey};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory ledger snapshot returning predefined account data.
///
/// Records the size of every batched read so tests can assert on chunking
/// behavior.
#[derive(Debug, Default)]
pub struct MockLedger {
    accounts: Vec<(Pubkey, Vec<u8>)>,
    token_balances: HashMap<(Pubkey, Pubkey), Decimal>,
    batch_sizes: Mutex<Vec<usize>>,
    fail_batches: bool,
}

impl MockLedger {
    /// Create an empty mock ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account's raw data at an address.
    pub fn with_account(mut self, address: Pubkey, data: Vec<u8>) -> Self {
        self.accounts.push((address, data));
        self
    }

    /// Register a token balance for a (mint, owner) pair.
    pub fn with_token_balance(mut self, mint: Pubkey, owner: Pubkey, amount: Decimal) -> Self {
        self.token_balances.insert((mint, owner), amount);
        self
    }

    /// Make every batched account read fail, for fail-fast tests.
    pub fn with_failing_batches(mut self) -> Self {
        self.fail_batches = true;
        self
    }

    /// The size of every batched read performed so far, in call order.
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batch_sizes.lock().unwrap().clone()
    }

    fn lookup(&self, address: &Pubkey) -> Option<Vec<u8>> {
        self.accounts
            .iter()
            .find(|(key, _)| key == address)
            .map(|(_, data)| data.clone())
    }
}

#[async_trait]
impl AccountSource for MockLedger {
    async fn multiple_accounts(
        &self,
        addresses: &[Pubkey],
    ) -> Result<Vec<Option<Vec<u8>>>, FetchError> {
        self.batch_sizes.lock().unwrap().push(addresses.len());
        if self.fail_batches {
            return Err(FetchError::Network("mock batch failure".to_string()));
        }
        if addresses.len() > MAX_ACCOUNT_BATCH {
            return Err(FetchError::Other(format!(
                "batch of {} exceeds the {}-account transport limit",
                addresses.len(),
                MAX_ACCOUNT_BATCH
            )));
        }
        Ok(addresses.iter().map(|addr| self.lookup(addr)).collect())
    }

    async fn program_accounts(
        &self,
        discriminator: [u8; 8],
    ) -> Result<Vec<(Pubkey, Vec<u8>)>, FetchError> {
        Ok(self
            .accounts
            .iter()
            .filter(|(_, data)| data.len() >= 8 && data[..8] == discriminator)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TokenBalanceSource for MockLedger {
    async fn sum_balances(&self, pairs: &[(Pubkey, Pubkey)]) -> Result<Decimal, FetchError> {
        let mut total = Decimal::zero();
        for pair in pairs {
            if let Some(amount) = self.token_balances.get(pair) {
                total += *amount;
            }
        }
        Ok(total)
    }
}
