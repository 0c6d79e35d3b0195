//! Solana JSON-RPC implementation of the fetch collaborators.

use super::{AccountSource, FetchError, TokenBalanceSource, MAX_ACCOUNT_BATCH};
use crate::domain::{Decimal, Pubkey};
use async_trait::async_trait;
use backoff::future::retry;
use backoff::ExponentialBackoff;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use futures::future::try_join_all;
use reqwest::Client;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

/// Account and token-balance reads against a Solana JSON-RPC node.
#[derive(Debug, Clone)]
pub struct SolanaRpcSource {
    client: Client,
    url: String,
    program_id: Pubkey,
}

impl SolanaRpcSource {
    /// Create a new RPC source for one program's accounts.
    pub fn new(url: String, program_id: Pubkey) -> Self {
        Self {
            client: Client::new(),
            url,
            program_id,
        }
    }

    async fn rpc_call(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, FetchError> {
        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let backoff = ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(30)),
            ..Default::default()
        };

        retry(backoff, || async {
            let response = self
                .client
                .post(&self.url)
                .json(&request)
                .send()
                .await
                .map_err(|e| backoff::Error::transient(FetchError::Network(e.to_string())))?;

            let status = response.status();
            if status == 429 {
                return Err(backoff::Error::transient(FetchError::RateLimited));
            }
            if status.is_server_error() {
                return Err(backoff::Error::transient(FetchError::Http {
                    status: status.as_u16(),
                    message: "Server error".to_string(),
                }));
            }
            if !status.is_success() {
                return Err(backoff::Error::permanent(FetchError::Http {
                    status: status.as_u16(),
                    message: "Client error".to_string(),
                }));
            }

            let body = response
                .json::<serde_json::Value>()
                .await
                .map_err(|e| backoff::Error::permanent(FetchError::Parse(e.to_string())))?;

            if let Some(error) = body.get("error") {
                return Err(backoff::Error::permanent(FetchError::Rpc {
                    code: error.get("code").and_then(|c| c.as_i64()).unwrap_or(0),
                    message: error
                        .get("message")
                        .and_then(|m| m.as_str())
                        .unwrap_or("unknown")
                        .to_string(),
                }));
            }

            body.get("result").cloned().ok_or_else(|| {
                backoff::Error::permanent(FetchError::Parse(
                    "response has neither result nor error".to_string(),
                ))
            })
        })
        .await
    }

    async fn token_accounts_total(
        &self,
        mint: &Pubkey,
        owner: &Pubkey,
    ) -> Result<Decimal, FetchError> {
        debug!(%mint, %owner, "fetching token accounts");
        let params = serde_json::json!([
            owner.to_string(),
            { "mint": mint.to_string() },
            { "encoding": "jsonParsed" },
        ]);
        let result = self.rpc_call("getTokenAccountsByOwner", params).await?;
        let entries = result
            .get("value")
            .and_then(|v| v.as_array())
            .ok_or_else(|| FetchError::Parse("expected value array".to_string()))?;

        let mut total = Decimal::zero();
        for entry in entries {
            let amount = entry
                .pointer("/account/data/parsed/info/tokenAmount/amount")
                .and_then(|v| v.as_str())
                .ok_or_else(|| FetchError::Parse("token account missing amount".to_string()))?;
            let amount = Decimal::from_str_canonical(amount)
                .map_err(|e| FetchError::Parse(format!("invalid token amount: {}", e)))?;
            total += amount;
        }
        Ok(total)
    }
}

fn account_bytes(entry: &serde_json::Value) -> Result<Vec<u8>, FetchError> {
    let encoded = entry
        .pointer("/data/0")
        .and_then(|v| v.as_str())
        .ok_or_else(|| FetchError::Parse("account entry missing data".to_string()))?;
    BASE64
        .decode(encoded)
        .map_err(|e| FetchError::Parse(format!("invalid base64 account data: {}", e)))
}

#[async_trait]
impl AccountSource for SolanaRpcSource {
    async fn multiple_accounts(
        &self,
        addresses: &[Pubkey],
    ) -> Result<Vec<Option<Vec<u8>>>, FetchError> {
        if addresses.len() > MAX_ACCOUNT_BATCH {
            return Err(FetchError::Other(format!(
                "batch of {} exceeds the {}-account transport limit",
                addresses.len(),
                MAX_ACCOUNT_BATCH
            )));
        }
        if addresses.is_empty() {
            return Ok(Vec::new());
        }
        debug!(count = addresses.len(), "fetching account batch");

        let keys: Vec<String> = addresses.iter().map(Pubkey::to_string).collect();
        let params = serde_json::json!([keys, { "encoding": "base64" }]);
        let result = self.rpc_call("getMultipleAccounts", params).await?;

        let values = result
            .get("value")
            .and_then(|v| v.as_array())
            .ok_or_else(|| FetchError::Parse("expected value array".to_string()))?;
        if values.len() != addresses.len() {
            return Err(FetchError::Parse(format!(
                "requested {} accounts, node returned {}",
                addresses.len(),
                values.len()
            )));
        }

        values
            .iter()
            .map(|entry| {
                if entry.is_null() {
                    Ok(None)
                } else {
                    account_bytes(entry).map(Some)
                }
            })
            .collect()
    }

    async fn program_accounts(
        &self,
        discriminator: [u8; 8],
    ) -> Result<Vec<(Pubkey, Vec<u8>)>, FetchError> {
        let params = serde_json::json!([
            self.program_id.to_string(),
            {
                "encoding": "base64",
                "filters": [
                    { "memcmp": { "offset": 0, "bytes": bs58::encode(&discriminator).into_string() } },
                ],
            },
        ]);
        let result = self.rpc_call("getProgramAccounts", params).await?;
        let entries = result
            .as_array()
            .ok_or_else(|| FetchError::Parse("expected account array".to_string()))?;

        let mut accounts = Vec::with_capacity(entries.len());
        for entry in entries {
            let address = entry.get("pubkey").and_then(|v| v.as_str());
            let address = match address.map(Pubkey::from_str) {
                Some(Ok(address)) => address,
                _ => {
                    warn!("program account entry with unparseable address skipped");
                    continue;
                }
            };
            match entry.get("account").map(account_bytes) {
                Some(Ok(data)) => accounts.push((address, data)),
                _ => warn!(account = %address, "program account entry without data skipped"),
            }
        }
        Ok(accounts)
    }
}

#[async_trait]
impl TokenBalanceSource for SolanaRpcSource {
    async fn sum_balances(&self, pairs: &[(Pubkey, Pubkey)]) -> Result<Decimal, FetchError> {
        let totals = try_join_all(
            pairs
                .iter()
                .map(|(mint, owner)| self.token_accounts_total(mint, owner)),
        )
        .await?;
        Ok(totals
            .into_iter()
            .fold(Decimal::zero(), |acc, total| acc + total))
    }
}
