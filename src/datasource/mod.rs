//! Fetch collaborators for reading account snapshots and token balances.

use crate::domain::{Decimal, Pubkey};
use async_trait::async_trait;
use std::fmt;

pub mod mock;
pub mod rpc;

pub use mock::MockLedger;
pub use rpc::SolanaRpcSource;

/// Hard transport ceiling on accounts per batched read.
pub const MAX_ACCOUNT_BATCH: usize = 99;

/// Read-only access to raw account snapshots.
///
/// Implementations own retry/backoff; callers treat a returned error as
/// final for that request.
#[async_trait]
pub trait AccountSource: Send + Sync + fmt::Debug {
    /// Fetch raw data for each address, preserving order and length.
    ///
    /// An address with no account on ledger yields `None`. At most
    /// [`MAX_ACCOUNT_BATCH`] addresses per call; chunking larger sets is
    /// the caller's job.
    async fn multiple_accounts(
        &self,
        addresses: &[Pubkey],
    ) -> Result<Vec<Option<Vec<u8>>>, FetchError>;

    /// Fetch every program-owned account whose data starts with the given
    /// 8-byte discriminator, with its address.
    async fn program_accounts(
        &self,
        discriminator: [u8; 8],
    ) -> Result<Vec<(Pubkey, Vec<u8>)>, FetchError>;
}

/// Token-balance summation: turns (mint, owner) pairs into one total.
#[async_trait]
pub trait TokenBalanceSource: Send + Sync + fmt::Debug {
    async fn sum_balances(&self, pairs: &[(Pubkey, Pubkey)]) -> Result<Decimal, FetchError>;
}

/// Error type for fetch operations. Fatal for the chunk it occurred in,
/// and therefore for that market's computation.
#[derive(Debug, Clone)]
pub enum FetchError {
    /// Network error (e.g., connection timeout, DNS failure)
    Network(String),
    /// HTTP error (e.g., 429 rate limit, 5xx server error)
    Http { status: u16, message: String },
    /// The RPC node rejected the call
    Rpc { code: i64, message: String },
    /// Parsing error (invalid JSON or malformed response)
    Parse(String),
    /// Rate limit exceeded after retries
    RateLimited,
    /// Other error
    Other(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Network(msg) => write!(f, "Network error: {}", msg),
            FetchError::Http { status, message } => {
                write!(f, "HTTP error {}: {}", status, message)
            }
            FetchError::Rpc { code, message } => write!(f, "RPC error {}: {}", code, message),
            FetchError::Parse(msg) => write!(f, "Parse error: {}", msg),
            FetchError::RateLimited => write!(f, "Rate limited"),
            FetchError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}
