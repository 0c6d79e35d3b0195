use crate::config::ConfigError;
use crate::datasource::FetchError;
use crate::domain::Pubkey;
use crate::pda::PdaError;
use thiserror::Error;

/// Top-level error for the aggregation entry points.
///
/// There is no partial-success mode: a market computation either completes
/// over verified inputs or the first fatal error propagates.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Derivation(#[from] PdaError),
    #[error(transparent)]
    Inconsistency(#[from] DataInconsistency),
}

/// A derived value violated an invariant that cannot be violated under
/// correct ledger operation. Surfaced, never clamped: masking it would
/// corrupt the aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataInconsistency {
    #[error(
        "deal {borrower} #{deal_number}: arrangement fees repaid {repaid} exceed fees charged {charged}"
    )]
    ArrangementFeeOverRepaid {
        borrower: Pubkey,
        deal_number: u16,
        charged: u64,
        repaid: u64,
    },
    #[error("market state account for \"{market}\" is missing or undecodable")]
    MissingMarketState { market: String },
    #[error("aggregate outstanding credit for {mint} exceeds the representable range")]
    AggregateOutOfRange { mint: Pubkey },
}
