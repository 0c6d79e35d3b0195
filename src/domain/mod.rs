//! Domain types for the credit-marketplace ledger.
//!
//! This module provides:
//! - Lossless numeric handling via the Decimal wrapper
//! - Ledger primitives: Pubkey, Fraction
//! - Typed account records: Deal, DealTranches, RepaymentSchedule,
//!   GlobalMarketState

pub mod deal;
pub mod decimal;
pub mod market;
pub mod primitives;
pub mod schedule;
pub mod tranche;

pub use deal::Deal;
pub use decimal::Decimal;
pub use market::GlobalMarketState;
pub use primitives::{Fraction, Pubkey, PubkeyParseError};
pub use schedule::{
    DaycountConvention, DistributionWaterfall, DistributionWaterfallType, RepaymentAllocation,
    RepaymentPeriod, RepaymentSchedule, TimeFrame, WaterfallTier,
};
pub use tranche::{
    DealTranche, DealTranches, Tranche, TrancheAmountsDue, TrancheAmountsRepaid, TrancheRates,
    VariableRate,
};
