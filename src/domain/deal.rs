//! Deal record: one lending arrangement between a borrower and investors.

use crate::domain::{Fraction, Pubkey};

/// Largest timestamp magnitude the legacy tooling could represent exactly
/// (53-bit safe integer range).
const MAX_SAFE_TIMESTAMP: u64 = (1 << 53) - 1;

/// Widen a raw ledger timestamp into an optional one.
///
/// Legacy records carry overflowed sentinel values in unset timestamp
/// slots; anything whose magnitude needs more than 53 bits is treated as
/// not recorded. Zero is representable and therefore counts as recorded.
fn recorded_timestamp(raw: i64) -> Option<i64> {
    if raw.unsigned_abs() > MAX_SAFE_TIMESTAMP {
        None
    } else {
        Some(raw)
    }
}

/// A lending deal, as stored on ledger.
///
/// Created at deal-opening and mutated on ledger by repayments and fee
/// charges; this crate only ever reads snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    pub name: String,
    pub borrower: Pubkey,
    /// Principal withdrawn from the deal token account by the borrower.
    pub amount_withdrawn: u64,
    pub go_live_at: i64,
    pub created_at: i64,
    /// Days after which tranche investors may burn tranches if the deal
    /// never goes live.
    pub max_funding_duration: u8,
    /// Per-borrower sequence number; part of the deal's address derivation.
    pub deal_number: u16,
    pub bump: u8,
    pub opened_at: i64,
    pub arrangement_fees: u64,
    pub arrangement_fees_repaid: u64,
    /// Tracks the year the arrangement fee was last charged for.
    pub time_latest_arrangement_fees_charged: i64,
    /// True when an off-chain deal was migrated onto the ledger.
    pub migrated: bool,
    /// Holds the original go-live timestamp across upscales.
    pub original_go_live_at: i64,
    pub prev_update_ts: Option<i64>,
    pub arrangement_fee: Fraction,
    pub collection_token_account: Option<Pubkey>,
    pub off_ramp_token_account: Option<Pubkey>,
    pub arrangement_fee_collection_token_account: Option<Pubkey>,
}

impl Deal {
    /// The opening timestamp, if one was ever recorded.
    pub fn opened_at(&self) -> Option<i64> {
        recorded_timestamp(self.opened_at)
    }

    /// The go-live timestamp, if one was ever recorded.
    pub fn go_live_at(&self) -> Option<i64> {
        recorded_timestamp(self.go_live_at)
    }
}
