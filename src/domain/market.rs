//! Global market state record: one per marketplace pool.

use crate::domain::{Fraction, Pubkey};

/// Pool-level state of a market, identified by a deterministic address
/// derived from the market's seed string. Immutable per snapshot read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalMarketState {
    pub base_token_mint: Pubkey,
    pub lp_token_mint: Pubkey,
    /// The amount lent from the senior tranche.
    pub pool_outstanding_credit: u64,
    pub treasury_pool_token_account: Pubkey,
    pub signing_authority_bump: u8,
    pub bump: u8,
    pub credix_fee_percentage: Fraction,
    pub withdrawal_fee: Fraction,
    pub frozen: bool,
    pub seed: String,
    pub pool_size_limit_percentage: Fraction,
    pub withdraw_epoch_request_seconds: u32,
    pub withdraw_epoch_redeem_seconds: u32,
    pub withdraw_epoch_available_liquidity_seconds: u32,
    pub latest_withdraw_epoch_idx: u32,
    pub latest_withdraw_epoch_end: i64,
    pub locked_liquidity: u64,
    pub total_redeemed_base_amount: u64,
    pub has_withdraw_epochs: bool,
    pub redeem_authority_bump: u8,
}
