//! Tranche set records: the risk-segmented slices of a deal's funding.

use crate::domain::{Fraction, Pubkey};

/// The tranche set account belonging to exactly one deal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealTranches {
    pub bump: u8,
    pub total_tranches: u8,
    pub tranches: Vec<DealTranche>,
}

/// One index-addressed tranche entry (0-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealTranche {
    pub index: u8,
    pub amount_deposited: u64,
    pub token_mint: Pubkey,
    pub max_deposit_percentage: Fraction,
    pub early_withdrawal_principal: bool,
    pub optional_account: bool,
    pub upscale_size: u64,
    pub interest_repaid_until_last_upscale: u64,
    pub funded_by_liquidity_pool: bool,
    pub name: String,
    pub tranche: Tranche,
    pub variable_rate: VariableRate,
}

/// Core balances and terms of a tranche.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tranche {
    pub size: u64,
    pub outstanding_principal: u64,
    pub rates: TrancheRates,
    pub amounts_due: TrancheAmountsDue,
    pub amounts_repaid: TrancheAmountsRepaid,
}

/// Rates used to charge fees at tranche level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrancheRates {
    pub interest: Fraction,
    pub late_interest_fee: Fraction,
    pub interest_performance_fee: Fraction,
    pub late_principal_fee: Fraction,
    pub principal_performance_fee: Fraction,
    pub early_principal_fee: Fraction,
    pub membership_fee: Fraction,
}

/// Per-category owed amounts, native-scale minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrancheAmountsDue {
    pub interest: u64,
    pub prev_interest: u64,
    pub principal: u64,
    pub prev_principal: u64,
    pub late_interest_fee: u64,
    pub late_principal_fee: u64,
    pub interest_performance_fee: u64,
    pub principal_performance_fee: u64,
    pub membership_fee: u64,
    pub early_principal_fee: u64,
}

impl TrancheAmountsDue {
    /// Every owed category, in declaration order.
    pub fn categories(&self) -> [u64; 10] {
        [
            self.interest,
            self.prev_interest,
            self.principal,
            self.prev_principal,
            self.late_interest_fee,
            self.late_principal_fee,
            self.interest_performance_fee,
            self.principal_performance_fee,
            self.membership_fee,
            self.early_principal_fee,
        ]
    }
}

/// Mirrored repaid amounts per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrancheAmountsRepaid {
    pub interest_repaid: u64,
    pub interest_performance_fee_repaid: u64,
    pub principal_performance_fee_repaid: u64,
    pub late_principal_fee_repaid: u64,
    pub late_interest_fee_repaid: u64,
    pub membership_fee_repaid: u64,
    pub early_principal_fee_repaid: u64,
}

/// Optional floating-rate marker on a tranche.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableRate {
    None,
    Sofr,
}
