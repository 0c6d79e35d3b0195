//! Field-order decode of the four account kinds.

use super::{AccountDecode, AccountKind, Cursor, DecodeError};
use crate::domain::{
    DaycountConvention, Deal, DealTranche, DealTranches, DistributionWaterfall,
    DistributionWaterfallType, Fraction, GlobalMarketState, RepaymentAllocation, RepaymentPeriod,
    RepaymentSchedule, TimeFrame, Tranche, TrancheAmountsDue, TrancheAmountsRepaid, TrancheRates,
    VariableRate, WaterfallTier,
};

fn fraction(cursor: &mut Cursor<'_>) -> Result<Fraction, DecodeError> {
    Ok(Fraction {
        numerator: cursor.u32()?,
        denominator: cursor.u32()?,
    })
}

impl AccountDecode for Deal {
    const KIND: AccountKind = AccountKind::Deal;

    fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        let mut cursor = Cursor::checked(Self::KIND, data)?;
        Ok(Deal {
            name: cursor.string()?,
            borrower: cursor.pubkey()?,
            amount_withdrawn: cursor.u64()?,
            go_live_at: cursor.i64()?,
            created_at: cursor.i64()?,
            max_funding_duration: cursor.u8()?,
            deal_number: cursor.u16()?,
            bump: cursor.u8()?,
            opened_at: cursor.i64()?,
            arrangement_fees: cursor.u64()?,
            arrangement_fees_repaid: cursor.u64()?,
            time_latest_arrangement_fees_charged: cursor.i64()?,
            migrated: cursor.bool()?,
            original_go_live_at: cursor.i64()?,
            prev_update_ts: cursor.option(|c| c.i64())?,
            arrangement_fee: fraction(&mut cursor)?,
            collection_token_account: cursor.option(|c| c.pubkey())?,
            off_ramp_token_account: cursor.option(|c| c.pubkey())?,
            arrangement_fee_collection_token_account: cursor.option(|c| c.pubkey())?,
        })
    }
}

fn tranche_rates(cursor: &mut Cursor<'_>) -> Result<TrancheRates, DecodeError> {
    Ok(TrancheRates {
        interest: fraction(cursor)?,
        late_interest_fee: fraction(cursor)?,
        interest_performance_fee: fraction(cursor)?,
        late_principal_fee: fraction(cursor)?,
        principal_performance_fee: fraction(cursor)?,
        early_principal_fee: fraction(cursor)?,
        membership_fee: fraction(cursor)?,
    })
}

fn amounts_due(cursor: &mut Cursor<'_>) -> Result<TrancheAmountsDue, DecodeError> {
    Ok(TrancheAmountsDue {
        interest: cursor.u64()?,
        prev_interest: cursor.u64()?,
        principal: cursor.u64()?,
        prev_principal: cursor.u64()?,
        late_interest_fee: cursor.u64()?,
        late_principal_fee: cursor.u64()?,
        interest_performance_fee: cursor.u64()?,
        principal_performance_fee: cursor.u64()?,
        membership_fee: cursor.u64()?,
        early_principal_fee: cursor.u64()?,
    })
}

fn amounts_repaid(cursor: &mut Cursor<'_>) -> Result<TrancheAmountsRepaid, DecodeError> {
    Ok(TrancheAmountsRepaid {
        interest_repaid: cursor.u64()?,
        interest_performance_fee_repaid: cursor.u64()?,
        principal_performance_fee_repaid: cursor.u64()?,
        late_principal_fee_repaid: cursor.u64()?,
        late_interest_fee_repaid: cursor.u64()?,
        membership_fee_repaid: cursor.u64()?,
        early_principal_fee_repaid: cursor.u64()?,
    })
}

fn tranche(cursor: &mut Cursor<'_>) -> Result<Tranche, DecodeError> {
    Ok(Tranche {
        size: cursor.u64()?,
        outstanding_principal: cursor.u64()?,
        rates: tranche_rates(cursor)?,
        amounts_due: amounts_due(cursor)?,
        amounts_repaid: amounts_repaid(cursor)?,
    })
}

fn variable_rate(cursor: &mut Cursor<'_>) -> Result<VariableRate, DecodeError> {
    match cursor.u8()? {
        0 => Ok(VariableRate::None),
        1 => Ok(VariableRate::Sofr),
        other => Err(cursor.error(format!("invalid VariableRate tag {}", other))),
    }
}

fn deal_tranche(cursor: &mut Cursor<'_>) -> Result<DealTranche, DecodeError> {
    let entry = DealTranche {
        index: cursor.u8()?,
        amount_deposited: cursor.u64()?,
        token_mint: cursor.pubkey()?,
        max_deposit_percentage: fraction(cursor)?,
        early_withdrawal_principal: cursor.bool()?,
        optional_account: cursor.bool()?,
        upscale_size: cursor.u64()?,
        interest_repaid_until_last_upscale: cursor.u64()?,
        funded_by_liquidity_pool: cursor.bool()?,
        name: cursor.string()?,
        tranche: tranche(cursor)?,
        variable_rate: variable_rate(cursor)?,
    };
    // Reserved [u32; 20] tail on every tranche entry.
    cursor.skip(80)?;
    Ok(entry)
}

impl AccountDecode for DealTranches {
    const KIND: AccountKind = AccountKind::DealTranches;

    fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        let mut cursor = Cursor::checked(Self::KIND, data)?;
        Ok(DealTranches {
            bump: cursor.u8()?,
            total_tranches: cursor.u8()?,
            tranches: cursor.vec(deal_tranche)?,
        })
    }
}

fn daycount_convention(cursor: &mut Cursor<'_>) -> Result<DaycountConvention, DecodeError> {
    match cursor.u8()? {
        0 => Ok(DaycountConvention::Act360),
        1 => Ok(DaycountConvention::Act365),
        other => Err(cursor.error(format!("invalid DaycountConvention tag {}", other))),
    }
}

fn repayment_period(cursor: &mut Cursor<'_>) -> Result<RepaymentPeriod, DecodeError> {
    Ok(RepaymentPeriod {
        waterfall_index: cursor.u64()?,
        accrual_in_days: cursor.u32()?,
        principal_expected: cursor.option(|c| c.u64())?,
        time_frame: TimeFrame {
            start: cursor.i64()?,
            end: cursor.i64()?,
        },
        calculation_waterfall_index: cursor.u64()?,
    })
}

fn repayment_allocation(cursor: &mut Cursor<'_>) -> Result<RepaymentAllocation, DecodeError> {
    match cursor.u8()? {
        0 => Ok(RepaymentAllocation::CompoundingInterest),
        1 => Ok(RepaymentAllocation::Interest),
        2 => Ok(RepaymentAllocation::Principal),
        3 => Ok(RepaymentAllocation::InterestPerformanceFee),
        4 => Ok(RepaymentAllocation::PrincipalPerformanceFee),
        5 => Ok(RepaymentAllocation::LatePrincipalFee),
        6 => Ok(RepaymentAllocation::LateInterestFee),
        7 => Ok(RepaymentAllocation::MembershipFee),
        8 => Ok(RepaymentAllocation::EarlyPrincipalFee),
        other => Err(cursor.error(format!("invalid RepaymentAllocation tag {}", other))),
    }
}

fn waterfall_tier(cursor: &mut Cursor<'_>) -> Result<WaterfallTier, DecodeError> {
    Ok(WaterfallTier {
        tranche_indices: cursor.vec(|c| c.u64())?,
        slash: cursor.bool()?,
        charge: cursor.bool()?,
        allocations: cursor.vec(repayment_allocation)?,
    })
}

fn distribution_waterfall(cursor: &mut Cursor<'_>) -> Result<DistributionWaterfall, DecodeError> {
    let waterfall_type = match cursor.u8()? {
        0 => DistributionWaterfallType::Acceleration,
        1 => DistributionWaterfallType::Amortization,
        2 => DistributionWaterfallType::Revolving,
        other => {
            return Err(cursor.error(format!("invalid DistributionWaterfallType tag {}", other)))
        }
    };
    Ok(DistributionWaterfall {
        waterfall_type,
        tiers: cursor.vec(waterfall_tier)?,
    })
}

impl AccountDecode for RepaymentSchedule {
    const KIND: AccountKind = AccountKind::RepaymentSchedule;

    fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        let mut cursor = Cursor::checked(Self::KIND, data)?;
        Ok(RepaymentSchedule {
            total_periods: cursor.u16()?,
            start_ts: cursor.i64()?,
            daycount_convention: daycount_convention(&mut cursor)?,
            periods: cursor.vec(repayment_period)?,
            waterfall_definitions: cursor.vec(distribution_waterfall)?,
        })
    }
}

impl AccountDecode for GlobalMarketState {
    const KIND: AccountKind = AccountKind::GlobalMarketState;

    fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        let mut cursor = Cursor::checked(Self::KIND, data)?;
        Ok(GlobalMarketState {
            base_token_mint: cursor.pubkey()?,
            lp_token_mint: cursor.pubkey()?,
            pool_outstanding_credit: cursor.u64()?,
            treasury_pool_token_account: cursor.pubkey()?,
            signing_authority_bump: cursor.u8()?,
            bump: cursor.u8()?,
            credix_fee_percentage: fraction(&mut cursor)?,
            withdrawal_fee: fraction(&mut cursor)?,
            frozen: cursor.bool()?,
            seed: cursor.string()?,
            pool_size_limit_percentage: fraction(&mut cursor)?,
            withdraw_epoch_request_seconds: cursor.u32()?,
            withdraw_epoch_redeem_seconds: cursor.u32()?,
            withdraw_epoch_available_liquidity_seconds: cursor.u32()?,
            latest_withdraw_epoch_idx: cursor.u32()?,
            latest_withdraw_epoch_end: cursor.i64()?,
            locked_liquidity: cursor.u64()?,
            total_redeemed_base_amount: cursor.u64()?,
            has_withdraw_epochs: cursor.bool()?,
            redeem_authority_bump: cursor.u8()?,
        })
    }
}
