//! Shared fixtures: byte-exact account images and ledger builders.
#![allow(dead_code)]

use credimeter::domain::{
    DaycountConvention, Deal, DealTranche, DealTranches, DistributionWaterfallType, Fraction,
    GlobalMarketState, Pubkey, RepaymentAllocation, RepaymentPeriod, RepaymentSchedule, TimeFrame,
    Tranche, TrancheAmountsDue, TrancheAmountsRepaid, TrancheRates, VariableRate,
};
use credimeter::pda;
use credimeter::{AccountKind, MockLedger};

/// Unset timestamp slots carry overflowed sentinel values on ledger.
pub const UNSET_TS: i64 = i64::MAX;

pub fn program_id() -> Pubkey {
    Pubkey::new([77u8; 32])
}

pub fn usdc_mint() -> Pubkey {
    Pubkey::new([100u8; 32])
}

fn push_string(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&(s.len() as u32).to_le_bytes());
    buf.extend_from_slice(s.as_bytes());
}

fn push_fraction(buf: &mut Vec<u8>, f: Fraction) {
    buf.extend_from_slice(&f.numerator.to_le_bytes());
    buf.extend_from_slice(&f.denominator.to_le_bytes());
}

fn push_option_i64(buf: &mut Vec<u8>, v: Option<i64>) {
    match v {
        None => buf.push(0),
        Some(v) => {
            buf.push(1);
            buf.extend_from_slice(&v.to_le_bytes());
        }
    }
}

fn push_option_u64(buf: &mut Vec<u8>, v: Option<u64>) {
    match v {
        None => buf.push(0),
        Some(v) => {
            buf.push(1);
            buf.extend_from_slice(&v.to_le_bytes());
        }
    }
}

fn push_option_pubkey(buf: &mut Vec<u8>, v: Option<Pubkey>) {
    match v {
        None => buf.push(0),
        Some(v) => {
            buf.push(1);
            buf.extend_from_slice(v.as_ref());
        }
    }
}

pub fn encode_deal(deal: &Deal) -> Vec<u8> {
    let mut buf = AccountKind::Deal.discriminator().to_vec();
    push_string(&mut buf, &deal.name);
    buf.extend_from_slice(deal.borrower.as_ref());
    buf.extend_from_slice(&deal.amount_withdrawn.to_le_bytes());
    buf.extend_from_slice(&deal.go_live_at.to_le_bytes());
    buf.extend_from_slice(&deal.created_at.to_le_bytes());
    buf.push(deal.max_funding_duration);
    buf.extend_from_slice(&deal.deal_number.to_le_bytes());
    buf.push(deal.bump);
    buf.extend_from_slice(&deal.opened_at.to_le_bytes());
    buf.extend_from_slice(&deal.arrangement_fees.to_le_bytes());
    buf.extend_from_slice(&deal.arrangement_fees_repaid.to_le_bytes());
    buf.extend_from_slice(&deal.time_latest_arrangement_fees_charged.to_le_bytes());
    buf.push(deal.migrated as u8);
    buf.extend_from_slice(&deal.original_go_live_at.to_le_bytes());
    push_option_i64(&mut buf, deal.prev_update_ts);
    push_fraction(&mut buf, deal.arrangement_fee);
    push_option_pubkey(&mut buf, deal.collection_token_account);
    push_option_pubkey(&mut buf, deal.off_ramp_token_account);
    push_option_pubkey(&mut buf, deal.arrangement_fee_collection_token_account);
    buf
}

fn push_tranche(buf: &mut Vec<u8>, t: &Tranche) {
    buf.extend_from_slice(&t.size.to_le_bytes());
    buf.extend_from_slice(&t.outstanding_principal.to_le_bytes());
    let r = &t.rates;
    for fraction in [
        r.interest,
        r.late_interest_fee,
        r.interest_performance_fee,
        r.late_principal_fee,
        r.principal_performance_fee,
        r.early_principal_fee,
        r.membership_fee,
    ] {
        push_fraction(buf, fraction);
    }
    for due in t.amounts_due.categories() {
        buf.extend_from_slice(&due.to_le_bytes());
    }
    let p = &t.amounts_repaid;
    for repaid in [
        p.interest_repaid,
        p.interest_performance_fee_repaid,
        p.principal_performance_fee_repaid,
        p.late_principal_fee_repaid,
        p.late_interest_fee_repaid,
        p.membership_fee_repaid,
        p.early_principal_fee_repaid,
    ] {
        buf.extend_from_slice(&repaid.to_le_bytes());
    }
}

pub fn encode_tranches(set: &DealTranches) -> Vec<u8> {
    let mut buf = AccountKind::DealTranches.discriminator().to_vec();
    buf.push(set.bump);
    buf.push(set.total_tranches);
    buf.extend_from_slice(&(set.tranches.len() as u32).to_le_bytes());
    for entry in &set.tranches {
        buf.push(entry.index);
        buf.extend_from_slice(&entry.amount_deposited.to_le_bytes());
        buf.extend_from_slice(entry.token_mint.as_ref());
        push_fraction(&mut buf, entry.max_deposit_percentage);
        buf.push(entry.early_withdrawal_principal as u8);
        buf.push(entry.optional_account as u8);
        buf.extend_from_slice(&entry.upscale_size.to_le_bytes());
        buf.extend_from_slice(&entry.interest_repaid_until_last_upscale.to_le_bytes());
        buf.push(entry.funded_by_liquidity_pool as u8);
        push_string(&mut buf, &entry.name);
        push_tranche(&mut buf, &entry.tranche);
        buf.push(match entry.variable_rate {
            VariableRate::None => 0,
            VariableRate::Sofr => 1,
        });
        buf.extend_from_slice(&[0u8; 80]); // reserved tail
    }
    buf
}

pub fn encode_schedule(schedule: &RepaymentSchedule) -> Vec<u8> {
    let mut buf = AccountKind::RepaymentSchedule.discriminator().to_vec();
    buf.extend_from_slice(&schedule.total_periods.to_le_bytes());
    buf.extend_from_slice(&schedule.start_ts.to_le_bytes());
    buf.push(match schedule.daycount_convention {
        DaycountConvention::Act360 => 0,
        DaycountConvention::Act365 => 1,
    });
    buf.extend_from_slice(&(schedule.periods.len() as u32).to_le_bytes());
    for period in &schedule.periods {
        buf.extend_from_slice(&period.waterfall_index.to_le_bytes());
        buf.extend_from_slice(&period.accrual_in_days.to_le_bytes());
        push_option_u64(&mut buf, period.principal_expected);
        buf.extend_from_slice(&period.time_frame.start.to_le_bytes());
        buf.extend_from_slice(&period.time_frame.end.to_le_bytes());
        buf.extend_from_slice(&period.calculation_waterfall_index.to_le_bytes());
    }
    buf.extend_from_slice(&(schedule.waterfall_definitions.len() as u32).to_le_bytes());
    for waterfall in &schedule.waterfall_definitions {
        buf.push(match waterfall.waterfall_type {
            DistributionWaterfallType::Acceleration => 0,
            DistributionWaterfallType::Amortization => 1,
            DistributionWaterfallType::Revolving => 2,
        });
        buf.extend_from_slice(&(waterfall.tiers.len() as u32).to_le_bytes());
        for tier in &waterfall.tiers {
            buf.extend_from_slice(&(tier.tranche_indices.len() as u32).to_le_bytes());
            for index in &tier.tranche_indices {
                buf.extend_from_slice(&index.to_le_bytes());
            }
            buf.push(tier.slash as u8);
            buf.push(tier.charge as u8);
            buf.extend_from_slice(&(tier.allocations.len() as u32).to_le_bytes());
            for allocation in &tier.allocations {
                buf.push(match allocation {
                    RepaymentAllocation::CompoundingInterest => 0,
                    RepaymentAllocation::Interest => 1,
                    RepaymentAllocation::Principal => 2,
                    RepaymentAllocation::InterestPerformanceFee => 3,
                    RepaymentAllocation::PrincipalPerformanceFee => 4,
                    RepaymentAllocation::LatePrincipalFee => 5,
                    RepaymentAllocation::LateInterestFee => 6,
                    RepaymentAllocation::MembershipFee => 7,
                    RepaymentAllocation::EarlyPrincipalFee => 8,
                });
            }
        }
    }
    buf
}

pub fn encode_market_state(state: &GlobalMarketState) -> Vec<u8> {
    let mut buf = AccountKind::GlobalMarketState.discriminator().to_vec();
    buf.extend_from_slice(state.base_token_mint.as_ref());
    buf.extend_from_slice(state.lp_token_mint.as_ref());
    buf.extend_from_slice(&state.pool_outstanding_credit.to_le_bytes());
    buf.extend_from_slice(state.treasury_pool_token_account.as_ref());
    buf.push(state.signing_authority_bump);
    buf.push(state.bump);
    push_fraction(&mut buf, state.credix_fee_percentage);
    push_fraction(&mut buf, state.withdrawal_fee);
    buf.push(state.frozen as u8);
    push_string(&mut buf, &state.seed);
    push_fraction(&mut buf, state.pool_size_limit_percentage);
    buf.extend_from_slice(&state.withdraw_epoch_request_seconds.to_le_bytes());
    buf.extend_from_slice(&state.withdraw_epoch_redeem_seconds.to_le_bytes());
    buf.extend_from_slice(&state.withdraw_epoch_available_liquidity_seconds.to_le_bytes());
    buf.extend_from_slice(&state.latest_withdraw_epoch_idx.to_le_bytes());
    buf.extend_from_slice(&state.latest_withdraw_epoch_end.to_le_bytes());
    buf.extend_from_slice(&state.locked_liquidity.to_le_bytes());
    buf.extend_from_slice(&state.total_redeemed_base_amount.to_le_bytes());
    buf.push(state.has_withdraw_epochs as u8);
    buf.push(state.redeem_authority_bump);
    buf
}

pub fn zero_fraction() -> Fraction {
    Fraction::new(0, 100)
}

pub fn deal(borrower: Pubkey, deal_number: u16) -> Deal {
    Deal {
        name: format!("deal-{}", deal_number),
        borrower,
        amount_withdrawn: 0,
        go_live_at: 1_650_000_100,
        created_at: 1_650_000_000,
        max_funding_duration: 30,
        deal_number,
        bump: 254,
        opened_at: 1_650_000_050,
        arrangement_fees: 0,
        arrangement_fees_repaid: 0,
        time_latest_arrangement_fees_charged: 0,
        migrated: false,
        original_go_live_at: UNSET_TS,
        prev_update_ts: None,
        arrangement_fee: zero_fraction(),
        collection_token_account: None,
        off_ramp_token_account: None,
        arrangement_fee_collection_token_account: None,
    }
}

pub fn tranche_entry(index: u8, outstanding_principal: u64) -> DealTranche {
    DealTranche {
        index,
        amount_deposited: 1_000,
        token_mint: usdc_mint(),
        max_deposit_percentage: Fraction::new(1, 1),
        early_withdrawal_principal: false,
        optional_account: false,
        upscale_size: 0,
        interest_repaid_until_last_upscale: 0,
        funded_by_liquidity_pool: false,
        name: format!("tranche-{}", index),
        tranche: Tranche {
            size: 1_000,
            outstanding_principal,
            rates: TrancheRates {
                interest: Fraction::new(12, 100),
                late_interest_fee: zero_fraction(),
                interest_performance_fee: zero_fraction(),
                late_principal_fee: zero_fraction(),
                principal_performance_fee: zero_fraction(),
                early_principal_fee: zero_fraction(),
                membership_fee: zero_fraction(),
            },
            amounts_due: TrancheAmountsDue::default(),
            amounts_repaid: TrancheAmountsRepaid::default(),
        },
        variable_rate: VariableRate::None,
    }
}

pub fn tranche_set(outstandings: &[u64]) -> DealTranches {
    DealTranches {
        bump: 255,
        total_tranches: outstandings.len() as u8,
        tranches: outstandings
            .iter()
            .enumerate()
            .map(|(i, &outstanding)| tranche_entry(i as u8, outstanding))
            .collect(),
    }
}

pub fn structured_schedule() -> RepaymentSchedule {
    schedule_with(1, 1)
}

pub fn unstructured_schedule() -> RepaymentSchedule {
    schedule_with(2, 1)
}

pub fn schedule_with(total_periods: u16, recorded: usize) -> RepaymentSchedule {
    let period = RepaymentPeriod {
        waterfall_index: 0,
        accrual_in_days: 30,
        principal_expected: None,
        time_frame: TimeFrame {
            start: 1_650_000_000,
            end: 1_652_592_000,
        },
        calculation_waterfall_index: 0,
    };
    RepaymentSchedule {
        total_periods,
        start_ts: 1_650_000_000,
        daycount_convention: DaycountConvention::Act360,
        periods: vec![period; recorded],
        waterfall_definitions: Vec::new(),
    }
}

pub fn market_state(seed: &str, mint: Pubkey) -> GlobalMarketState {
    GlobalMarketState {
        base_token_mint: mint,
        lp_token_mint: Pubkey::new([101u8; 32]),
        pool_outstanding_credit: 0,
        treasury_pool_token_account: Pubkey::new([102u8; 32]),
        signing_authority_bump: 250,
        bump: 251,
        credix_fee_percentage: Fraction::new(10, 1000),
        withdrawal_fee: Fraction::new(5, 1000),
        frozen: false,
        seed: seed.to_string(),
        pool_size_limit_percentage: Fraction::new(1, 1),
        withdraw_epoch_request_seconds: 0,
        withdraw_epoch_redeem_seconds: 0,
        withdraw_epoch_available_liquidity_seconds: 0,
        latest_withdraw_epoch_idx: 0,
        latest_withdraw_epoch_end: 0,
        locked_liquidity: 0,
        total_redeemed_base_amount: 0,
        has_withdraw_epochs: false,
        redeem_authority_bump: 249,
    }
}

/// Register a market's state account at its derived address.
pub fn with_market(mock: MockLedger, seed: &str, mint: Pubkey) -> MockLedger {
    let (market, _) = pda::find_market_address(seed, &program_id()).unwrap();
    mock.with_account(market, encode_market_state(&market_state(seed, mint)))
}

/// Register a deal with its schedule and tranche set, all at their derived
/// addresses for the given market seed.
pub fn with_deal(
    mock: MockLedger,
    seed: &str,
    deal: &Deal,
    schedule: &RepaymentSchedule,
    tranches: &DealTranches,
) -> MockLedger {
    let pid = program_id();
    let (market, _) = pda::find_market_address(seed, &pid).unwrap();
    let (address, _) = pda::find_deal_address(&market, &deal.borrower, deal.deal_number, &pid)
        .unwrap();
    let (schedule_address, _) =
        pda::find_repayment_schedule_address(&market, &address, &pid).unwrap();
    let (tranches_address, _) = pda::find_tranches_address(&market, &address, &pid).unwrap();
    mock.with_account(address, encode_deal(deal))
        .with_account(schedule_address, encode_schedule(schedule))
        .with_account(tranches_address, encode_tranches(tranches))
}
