//! Per-market outstanding-credit pipeline: membership filter, chunked
//! fetch, decode, zip, status filter, reduction.

use crate::datasource::{AccountSource, FetchError, MAX_ACCOUNT_BATCH};
use crate::decode::{decode_or_missing, AccountDecode};
use crate::domain::{Deal, DealTranches, Pubkey, RepaymentSchedule};
use crate::engine::{deal_in_progress, total_outstanding_principal};
use crate::error::AppError;
use crate::pda::{self, PdaError};
use futures::future::try_join_all;
use tracing::debug;

/// One below the transport ceiling, leaving headroom.
pub(crate) const ACCOUNT_CHUNK: usize = MAX_ACCOUNT_BATCH - 1;

/// Keep the candidates that belong to the market, order preserved.
///
/// A member's observed address must equal the address derived from
/// (market, borrower, deal number); malformed or foreign records are
/// excluded.
pub fn filter_market_deals<'a>(
    deals: &'a [(Pubkey, Deal)],
    market: &Pubkey,
    program_id: &Pubkey,
) -> Result<Vec<&'a (Pubkey, Deal)>, PdaError> {
    let mut members = Vec::new();
    for entry in deals {
        let (address, deal) = entry;
        let (expected, _) =
            pda::find_deal_address(market, &deal.borrower, deal.deal_number, program_id)?;
        if expected == *address {
            members.push(entry);
        }
    }
    Ok(members)
}

/// Fetch and decode one record kind for a list of addresses, chunked at
/// [`ACCOUNT_CHUNK`] with all chunks in flight concurrently.
///
/// Output order matches input order. An absent account, or one that fails
/// to decode, yields `None`; a failed chunk fails the whole fetch.
pub(crate) async fn fetch_records<T: AccountDecode>(
    accounts: &dyn AccountSource,
    addresses: &[Pubkey],
) -> Result<Vec<Option<T>>, FetchError> {
    let chunks = try_join_all(
        addresses
            .chunks(ACCOUNT_CHUNK)
            .map(|chunk| accounts.multiple_accounts(chunk)),
    )
    .await?;

    Ok(addresses
        .iter()
        .zip(chunks.into_iter().flatten())
        .map(|(address, data)| data.and_then(|bytes| decode_or_missing(address, &bytes)))
        .collect())
}

/// Total outstanding principal across the market's in-progress deals,
/// in native minor units.
pub(crate) async fn market_outstanding_credit(
    accounts: &dyn AccountSource,
    program_id: &Pubkey,
    market: &Pubkey,
    deals: &[(Pubkey, Deal)],
    market_seed: &str,
) -> Result<u128, AppError> {
    let members = filter_market_deals(deals, market, program_id)?;
    debug!(
        market = market_seed,
        candidates = deals.len(),
        members = members.len(),
        "filtered deals for market"
    );

    let mut schedule_addresses = Vec::with_capacity(members.len());
    let mut tranche_addresses = Vec::with_capacity(members.len());
    for (address, _) in members.iter().copied() {
        let (schedule, _) = pda::find_repayment_schedule_address(market, address, program_id)?;
        let (tranches, _) = pda::find_tranches_address(market, address, program_id)?;
        schedule_addresses.push(schedule);
        tranche_addresses.push(tranches);
    }

    let (schedules, tranche_sets) = tokio::try_join!(
        fetch_records::<RepaymentSchedule>(accounts, &schedule_addresses),
        fetch_records::<DealTranches>(accounts, &tranche_addresses),
    )?;

    let mut total: u128 = 0;
    for ((entry, schedule), tranches) in members
        .iter()
        .copied()
        .zip(schedules.into_iter())
        .zip(tranche_sets.into_iter())
    {
        let (address, deal) = entry;
        match (schedule, tranches) {
            (Some(schedule), Some(tranches)) => {
                if deal_in_progress(deal, &tranches, &schedule)? {
                    total += total_outstanding_principal(&tranches);
                }
            }
            _ => {
                debug!(deal = %address, "schedule or tranche set missing, deal skipped");
            }
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Fraction;

    fn program_id() -> Pubkey {
        Pubkey::new([42u8; 32])
    }

    fn deal(borrower: Pubkey, deal_number: u16) -> Deal {
        Deal {
            name: String::new(),
            borrower,
            amount_withdrawn: 0,
            go_live_at: 0,
            created_at: 0,
            max_funding_duration: 0,
            deal_number,
            bump: 0,
            opened_at: 0,
            arrangement_fees: 0,
            arrangement_fees_repaid: 0,
            time_latest_arrangement_fees_charged: 0,
            migrated: false,
            original_go_live_at: 0,
            prev_update_ts: None,
            arrangement_fee: Fraction::new(0, 1),
            collection_token_account: None,
            off_ramp_token_account: None,
            arrangement_fee_collection_token_account: None,
        }
    }

    #[test]
    fn test_filter_keeps_deals_at_their_derived_address() {
        let market = pda::find_market_address("m", &program_id()).unwrap().0;
        let borrower = Pubkey::new([5u8; 32]);
        let d = deal(borrower, 3);
        let address = pda::find_deal_address(&market, &borrower, 3, &program_id())
            .unwrap()
            .0;
        let deals = vec![(address, d)];
        let members = filter_market_deals(&deals, &market, &program_id()).unwrap();
        assert_eq!(members.len(), 1);
    }

    #[test]
    fn test_filter_excludes_mismatched_sequence_number() {
        let market = pda::find_market_address("m", &program_id()).unwrap().0;
        let borrower = Pubkey::new([5u8; 32]);
        // Stored under deal number 3 but claims to be number 4.
        let address = pda::find_deal_address(&market, &borrower, 3, &program_id())
            .unwrap()
            .0;
        let deals = vec![(address, deal(borrower, 4))];
        let members = filter_market_deals(&deals, &market, &program_id()).unwrap();
        assert!(members.is_empty());
    }

    #[test]
    fn test_filter_excludes_foreign_market_members() {
        let market_a = pda::find_market_address("a", &program_id()).unwrap().0;
        let market_b = pda::find_market_address("b", &program_id()).unwrap().0;
        let borrower = Pubkey::new([5u8; 32]);
        let address = pda::find_deal_address(&market_a, &borrower, 1, &program_id())
            .unwrap()
            .0;
        let deals = vec![(address, deal(borrower, 1))];
        assert!(filter_market_deals(&deals, &market_b, &program_id())
            .unwrap()
            .is_empty());
        assert_eq!(
            filter_market_deals(&deals, &market_a, &program_id())
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_filter_preserves_input_order() {
        let market = pda::find_market_address("m", &program_id()).unwrap().0;
        let mut deals = Vec::new();
        for n in 0..4u16 {
            let borrower = Pubkey::new([n as u8 + 1; 32]);
            let address = pda::find_deal_address(&market, &borrower, n, &program_id())
                .unwrap()
                .0;
            deals.push((address, deal(borrower, n)));
        }
        let members = filter_market_deals(&deals, &market, &program_id()).unwrap();
        let numbers: Vec<u16> = members.iter().map(|(_, d)| d.deal_number).collect();
        assert_eq!(numbers, vec![0, 1, 2, 3]);
    }
}
