//! Deal lifecycle status and repayment-completion model.
//!
//! Everything here is a pure function of decoded records: deterministic,
//! no side effects, no I/O.

use super::DealStatus;
use crate::domain::{Deal, DealTranches, RepaymentSchedule, Tranche};
use crate::error::DataInconsistency;

/// A tranche is repaid iff nothing is outstanding and no owed category
/// carries a balance. Outstanding principal of 1 with all dues at zero is
/// not repaid.
pub fn tranche_repaid(tranche: &Tranche) -> bool {
    tranche.outstanding_principal == 0
        && tranche.amounts_due.categories().iter().all(|&due| due == 0)
}

/// A deal's funding is repaid iff every tranche is repaid.
pub fn deal_repaid(tranches: &DealTranches) -> bool {
    tranches
        .tranches
        .iter()
        .all(|entry| tranche_repaid(&entry.tranche))
}

/// Arrangement fees still owed on a deal.
///
/// Repaid exceeding charged is impossible under correct ledger operation;
/// it is surfaced as an inconsistency rather than clamped.
pub fn outstanding_arrangement_fee(deal: &Deal) -> Result<u64, DataInconsistency> {
    deal.arrangement_fees
        .checked_sub(deal.arrangement_fees_repaid)
        .ok_or(DataInconsistency::ArrangementFeeOverRepaid {
            borrower: deal.borrower,
            deal_number: deal.deal_number,
            charged: deal.arrangement_fees,
            repaid: deal.arrangement_fees_repaid,
        })
}

/// Sum of outstanding principal across all tranches, widened so the sum
/// cannot wrap.
pub fn total_outstanding_principal(tranches: &DealTranches) -> u128 {
    tranches
        .tranches
        .iter()
        .map(|entry| entry.tranche.outstanding_principal as u128)
        .sum()
}

/// Derive a deal's lifecycle status. Ordered decision list, first matching
/// rule wins:
///
/// 1. schedule not fully recorded -> STRUCTURING (still being authored)
/// 2. no recorded opening timestamp -> PENDING
/// 3. no recorded go-live timestamp -> OPEN_FOR_FUNDING
/// 4. all tranches repaid and no arrangement fee outstanding -> CLOSED
/// 5. otherwise -> IN_PROGRESS
pub fn deal_status(
    deal: &Deal,
    tranches: &DealTranches,
    schedule: &RepaymentSchedule,
) -> Result<DealStatus, DataInconsistency> {
    if !schedule.is_structured() {
        return Ok(DealStatus::Structuring);
    }
    if deal.opened_at().is_none() {
        return Ok(DealStatus::Pending);
    }
    if deal.go_live_at().is_none() {
        return Ok(DealStatus::OpenForFunding);
    }
    if deal_repaid(tranches) && outstanding_arrangement_fee(deal)? == 0 {
        return Ok(DealStatus::Closed);
    }
    Ok(DealStatus::InProgress)
}

/// Whether a deal contributes to outstanding-credit aggregation.
pub fn deal_in_progress(
    deal: &Deal,
    tranches: &DealTranches,
    schedule: &RepaymentSchedule,
) -> Result<bool, DataInconsistency> {
    Ok(deal_status(deal, tranches, schedule)? == DealStatus::InProgress)
}
