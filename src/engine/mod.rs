//! Pure computation over decoded ledger records.

use std::fmt;

pub mod status;

pub use status::{
    deal_in_progress, deal_repaid, deal_status, outstanding_arrangement_fee,
    total_outstanding_principal, tranche_repaid,
};

/// Lifecycle status of a deal, derived from three independently stored
/// records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DealStatus {
    Pending,
    Structuring,
    OpenForFunding,
    InProgress,
    Closed,
}

impl fmt::Display for DealStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DealStatus::Pending => "PENDING",
            DealStatus::Structuring => "STRUCTURING",
            DealStatus::OpenForFunding => "OPEN_FOR_FUNDING",
            DealStatus::InProgress => "IN_PROGRESS",
            DealStatus::Closed => "CLOSED",
        };
        write!(f, "{}", name)
    }
}
