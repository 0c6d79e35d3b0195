//! Repayment schedule records: periods and their distribution waterfalls.

/// The repayment schedule account belonging to exactly one deal.
///
/// `total_periods` is the declared count; `periods` may still be shorter
/// while the schedule is being authored off-chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepaymentSchedule {
    pub total_periods: u16,
    pub start_ts: i64,
    pub daycount_convention: DaycountConvention,
    pub periods: Vec<RepaymentPeriod>,
    pub waterfall_definitions: Vec<DistributionWaterfall>,
}

impl RepaymentSchedule {
    /// True once every declared period has been recorded on ledger.
    pub fn is_structured(&self) -> bool {
        self.total_periods as usize == self.periods.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaycountConvention {
    Act360,
    Act365,
}

/// One repayment period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepaymentPeriod {
    /// Reference into the schedule's waterfall definitions.
    pub waterfall_index: u64,
    /// Days considered accrued in this period (precomputed off-chain).
    pub accrual_in_days: u32,
    /// Expected principal for the period. When None, any amount may be
    /// repaid without incurring early-principal fees.
    pub principal_expected: Option<u64>,
    pub time_frame: TimeFrame,
    pub calculation_waterfall_index: u64,
}

/// The window a period takes place in, as midnight unix timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeFrame {
    pub start: i64,
    pub end: i64,
}

/// How repayments are allocated within a period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionWaterfall {
    pub waterfall_type: DistributionWaterfallType,
    /// Tier order is repayment priority; earlier tiers are paid first.
    pub tiers: Vec<WaterfallTier>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistributionWaterfallType {
    Acceleration,
    Amortization,
    Revolving,
}

/// A single priority level in a distribution waterfall.
///
/// Multiple tranche indices in a tier are paid pro-rata, unless `slash`
/// turns the distribution sequential with list order as seniority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaterfallTier {
    pub tranche_indices: Vec<u64>,
    pub slash: bool,
    /// When false the tier only shapes repayment order, nothing is charged.
    pub charge: bool,
    pub allocations: Vec<RepaymentAllocation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepaymentAllocation {
    CompoundingInterest,
    Interest,
    Principal,
    InterestPerformanceFee,
    PrincipalPerformanceFee,
    LatePrincipalFee,
    LateInterestFee,
    MembershipFee,
    EarlyPrincipalFee,
}
