//! Shapes of the derived analytics aggregate.
//!
//! Everything here is ephemeral: computed from already-fetched records,
//! rendered, and discarded. Serde derives exist so the whole aggregate can
//! be exported as JSON from the dashboard.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// All-time headline numbers. Deliberately NOT time-windowed; the
/// distributions and trends below are.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverviewStats {
    pub total_policies: usize,
    pub active_policies: usize,
    pub total_claims: usize,
    /// Approved here counts both Approved and Paid statuses.
    pub approved_claims: usize,
    pub total_premiums_paid: f64,
    pub total_claims_amount: f64,
    pub total_approved_amount: f64,
    /// Percent; 0 when there are no claims.
    pub claim_approval_rate: f64,
    /// Approved payout over premiums, percent; 0 when no premiums were paid.
    pub loss_ratio: f64,
}

/// Coverage triple for one policy, for stacked-bar charting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoveragePoint {
    pub policy_id: u64,
    pub coverage: f64,
    pub used: f64,
    /// Never negative even if used exceeds coverage.
    pub remaining: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyAnalytics {
    pub plan_distribution: HashMap<String, usize>,
    pub payment_type_distribution: HashMap<String, usize>,
    pub coverage_distribution: Vec<CoveragePoint>,
    pub total_coverage: f64,
    pub total_used_coverage: f64,
}

/// One "YYYY-MM" bucket with a record count and an amount sum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyBucket {
    pub month: String,
    pub count: usize,
    pub value: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClaimsAnalytics {
    pub status_distribution: HashMap<String, usize>,
    pub monthly_claims: Vec<MonthlyBucket>,
    pub average_claim_amount: f64,
    /// Mean processed−submitted over processed claims, in days.
    pub average_processing_days: f64,
    pub total_claims_value: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RevenueAnalytics {
    pub monthly_revenue: Vec<MonthlyBucket>,
    pub revenue_by_plan: HashMap<String, f64>,
    pub total_revenue: f64,
    pub average_revenue_per_policy: f64,
}

/// One calendar day in a dense daily series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// "YYYY-MM-DD".
    pub date: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrendAnalytics {
    pub policy_trend: Vec<TrendPoint>,
    pub claims_trend: Vec<TrendPoint>,
}

/// The full aggregate handed to the presentation layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsData {
    pub overview: OverviewStats,
    pub policies: PolicyAnalytics,
    pub claims: ClaimsAnalytics,
    pub revenue: RevenueAnalytics,
    pub trends: TrendAnalytics,
}

impl AnalyticsData {
    /// Pretty JSON for the dashboard's export action.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_aggregate_exports_cleanly() {
        let data = AnalyticsData::default();
        let json = data.to_json().unwrap();
        assert!(json.contains("\"overview\""));
        assert!(json.contains("\"claim_approval_rate\""));
    }
}
