//! Pure aggregation over normalized policy and claim collections.
//!
//! No I/O happens here. `now` is an explicit parameter so the same inputs
//! always produce the same aggregate. Overview totals are all-time; every
//! distribution, bucket and trend below them is scoped to the selected
//! window. Malformed numeric strings count as zero and zero timestamps as
//! the epoch, so one bad record cannot take a chart down.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::domain::{
    AnalyticsData, Claim, ClaimStatus, ClaimsAnalytics, CoveragePoint, MonthlyBucket,
    OverviewStats, PaymentType, PlanType, Policy, PolicyAnalytics, PolicyStatus, RevenueAnalytics,
    TimeRange, TrendAnalytics, TrendPoint, SECONDS_PER_DAY,
};

/// Build the full aggregate for one time window.
pub fn build_analytics(
    policies: &[Policy],
    claims: &[Claim],
    range: TimeRange,
    now: DateTime<Utc>,
) -> AnalyticsData {
    let cutoff = now.timestamp() - range.window_secs() as i64;
    let windowed_policies: Vec<&Policy> = policies
        .iter()
        .filter(|p| p.start_date as i64 >= cutoff)
        .collect();
    let windowed_claims: Vec<&Claim> = claims
        .iter()
        .filter(|c| c.submission_date as i64 >= cutoff)
        .collect();

    AnalyticsData {
        overview: overview(policies, claims),
        policies: policy_analytics(&windowed_policies),
        claims: claims_analytics(&windowed_claims),
        revenue: revenue_analytics(&windowed_policies),
        trends: TrendAnalytics {
            policy_trend: daily_trend(
                windowed_policies.iter().map(|p| p.start_date),
                range,
                now,
            ),
            claims_trend: daily_trend(
                windowed_claims.iter().map(|c| c.submission_date),
                range,
                now,
            ),
        },
    }
}

fn amount(s: &str) -> f64 {
    s.parse().unwrap_or(0.0)
}

fn stamp(ts: u64) -> DateTime<Utc> {
    DateTime::from_timestamp(ts as i64, 0).unwrap_or(DateTime::UNIX_EPOCH)
}

fn month_key(ts: u64) -> String {
    stamp(ts).format("%Y-%m").to_string()
}

fn day_key(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn overview(policies: &[Policy], claims: &[Claim]) -> OverviewStats {
    let active_policies = policies
        .iter()
        .filter(|p| p.status == PolicyStatus::Active.as_u8())
        .count();
    // Rate "approved" pools Approved and Paid; the status distribution keeps
    // them as distinct buckets. Both views are intentional.
    let approved_claims = claims
        .iter()
        .filter(|c| ClaimStatus::counts_as_approved(c.status))
        .count();

    let total_premiums_paid: f64 = policies.iter().map(|p| amount(&p.total_paid)).sum();
    let total_claims_amount: f64 = claims.iter().map(|c| amount(&c.claim_amount)).sum();
    let total_approved_amount: f64 = claims
        .iter()
        .filter(|c| ClaimStatus::counts_as_approved(c.status))
        .map(|c| amount(&c.approved_amount))
        .sum();

    let claim_approval_rate = if claims.is_empty() {
        0.0
    } else {
        approved_claims as f64 / claims.len() as f64 * 100.0
    };
    let loss_ratio = if total_premiums_paid > 0.0 {
        total_approved_amount / total_premiums_paid * 100.0
    } else {
        0.0
    };

    OverviewStats {
        total_policies: policies.len(),
        active_policies,
        total_claims: claims.len(),
        approved_claims,
        total_premiums_paid,
        total_claims_amount,
        total_approved_amount,
        claim_approval_rate,
        loss_ratio,
    }
}

fn policy_analytics(policies: &[&Policy]) -> PolicyAnalytics {
    let mut plan_distribution: HashMap<String, usize> = HashMap::new();
    let mut payment_type_distribution: HashMap<String, usize> = HashMap::new();
    let mut coverage_distribution = Vec::with_capacity(policies.len());
    let mut total_coverage = 0.0;
    let mut total_used_coverage = 0.0;

    for policy in policies {
        *plan_distribution
            .entry(PlanType::label(policy.plan_type).to_string())
            .or_default() += 1;
        *payment_type_distribution
            .entry(PaymentType::label(policy.payment_type).to_string())
            .or_default() += 1;

        let coverage = amount(&policy.coverage_amount);
        let used = amount(&policy.claims_used);
        total_coverage += coverage;
        total_used_coverage += used;
        coverage_distribution.push(CoveragePoint {
            policy_id: policy.policy_id,
            coverage,
            used,
            remaining: (coverage - used).max(0.0),
        });
    }

    PolicyAnalytics {
        plan_distribution,
        payment_type_distribution,
        coverage_distribution,
        total_coverage,
        total_used_coverage,
    }
}

fn claims_analytics(claims: &[&Claim]) -> ClaimsAnalytics {
    let mut status_distribution: HashMap<String, usize> = HashMap::new();
    let mut monthly: HashMap<String, (usize, f64)> = HashMap::new();
    let mut total_claims_value = 0.0;
    let mut processing_secs = 0.0;
    let mut processed = 0usize;

    for claim in claims {
        *status_distribution
            .entry(ClaimStatus::label(claim.status).to_string())
            .or_default() += 1;

        let value = amount(&claim.claim_amount);
        total_claims_value += value;
        let bucket = monthly.entry(month_key(claim.submission_date)).or_default();
        bucket.0 += 1;
        bucket.1 += value;

        if claim.processed_date > 0 {
            processing_secs +=
                claim.processed_date.saturating_sub(claim.submission_date) as f64;
            processed += 1;
        }
    }

    let average_claim_amount = if claims.is_empty() {
        0.0
    } else {
        total_claims_value / claims.len() as f64
    };
    let average_processing_days = if processed == 0 {
        0.0
    } else {
        processing_secs / processed as f64 / SECONDS_PER_DAY as f64
    };

    ClaimsAnalytics {
        status_distribution,
        monthly_claims: sorted_buckets(monthly),
        average_claim_amount,
        average_processing_days,
        total_claims_value,
    }
}

fn revenue_analytics(policies: &[&Policy]) -> RevenueAnalytics {
    let mut monthly: HashMap<String, (usize, f64)> = HashMap::new();
    let mut revenue_by_plan: HashMap<String, f64> = HashMap::new();
    let mut total_revenue = 0.0;

    for policy in policies {
        let paid = amount(&policy.total_paid);
        total_revenue += paid;
        let bucket = monthly.entry(month_key(policy.start_date)).or_default();
        bucket.0 += 1;
        bucket.1 += paid;
        *revenue_by_plan
            .entry(PlanType::label(policy.plan_type).to_string())
            .or_default() += paid;
    }

    let average_revenue_per_policy = if policies.is_empty() {
        0.0
    } else {
        total_revenue / policies.len() as f64
    };

    RevenueAnalytics {
        monthly_revenue: sorted_buckets(monthly),
        revenue_by_plan,
        total_revenue,
        average_revenue_per_policy,
    }
}

// "YYYY-MM" sorts chronologically, so a plain lexicographic sort suffices.
fn sorted_buckets(map: HashMap<String, (usize, f64)>) -> Vec<MonthlyBucket> {
    let mut buckets: Vec<MonthlyBucket> = map
        .into_iter()
        .map(|(month, (count, value))| MonthlyBucket {
            month,
            count,
            value,
        })
        .collect();
    buckets.sort_by(|a, b| a.month.cmp(&b.month));
    buckets
}

/// One point per calendar day for the last N days, oldest first. Days with
/// no activity are present with count zero; the series is dense.
fn daily_trend(
    timestamps: impl Iterator<Item = u64> + Clone,
    range: TimeRange,
    now: DateTime<Utc>,
) -> Vec<TrendPoint> {
    let days = range.days();
    let mut points = Vec::with_capacity(days as usize);
    for back in (0..days).rev() {
        let day = now - Duration::days(back as i64);
        let key = day_key(day);
        let count = timestamps
            .clone()
            .filter(|ts| day_key(stamp(*ts)) == key)
            .count();
        points.push(TrendPoint { date: key, count });
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn malformed_amounts_count_as_zero() {
        assert_eq!(amount("not-a-number"), 0.0);
        assert_eq!(amount("1.5"), 1.5);
    }

    #[test]
    fn month_keys_sort_chronologically() {
        let mut map = HashMap::new();
        map.insert("2026-01".to_string(), (1, 1.0));
        map.insert("2025-12".to_string(), (2, 2.0));
        map.insert("2025-03".to_string(), (3, 3.0));
        let buckets = sorted_buckets(map);
        let months: Vec<&str> = buckets.iter().map(|b| b.month.as_str()).collect();
        assert_eq!(months, vec!["2025-03", "2025-12", "2026-01"]);
    }

    #[test]
    fn zero_timestamp_buckets_at_epoch() {
        assert_eq!(month_key(0), "1970-01");
    }

    #[test]
    fn trend_is_dense_and_chronological() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        let stamps = vec![now.timestamp() as u64];
        let trend = daily_trend(stamps.into_iter(), TimeRange::SevenDays, now);
        assert_eq!(trend.len(), 7);
        assert_eq!(trend[0].date, "2026-03-04");
        assert_eq!(trend[6].date, "2026-03-10");
        assert_eq!(trend[6].count, 1);
        assert!(trend[..6].iter().all(|p| p.count == 0));
    }
}
