//! Performance benchmarks for the analytics aggregation layer.
//!
//! Run with: cargo bench

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use bima_core::build_analytics;
use bima_core::domain::{Claim, Policy, TimeRange};

fn now() -> chrono::DateTime<chrono::Utc> {
    Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap()
}

fn create_policies(count: usize) -> Vec<Policy> {
    let base = now().timestamp() as u64;
    (0..count)
        .map(|i| Policy {
            policy_id: i as u64 + 1,
            policyholder: format!("0x{:040x}", i),
            plan_type: (i % 3) as u8,
            payment_type: (i % 2) as u8,
            payment_token: "0x0000000000000000000000000000000000000001".to_string(),
            coverage_amount: "10".to_string(),
            deductible: "0.1".to_string(),
            premium: "1".to_string(),
            start_date: base - (i as u64 % 400) * 86_400,
            end_date: base + 86_400,
            last_payment_date: base,
            status: (i % 4) as u8,
            metadata_ref: format!("QmPolicy{i}"),
            total_paid: format!("{}", (i % 12) + 1),
            claims_used: "2".to_string(),
            remaining_coverage: "8".to_string(),
        })
        .collect()
}

fn create_claims(count: usize) -> Vec<Claim> {
    let base = now().timestamp() as u64;
    (0..count)
        .map(|i| Claim {
            claim_id: i as u64 + 1,
            policy_id: (i as u64 % 100) + 1,
            claimant: format!("0x{:040x}", i),
            claim_amount: "1.5".to_string(),
            approved_amount: "1".to_string(),
            status: (i % 4) as u8,
            submission_date: base - (i as u64 % 400) * 86_400,
            processed_date: if i % 2 == 0 { base } else { 0 },
            documents_ref: format!("QmDocs{i}"),
            description: "benchmark claim".to_string(),
        })
        .collect()
}

fn bench_build_analytics(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_analytics");

    for count in [100, 1_000, 10_000].iter() {
        let policies = create_policies(*count);
        let claims = create_claims(*count);
        group.throughput(Throughput::Elements(*count as u64 * 2));
        group.bench_with_input(BenchmarkId::new("year_window", count), count, |b, _| {
            b.iter(|| {
                black_box(build_analytics(
                    &policies,
                    &claims,
                    TimeRange::OneYear,
                    now(),
                ));
            });
        });
    }
    group.finish();
}

fn bench_window_sizes(c: &mut Criterion) {
    let policies = create_policies(5_000);
    let claims = create_claims(5_000);
    let mut group = c.benchmark_group("window_sizes");

    for range in [
        TimeRange::SevenDays,
        TimeRange::ThirtyDays,
        TimeRange::NinetyDays,
        TimeRange::OneYear,
    ] {
        group.bench_with_input(
            BenchmarkId::new("range", range.to_string()),
            &range,
            |b, range| {
                b.iter(|| {
                    black_box(build_analytics(&policies, &claims, *range, now()));
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_build_analytics, bench_window_sizes);
criterion_main!(benches);
