use billfold_core::models::{BillSeries, Recurrence};
use billfold_core::recurrence::generate_occurrences;
use chrono::{NaiveDate, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use uuid::Uuid;

fn bench_series(recurrence: Recurrence) -> BillSeries {
    BillSeries {
        id: Uuid::now_v7(),
        name: "Benchmark Bill".to_string(),
        amount: 99.0,
        anchor_date: NaiveDate::from_ymd_opt(2020, 1, 31).unwrap(),
        recurrence,
        deleted_from: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn bench_weekly_generation(c: &mut Criterion) {
    let series = bench_series(Recurrence::Weekly);

    c.bench_function("generate_weekly_24_months", |b| {
        b.iter(|| generate_occurrences(black_box(&series), black_box(24)).unwrap())
    });
}

fn bench_monthly_generation(c: &mut Criterion) {
    let series = bench_series(Recurrence::Monthly);

    c.bench_function("generate_monthly_120_months", |b| {
        b.iter(|| generate_occurrences(black_box(&series), black_box(120)).unwrap())
    });
}

fn bench_bounded_generation(c: &mut Criterion) {
    let mut series = bench_series(Recurrence::Weekly);
    series.deleted_from = NaiveDate::from_ymd_opt(2021, 1, 1);

    c.bench_function("generate_weekly_with_boundary", |b| {
        b.iter(|| generate_occurrences(black_box(&series), black_box(120)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_weekly_generation,
    bench_monthly_generation,
    bench_bounded_generation
);
criterion_main!(benches);
