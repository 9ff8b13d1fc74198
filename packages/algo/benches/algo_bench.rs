//! Benchmark suite for eit-algo
//!
//! Run with: cargo bench

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use eit_algo::{apply_reviews, record_review, BatchReviewItem, LearnerWordState};

fn bench_record_review(c: &mut Criterion) {
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let mut state = LearnerWordState::new(now);
    for q in [5, 4, 5] {
        state = record_review(&state, q, now).unwrap();
    }

    c.bench_function("record_review", |b| {
        b.iter(|| record_review(black_box(&state), black_box(4), now))
    });
}

fn bench_apply_reviews(c: &mut Criterion) {
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let items: Vec<BatchReviewItem> = (0..10_000)
        .map(|i| BatchReviewItem {
            state: LearnerWordState::new(now),
            quality: i % 6,
        })
        .collect();

    c.bench_function("apply_reviews_10k", |b| {
        b.iter(|| apply_reviews(black_box(&items), now))
    });
}

criterion_group!(benches, bench_record_review, bench_apply_reviews);
criterion_main!(benches);
