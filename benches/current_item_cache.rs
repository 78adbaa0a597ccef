//! Current-item cache benchmarks.
//!
//! Verifies the scroll-tracking fast path: offset updates inside the cached
//! page's span must cost no positional lookup, so steady scrolling stays
//! O(1) regardless of item count.
//!
//! Run with: cargo bench --bench current_item_cache --features bench-internals

#![allow(missing_docs)] // criterion macros generate undocumented items

use chatdeck::browser::DetailController;
use chatdeck::model::{IndexPath, Point, Size};
use chatdeck::test_harness::{FixedContainer, RecordingIndicator, RecordingView};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const PAGE: f64 = 320.0;
const HEIGHT: f64 = 480.0;

fn setup(pages: usize) -> (DetailController<FixedContainer>, RecordingView, RecordingIndicator) {
    let container = FixedContainer::uniform(pages, Size::new(20.0, 20.0));
    let controller = DetailController::new(container, Some(IndexPath::new(0, 0)));
    let view = RecordingView::paged(pages, PAGE, HEIGHT);
    let indicator = RecordingIndicator::default();
    (controller, view, indicator)
}

/// Repeated offset updates inside one page: every update after the first
/// hits the cache.
fn benchmark_cache_hits(c: &mut Criterion) {
    let mut group = c.benchmark_group("scroll_cache_hit");

    for pages in [100, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::new("within_page", pages), &pages, |b, &pages| {
            let (mut controller, mut view, mut indicator) = setup(pages);
            let base = (pages / 2) as f64 * PAGE;
            // Warm the cache onto the middle page.
            view.offset = Point::new(base + 1.0, 0.0);
            controller.scroll_did_change(&view, &mut indicator);

            let mut step = 0u32;
            b.iter(|| {
                // Stay strictly inside the warmed page.
                step = (step + 1) % 100;
                view.offset = Point::new(base + 1.0 + f64::from(step), 0.0);
                controller.scroll_did_change(black_box(&view), &mut indicator);
                indicator.interpolations.clear();
            });
        });
    }

    group.finish();
}

/// Alternating page boundaries: every update misses the cache and pays the
/// positional lookup.
fn benchmark_cache_misses(c: &mut Criterion) {
    let mut group = c.benchmark_group("scroll_cache_miss");

    for pages in [100, 10_000] {
        group.bench_with_input(
            BenchmarkId::new("across_pages", pages),
            &pages,
            |b, &pages| {
                let (mut controller, mut view, mut indicator) = setup(pages);
                let mid = (pages / 2) as f64;

                let mut flip = false;
                b.iter(|| {
                    flip = !flip;
                    let page = if flip { mid } else { mid + 1.0 };
                    view.offset = Point::new(page * PAGE + 1.0, 0.0);
                    controller.scroll_did_change(black_box(&view), &mut indicator);
                    indicator.interpolations.clear();
                });
            },
        );
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = benchmark_cache_hits, benchmark_cache_misses
}

criterion_main!(benches);
