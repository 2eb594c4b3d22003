use criterion::{Criterion, criterion_group, criterion_main};
use memo_selector::{SelectorCreator, SelectorOptions, StabilityCheck};
use std::hint::black_box;
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq)]
struct Catalog {
    prices: Rc<Vec<u64>>,
    tax_percent: u64,
    revision: u64,
}

/// A catalog with a shared price list, so equal catalogs compare by pointer.
fn build_catalog(items: u64) -> Catalog {
    Catalog {
        prices: Rc::new((1..=items).collect()),
        tax_percent: 20,
        revision: 0,
    }
}

fn bench_select(criterion: &mut Criterion) {
    let creator = SelectorCreator::default();
    let total = creator.create_with(
        (
            |catalog: &Catalog| Rc::clone(&catalog.prices),
            |catalog: &Catalog| catalog.tax_percent,
        ),
        |prices: Rc<Vec<u64>>, tax: u64| prices.iter().sum::<u64>() * (100 + tax) / 100,
        SelectorOptions::new().input_stability_check(StabilityCheck::Never),
    );

    let catalog = build_catalog(10_000);
    criterion.bench_function("select_cache_hit", |bencher| {
        bencher.iter(|| black_box(total.select(black_box(&catalog))));
    });

    // Alternate between two catalogs so every call misses both caches.
    let other = Catalog {
        tax_percent: 10,
        ..catalog.clone()
    };
    let mut flip = false;
    criterion.bench_function("select_recompute", |bencher| {
        bencher.iter(|| {
            flip = !flip;
            let current = if flip { &catalog } else { &other };
            black_box(total.select(black_box(current)))
        });
    });

    // A new revision with unchanged dependencies: outer miss, inner hit.
    let mut revision = 0;
    criterion.bench_function("select_dependency_hit", |bencher| {
        bencher.iter(|| {
            revision += 1;
            let fresh = Catalog {
                revision,
                ..catalog.clone()
            };
            black_box(total.select(black_box(&fresh)))
        });
    });
}

criterion_group!(select_benches, bench_select);
criterion_main!(select_benches);
