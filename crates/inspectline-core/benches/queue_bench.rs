//! Criterion benchmarks for level queue construction and validation.
//!
//! Two benchmark groups:
//! - `build_queue`: small (R = 3) and large (R = 60) levels
//! - `validate`: a full six-slot order against its recipe

use criterion::{Criterion, criterion_group, criterion_main};
use inspectline_core::catalog::IngredientType::*;
use inspectline_core::item::ItemGenerator;
use inspectline_core::queue::QueueBuilder;
use inspectline_core::recipe::RecipeSpec;
use inspectline_core::test_utils::*;
use inspectline_core::validation::{OrderValidator, ScoringConfig};

fn large_level() -> Vec<RecipeSpec> {
    (0..6)
        .map(|i| {
            recipe(
                &format!("big{i}"),
                &[(Tomato, 3), (Onion, 2), (Potato, 3), (Carrot, 2)],
            )
        })
        .collect()
}

fn bench_build_queue(c: &mut Criterion) {
    let builder = QueueBuilder::new(ItemGenerator::new(standard_catalog()));
    let small = vec![recipe("salad", &[(Tomato, 2), (Onion, 1)])];
    let large = large_level();

    let mut group = c.benchmark_group("build_queue");
    group.bench_function("small", |b| {
        let mut rng = seeded(1);
        b.iter(|| builder.build_queue(&small, test_date(), &mut rng))
    });
    group.bench_function("large", |b| {
        let mut rng = seeded(2);
        b.iter(|| builder.build_queue(&large, test_date(), &mut rng))
    });
    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let validator = OrderValidator::new(standard_catalog(), ScoringConfig::default());
    let spec = recipe("six", &[(Tomato, 3), (Cabbage, 3)]);
    let items = [Tomato, Tomato, Tomato, Cabbage, Cabbage, Cabbage]
        .into_iter()
        .map(|t| correct_record(t, test_date()))
        .collect();
    let order = order_with("six", items);

    c.bench_function("validate", |b| {
        b.iter(|| validator.validate(&order, &spec, test_date()))
    });
}

criterion_group!(benches, bench_build_queue, bench_validate);
criterion_main!(benches);
