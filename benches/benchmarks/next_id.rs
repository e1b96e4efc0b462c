use std::time::Instant;

use criterion::{Criterion, criterion_group};

use aside_cached::cache::clock::SystemClock;
use aside_cached::cache::id::time_ordered_id_generator::TimeOrderedIdGenerator;
use aside_cached::cache::store::memory::MemoryStore;

pub fn next_order_id(criterion: &mut Criterion) {
    let id_generator = TimeOrderedIdGenerator::new(MemoryStore::new(), SystemClock::boxed());

    criterion.bench_function("TimeOrderedIdGenerator.next_id()", |bencher| {
        bencher.iter_custom(|iterations| {
            let start = Instant::now();
            for _ in 0..iterations {
                id_generator.next_id("order").unwrap();
            }
            start.elapsed()
        });
    });
}

criterion_group!(benches, next_order_id);
