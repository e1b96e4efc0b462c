use criterion::criterion_main;

mod benchmarks;

#[cfg(not(tarpaulin_include))]
criterion_main! {
    benchmarks::query_hit::benches,
    benchmarks::next_id::benches,
}
