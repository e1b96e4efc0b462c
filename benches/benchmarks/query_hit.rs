use std::time::{Duration, Instant};

use criterion::{Criterion, criterion_group};
use rand::{Rng, thread_rng};
use rand_distr::Zipf;

use aside_cached::cache::client::CacheClient;
use aside_cached::cache::config::ConfigBuilder;
use aside_cached::cache::store::memory::MemoryStore;

const CAPACITY: usize = 2 << 14;
const ITEMS: u64 = (CAPACITY / 3) as u64;
const MASK: usize = CAPACITY - 1;
const TIME_TO_LIVE: Duration = Duration::from_secs(30 * 60);

fn distribution() -> Vec<u64> {
    thread_rng()
        .sample_iter(Zipf::new(ITEMS, 1.01).unwrap())
        .take(CAPACITY)
        .map(|value| value as u64)
        .collect::<Vec<_>>()
}

fn populated_client() -> CacheClient {
    let client = CacheClient::new(MemoryStore::new(), ConfigBuilder::new().build());
    for id in 1..=ITEMS {
        client.set("cache:shop:", &id, &format!("shop#{}", id), TIME_TO_LIVE).unwrap();
    }
    client
}

pub fn query_pass_through_hits(criterion: &mut Criterion) {
    let client = populated_client();
    let distribution = distribution();

    let mut index = 0;
    criterion.bench_function("CacheClient.query_pass_through() | hits", |bencher| {
        bencher.iter_custom(|iterations| {
            let start = Instant::now();
            for _ in 0..iterations {
                let id = distribution[index & MASK];
                let _: Option<String> = client.query_pass_through("cache:shop:", &id, |_id| Ok(None), TIME_TO_LIVE).unwrap();
                index += 1;
            }
            start.elapsed()
        });
    });
}

pub fn query_with_mutex_hits(criterion: &mut Criterion) {
    let client = populated_client();
    let distribution = distribution();

    let mut index = 0;
    criterion.bench_function("CacheClient.query_with_mutex() | hits", |bencher| {
        bencher.iter_custom(|iterations| {
            let start = Instant::now();
            for _ in 0..iterations {
                let id = distribution[index & MASK];
                let _: Option<String> = client.query_with_mutex("cache:shop:", &id, |_id| Ok(None), TIME_TO_LIVE).unwrap();
                index += 1;
            }
            start.elapsed()
        });
    });
}

criterion_group!(benches, query_pass_through_hits, query_with_mutex_hits);
