use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use snapcache::{RefreshingCache, Source};
use std::convert::Infallible;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

const READS_PER_THREAD: u64 = 10_000;

// Returns `size` records; every fetch produces a new batch.
struct CountingSource {
  size: u64,
  fetches: AtomicU64,
}

impl Source<u64> for CountingSource {
  type Error = Infallible;

  fn fetch_all(&self) -> Result<Vec<u64>, Infallible> {
    let batch = self.fetches.fetch_add(1, Ordering::Relaxed);
    Ok((0..self.size).map(|i| batch * self.size + i).collect())
  }
}

fn build_cache(size: u64) -> Arc<RefreshingCache<u64>> {
  let source = CountingSource {
    size,
    fetches: AtomicU64::new(0),
  };
  Arc::new(RefreshingCache::new(source, Duration::from_secs(3600)).unwrap())
}

fn bench_single_reader(c: &mut Criterion) {
  let mut group = c.benchmark_group("read/single");
  for size in [16u64, 4_096] {
    let cache = build_cache(size);
    group.throughput(Throughput::Elements(1));
    group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
      b.iter(|| {
        let snapshot = cache.read();
        black_box(snapshot.len())
      });
    });
  }
  group.finish();
}

// Many threads reading while one thread keeps forcing reloads.
fn bench_contended_reads(c: &mut Criterion) {
  let mut group = c.benchmark_group("read/contended");
  for concurrency in [2usize, 4, 8] {
    let cache = build_cache(1_024);
    group.throughput(Throughput::Elements(READS_PER_THREAD * concurrency as u64));
    group.bench_with_input(BenchmarkId::from_parameter(concurrency), &concurrency, |b, &concurrency| {
      b.iter_custom(|iters| {
        let mut total = Duration::ZERO;
        for _ in 0..iters {
          let barrier = Arc::new(Barrier::new(concurrency + 1));
          let readers: Vec<_> = (0..concurrency)
            .map(|_| {
              let cache = cache.clone();
              let barrier = barrier.clone();
              thread::spawn(move || {
                barrier.wait();
                for _ in 0..READS_PER_THREAD {
                  black_box(cache.read().first().copied());
                }
              })
            })
            .collect();

          barrier.wait();
          let start = Instant::now();
          cache.reload();
          for handle in readers {
            handle.join().unwrap();
          }
          total += start.elapsed();
        }
        total
      });
    });
  }
  group.finish();
}

criterion_group!(benches, bench_single_reader, bench_contended_reads);
criterion_main!(benches);
