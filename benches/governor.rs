use std::sync::Arc;
use std::thread;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use orcfile::memory::MemoryGovernor;

const BUDGET: u64 = 2 * 1024 * 1024 * 1024;
const STRIPE: u64 = 256 * 1024 * 1024;

/// Benchmark registering and releasing writers on one thread
fn bench_register_unregister(c: &mut Criterion) {
    let mut group = c.benchmark_group("register_unregister");

    for resident in [0usize, 16, 256] {
        let governor = Arc::new(MemoryGovernor::new(BUDGET).unwrap());
        let _held: Vec<_> = (0..resident).map(|_| governor.lease(STRIPE)).collect();

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::new("resident_writers", resident),
            &resident,
            |b, _| {
                b.iter(|| {
                    let registration = governor.register(black_box(STRIPE));
                    governor.unregister(registration.id)
                });
            },
        );
    }

    group.finish();
}

/// Benchmark pressure checks from many threads against one governor
fn bench_concurrent_checks(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_checks");
    let checks_per_thread = 1_000u64;

    for threads in [1usize, 4, 8] {
        let governor = Arc::new(MemoryGovernor::new(BUDGET).unwrap());

        group.throughput(Throughput::Elements(threads as u64 * checks_per_thread));
        group.bench_with_input(BenchmarkId::new("threads", threads), &threads, |b, &threads| {
            b.iter(|| {
                let handles: Vec<_> = (0..threads)
                    .map(|_| {
                        let governor = Arc::clone(&governor);
                        thread::spawn(move || {
                            let lease = governor.lease(STRIPE);
                            let mut flushes = 0u64;
                            for i in 0..checks_per_thread {
                                if lease.check(black_box(i * 1024 * 1024))
                                    == orcfile::memory::Pressure::MustFlushNow
                                {
                                    flushes += 1;
                                }
                            }
                            flushes
                        })
                    })
                    .collect();
                handles.into_iter().map(|h| h.join().unwrap()).sum::<u64>()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_register_unregister, bench_concurrent_checks);
criterion_main!(benches);
