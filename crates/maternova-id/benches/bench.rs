use core::hint::black_box;
use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use maternova_id::{
    AtomicCounters, BasicCounters, CounterBank, IdGenerator, IssuancePolicy, LockCounters, Role,
    TimeSource, reconcile,
};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};

struct FixedMockTime {
    millis: u64,
}

impl TimeSource for FixedMockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

// Identifiers generated per benchmark iteration, split across roles so no
// counter comes near capacity.
const TOTAL_IDS: usize = 4096;

fn generator<C: CounterBank>(counters: C) -> IdGenerator<C, FixedMockTime> {
    IdGenerator::new(counters, FixedMockTime { millis: 1 }, IssuancePolicy::Sequential)
}

/// Single-threaded generation from a fresh bank.
fn bench_generator<C: CounterBank>(c: &mut Criterion, group_name: &str, counters_fn: impl Fn() -> C) {
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = generator(counters_fn());
                for n in 0..TOTAL_IDS {
                    let id = generator.generate(Role::ALL[n % Role::COUNT]).unwrap();
                    black_box(id);
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// One bank shared by several threads, all released at once.
fn bench_generator_contended<C>(c: &mut Criterion, group_name: &str, counters_fn: impl Fn() -> C)
where
    C: CounterBank + Send + Sync,
{
    let mut group = c.benchmark_group(group_name);

    for thread_count in [1, 2, 4, 8, 16] {
        let ids_per_thread = TOTAL_IDS / thread_count;

        group.throughput(Throughput::Elements(TOTAL_IDS as u64));
        group.bench_function(format!("elems/{TOTAL_IDS}/threads/{thread_count}"), |b| {
            b.iter_custom(|iters| {
                let start = Instant::now();

                for _ in 0..iters {
                    let generator = Arc::new(generator(counters_fn()));
                    let barrier = Arc::new(Barrier::new(thread_count + 1));
                    scope(|s| {
                        for t in 0..thread_count {
                            let generator = Arc::clone(&generator);
                            let barrier = Arc::clone(&barrier);
                            s.spawn(move || {
                                barrier.wait();
                                for n in 0..ids_per_thread {
                                    let role = Role::BENEFICIARIES[(t + n) % 3];
                                    black_box(generator.generate(role).unwrap());
                                }
                            });
                        }
                        barrier.wait();
                    });
                }

                start.elapsed()
            });
        });
    }

    group.finish();
}

/// Priming a bank from a store of previously issued identifiers.
fn bench_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile");

    for stored in [1_000, 10_000, 90_000] {
        let issued: Vec<String> = (1..=stored)
            .map(|n| format!("{}{:05}", 1 + n % 3, n / 3 + 1))
            .collect();

        group.throughput(Throughput::Elements(stored as u64));
        group.bench_function(format!("stored/{stored}"), |b| {
            b.iter_batched(
                BasicCounters::new,
                |counters| {
                    black_box(reconcile(&counters, IssuancePolicy::Sequential, &issued).unwrap())
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn benchmark_sequential_basic(c: &mut Criterion) {
    bench_generator(c, "sequential/basic", BasicCounters::new);
}

fn benchmark_sequential_lock(c: &mut Criterion) {
    bench_generator(c, "sequential/lock", LockCounters::new);
}

fn benchmark_sequential_atomic(c: &mut Criterion) {
    bench_generator(c, "sequential/atomic", AtomicCounters::new);
}

/// No yielding; measures raw lock contention.
fn benchmark_contended_lock(c: &mut Criterion) {
    bench_generator_contended(c, "contended/lock", LockCounters::new);
}

/// CAS retries under contention.
fn benchmark_contended_atomic(c: &mut Criterion) {
    bench_generator_contended(c, "contended/atomic", AtomicCounters::new);
}

criterion_group!(
    benches,
    benchmark_sequential_basic,
    benchmark_sequential_lock,
    benchmark_sequential_atomic,
    benchmark_contended_lock,
    benchmark_contended_atomic,
    bench_reconcile,
);
criterion_main!(benches);
