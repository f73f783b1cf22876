use std::hint::black_box;

use bto_core::{Operation, Scheduler};
use criterion::{criterion_group, criterion_main, Criterion};

const ITEMS: [&str; 10] = ["x", "y", "z", "a", "b", "c", "d", "e", "f", "g"];

/// Build a round-robin interleaving of `transactions` programs.
/// Each program has `accesses` reads/writes followed by its commit.
/// Neighbouring transactions share items, so later ones force restarts of
/// earlier ones.
fn build_history(transactions: u64, accesses: usize) -> Vec<Operation> {
    let programs: Vec<Vec<Operation>> = (1..=transactions)
        .map(|id| {
            let mut program: Vec<Operation> = (0..accesses)
                .map(|a| {
                    let item = ITEMS[(usize::try_from(id).unwrap_or(0) + a) % ITEMS.len()];
                    if a % 2 == 0 {
                        Operation::read(id, item)
                    } else {
                        Operation::write(id, item)
                    }
                })
                .collect();
            program.push(Operation::commit(id));
            program
        })
        .collect();

    let mut history = Vec::new();
    for step in 0..=accesses {
        for program in &programs {
            history.push(program[step].clone());
        }
    }
    history
}

fn bench_scheduler(c: &mut Criterion) {
    let small = build_history(3, 3);
    let medium = build_history(8, 4);
    let large = build_history(20, 6);

    let mut group = c.benchmark_group("scheduler_run");
    for (name, history) in [("small", &small), ("medium", &medium), ("large", &large)] {
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut scheduler = Scheduler::new();
                scheduler.load_operations(black_box(history.clone()));
                let _ = scheduler.run(1_000_000);
                black_box(scheduler.accepted().len())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_scheduler);
criterion_main!(benches);
