/// Random histories checked against the scheduler invariants after every
/// step.
use bto_core::registry::Status;
use bto_core::{Scheduler, State, Step};
use bto_testgen::generator::generate_history_with;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn check_random_history(seed: u64, n_transaction: u64, n_item: u64, n_operation: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let history = generate_history_with(&mut rng, n_transaction, n_item, n_operation);
    let original_len = history.len();

    let mut scheduler = Scheduler::new();
    scheduler.load_operations(history);

    let mut clock = 0;
    let mut steps = 0;
    loop {
        match scheduler.step() {
            Step::Advanced(report) => {
                steps += 1;
                if let Err(violation) = scheduler.verify_invariants() {
                    panic!(
                        "seed {seed}, step {} ({}): {violation}",
                        report.step, report.operation
                    );
                }
                let now = scheduler.transactions().clock();
                assert!(now >= clock, "seed {seed}: clock went backwards");
                clock = now;
            }
            Step::Completed => break,
            Step::NotStarted => panic!("seed {seed}: history vanished"),
        }
        let bound = original_len * (original_len + 1);
        assert!(steps <= bound, "seed {seed}: more than {bound} steps");
    }

    assert_eq!(scheduler.state(), State::Completed);
    // every transaction eventually commits exactly once
    let transactions = scheduler.transactions().iter();
    assert_eq!(transactions.len() as u64, n_transaction, "seed {seed}");
    assert!(transactions.iter().all(|t| t.status == Status::Committed));
    let commits = scheduler
        .accepted()
        .iter()
        .filter(|operation| operation.is_commit())
        .count();
    assert_eq!(commits as u64, n_transaction, "seed {seed}");
}

#[test]
fn small_random_histories() {
    for seed in 0..200 {
        check_random_history(seed, 3, 2, 3);
    }
}

#[test]
fn contended_random_histories() {
    for seed in 0..50 {
        check_random_history(seed, 6, 1, 4);
    }
}

#[test]
fn wide_random_histories() {
    for seed in 0..20 {
        check_random_history(seed, 10, 8, 5);
    }
}

#[test]
fn abort_history_is_reported_per_transaction() {
    let mut rng = StdRng::seed_from_u64(11);
    let history = generate_history_with(&mut rng, 5, 1, 3);
    let mut scheduler = Scheduler::new();
    scheduler.load_operations(history);
    scheduler.run(100_000).unwrap();

    let counts = scheduler.abort_counts();
    let total: usize = counts.values().sum();
    assert_eq!(total, scheduler.aborted_ids().len());
}
