#![allow(dead_code)]

use bto_core::{Scheduler, Step, StepReport};

/// DSL macro for building test histories.
///
/// Produces `Vec<&'static str>` of operation tokens.
///
/// # Syntax
///
/// ```ignore
/// history![r1(x), w1(x), c1, r2(x), c2]
/// ```
///
/// - `r1(x)` → `"r1(x)"`
/// - `w2(y)` → `"w2(y)"`
/// - `c1`    → `"c1"`
#[macro_export]
macro_rules! history {
    ($($op:ident $(($item:ident))?),* $(,)?) => {
        vec![$(concat!(stringify!($op) $(, "(", stringify!($item), ")")?)),*]
    };
}

/// Load `tokens` and step to completion, checking the run invariants after
/// every step. Panics if the run does not finish within `max_steps`.
pub fn run_checked(tokens: &[&str], max_steps: usize) -> (Scheduler, Vec<StepReport>) {
    let mut scheduler = Scheduler::new();
    scheduler.load(tokens).expect("history should parse");
    let mut reports = Vec::new();
    for _ in 0..max_steps {
        match scheduler.step() {
            Step::Advanced(report) => {
                if let Err(violation) = scheduler.verify_invariants() {
                    panic!("after step {} ({}): {violation}", report.step, report.operation);
                }
                for aborted in scheduler.aborted_ids() {
                    let stale = scheduler.accepted().iter().any(|operation| {
                        operation.transaction() == *aborted
                            && scheduler.transaction(*aborted).is_none()
                    });
                    assert!(!stale, "operations of aborted {aborted} left in the accepted log");
                }
                reports.push(report);
            }
            Step::Completed => return (scheduler, reports),
            Step::NotStarted => panic!("scheduler lost its history"),
        }
    }
    panic!("history did not complete within {max_steps} steps");
}

/// The item's `(RTS, WTS)`.
pub fn timestamps(scheduler: &Scheduler, item: &str) -> (u64, u64) {
    let item = scheduler
        .item(item)
        .unwrap_or_else(|| panic!("item {item} was never accessed"));
    (item.rts, item.wts)
}
