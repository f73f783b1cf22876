//! Plain-text rendering of steps and final state.

use std::fmt::Write;

use bto_core::history::display::format_history;
use bto_core::{Scenario, Scheduler, StepReport};

/// Header printed before the first step.
#[must_use]
pub fn render_header(scenario: &Scenario) -> String {
    format!(
        "{}\nhistory: {}\n",
        scenario.display_name(),
        format_history(&scenario.operations)
    )
}

/// One step and its events, one event per line.
#[must_use]
pub fn render_report(report: &StepReport) -> String {
    let mut out = format!("[{}] {}\n", report.step, report.operation);
    for event in &report.events {
        let _ = writeln!(out, "    {event}");
    }
    out
}

/// Final accepted history, items, transactions and aborts.
#[must_use]
pub fn render_summary(scheduler: &Scheduler) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "accepted: {}", scheduler.accepted());
    let _ = writeln!(out, "items:");
    for item in scheduler.items().iter() {
        let _ = writeln!(out, "    {item}");
    }
    let _ = writeln!(out, "transactions:");
    for transaction in scheduler.transactions().iter() {
        let _ = writeln!(out, "    {transaction} {}", transaction.status);
    }
    let counts = scheduler.abort_counts();
    if counts.is_empty() {
        let _ = writeln!(out, "aborts: none");
    } else {
        let listed = counts
            .iter()
            .map(|(id, count)| format!("{id} x{count}"))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "aborts: {listed}");
    }
    let _ = writeln!(out, "steps: {}", scheduler.steps_taken());
    out
}
