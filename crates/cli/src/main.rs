use std::time::Duration;
use std::{fs, process, thread};

use bto_cli::{catalog, driver, render, source, App, Command, GenerateArgs, RunArgs};
use bto_core::history::display::format_history;
use bto_core::scheduler::snapshot::Snapshot;
use bto_core::Scheduler;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let app = App::parse();
    match &app.command {
        Command::Run(args) => run(args),
        Command::Scenarios => scenarios(),
        Command::Generate(args) => generate(args),
        Command::Schema => schema(),
    }
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{message}");
    process::exit(1);
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| fail(format!("Failed to serialize: {e}")))
}

fn run(args: &RunArgs) {
    let scenario = source::resolve(args).unwrap_or_else(|e| fail(e));
    let mut scheduler = Scheduler::with_scenario(&scenario);

    if !args.json {
        print!("{}", render::render_header(&scenario));
    }

    let outcome = driver::drive(&mut scheduler, args.max_steps, |scheduler, report| {
        if args.json {
            println!("{}", to_json(report));
        } else {
            print!("{}", render::render_report(report));
        }
        if args.check_invariants {
            if let Err(violation) = scheduler.verify_invariants() {
                fail(format!("invariant violated after step {}: {violation}", report.step));
            }
        }
        if args.delay_ms > 0 && !scheduler.pending().is_exhausted() {
            thread::sleep(Duration::from_millis(args.delay_ms));
        }
    });
    if let Err(err) = outcome {
        fail(err);
    }

    if args.json {
        println!("{}", to_json(&scheduler.snapshot()));
    } else {
        print!("{}", render::render_summary(&scheduler));
    }
}

fn scenarios() {
    let scenarios = catalog::builtin().unwrap_or_else(|e| fail(e));
    for scenario in &scenarios {
        println!(
            "{:<18} {:<40} {}",
            scenario.key,
            scenario.display_name(),
            format_history(&scenario.operations)
        );
    }
}

fn generate(args: &GenerateArgs) {
    fs::create_dir_all(&args.output_dir).unwrap_or_else(|e| {
        fail(format!("Failed to create output directory: {e}"));
    });

    let histories = bto_testgen::generator::generate_mult_histories(
        args.n_hist,
        args.n_txn,
        args.n_item,
        args.n_op,
    );

    for history in &histories {
        let path = args.output_dir.join(format!("{}.json", history.get_id()));
        let file = fs::File::create(&path).unwrap_or_else(|e| {
            fail(format!("Failed to create {}: {e}", path.display()));
        });
        serde_json::to_writer_pretty(file, history).unwrap_or_else(|e| {
            fail(format!("Failed to write {}: {e}", path.display()));
        });
    }

    println!(
        "Generated {} histories to {}",
        histories.len(),
        args.output_dir.display()
    );
}

fn schema() {
    let schema = schemars::schema_for!(Snapshot);
    let text = serde_json::to_string_pretty(&schema)
        .unwrap_or_else(|e| fail(format!("Failed to serialize schema: {e}")));
    println!("{text}");
}
