//! TDD Monitor
//!
//! This example wires the ready-made machines into a small monitor loop.
//!
//! Key concepts:
//! - A producer thread standing in for a file watcher
//! - A driver loop ticking every 100 ms
//! - The tracker runs the suite one unit per tick and reports the outcome
//! - The indicator turns outcomes into a green, gray or red light
//!
//! Run with: RUST_LOG=tickwork=debug cargo run --example tdd_monitor

use std::thread;
use std::time::Duration;
use tickwork::machines::{StatusIndicator, TestRunTracker, FILE_CHANGE};
use tickwork::Runner;
use tracing::info;
use tracing_subscriber::EnvFilter;

const TICK: Duration = Duration::from_millis(100);
const TICKS: u64 = 60;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== TDD Monitor ===\n");

    let mut runner = Runner::new();
    let tracker = runner
        .register(TestRunTracker::with_total(8))
        .expect("fresh runner accepts machines");
    let lamp = runner
        .register(StatusIndicator::new())
        .expect("fresh runner accepts machines");

    // Pretend somebody saves a file every 1.5 seconds.
    let publisher = runner.publisher();
    let watcher = thread::spawn(move || {
        for save in 1..=3 {
            thread::sleep(Duration::from_millis(1500));
            info!(save, "file saved");
            if publisher.publish(FILE_CHANGE).is_err() {
                break;
            }
        }
    });

    let mut last = String::new();
    for _ in 0..TICKS {
        match runner.tick() {
            Ok(report) if !report.transitions.is_empty() => {
                for t in &report.transitions {
                    println!("tick {:>3}: {} {} -> {}", report.tick, t.machine, t.from, t.to);
                }
            }
            Ok(_) => {}
            Err(err) => eprintln!("tick failed: {err}"),
        }

        let light = runner.state_name(lamp).unwrap_or("?").to_string();
        if light != last {
            println!("           light is now {light}");
            last = light;
        }
        thread::sleep(TICK);
    }

    let _ = watcher.join();

    let machine = runner.machine(tracker).expect("registered above");
    let (completed, total) = machine.progress();
    println!("\n=== Summary ===");
    println!("Ticks:         {}", runner.ticks());
    println!("Runs finished: {}", machine.runs_finished());
    println!("Last progress: {completed}/{total}");
    for (name, state) in runner.states() {
        println!("{name:<16} {state}");
    }
}
