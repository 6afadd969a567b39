//! Publishing from other threads and tasks while one thread ticks.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tickwork::core::Signal;
use tickwork::machine::{Context, HandlerError, Machine};
use tickwork::observe::Silent;
use tickwork::queue::{OverflowPolicy, PublishError};
use tickwork::{state_set, RunnerBuilder};

state_set! {
    enum Listening {
        Idle,
    }
}

/// Keeps the sequence numbers it received, per producer signal name.
#[derive(Default)]
struct Collector {
    received: HashMap<String, Vec<u64>>,
}

impl Collector {
    fn total(&self) -> usize {
        self.received.values().map(Vec::len).sum()
    }
}

impl Machine for Collector {
    type State = Listening;

    fn name(&self) -> &str {
        "Collector"
    }

    fn initial_state(&self) -> Listening {
        Listening::Idle
    }

    fn handle(
        &mut self,
        _state: &Listening,
        signal: &Signal,
        _ctx: &Context<'_>,
    ) -> Result<Option<Listening>, HandlerError> {
        if signal.is("tick") {
            return Ok(None);
        }
        let seq: u64 = signal.payload_as()?;
        self.received
            .entry(signal.name().to_string())
            .or_default()
            .push(seq);
        Ok(None)
    }
}

fn assert_in_order(collector: &Collector, producers: usize, per_producer: u64) {
    assert_eq!(collector.received.len(), producers);
    let expected: Vec<u64> = (0..per_producer).collect();
    for (name, seqs) in &collector.received {
        assert_eq!(seqs, &expected, "{name} delivered out of order");
    }
}

#[test]
fn producer_threads_interleave_with_ticks() {
    const PRODUCERS: usize = 4;
    const PER_PRODUCER: u64 = 250;

    let mut runner = RunnerBuilder::new()
        .unbounded()
        .observer(Arc::new(Silent))
        .build()
        .unwrap();
    let collector = runner.register(Collector::default()).unwrap();

    let handles: Vec<_> = (0..PRODUCERS)
        .map(|i| {
            let publisher = runner.publisher();
            thread::spawn(move || {
                let name = format!("producer_{i}");
                for seq in 0..PER_PRODUCER {
                    publisher.publish_with(&name, &seq).unwrap();
                }
            })
        })
        .collect();

    while handles.iter().any(|h| !h.is_finished()) {
        runner.tick().unwrap();
        thread::sleep(Duration::from_millis(1));
    }
    for handle in handles {
        handle.join().unwrap();
    }
    runner.tick().unwrap();

    let collected = runner.machine(collector).unwrap();
    assert_eq!(collected.total(), PRODUCERS * PER_PRODUCER as usize);
    assert_in_order(collected, PRODUCERS, PER_PRODUCER);
    assert_eq!(runner.pending(), 0);
}

#[test]
fn blocked_producer_resumes_after_tick() {
    const SIGNALS: u64 = 40;

    let mut runner = RunnerBuilder::new()
        .capacity(4)
        .overflow(OverflowPolicy::Block)
        .observer(Arc::new(Silent))
        .build()
        .unwrap();
    let collector = runner.register(Collector::default()).unwrap();

    let publisher = runner.publisher();
    let producer = thread::spawn(move || {
        for seq in 0..SIGNALS {
            publisher.publish_with("producer_0", &seq).unwrap();
        }
    });

    for _ in 0..10_000 {
        if runner.machine(collector).unwrap().total() == SIGNALS as usize {
            break;
        }
        let report = runner.tick().unwrap();
        // Never more than the capacity plus the heartbeat.
        assert!(report.batch <= 5);
        thread::sleep(Duration::from_millis(1));
    }
    producer.join().unwrap();

    assert_in_order(runner.machine(collector).unwrap(), 1, SIGNALS);
}

#[test]
fn dropping_the_runner_releases_blocked_producers() {
    let runner = RunnerBuilder::new()
        .capacity(1)
        .overflow(OverflowPolicy::Block)
        .observer(Arc::new(Silent))
        .build()
        .unwrap();
    let publisher = runner.publisher();
    publisher.publish("first").unwrap();

    let producer = thread::spawn(move || publisher.publish("second"));
    thread::sleep(Duration::from_millis(20));
    drop(runner);

    assert!(matches!(producer.join().unwrap(), Err(PublishError::Closed)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn async_tasks_publish_through_clones() {
    const TASKS: usize = 8;
    const PER_TASK: u64 = 100;

    let mut runner = RunnerBuilder::new()
        .observer(Arc::new(Silent))
        .build()
        .unwrap();
    let collector = runner.register(Collector::default()).unwrap();

    let mut tasks = Vec::new();
    for i in 0..TASKS {
        let publisher = runner.publisher();
        tasks.push(tokio::spawn(async move {
            let name = format!("task_{i}");
            for seq in 0..PER_TASK {
                publisher.publish_with(&name, &seq).unwrap();
                tokio::task::yield_now().await;
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let report = runner.tick().unwrap();
    assert_eq!(report.batch, TASKS * PER_TASK as usize + 1);

    let collected = runner.machine(collector).unwrap();
    assert_eq!(collected.total(), TASKS * PER_TASK as usize);
    assert_in_order(collected, TASKS, PER_TASK);
}
