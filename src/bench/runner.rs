/*!
 * Workload Runner
 *
 * Starts one producer thread per source and one consumer thread per watcher,
 * then times the whole exchange.
 *
 * Producers emit every signal round-robin with the round number as payload,
 * so each consumer must observe exactly `1..=E` in order. Anything else means
 * the strategy lost, duplicated or reordered an emission.
 */

use super::elapsed::{self, Elapsed};
use super::workload::{BoundWatcher, Workload};
use crate::core::errors::BenchError;
use crate::core::types::{BenchResult, Payload};
use crate::strategy::SourceHandle;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error};

/// Run `workload` to completion and return the elapsed wall time
///
/// On the first failing producer the error is returned without joining the
/// consumers; they may be blocked forever on emissions that never come.
pub fn run_workload(workload: Workload) -> BenchResult<Elapsed> {
    let Workload {
        config,
        sources,
        watchers,
    } = workload;
    let emits = config.emits;

    let start = elapsed::now()?;

    let producers = sources
        .into_iter()
        .enumerate()
        .map(|(index, source)| spawn(format!("producer-{index}"), move || produce(&source, emits)))
        .collect::<BenchResult<Vec<_>>>()?;

    let consumers = watchers
        .into_iter()
        .map(|bound| {
            let name = format!("consumer-{}-{}", bound.source, bound.watcher.signal());
            spawn(name, move || consume(bound, emits))
        })
        .collect::<BenchResult<Vec<_>>>()?;

    join_all(producers)?;
    join_all(consumers)?;

    let end = elapsed::now()?;
    let elapsed = Elapsed::between(start, end);

    debug!(
        threads = config.thread_count(),
        emissions = config.total_emissions(),
        elapsed = %elapsed,
        "workload finished"
    );
    Ok(elapsed)
}

fn produce(source: &Arc<dyn SourceHandle>, emits: usize) -> BenchResult<()> {
    for round in 1..=emits {
        let payload = Payload::new(round);
        for signal in source.signals() {
            source.emit(signal, payload)?;
        }
    }
    Ok(())
}

fn consume(mut bound: BoundWatcher, emits: usize) -> BenchResult<()> {
    for round in 1..=emits {
        let expected = Payload::new(round);
        let received = bound.watcher.wait()?;
        if received != expected {
            return Err(BenchError::OutOfOrder {
                signal: bound.watcher.signal().to_string(),
                expected,
                received,
            });
        }
    }
    Ok(())
}

fn spawn<F>(name: String, work: F) -> BenchResult<(String, JoinHandle<BenchResult<()>>)>
where
    F: FnOnce() -> BenchResult<()> + Send + 'static,
{
    let handle = thread::Builder::new()
        .name(name.clone())
        .spawn(work)
        .map_err(|e| BenchError::ThreadSpawn {
            thread: name.clone(),
            reason: e.to_string(),
        })?;
    Ok((name, handle))
}

fn join_all(handles: Vec<(String, JoinHandle<BenchResult<()>>)>) -> BenchResult<()> {
    for (name, handle) in handles {
        match handle.join() {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                error!(thread = %name, error = %err, "worker failed");
                return Err(err);
            }
            Err(_) => return Err(BenchError::ThreadPanicked { thread: name }),
        }
    }
    Ok(())
}
