use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::thread;
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;

use crate::cache::errors::CacheError;
use crate::cache::rebuild::RebuildStatus;
use crate::cache::rebuild::acknowledgement::RebuildAcknowledgement;
use crate::cache::stats::ConcurrentStatsCounter;
use crate::cache::types::TotalRebuildWorkers;

pub(crate) type RebuildTask = Box<dyn FnOnce() -> Result<(), CacheError> + Send + 'static>;

/// RebuildPool executes the background rebuilds dispatched by the logical-expiration
/// strategy: a fixed number of worker threads consuming an unbounded task queue.
/// A failing or panicking task is logged and counted, it never takes a worker down.
/// `shutdown` closes the queue and joins the workers; pending tasks run to completion,
/// tasks submitted afterwards resolve as failed.
pub(crate) struct RebuildPool {
    sender: Mutex<Option<Sender<TaskAcknowledgementPair>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    stats_counter: Arc<ConcurrentStatsCounter>,
}

struct TaskAcknowledgementPair {
    task: RebuildTask,
    acknowledgement: Arc<RebuildAcknowledgement>,
}

impl RebuildPool {
    pub(crate) fn new(total_workers: TotalRebuildWorkers, stats_counter: Arc<ConcurrentStatsCounter>) -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let pool = RebuildPool {
            sender: Mutex::new(Some(sender)),
            workers: Mutex::new(Vec::with_capacity(total_workers)),
            stats_counter,
        };
        pool.spin(total_workers, receiver);
        pool
    }

    fn spin(&self, total_workers: TotalRebuildWorkers, receiver: Receiver<TaskAcknowledgementPair>) {
        let mut workers = self.workers.lock();
        for _ in 0..total_workers {
            let receiver = receiver.clone();
            let stats_counter = self.stats_counter.clone();

            workers.push(thread::spawn(move || {
                while let Ok(pair) = receiver.recv() {
                    let status = match catch_unwind(AssertUnwindSafe(pair.task)) {
                        Ok(Ok(())) => RebuildStatus::Completed,
                        Ok(Err(cause)) => {
                            log::error!("cache rebuild failed: {}", cause);
                            RebuildStatus::Failed
                        }
                        Err(_) => {
                            log::error!("cache rebuild panicked");
                            RebuildStatus::Failed
                        }
                    };
                    if let RebuildStatus::Failed = status {
                        stats_counter.rebuild_failed();
                    }
                    pair.acknowledgement.done(status);
                }
            }));
        }
    }

    pub(crate) fn submit(&self, task: RebuildTask) -> Arc<RebuildAcknowledgement> {
        let acknowledgement = RebuildAcknowledgement::new();
        match &*self.sender.lock() {
            Some(sender) => {
                let pair = TaskAcknowledgementPair { task, acknowledgement: acknowledgement.clone() };
                if sender.send(pair).is_err() {
                    acknowledgement.done(RebuildStatus::Failed);
                }
            }
            None => acknowledgement.done(RebuildStatus::Failed),
        }
        acknowledgement
    }

    pub(crate) fn shutdown(&self) {
        self.sender.lock().take();

        let workers = self.workers.lock().drain(..).collect::<Vec<_>>();
        for worker in workers {
            let _ = worker.join();
        }
    }
}

impl Drop for RebuildPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}
