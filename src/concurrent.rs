use futures::stream::{FuturesUnordered, StreamExt};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};

/// Bounded fan-out executor. Outputs arrive in completion order.
pub struct ConcurrentProbe {
    semaphore: Arc<Semaphore>,
    completed: Arc<AtomicUsize>,
    errors: Arc<AtomicUsize>,
}

impl ConcurrentProbe {
    /// `concurrency == 0` lets every task run at once.
    pub fn new(concurrency: usize) -> Self {
        let permits = if concurrency == 0 { Semaphore::MAX_PERMITS } else { concurrency };
        Self {
            semaphore: Arc::new(Semaphore::new(permits)),
            completed: Arc::new(AtomicUsize::new(0)),
            errors: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Spawn one task per item, at most `concurrency` in flight, and return
    /// a receiver that yields one output per task that finished without
    /// panicking. Panicked tasks send nothing and are counted in `get_stats`;
    /// callers needing an outcome per item catch panics inside `task_fn`.
    ///
    /// The channel is sized to the item count so no task ever blocks on send.
    /// It closes once every task has finished.
    pub fn execute<T, F, Fut>(&self, tasks: Vec<T>, task_fn: F) -> mpsc::Receiver<Fut::Output>
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = mpsc::channel(tasks.len().max(1));
        let semaphore = self.semaphore.clone();
        let completed = self.completed.clone();
        let errors = self.errors.clone();
        let task_fn = Arc::new(task_fn);

        tokio::spawn(async move {
            let mut running = FuturesUnordered::new();

            for task in tasks {
                let Ok(permit) = semaphore.clone().acquire_owned().await else {
                    break;
                };
                let task_fn = task_fn.clone();
                let completed = completed.clone();
                let tx = tx.clone();

                running.push(tokio::spawn(async move {
                    let output = task_fn(task).await;
                    drop(permit); // Release semaphore
                    completed.fetch_add(1, Ordering::Relaxed);
                    let _ = tx.send(output).await;
                }));
            }
            drop(tx);

            while let Some(joined) = running.next().await {
                if joined.is_err() {
                    errors.fetch_add(1, Ordering::Relaxed);
                }
            }
        });

        rx
    }

    /// (completed, panicked) task counts so far.
    pub fn get_stats(&self) -> (usize, usize) {
        (
            self.completed.load(Ordering::Relaxed),
            self.errors.load(Ordering::Relaxed),
        )
    }
}
