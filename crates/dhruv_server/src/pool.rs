//! The Compute Worker Pool (§4.B).
//!
//! The realized ephemeris primitive ([`dhruv_core::Engine`]) is `Send +
//! Sync` — kernels are read-only after load and its result cache is a
//! short-critical-section mutex — so "one ephemeris primitive per worker,
//! never shared across a compute" is satisfied by a fixed number of OS
//! threads pulling from one shared, bounded job queue, in the classic
//! thread-pool shape, rather than by per-worker process isolation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use tokio::sync::oneshot;
use tracing::warn;

type Job = Box<dyn FnOnce() + Send + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    /// The bounded queue is at capacity; the caller should map this to
    /// `ApiError::ServiceOverloaded` rather than blocking the HTTP handler.
    Overloaded,
}

/// A fixed-size pool of worker threads draining one shared, bounded queue.
pub struct WorkerPool {
    sender: Option<mpsc::SyncSender<Job>>,
    workers: Vec<thread::JoinHandle<()>>,
    size: usize,
    queue_capacity: usize,
    queue_len: Arc<AtomicUsize>,
}

impl WorkerPool {
    /// `size` workers, each idle-blocked on the shared receiver; `queue_capacity`
    /// jobs may wait beyond the `size` currently executing before `submit`
    /// starts rejecting.
    pub fn new(size: usize, queue_capacity: usize) -> Self {
        let size = size.max(1);
        let (sender, receiver) = mpsc::sync_channel::<Job>(queue_capacity.max(1));
        let receiver = Arc::new(Mutex::new(receiver));
        let queue_len = Arc::new(AtomicUsize::new(0));

        let mut workers = Vec::with_capacity(size);
        for id in 0..size {
            let receiver = Arc::clone(&receiver);
            let queue_len = Arc::clone(&queue_len);
            let handle = thread::Builder::new()
                .name(format!("dhruv-worker-{id}"))
                .spawn(move || loop {
                    let job = { receiver.lock().unwrap().recv() };
                    match job {
                        Ok(job) => {
                            queue_len.fetch_sub(1, Ordering::SeqCst);
                            job();
                        }
                        Err(_) => break,
                    }
                })
                .expect("failed to spawn worker thread");
            workers.push(handle);
        }

        Self { sender: Some(sender), workers, size, queue_capacity, queue_len }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    pub fn queue_len(&self) -> usize {
        self.queue_len.load(Ordering::SeqCst)
    }

    /// Submit a unit of work and get back a receiver for its result.
    /// Never blocks: if the bounded queue is full, returns
    /// [`SubmitError::Overloaded`] immediately.
    pub fn submit<F, R>(&self, job: F) -> Result<oneshot::Receiver<R>, SubmitError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let boxed: Job = Box::new(move || {
            let result = job();
            let _ = tx.send(result);
        });

        let sender = self.sender.as_ref().expect("pool used after shutdown");
        match sender.try_send(boxed) {
            Ok(()) => {
                self.queue_len.fetch_add(1, Ordering::SeqCst);
                Ok(rx)
            }
            Err(_) => Err(SubmitError::Overloaded),
        }
    }

    /// Close the queue and join every worker thread. Jobs already accepted
    /// run to completion; no new job is accepted once this returns.
    pub fn shutdown(&mut self) {
        drop(self.sender.take());
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                warn!("worker thread panicked during shutdown");
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn submitted_job_runs_and_returns_result() {
        let pool = WorkerPool::new(2, 8);
        let rx = pool.submit(|| 2 + 2).unwrap();
        let result = rx.await.unwrap();
        assert_eq!(result, 4);
    }

    #[tokio::test]
    async fn queue_rejects_once_full() {
        let pool = WorkerPool::new(1, 1);
        // Occupy the single worker with a job that blocks until released.
        let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();
        let _busy = pool.submit(move || {
            release_rx.recv().ok();
        });
        // Give the worker a moment to pick up the blocking job.
        std::thread::sleep(Duration::from_millis(50));

        // Fill the one queue slot.
        let _queued = pool.submit(|| 1).unwrap();
        // The queue is now full (1 running + 1 queued, capacity 1 beyond running).
        let overloaded = pool.submit(|| 1);
        assert!(matches!(overloaded, Err(SubmitError::Overloaded)));

        release_tx.send(()).ok();
    }

    #[test]
    fn shutdown_joins_workers_without_deadlock() {
        let mut pool = WorkerPool::new(3, 4);
        pool.shutdown();
        assert!(pool.workers.is_empty());
    }
}
