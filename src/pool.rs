use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

use anyhow::anyhow;

use crate::tile::{self, TileRequest, TileResult};

/// Backoff while every worker is busy. Deliberate bounded polling rather
/// than an unbounded queue: the caller blocks briefly instead of piling up
/// requests.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

type Callback = Box<dyn FnOnce(TileResult) + Send + 'static>;

struct Job {
    request: TileRequest,
    on_complete: Callback,
}

struct Worker {
    busy: Arc<AtomicBool>,
    sender: Option<mpsc::Sender<Job>>,
    handle: Option<thread::JoinHandle<()>>,
}

/// Fixed-size pool of render workers, one OS thread each.
///
/// Each worker owns a private job channel; the busy flag guarantees at most
/// one request in flight per worker, so a sent job is always picked up
/// immediately. Results are delivered through the per-job callback on the
/// worker thread, in completion order, which need not match submission
/// order. The pool is recreated wholesale when configuration changes; it is
/// not reconfigured in place.
pub struct RenderPool {
    workers: Vec<Worker>,
    pending: Arc<AtomicUsize>,
    stop: Arc<AtomicBool>,
}

/// Hardware concurrency, with a fallback of 4 when it cannot be queried.
pub fn default_pool_size() -> usize {
    thread::available_parallelism().map(|n| n.get()).unwrap_or(4)
}

impl RenderPool {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        let pending = Arc::new(AtomicUsize::new(0));
        let stop = Arc::new(AtomicBool::new(false));

        let workers = (0..size)
            .map(|_| {
                let (sender, receiver) = mpsc::channel::<Job>();
                let busy = Arc::new(AtomicBool::new(false));
                let busy_for_thread = Arc::clone(&busy);
                let pending_for_thread = Arc::clone(&pending);
                let stop_for_thread = Arc::clone(&stop);

                let handle = thread::spawn(move || {
                    while let Ok(job) = receiver.recv() {
                        let result = tile::render_tile(&job.request, &stop_for_thread);
                        (job.on_complete)(result);
                        pending_for_thread.fetch_sub(1, Ordering::AcqRel);
                        busy_for_thread.store(false, Ordering::Release);
                    }
                });

                Worker {
                    busy,
                    sender: Some(sender),
                    handle: Some(handle),
                }
            })
            .collect();

        Self {
            workers,
            pending,
            stop,
        }
    }

    pub fn with_default_size() -> Self {
        Self::new(default_pool_size())
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Tiles dispatched but not yet delivered.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    pub fn stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    /// Dispatch a tile to any free worker, blocking in a bounded poll while
    /// all of them are busy. The pick among free workers is random; no
    /// ordering is implied or relied upon.
    pub fn submit(
        &self,
        request: TileRequest,
        on_complete: impl FnOnce(TileResult) + Send + 'static,
    ) -> anyhow::Result<()> {
        let mut job = Job {
            request,
            on_complete: Box::new(on_complete),
        };

        loop {
            let free: Vec<usize> = self
                .workers
                .iter()
                .enumerate()
                .filter(|(_, w)| !w.busy.load(Ordering::Acquire))
                .map(|(i, _)| i)
                .collect();

            if !free.is_empty() {
                let idx = free[fastrand::usize(..free.len())];
                let worker = &self.workers[idx];
                let Some(sender) = worker.sender.as_ref() else {
                    return Err(anyhow!("render pool is shutting down"));
                };

                worker.busy.store(true, Ordering::Release);
                self.pending.fetch_add(1, Ordering::AcqRel);

                match sender.send(job) {
                    Ok(()) => return Ok(()),
                    Err(mpsc::SendError(returned)) => {
                        // Worker thread is gone. Leave its busy flag set so
                        // it is never picked again, take back the pending
                        // count, and retry with the remaining workers.
                        self.pending.fetch_sub(1, Ordering::AcqRel);
                        job = returned;
                    }
                }
            }

            thread::sleep(POLL_INTERVAL);
        }
    }

    /// Broadcast cancellation. In-flight tile loops observe the flag within
    /// one pixel's cost and return partial buffers; tiles already delivered
    /// are not retracted. Idempotent.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

impl Drop for RenderPool {
    fn drop(&mut self) {
        for w in &mut self.workers {
            drop(w.sender.take());
        }
        for w in &mut self.workers {
            if let Some(h) = w.handle.take() {
                let _ = h.join();
            }
        }
    }
}
