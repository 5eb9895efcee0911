use rayon::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("failed to start worker pool: {0}")]
pub struct PoolError(#[from] rayon::ThreadPoolBuildError);

/// Pool size for `items` units of work: never more workers than items, never zero.
pub fn worker_count(configured: usize, items: usize) -> usize {
    configured.min(items).max(1)
}

/// A bounded set of worker threads, built once and reused for every batch.
///
/// With one worker no threads are spawned and jobs run on the caller.
#[derive(Debug)]
pub struct WorkerPool {
    pool: Option<rayon::ThreadPool>,
    threads: usize,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Result<Self, PoolError> {
        let threads = workers.max(1);
        let pool = if threads == 1 {
            None
        } else {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("ulp-worker-{i}"))
                    .build()?,
            )
        };
        Ok(Self { pool, threads })
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Runs `job` once per item and returns when every item is done.
    ///
    /// Items are handed out once and never revisited. A panic inside `job` is
    /// re-raised on the calling thread after the pool unwinds.
    pub fn for_each<T, F>(&self, items: &[T], job: F)
    where
        T: Sync,
        F: Fn(&T) + Send + Sync,
    {
        match &self.pool {
            Some(pool) if items.len() > 1 => pool.install(|| items.par_iter().for_each(job)),
            _ => items.iter().for_each(job),
        }
    }
}

/// One-off batch on a fresh pool of at most `workers` threads.
pub fn for_each_parallel<T, F>(items: &[T], workers: usize, job: F) -> Result<(), PoolError>
where
    T: Sync,
    F: Fn(&T) + Send + Sync,
{
    if items.is_empty() {
        return Ok(());
    }
    WorkerPool::new(worker_count(workers, items.len()))?.for_each(items, job);
    Ok(())
}
