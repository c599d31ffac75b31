//! Rayon thread-pool configuration for trial execution.
//!
//! The trial driver runs on the global Rayon pool by default. Callers that
//! need a fixed worker count (benchmarks, embedding hosts that reserve
//! cores for a UI thread) wrap the run in [WorkerPool::install].

use rayon::ThreadPoolBuilder;

/// Worker-thread budget for parallel trial execution. Zero means the
/// global Rayon pool (all CPU cores).
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    /// All available CPU cores.
    pub fn auto() -> Self {
        Self::default()
    }

    /// Exactly `n` worker threads.
    pub fn fixed(n: usize) -> Self {
        Self { workers: n }
    }

    /// Runs `f` under this budget: directly on the global pool when the
    /// budget is zero, otherwise inside a temporary pool of that size.
    pub fn install<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        match self.workers {
            0 => f(),
            n => ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .expect("rayon thread pool")
                .install(f),
        }
    }
}
