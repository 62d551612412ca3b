//! Worker pool for per-file processing.
//!
//! One rayon pool is built per run and reused for every batch.
//! `par_iter().map().collect()` keeps results in input order.

use rayon::ThreadPool;
use rayon::prelude::*;

use crate::error::Result;

/// Default worker count: one per available core.
pub fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(4)
}

/// Build a pool with `jobs` worker threads (at least one).
pub fn build_pool(jobs: usize) -> Result<ThreadPool> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.max(1))
        .thread_name(|i| format!("wikidict-worker-{i}"))
        .build()?;
    Ok(pool)
}

/// Apply `f` to every item on `pool`. Output order matches `items`.
pub fn map_ordered<T, R, F>(pool: &ThreadPool, items: &[T], f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    pool.install(|| items.par_iter().map(f).collect())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::panic::{self, AssertUnwindSafe};
    use std::thread;
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_preserves_order() {
        let pool = build_pool(8).expect("pool");
        let items: Vec<u64> = (0..200).collect();
        let out = map_ordered(&pool, &items, |&n| {
            if n % 7 == 0 {
                thread::sleep(Duration::from_millis(1));
            }
            n * 2
        });
        assert_eq!(out, items.iter().map(|n| n * 2).collect::<Vec<_>>());
    }

    #[test]
    fn test_uses_pool_threads() {
        let pool = build_pool(4).expect("pool");
        assert_eq!(pool.current_num_threads(), 4);

        let items: Vec<u32> = (0..64).collect();
        let names = map_ordered(&pool, &items, |_| {
            thread::sleep(Duration::from_millis(2));
            thread::current().name().map(str::to_string)
        });
        let distinct: HashSet<_> = names.iter().collect();
        assert!(distinct.len() > 1);
        assert!(
            names
                .iter()
                .all(|n| n.as_deref().is_some_and(|n| n.starts_with("wikidict-worker-")))
        );
    }

    #[test]
    fn test_zero_jobs_and_empty_input() {
        let pool = build_pool(0).expect("pool");
        assert_eq!(pool.current_num_threads(), 1);

        let items = vec!["a", "b"];
        assert_eq!(map_ordered(&pool, &items, |s| s.to_uppercase()), vec!["A", "B"]);
        let empty: Vec<u8> = Vec::new();
        assert!(map_ordered(&pool, &empty, |&b| b).is_empty());
        assert!(default_jobs() >= 1);
    }

    #[test]
    fn test_panicking_job_propagates() {
        let pool = build_pool(2).expect("pool");
        let items: Vec<u32> = (0..100).collect();
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            map_ordered(&pool, &items, |_| -> u32 { panic!("worker failed") })
        }));
        assert!(result.is_err());
    }
}
