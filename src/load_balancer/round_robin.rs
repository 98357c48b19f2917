//! Round-robin selection strategy.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::load_balancer::backend::Backend;
use crate::load_balancer::{SelectionError, SelectionStrategy};

/// Round-robin selector.
///
/// Keeps one shared cursor, advanced atomically on every selection. The
/// cursor is a fairness hint, not a correctness-critical value: the
/// corrective store after skipping dead backends is best-effort and may be
/// overwritten by concurrent selections.
#[derive(Debug, Default)]
pub struct RoundRobin {
    cursor: AtomicUsize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SelectionStrategy for RoundRobin {
    fn select_next(&self, backends: &[Arc<Backend>]) -> Result<Arc<Backend>, SelectionError> {
        let len = backends.len();
        // Guard before the modulo: an empty pool must fail fast, not panic.
        if len == 0 {
            tracing::error!("No backend is alive: candidate sequence is empty");
            return Err(SelectionError::NoBackendAlive);
        }

        let start = self.cursor.fetch_add(1, Ordering::Relaxed).wrapping_add(1) % len;

        // Scan forward from the starting index, wrapping at most once.
        for offset in 0..len {
            let index = (start + offset) % len;
            let backend = &backends[index];
            if backend.is_alive() {
                if index != start {
                    // Self-correct future starting points toward the last
                    // known-good index. Lost updates under race are fine.
                    self.cursor.store(index, Ordering::Relaxed);
                }
                tracing::debug!(url = %backend.url, "Backend selected to serve the request");
                return Ok(backend.clone());
            }
        }

        tracing::error!("No backend is alive");
        Err(SelectionError::NoBackendAlive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn backends(count: usize) -> Vec<Arc<Backend>> {
        (0..count)
            .map(|i| {
                let url = Url::parse(&format!("http://127.0.0.1:{}", 9000 + i)).unwrap();
                Arc::new(Backend::new(url).unwrap())
            })
            .collect()
    }

    #[test]
    fn all_alive_yields_strict_cyclic_order() {
        let lb = RoundRobin::new();
        let pool = backends(3);

        // Cursor starts at 0, so the k-th selection is index (0 + k) mod 3.
        let order: Vec<_> = (0..6)
            .map(|_| lb.select_next(&pool).unwrap().url.clone())
            .collect();

        assert_eq!(order[0], pool[1].url);
        assert_eq!(order[1], pool[2].url);
        assert_eq!(order[2], pool[0].url);
        assert_eq!(order[3], pool[1].url);
        assert_eq!(order[4], pool[2].url);
        assert_eq!(order[5], pool[0].url);
    }

    #[test]
    fn dead_backend_is_skipped() {
        let lb = RoundRobin::new();
        let pool = backends(3);
        pool[1].set_alive(false);

        // Naive start index is 1, which is dead; the scan must land on 2.
        let selected = lb.select_next(&pool).unwrap();
        assert_eq!(selected.url, pool[2].url);
    }

    #[test]
    fn skipping_corrects_the_cursor_hint() {
        let lb = RoundRobin::new();
        let pool = backends(3);
        pool[1].set_alive(false);

        // First selection skips index 1 and stores index 2 as the hint, so
        // the next selection starts from index 0 rather than repeating 2.
        let first = lb.select_next(&pool).unwrap();
        assert_eq!(first.url, pool[2].url);

        let second = lb.select_next(&pool).unwrap();
        assert_eq!(second.url, pool[0].url);
    }

    #[test]
    fn all_dead_fails_with_no_backend_alive() {
        let lb = RoundRobin::new();
        let pool = backends(2);
        pool[0].set_alive(false);
        pool[1].set_alive(false);

        assert_eq!(
            lb.select_next(&pool).unwrap_err(),
            SelectionError::NoBackendAlive
        );
    }

    #[test]
    fn empty_pool_fails_without_panicking() {
        let lb = RoundRobin::new();
        assert_eq!(
            lb.select_next(&[]).unwrap_err(),
            SelectionError::NoBackendAlive
        );
    }

    #[test]
    fn revived_backend_is_selected_again() {
        let lb = RoundRobin::new();
        let pool = backends(2);
        pool[1].set_alive(false);

        for _ in 0..4 {
            assert_eq!(lb.select_next(&pool).unwrap().url, pool[0].url);
        }

        pool[1].set_alive(true);
        let urls: Vec<_> = (0..2)
            .map(|_| lb.select_next(&pool).unwrap().url.clone())
            .collect();
        assert!(urls.contains(&pool[1].url));
    }
}
