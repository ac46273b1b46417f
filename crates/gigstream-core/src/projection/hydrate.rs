//! Bounded fan-out for per-object reads.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

/// Apply `f` to every item on up to `width` scoped worker threads.
///
/// Results come back in input order regardless of completion order. A
/// panic in `f` is re-raised on the calling thread.
pub fn map_ordered<T, U, F>(items: &[T], width: usize, f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync,
{
    let workers = width.max(1).min(items.len());
    if workers <= 1 {
        return items.iter().map(f).collect();
    }

    let next = AtomicUsize::new(0);
    let mut slots: Vec<Option<U>> = std::iter::repeat_with(|| None).take(items.len()).collect();

    thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                scope.spawn(|| {
                    let mut done = Vec::new();
                    loop {
                        let index = next.fetch_add(1, Ordering::Relaxed);
                        let Some(item) = items.get(index) else {
                            break;
                        };
                        done.push((index, f(item)));
                    }
                    done
                })
            })
            .collect();

        for handle in handles {
            match handle.join() {
                Ok(done) => {
                    for (index, value) in done {
                        slots[index] = Some(value);
                    }
                }
                Err(panic) => std::panic::resume_unwind(panic),
            }
        }
    });

    slots.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn preserves_input_order_under_uneven_latency() {
        let items: Vec<u64> = (0..20).collect();
        let out = map_ordered(&items, 4, |n| {
            // Earlier items finish last.
            thread::sleep(Duration::from_millis(20 - n));
            n * 10
        });
        assert_eq!(out, items.iter().map(|n| n * 10).collect::<Vec<_>>());
    }

    #[test]
    fn width_zero_runs_inline() {
        let out = map_ordered(&[1, 2, 3], 0, |n| n + 1);
        assert_eq!(out, vec![2, 3, 4]);
    }

    #[test]
    fn never_exceeds_requested_width() {
        let active = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);
        let items: Vec<u32> = (0..32).collect();

        map_ordered(&items, 3, |_| {
            let now = active.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(2));
            active.fetch_sub(1, Ordering::SeqCst);
        });

        assert!(peak.load(Ordering::SeqCst) <= 3);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let out: Vec<u8> = map_ordered(&[] as &[u8], 8, |b| *b);
        assert!(out.is_empty());
    }
}
