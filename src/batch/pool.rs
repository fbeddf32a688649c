use std::panic;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

/// Maps `work` over `items` on at most `workers` scoped threads and returns
/// the results in input order.
///
/// Each worker builds its own state with `init` before taking items, so the
/// state never crosses threads. The first `init` error is returned once all
/// workers have stopped.
pub(crate) fn map_bounded<T, U, S, E, I, F>(
    items: &[T],
    workers: usize,
    init: I,
    work: F,
) -> Result<Vec<U>, E>
where
    T: Sync,
    U: Send,
    E: Send,
    I: Fn() -> Result<S, E> + Sync,
    F: Fn(&S, &T) -> U + Sync,
{
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let workers = workers.clamp(1, items.len());
    let next = AtomicUsize::new(0);
    let (next, init, work) = (&next, &init, &work);

    thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                scope.spawn(move || -> Result<Vec<(usize, U)>, E> {
                    let state = init()?;
                    let mut done = Vec::new();
                    loop {
                        let idx = next.fetch_add(1, Ordering::Relaxed);
                        let Some(item) = items.get(idx) else {
                            break;
                        };
                        done.push((idx, work(&state, item)));
                    }
                    Ok(done)
                })
            })
            .collect();

        let mut merged = Vec::with_capacity(items.len());
        let mut first_err = None;
        for handle in handles {
            match handle.join() {
                Ok(Ok(part)) => merged.extend(part),
                Ok(Err(err)) => {
                    first_err.get_or_insert(err);
                }
                Err(payload) => panic::resume_unwind(payload),
            }
        }
        if let Some(err) = first_err {
            return Err(err);
        }

        merged.sort_unstable_by_key(|(idx, _)| *idx);
        Ok(merged.into_iter().map(|(_, value)| value).collect())
    })
}
