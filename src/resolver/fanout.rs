//! Ordered fan-out/fan-in for per-item joins.
//!
//! Each item becomes one job. Results are written back into a slot indexed by
//! the item's original position, so the output order never depends on which
//! worker finished first.

use std::thread;

use crossbeam_channel::{bounded, unbounded};

use crate::error::{SocialError, SocialResult};

/// Applies `f` to every item and returns the results in item order.
///
/// With `workers <= 1` the jobs run inline on the caller's thread. Otherwise
/// scoped worker threads pull item indices from a bounded queue of
/// `queue_capacity` slots. If several items fail, the error of the lowest
/// index is returned.
pub(crate) fn map_ordered<I, R, F>(
    items: &[I],
    workers: usize,
    queue_capacity: usize,
    f: F,
) -> SocialResult<Vec<R>>
where
    I: Sync,
    R: Send,
    F: Fn(&I) -> SocialResult<R> + Sync,
{
    if workers <= 1 || items.len() <= 1 {
        return items.iter().map(&f).collect();
    }

    let workers = workers.min(items.len());
    let (job_tx, job_rx) = bounded::<usize>(queue_capacity.max(1));
    let (done_tx, done_rx) = unbounded::<(usize, SocialResult<R>)>();

    let joined = thread::scope(|scope| {
        let mut handles = Vec::with_capacity(workers);
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let done_tx = done_tx.clone();
            let f = &f;
            handles.push(scope.spawn(move || {
                for idx in job_rx {
                    if done_tx.send((idx, f(&items[idx]))).is_err() {
                        break;
                    }
                }
            }));
        }
        // Workers hold the only remaining ends.
        drop(job_rx);
        drop(done_tx);

        for idx in 0..items.len() {
            if job_tx.send(idx).is_err() {
                break;
            }
        }
        drop(job_tx);

        handles
            .into_iter()
            .map(|h| h.join())
            .filter(Result::is_err)
            .count()
    });

    if joined > 0 {
        return Err(SocialError::internal(format!(
            "{joined} fan-out worker(s) panicked"
        )));
    }

    let mut slots: Vec<Option<SocialResult<R>>> = (0..items.len()).map(|_| None).collect();
    for (idx, result) in done_rx {
        slots[idx] = Some(result);
    }

    let mut out = Vec::with_capacity(items.len());
    for (idx, slot) in slots.into_iter().enumerate() {
        match slot {
            Some(Ok(value)) => out.push(value),
            Some(Err(err)) => return Err(err),
            None => {
                return Err(SocialError::internal(format!(
                    "fan-out lost the result for item {idx}"
                )))
            }
        }
    }
    Ok(out)
}
