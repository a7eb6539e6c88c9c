use std::{thread, time::Instant};

use brillouin_core::PointSource;
use crossbeam_channel::bounded;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::reducer::{Delta, DeltaBinner, Maximum, Mean, Minimum, Reducer};

/// Points buffered per worker between the producer and the workers.
const QUEUE_DEPTH: usize = 64;

/// Errors that can occur during a reduction pass.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    #[error("a reduction needs at least one worker")]
    NoWorkers,

    #[error("a reduction worker panicked")]
    WorkerPanicked,

    #[error("reduction absorbed {absorbed} of {expected} points")]
    PointsLost { expected: u64, absorbed: u64 },
}

/// Reduces `evaluate` over every point of `source` using `workers` threads.
///
/// The calling thread feeds points into a bounded queue that all workers pull
/// from. Each worker folds its points into a private reducer created with
/// `seed.initialize()`. After every worker has joined, the partial reducers
/// are merged in worker order and the merged reducer is returned.
///
/// The result does not depend on how points were split between workers, up
/// to floating-point rounding in the merge. Results for different worker
/// counts are close but not bit-identical.
///
/// # Errors
///
/// Returns an error if `workers` is zero, a worker panics, or the merged
/// reducer did not absorb every point.
#[instrument(level = "debug", skip_all, fields(points = source.len(), workers = workers))]
pub fn reduce<S, F, R>(source: &S, evaluate: F, workers: usize, seed: &R) -> Result<R, GridError>
where
    S: PointSource + ?Sized,
    F: Fn(&S::Point) -> R::Value + Sync,
    R: Reducer,
{
    if workers == 0 {
        return Err(GridError::NoWorkers);
    }

    let started = Instant::now();
    let (sender, receiver) = bounded::<S::Point>(queue_capacity(workers));
    let evaluate = &evaluate;

    let (produced, partials) = thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                let receiver = receiver.clone();
                let mut reducer = seed.initialize();
                scope.spawn(move || {
                    for point in receiver {
                        reducer = reducer.absorb(evaluate(&point));
                    }
                    reducer
                })
            })
            .collect();
        drop(receiver);

        let mut produced: u64 = 0;
        for point in source.points() {
            // Only fails once every worker has exited, which means one panicked.
            if sender.send(point).is_err() {
                break;
            }
            produced += 1;
        }
        drop(sender);

        let partials: Vec<_> = handles.into_iter().map(thread::ScopedJoinHandle::join).collect();
        (produced, partials)
    });

    let mut merged = seed.initialize();
    for partial in partials {
        merged = merged.merge(partial.map_err(|_| GridError::WorkerPanicked)?);
    }

    if merged.count() != produced {
        return Err(GridError::PointsLost {
            expected: produced,
            absorbed: merged.count(),
        });
    }

    debug!(elapsed = ?started.elapsed(), "reduction finished");
    Ok(merged)
}

/// Averages `evaluate` over `source`.
///
/// # Errors
///
/// Returns an error under the same conditions as [`reduce`].
pub fn average<S, F>(source: &S, evaluate: F, workers: usize) -> Result<f64, GridError>
where
    S: PointSource + ?Sized,
    F: Fn(&S::Point) -> f64 + Sync,
{
    reduce(source, evaluate, workers, &Mean::new()).map(|mean| mean.result())
}

/// Finds the minimum of `evaluate` over `source`.
///
/// # Errors
///
/// Returns an error under the same conditions as [`reduce`].
pub fn minimum<S, F>(source: &S, evaluate: F, workers: usize) -> Result<f64, GridError>
where
    S: PointSource + ?Sized,
    F: Fn(&S::Point) -> f64 + Sync,
{
    reduce(source, evaluate, workers, &Minimum::new()).map(|min| min.result())
}

/// Finds the maximum of `evaluate` over `source`.
///
/// # Errors
///
/// Returns an error under the same conditions as [`reduce`].
pub fn maximum<S, F>(source: &S, evaluate: F, workers: usize) -> Result<f64, GridError>
where
    S: PointSource + ?Sized,
    F: Fn(&S::Point) -> f64 + Sync,
{
    reduce(source, evaluate, workers, &Maximum::new()).map(|max| max.result())
}

/// Bins the delta terms produced at each point of `source`.
///
/// Returns the per-bin weight sums of `binner` after the pass.
///
/// # Errors
///
/// Returns an error under the same conditions as [`reduce`].
pub fn bin_deltas<S, F>(
    source: &S,
    deltas: F,
    workers: usize,
    binner: &DeltaBinner,
) -> Result<Vec<f64>, GridError>
where
    S: PointSource + ?Sized,
    F: Fn(&S::Point) -> Vec<Delta> + Sync,
{
    reduce(source, deltas, workers, binner).map(|binner| binner.result())
}

/// Channel capacity for `workers` consumers, saturating on overflow.
fn queue_capacity(workers: usize) -> usize {
    workers.saturating_mul(QUEUE_DEPTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use approx::assert_relative_eq;
    use brillouin_core::{Point2, SquareLattice};

    fn band([kx, ky]: &Point2) -> f64 {
        -2.0 * (kx.cos() + ky.cos()) + 0.3 * kx.cos() * ky.cos()
    }

    #[test]
    fn mean_agrees_across_worker_counts() {
        let lattice = SquareLattice::brillouin_zone(64).expect("valid lattice");

        let one = average(&lattice, band, 1).expect("reduces");
        let two = average(&lattice, band, 2).expect("reduces");
        let eight = average(&lattice, band, 8).expect("reduces");

        assert_relative_eq!(one, two, epsilon = 1e-12);
        assert_relative_eq!(one, eight, epsilon = 1e-12);
    }

    #[test]
    fn mean_matches_sequential_sum() {
        let lattice = SquareLattice::new([0.0, 1.0], 11).expect("valid lattice");
        let expected = lattice.points().map(|[kx, ky]| kx * ky).sum::<f64>() / 121.0;

        let mean = average(&lattice, |[kx, ky]| kx * ky, 3).expect("reduces");
        assert_relative_eq!(mean, expected, epsilon = 1e-14);
    }

    #[test]
    fn extrema_are_exact() {
        // 65 points per side puts k = 0 and k = ±π exactly on the lattice.
        let lattice = SquareLattice::brillouin_zone(65).expect("valid lattice");
        let cosines = |[kx, ky]: &Point2| kx.cos() + ky.cos();

        assert_eq!(maximum(&lattice, cosines, 4).expect("reduces"), 2.0);
        assert_eq!(minimum(&lattice, cosines, 4).expect("reduces"), -2.0);
    }

    #[test]
    fn every_point_is_evaluated_once() {
        let lattice = SquareLattice::brillouin_zone(40).expect("valid lattice");
        let calls = AtomicUsize::new(0);

        let merged = reduce(
            &lattice,
            |_| {
                calls.fetch_add(1, Ordering::Relaxed);
                1.0
            },
            7,
            &Mean::new(),
        )
        .expect("reduces");

        assert_eq!(calls.load(Ordering::Relaxed), 1600);
        assert_eq!(merged.count(), 1600);
        assert_relative_eq!(merged.sum(), 1600.0);
    }

    #[test]
    fn histogram_total_matches_in_range_weight() {
        let lattice = SquareLattice::brillouin_zone(32).expect("valid lattice");
        let binner = DeltaBinner::new(-5.0, 5.0, 50).expect("valid binner");
        let weight = 1.0 / 1024.0;

        // The second term always lands above the binned range.
        let deltas = |k: &Point2| vec![Delta::new(band(k), weight), Delta::new(10.0, 1.0)];

        let bins = bin_deltas(&lattice, deltas, 4, &binner).expect("reduces");
        let total: f64 = bins.iter().sum();

        assert_eq!(bins.len(), 50);
        assert_relative_eq!(total, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn histogram_is_independent_of_worker_count() {
        let lattice = SquareLattice::brillouin_zone(24).expect("valid lattice");
        let binner = DeltaBinner::new(-4.5, 4.5, 30).expect("valid binner");
        let deltas = |k: &Point2| vec![Delta::new(band(k), 0.5)];

        let serial = bin_deltas(&lattice, deltas, 1, &binner).expect("reduces");
        let parallel = bin_deltas(&lattice, deltas, 6, &binner).expect("reduces");

        for (a, b) in serial.iter().zip(&parallel) {
            assert_relative_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn more_workers_than_points() {
        let values = [1.0, 2.0, 3.0];
        let mean = average(&values[..], |v| *v, 16).expect("reduces");
        assert_relative_eq!(mean, 2.0);
    }

    #[test]
    fn queue_capacity_saturates() {
        assert_eq!(queue_capacity(2), 2 * QUEUE_DEPTH);
        assert_eq!(queue_capacity(usize::MAX), usize::MAX);
    }

    #[test]
    fn rejects_zero_workers() {
        let lattice = SquareLattice::brillouin_zone(4).expect("valid lattice");
        assert_eq!(average(&lattice, band, 0), Err(GridError::NoWorkers));
    }

    #[test]
    fn reports_worker_panic() {
        let lattice = SquareLattice::brillouin_zone(8).expect("valid lattice");
        let result = average(
            &lattice,
            |[kx, _]| {
                assert!(*kx < 1.0, "evaluation failed");
                1.0
            },
            2,
        );
        assert_eq!(result, Err(GridError::WorkerPanicked));
    }
}
