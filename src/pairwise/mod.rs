//! ## All-pairs distance computation.
//!
//! [`PairwiseEngine`] computes a [`Distance`] between every unordered pair of
//! a collection of records and returns a [`CondensedMatrix`]. Each record is
//! prepared exactly once, then the pairs are computed row by row. With the
//! `parallel` feature the rows are distributed over a [rayon] thread pool;
//! each task writes to its own disjoint slice of the output, so results are
//! identical for any number of threads.
//!
//! ```
//! # use setriq::{data::Record, distance::Levenshtein, pairwise::PairwiseEngine};
//! let records: Vec<Record> = ["AASQ", "PASQ", "AAS"].into_iter().map(Record::from).collect();
//! let distances = PairwiseEngine::new().with_threads(2).compute(&Levenshtein, &records).unwrap();
//!
//! assert_eq!(distances.values(), &[1.0, 1.0, 2.0]);
//! assert_eq!(distances.get(2, 1), Some(2.0));
//! ```
//!
//! [rayon]: https://docs.rs/rayon

use crate::{
    data::{Record, err::DistanceError},
    distance::Distance,
};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tracing::{debug, trace};

mod condensed;

pub use condensed::*;

/// A handle for cooperatively cancelling a running computation. Clones share
/// the same flag.
///
/// ```
/// # use setriq::{data::{Record, err::DistanceError}, distance::Levenshtein, pairwise::{CancelToken, PairwiseEngine}};
/// let token = CancelToken::new();
/// let engine = PairwiseEngine::new().with_cancel_token(token.clone());
///
/// token.cancel();
/// let records: Vec<Record> = ["GTA", "HLA"].into_iter().map(Record::from).collect();
/// assert_eq!(engine.compute(&Levenshtein, &records), Err(DistanceError::Cancelled));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Computations observe the request between pairs.
    #[inline]
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Orchestrates the computation of all pairwise distances of a collection.
///
/// By default the computation runs on rayon's global thread pool (when the
/// `parallel` feature is enabled). [`with_threads`] runs it on a dedicated
/// pool instead, which is built once and shared by clones of the engine.
///
/// [`with_threads`]: PairwiseEngine::with_threads
#[derive(Debug, Clone, Default)]
pub struct PairwiseEngine {
    threads: Option<usize>,
    #[cfg(feature = "parallel")]
    pool:    Option<Result<Arc<rayon::ThreadPool>, crate::data::err::ConfigurationError>>,
    cancel:  Option<CancelToken>,
}

impl PairwiseEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs computations on a dedicated pool of `threads` threads. Zero uses
    /// the global pool. Without the `parallel` feature this has no effect.
    ///
    /// The pool is built here. If that fails, the error is returned by every
    /// subsequent computation.
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = (threads > 0).then_some(threads);

        #[cfg(feature = "parallel")]
        {
            self.pool = self.threads.map(|threads| {
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map(Arc::new)
                    .map_err(|e| crate::data::err::ConfigurationError::ThreadPool(e.to_string()))
            });
        }

        self
    }

    /// Stops computations early once `token` is cancelled.
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// The distance between every unordered pair of `records`, in condensed
    /// order. Fewer than two records give an empty result.
    ///
    /// ## Errors
    ///
    /// Every record is prepared before any pair is computed, and the error of
    /// the lowest-indexed record that fails preparation is returned. A
    /// cancelled computation returns [`DistanceError::Cancelled`], and an
    /// engine whose dedicated thread pool could not be built returns
    /// [`ConfigurationError::ThreadPool`].
    ///
    /// [`ConfigurationError::ThreadPool`]: crate::data::err::ConfigurationError::ThreadPool
    pub fn compute<D: Distance>(&self, metric: &D, records: &[Record]) -> Result<CondensedMatrix, DistanceError> {
        let n = records.len();
        if n < 2 {
            return Ok(CondensedMatrix::empty(n));
        }

        debug!(
            records = n,
            pairs = condensed_len(n),
            threads = ?self.threads,
            "Computing pairwise distances"
        );

        let values = self.install(|| {
            let prepared = self.prepare_all(metric, records, 0)?;
            let mut values = vec![0.0; condensed_len(n)];

            // Row i holds the distances (i, i+1), ..., (i, n-1)
            let mut rows = Vec::with_capacity(n - 1);
            let mut rest = values.as_mut_slice();
            for i in 0..n - 1 {
                let (row, tail) = rest.split_at_mut(n - 1 - i);
                rows.push((i, row));
                rest = tail;
            }

            let fill_row = |(i, row): (usize, &mut [f64])| -> Result<(), DistanceError> {
                for (offset, out) in row.iter_mut().enumerate() {
                    self.check_cancelled()?;
                    *out = metric.distance(&prepared[i], &prepared[i + 1 + offset]);
                }
                Ok(())
            };

            #[cfg(feature = "parallel")]
            {
                use rayon::prelude::*;
                rows.into_par_iter().try_for_each(fill_row)?;
            }

            #[cfg(not(feature = "parallel"))]
            rows.into_iter().try_for_each(fill_row)?;

            Ok(values)
        })?;

        debug!(pairs = values.len(), "Finished computing pairwise distances");
        Ok(CondensedMatrix::from_parts(n, values))
    }

    /// The distance between every record of `a` and every record of `b`, in
    /// row-major order: the distance between `a[i]` and `b[j]` is at
    /// `i * b.len() + j`. Records of `b` are reported in errors at indices
    /// following those of `a`.
    ///
    /// ## Errors
    ///
    /// As for [`compute`](PairwiseEngine::compute). Every record of both
    /// collections is prepared, even if the other collection is empty.
    pub fn compute_cross<D: Distance>(
        &self, metric: &D, a: &[Record], b: &[Record],
    ) -> Result<Vec<f64>, DistanceError> {
        debug!(
            rows = a.len(),
            columns = b.len(),
            threads = ?self.threads,
            "Computing cross distances"
        );

        self.install(|| {
            let prepared_a = self.prepare_all(metric, a, 0)?;
            let prepared_b = self.prepare_all(metric, b, a.len())?;
            if prepared_a.is_empty() || prepared_b.is_empty() {
                return Ok(Vec::new());
            }

            let mut values = vec![0.0; a.len() * b.len()];
            let fill_row = |(i, row): (usize, &mut [f64])| -> Result<(), DistanceError> {
                for (j, out) in row.iter_mut().enumerate() {
                    self.check_cancelled()?;
                    *out = metric.distance(&prepared_a[i], &prepared_b[j]);
                }
                Ok(())
            };

            #[cfg(feature = "parallel")]
            {
                use rayon::prelude::*;
                values.par_chunks_mut(b.len()).enumerate().try_for_each(fill_row)?;
            }

            #[cfg(not(feature = "parallel"))]
            values.chunks_mut(b.len()).enumerate().try_for_each(fill_row)?;

            Ok(values)
        })
    }

    /// Prepares every record without computing any distance, and returns
    /// every error encountered in record order. An empty report means
    /// [`compute`](PairwiseEngine::compute) will not fail validation.
    #[must_use]
    pub fn validate<D: Distance>(&self, metric: &D, records: &[Record]) -> Vec<DistanceError> {
        let report = self.install(|| Ok(self.prepare_each(metric, records, 0)));
        match report {
            Ok(results) => results.into_iter().filter_map(Result::err).collect(),
            Err(err) => vec![err],
        }
    }

    /// Prepares every record, keeping the lowest-indexed error.
    fn prepare_all<D: Distance>(
        &self, metric: &D, records: &[Record], offset: usize,
    ) -> Result<Vec<D::Prepared>, DistanceError> {
        self.check_cancelled()?;
        self.prepare_each(metric, records, offset).into_iter().collect()
    }

    fn prepare_each<D: Distance>(
        &self, metric: &D, records: &[Record], offset: usize,
    ) -> Vec<Result<D::Prepared, DistanceError>> {
        let prepare = |(i, record): (usize, &Record)| {
            trace!(record = offset + i, "Preparing record");
            metric.prepare(record, offset + i)
        };

        #[cfg(feature = "parallel")]
        let results: Vec<_> = {
            use rayon::prelude::*;
            records.par_iter().enumerate().map(prepare).collect()
        };

        #[cfg(not(feature = "parallel"))]
        let results: Vec<_> = records.iter().enumerate().map(prepare).collect();

        results
    }

    #[inline]
    fn check_cancelled(&self) -> Result<(), DistanceError> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(DistanceError::Cancelled),
            _ => Ok(()),
        }
    }

    /// Runs `op` on the dedicated pool, if one was requested.
    fn install<T, F>(&self, op: F) -> Result<T, DistanceError>
    where
        T: Send,
        F: FnOnce() -> Result<T, DistanceError> + Send, {
        #[cfg(feature = "parallel")]
        match &self.pool {
            Some(Ok(pool)) => return pool.install(op),
            Some(Err(e)) => return Err(e.clone().into()),
            None => {}
        }

        op()
    }
}

#[cfg(test)]
mod test;
