//! Batch extraction over a bounded worker pool.
//!
//! Workers pull the next pending index from a shared cursor, so at most
//! `pool_size` documents are in flight and results land in input order
//! regardless of completion order.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::options::ExtractConfig;
use crate::processor::{build_pool, Processor};
use crate::result::ExtractResult;

/// What a batch does when one of its documents fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Run every document; each slot carries its own outcome.
    #[default]
    CollectAll,
    /// Stop at the first error and return it in place of the results.
    FailFast,
}

/// Per-batch settings.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Concurrent extractions. `None` uses the processor's pool size.
    pub pool_size: Option<usize>,
    pub failure_policy: FailurePolicy,
    /// Wall-clock budget for the whole batch.
    pub deadline: Option<Duration>,
}

impl BatchOptions {
    pub fn validate(&self) -> Result<()> {
        if self.pool_size == Some(0) {
            return Err(Error::invalid_config("pool_size", "must be at least 1"));
        }
        if self.deadline.is_some_and(|d| d.is_zero()) {
            return Err(Error::invalid_config("deadline", "must be greater than 0"));
        }
        Ok(())
    }
}

impl Processor {
    /// Extract many documents concurrently.
    ///
    /// Results are aligned with `inputs`. Under [`FailurePolicy::FailFast`]
    /// the first error cancels in-flight and pending documents and is
    /// returned as the outer `Err`. An invalid `config` or `options` rejects
    /// the whole batch before any work starts.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rs_readable::{BatchOptions, ExtractConfig, Processor, ProcessorConfig};
    ///
    /// let processor = Processor::new(ProcessorConfig::default())?;
    /// let docs = ["<p>first document body text</p>", "<p>second document body text</p>"];
    /// let results = processor.extract_batch(&docs, &ExtractConfig::default(), &BatchOptions::default())?;
    /// assert_eq!(results.len(), 2);
    /// assert!(results.iter().all(Result::is_ok));
    /// # Ok::<(), rs_readable::Error>(())
    /// ```
    pub fn extract_batch<S>(
        &self,
        inputs: &[S],
        config: &ExtractConfig,
        options: &BatchOptions,
    ) -> Result<Vec<Result<ExtractResult>>>
    where
        S: AsRef<str> + Sync,
    {
        config.validate()?;
        options.validate()?;
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let pool_size = options.pool_size.unwrap_or(self.config.worker_pool_size);
        let dedicated;
        let pool = if pool_size == self.pool.current_num_threads() {
            &self.pool
        } else {
            dedicated = build_pool(pool_size)?;
            &dedicated
        };

        let started = Instant::now();
        let deadline = options.deadline.and_then(|d| started.checked_add(d));
        let budget = options.deadline.unwrap_or(self.config.processing_timeout);
        let fail_fast = options.failure_policy == FailurePolicy::FailFast;
        let cancel = Arc::new(AtomicBool::new(false));
        let first_error: Mutex<Option<Error>> = Mutex::new(None);
        let slots: Vec<Mutex<Option<Result<ExtractResult>>>> = inputs.iter().map(|_| Mutex::new(None)).collect();
        let cursor = AtomicUsize::new(0);
        let workers = pool_size.min(inputs.len());

        tracing::debug!(documents = inputs.len(), workers, fail_fast, "batch started");

        pool.scope(|scope| {
            for _ in 0..workers {
                scope.spawn(|_| loop {
                    let index = cursor.fetch_add(1, Ordering::Relaxed);
                    let Some(input) = inputs.get(index) else {
                        break;
                    };

                    let outcome = if fail_fast && cancel.load(Ordering::Relaxed) {
                        Err(Error::Cancelled)
                    } else if deadline.is_some_and(|d| Instant::now() >= d) {
                        self.finish(Err(Error::ProcessingTimeout { budget }))
                    } else {
                        let flag = fail_fast.then(|| Arc::clone(&cancel));
                        self.extract_with(input.as_ref(), config, deadline, flag)
                    };

                    if fail_fast {
                        if let Err(err) = &outcome {
                            if *err != Error::Cancelled {
                                let mut first = first_error.lock();
                                if first.is_none() {
                                    tracing::debug!(index, error = %err, "batch failing fast");
                                    *first = Some(err.clone());
                                    cancel.store(true, Ordering::Relaxed);
                                }
                            }
                        }
                    }
                    if let Some(slot) = slots.get(index) {
                        *slot.lock() = Some(outcome);
                    }
                });
            }
        });

        tracing::debug!(
            documents = inputs.len(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "batch finished"
        );

        if let Some(err) = first_error.into_inner() {
            return Err(err);
        }
        Ok(slots
            .into_iter()
            .map(|slot| slot.into_inner().unwrap_or(Err(Error::Cancelled)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ProcessorConfig;

    fn doc(n: usize) -> String {
        format!("<html><head><title>Doc {n}</title></head><body><p>Body text for document number {n} in the batch.</p></body></html>")
    }

    fn processor(workers: usize) -> Processor {
        Processor::new(ProcessorConfig { worker_pool_size: workers, ..ProcessorConfig::default() }).unwrap()
    }

    #[test]
    fn test_results_follow_input_order() {
        let processor = processor(2);
        let docs: Vec<String> = (0..12).map(doc).collect();
        let results = processor.extract_batch(&docs, &ExtractConfig::default(), &BatchOptions::default()).unwrap();
        assert_eq!(results.len(), 12);
        for (n, result) in results.iter().enumerate() {
            assert_eq!(result.as_ref().unwrap().title, format!("Doc {n}"));
        }
        assert_eq!(processor.statistics().documents_processed, 12);
    }

    #[test]
    fn test_dedicated_pool_size() {
        let processor = processor(1);
        let docs: Vec<String> = (0..5).map(doc).collect();
        let options = BatchOptions { pool_size: Some(3), ..BatchOptions::default() };
        let results = processor.extract_batch(&docs, &ExtractConfig::default(), &options).unwrap();
        assert!(results.iter().all(Result::is_ok));
    }

    #[test]
    fn test_empty_batch() {
        let processor = processor(1);
        let docs: [&str; 0] = [];
        let results = processor.extract_batch(&docs, &ExtractConfig::default(), &BatchOptions::default()).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_invalid_options_reject_batch() {
        let processor = processor(1);
        let options = BatchOptions { pool_size: Some(0), ..BatchOptions::default() };
        let err = processor.extract_batch(&[doc(0)], &ExtractConfig::default(), &options).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { ref field, .. } if field == "pool_size"));
    }
}
