//! The extraction processor.
//!
//! A [`Processor`] owns the shared state of an extraction service: its
//! configuration, the result cache, the statistics counters and the batch
//! worker pool. It is `Send + Sync`; share it behind an `Arc` to serve
//! concurrent callers.

use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use crate::cache::{self, ResultCache};
use crate::encoding;
use crate::error::{Error, Result};
use crate::extract;
use crate::guard::{self, Guard};
use crate::options::{ExtractConfig, ProcessorConfig};
use crate::result::ExtractResult;
use crate::stats::{Counters, Statistics};

/// Caching extraction service.
///
/// # Example
///
/// ```rust
/// use rs_readable::{ExtractConfig, Processor, ProcessorConfig};
///
/// let processor = Processor::new(ProcessorConfig::default())?;
/// let html = "<html><body><article><p>Readable text that is long enough to score.</p></article></body></html>";
///
/// let first = processor.extract(html, &ExtractConfig::default())?;
/// let second = processor.extract(html, &ExtractConfig::default())?;
/// assert_eq!(first, second);
/// assert_eq!(processor.statistics().cache_hits, 1);
/// # Ok::<(), rs_readable::Error>(())
/// ```
pub struct Processor {
    pub(crate) config: ProcessorConfig,
    pub(crate) cache: ResultCache,
    pub(crate) counters: Counters,
    pub(crate) pool: rayon::ThreadPool,
}

impl Processor {
    /// Validate `config` and build the processor with its worker pool.
    pub fn new(config: ProcessorConfig) -> Result<Self> {
        config.validate()?;
        let pool = build_pool(config.worker_pool_size)?;
        tracing::debug!(
            workers = config.worker_pool_size,
            cache_entries = config.max_cache_entries,
            cache_ttl_s = config.cache_ttl.as_secs(),
            max_depth = config.max_depth,
            "processor initialized"
        );
        Ok(Self {
            cache: ResultCache::new(config.max_cache_entries, config.cache_ttl),
            counters: Counters::default(),
            pool,
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Extract readable content from an HTML string.
    ///
    /// Results are cached by (document, config); a repeated call returns the
    /// cached result unchanged.
    pub fn extract(&self, html: &str, config: &ExtractConfig) -> Result<ExtractResult> {
        self.extract_with(html, config, None, None)
    }

    /// Extract from raw bytes, detecting the character encoding.
    ///
    /// The size limit applies to the raw bytes.
    pub fn extract_bytes(&self, html: &[u8], config: &ExtractConfig) -> Result<ExtractResult> {
        let outcome = guard::check_input_size(html.len(), self.config.max_input_size)
            .and_then(|()| self.run(&encoding::transcode_to_utf8(html), config, None, None));
        self.finish(outcome)
    }

    /// Single extraction with an optional batch deadline and cancel flag.
    pub(crate) fn extract_with(
        &self,
        html: &str,
        config: &ExtractConfig,
        deadline: Option<Instant>,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<ExtractResult> {
        let outcome = guard::check_input_size(html.len(), self.config.max_input_size)
            .and_then(|()| self.run(html, config, deadline, cancel));
        self.finish(outcome)
    }

    fn run(
        &self,
        html: &str,
        config: &ExtractConfig,
        deadline: Option<Instant>,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<ExtractResult> {
        config.validate()?;

        let key = cache::compute_key(html.as_bytes(), config);
        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(key = %key, "cache hit");
            return Ok(hit);
        }
        tracing::debug!(key = %key, bytes = html.len(), "cache miss");

        let mut guard = Guard::new(self.config.max_depth, self.config.processing_timeout)
            .with_deadline(deadline)
            .with_cancel(cancel);
        let result = extract::extract_content(html, config, &self.config, &mut guard)?;
        self.cache.put(key, result.clone());
        Ok(result)
    }

    pub(crate) fn finish(&self, outcome: Result<ExtractResult>) -> Result<ExtractResult> {
        self.counters.record(&outcome);
        if let Err(err) = &outcome {
            tracing::debug!(error = %err, "extraction failed");
        }
        outcome
    }

    /// Current counters.
    #[must_use]
    pub fn statistics(&self) -> Statistics {
        self.counters.snapshot(self.cache.stats())
    }

    /// Zero every counter. Cached entries are kept.
    pub fn reset_statistics(&self) {
        self.counters.reset();
        self.cache.reset_stats();
    }

    /// Drop all cached results.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Remove expired cache entries; returns how many were dropped.
    pub fn sweep_cache(&self) -> usize {
        let removed = self.cache.sweep_expired();
        if removed > 0 {
            tracing::debug!(removed, "swept expired cache entries");
        }
        removed
    }
}

impl fmt::Debug for Processor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Processor")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .field("workers", &self.pool.current_num_threads())
            .finish_non_exhaustive()
    }
}

pub(crate) fn build_pool(size: usize) -> Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(size)
        .thread_name(|index| format!("rs-readable-worker-{index}"))
        .build()
        .map_err(|e| Error::WorkerPool(e.to_string()))
}
