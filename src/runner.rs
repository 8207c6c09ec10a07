//! Timed multi-trial benchmark of hash functions over a corpus.
//!
//! Each trial hashes every token once, in corpus order, while recording the
//! bucket `hash % n_buckets` it lands in. Timing is accumulated across all
//! trials (minimum and total). Buckets and checksum only ever describe the
//! last trial.
use std::hint::black_box;
use std::time::Duration;

use crate::corpus::Corpus;
use crate::error::{BenchError, Result};
use crate::hash_functions::{HashFunction, HashKind, HashRegistry};
use crate::score;
use crate::timer::{duration_ms, nanos_ms, Timer};

/// Default number of distribution buckets.
pub const DEFAULT_BUCKETS: usize = 32;

/// Default number of timed trials per hash function.
pub const DEFAULT_TRIALS: usize = 100;

const MIB: f64 = 1024.0 * 1024.0;

/// Benchmark parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BenchConfig {
    /// Histogram size. Zero disables distribution measurement.
    pub n_buckets: usize,

    /// Timed trials per hash function. Must be positive.
    pub n_trials: usize,

    /// Untimed passes per hash function before measuring.
    pub warmup_trials: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            n_buckets: DEFAULT_BUCKETS,
            n_trials: DEFAULT_TRIALS,
            warmup_trials: 0,
        }
    }
}

impl BenchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_buckets(mut self, n_buckets: usize) -> Self {
        self.n_buckets = n_buckets;
        self
    }

    #[must_use]
    pub fn with_trials(mut self, n_trials: usize) -> Self {
        self.n_trials = n_trials;
        self
    }

    #[must_use]
    pub fn with_warmup(mut self, warmup_trials: usize) -> Self {
        self.warmup_trials = warmup_trials;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_trials == 0 {
            return Err(BenchError::InvalidTrialCount);
        }
        Ok(())
    }
}

/// Measurements for one hash function.
#[derive(Clone, Debug)]
pub struct BenchResult {
    /// Registry index of the measured function.
    pub hash_index: usize,
    pub name: &'static str,
    pub bits: u32,
    /// Occupancy per bucket after the last trial.
    pub bucket_counts: Box<[u64]>,
    /// Token bytes hashed by the last trial.
    pub bytes_hashed: u64,
    /// Wrapping sum of the last trial's hash outputs.
    pub checksum: u64,
    /// Sum of every trial's elapsed time.
    pub total_elapsed: Duration,
    /// Fastest single trial; `Duration::MAX` until a trial completes.
    pub min_elapsed: Duration,
    pub n_trials: usize,
    pub uniformity_score: f64,
}

impl BenchResult {
    pub fn new(
        hash_index: usize,
        function: &HashFunction,
        n_buckets: usize,
        n_trials: usize,
    ) -> Self {
        Self {
            hash_index,
            name: function.name(),
            bits: function.bits(),
            bucket_counts: vec![0; n_buckets].into_boxed_slice(),
            bytes_hashed: 0,
            checksum: 0,
            total_elapsed: Duration::ZERO,
            min_elapsed: Duration::MAX,
            n_trials,
            uniformity_score: 0.0,
        }
    }

    pub fn n_buckets(&self) -> usize {
        self.bucket_counts.len()
    }

    pub fn min_elapsed_ms(&self) -> f64 {
        duration_ms(self.min_elapsed)
    }

    pub fn total_elapsed_ms(&self) -> f64 {
        duration_ms(self.total_elapsed)
    }

    /// Mean trial time. The division happens on integer nanoseconds and both
    /// go through the same conversion, so it never drops below
    /// [`BenchResult::min_elapsed_ms`].
    pub fn avg_elapsed_ms(&self) -> f64 {
        if self.n_trials == 0 {
            return 0.0;
        }
        nanos_ms(self.total_elapsed.as_nanos() / self.n_trials as u128)
    }

    /// Average hashing throughput in MiB/s.
    pub fn throughput_mib_s(&self) -> f64 {
        let avg_ms = self.avg_elapsed_ms();
        if avg_ms <= 0.0 {
            return 0.0;
        }
        (self.bytes_hashed as f64 / avg_ms) * 1000.0 / MIB
    }

    /// Checksum truncated to the function's output width.
    pub fn display_checksum(&self) -> u64 {
        if self.bits == 32 {
            u64::from(self.checksum as u32)
        } else {
            self.checksum
        }
    }
}

/// Drives the trials for each registered hash function.
#[derive(Clone, Debug)]
pub struct BenchRunner {
    config: BenchConfig,
}

impl BenchRunner {
    pub fn new(config: BenchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Times one walk over the corpus without hashing. Also warms the caches.
    pub fn iteration_baseline(corpus: &Corpus) -> f64 {
        let timer = Timer::start();
        let bytes: usize = corpus.tokens().map(<[u8]>::len).sum();
        black_box(bytes);
        timer.elapsed_ms()
    }

    /// Benchmarks every function in `registry`, in registration order.
    pub fn run_all(&self, registry: &HashRegistry, corpus: &Corpus) -> Result<Vec<BenchResult>> {
        if registry.is_empty() {
            return Err(BenchError::EmptyRegistry);
        }
        Ok(registry
            .iter()
            .enumerate()
            .map(|(index, function)| self.run(function, index, corpus))
            .collect())
    }

    pub fn run(&self, function: &HashFunction, hash_index: usize, corpus: &Corpus) -> BenchResult {
        log::info!("Benchmarking {} ({}-bit)...", function.name(), function.bits());

        let mut result = BenchResult::new(
            hash_index,
            function,
            self.config.n_buckets,
            self.config.n_trials,
        );
        let seed = function.seed();
        match function.kind() {
            HashKind::Hash32(func) => self.measure(&mut result, corpus, |token| func(token, seed)),
            HashKind::Hash64(func) => self.measure(&mut result, corpus, |token| func(token, seed)),
        }
        result.uniformity_score = score::uniformity(&result.bucket_counts, corpus.token_count());

        log::debug!(
            "{}: {:.3}/{:.3} ms (min/avg), score={:.2}",
            result.name,
            result.min_elapsed_ms(),
            result.avg_elapsed_ms(),
            result.uniformity_score
        );
        result
    }

    fn measure<H, F>(&self, result: &mut BenchResult, corpus: &Corpus, hash: F)
    where
        H: Into<u64>,
        F: Fn(&[u8]) -> H,
    {
        for _ in 0..self.config.warmup_trials {
            for token in corpus.tokens() {
                black_box(hash(token));
            }
        }

        for _ in 0..self.config.n_trials {
            let elapsed = trial(result, corpus, &hash);
            result.min_elapsed = result.min_elapsed.min(elapsed);
        }
    }
}

/// One timed pass. Resets the per-trial state, adds the sample into the
/// result's total and returns it.
fn trial<H, F>(result: &mut BenchResult, corpus: &Corpus, hash: &F) -> Duration
where
    H: Into<u64>,
    F: Fn(&[u8]) -> H,
{
    let buckets = &mut result.bucket_counts;
    buckets.fill(0);
    let n_buckets = buckets.len() as u64;
    let mut checksum = 0u64;
    let mut bytes = 0u64;

    let timer = Timer::start();
    for token in corpus.tokens() {
        let value: u64 = hash(token).into();
        bytes += token.len() as u64;
        checksum = checksum.wrapping_add(value);
        if n_buckets != 0 {
            buckets[(value % n_buckets) as usize] += 1;
        }
    }
    let elapsed = timer.stop_and_accumulate(&mut result.total_elapsed);

    result.checksum = black_box(checksum);
    result.bytes_hashed = bytes;
    elapsed
}
