//! Throughput and output-distribution benchmark for non-cryptographic hash
//! functions over a newline-delimited text corpus.
//!
//! ```
//! use hashbench::{BenchConfig, BenchRunner, Corpus, HashRegistry};
//!
//! let corpus = Corpus::from_bytes(b"apple\nbanana\ncherry\n".to_vec());
//! let runner = BenchRunner::new(BenchConfig::new().with_buckets(4).with_trials(3)).unwrap();
//! let results = runner.run_all(&HashRegistry::classic(), &corpus).unwrap();
//! assert_eq!(results.len(), 6);
//! assert!(results.iter().all(|r| r.bucket_counts.iter().sum::<u64>() == 3));
//! ```

pub mod corpus;
pub mod error;
pub mod hash_functions;
pub mod report;
pub mod runner;
pub mod score;
pub mod timer;

pub use corpus::{Corpus, TokenSpan, Tokens};
pub use error::{BenchError, Result};
pub use hash_functions::{HashFunction, HashKind, HashRegistry, Seed};
pub use report::{OutputFormat, Report, Standings};
pub use runner::{BenchConfig, BenchResult, BenchRunner};
