#![doc = r#"
# hashbench: Hash Function Throughput and Distribution Benchmark

Hashes every line of a text corpus with each registered hash function,
repeatedly, and reports how fast it went and how evenly the outputs spread
over a fixed number of buckets.

## Usage

```sh
# Benchmark all hash functions against the system dictionary
RUSTFLAGS="-C target-cpu=native" cargo run --release

# Custom corpus, 64 buckets, 20 trials
RUSTFLAGS="-C target-cpu=native" cargo run --release -- words.txt 64 20

# Benchmark specific hash functions
cargo run --release -- --hash djb2 --hash xxh3_64

# List available hash functions
cargo run -- --list-hashes

# Dump the bucket histograms for plotting
cargo run --release -- --dump-buckets > buckets.csv
```

## Metrics

- **min/avg ms**: Fastest single trial and mean over all trials
- **MiB/s**: Token bytes per trial over the average trial time
- **Checksum**: Sum of all hash outputs of the last trial (keeps the work observable)
- **Score**: Negated mean squared deviation from uniform bucket occupancy (0 is ideal)

Progress is logged to stderr; set `RUST_LOG=debug` for per-function timings.
"#]

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use hashbench::runner::{DEFAULT_BUCKETS, DEFAULT_TRIALS};
use hashbench::{
    BenchConfig, BenchError, BenchRunner, Corpus, HashRegistry, OutputFormat, Report,
};

const DEFAULT_CORPUS: &str = "/usr/share/dict/american-english";

/// Command line arguments
#[derive(Parser)]
#[command(name = "hashbench")]
#[command(about = "Hash function throughput and distribution benchmark")]
#[command(version)]
struct Args {
    /// Newline-delimited corpus file
    #[arg(default_value = DEFAULT_CORPUS)]
    corpus: PathBuf,

    /// Number of distribution buckets (0 disables the distribution score)
    #[arg(default_value_t = DEFAULT_BUCKETS)]
    buckets: usize,

    /// Number of timed trials per hash function
    #[arg(default_value_t = DEFAULT_TRIALS)]
    trials: usize,

    /// Hash functions to benchmark (can be specified multiple times)
    #[arg(long = "hash", value_name = "HASH")]
    hash_functions: Vec<String>,

    /// List all available hash functions
    #[arg(long = "list-hashes")]
    list_hashes: bool,

    /// Untimed passes per hash function before measuring
    #[arg(long = "warmup", default_value_t = 0)]
    warmup: usize,

    /// Append the raw bucket histograms after the results
    #[arg(long = "dump-buckets")]
    dump_buckets: bool,

    /// Result format
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Human)]
    format: OutputFormat,
}

fn run(args: &Args) -> Result<(), BenchError> {
    let registry = if args.hash_functions.is_empty() {
        HashRegistry::builtin()
    } else {
        HashRegistry::builtin().select(args.hash_functions.as_slice())?
    };

    let config = BenchConfig::new()
        .with_buckets(args.buckets)
        .with_trials(args.trials)
        .with_warmup(args.warmup);
    let runner = BenchRunner::new(config)?;

    let mut report = Report::new(io::stdout().lock(), args.format);
    report.write_header(&args.corpus.display().to_string(), runner.config())?;

    let corpus = Corpus::load(&args.corpus)?;
    log::info!(
        "Loaded {} bytes, {} tokens ({} token bytes)",
        corpus.len_bytes(),
        corpus.token_count(),
        corpus.total_token_bytes()
    );
    if corpus.trailing_bytes() > 0 {
        log::warn!(
            "Ignoring {} bytes after the last newline",
            corpus.trailing_bytes()
        );
    }

    let baseline_ms = BenchRunner::iteration_baseline(&corpus);
    report.write_baseline(&corpus, baseline_ms)?;

    let results = runner.run_all(&registry, &corpus)?;
    report.write(&results)?;
    if args.dump_buckets {
        report.write_bucket_dump(&results, corpus.token_count())?;
    }
    report.into_inner().flush()?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let args = Args::parse();

    if args.list_hashes {
        println!("Available hash functions:");
        for function in HashRegistry::builtin().iter() {
            println!("  {:<12} {}-bit", function.name(), function.bits());
        }
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        // Output closed early, e.g. piped into `head`.
        Err(BenchError::Output(err)) if err.kind() == io::ErrorKind::BrokenPipe => {
            log::debug!("{err}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
