//! Output formatters for benchmark results.
//!
//! - [`OutputFormat::Human`]: fixed-width table with the fastest/slowest and
//!   best/worst-score functions annotated (default)
//! - [`OutputFormat::Csv`]: one comma-separated row per hash function
//!
//! [`Report::write_bucket_dump`] additionally emits the raw bucket histograms
//! for offline plotting.

use std::io::{self, Write};

use crate::corpus::Corpus;
use crate::runner::{BenchConfig, BenchResult};

/// Output format for benchmark results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table.
    #[default]
    Human,

    /// Comma-separated values.
    Csv,
}

/// Positions of the distinguished results. Ties go to the lowest index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Standings {
    pub fastest: usize,
    pub slowest: usize,
    pub best_score: usize,
    pub worst_score: usize,
}

impl Standings {
    /// `None` when there is nothing to rank.
    pub fn from_results(results: &[BenchResult]) -> Option<Self> {
        results.first()?;
        let mut standings = Self {
            fastest: 0,
            slowest: 0,
            best_score: 0,
            worst_score: 0,
        };
        for (i, result) in results.iter().enumerate().skip(1) {
            if result.min_elapsed < results[standings.fastest].min_elapsed {
                standings.fastest = i;
            }
            if result.min_elapsed > results[standings.slowest].min_elapsed {
                standings.slowest = i;
            }
            if result.uniformity_score > results[standings.best_score].uniformity_score {
                standings.best_score = i;
            }
            if result.uniformity_score < results[standings.worst_score].uniformity_score {
                standings.worst_score = i;
            }
        }
        Some(standings)
    }

    pub fn annotations(&self, index: usize) -> Vec<&'static str> {
        let mut notes = Vec::new();
        if index == self.fastest {
            notes.push("best time!");
        }
        if index == self.slowest {
            notes.push("slowest.");
        }
        if index == self.best_score {
            notes.push("best score!");
        }
        if index == self.worst_score {
            notes.push("worst score.");
        }
        notes
    }
}

/// Report generator for benchmark results.
pub struct Report<W: Write> {
    writer: W,
    format: OutputFormat,
}

impl<W: Write> Report<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self { writer, format }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Run parameters, written before the corpus is loaded. Human format only.
    pub fn write_header(&mut self, corpus_label: &str, config: &BenchConfig) -> io::Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }
        writeln!(
            self.writer,
            "Benchmarking hashes using '{}' with {} buckets, {} iterations.",
            corpus_label, config.n_buckets, config.n_trials
        )
    }

    /// Corpus statistics and the time of a bare walk over it. Human format only.
    pub fn write_baseline(&mut self, corpus: &Corpus, baseline_ms: f64) -> io::Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }
        writeln!(
            self.writer,
            "time to iterate: {:.2} ms ({} words, {} bytes)",
            baseline_ms,
            corpus.token_count(),
            corpus.total_token_bytes()
        )
    }

    pub fn write(&mut self, results: &[BenchResult]) -> io::Result<()> {
        match self.format {
            OutputFormat::Human => self.write_human(results),
            OutputFormat::Csv => self.write_csv(results),
        }
    }

    fn write_human(&mut self, results: &[BenchResult]) -> io::Result<()> {
        let Some(standings) = Standings::from_results(results) else {
            return writeln!(self.writer, "No results.");
        };

        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "{:<12} | {:>10} | {:>10} | {:>10} | {:>18} | {:>12} | Notes",
            "Hash", "Min ms", "Avg ms", "MiB/s", "Checksum", "Score"
        )?;
        writeln!(self.writer, "{}", "-".repeat(100))?;

        for (i, result) in results.iter().enumerate() {
            writeln!(
                self.writer,
                "{:<12} | {:>10.2} | {:>10.2} | {:>10.2} | {:>18} | {:>12.2} | {}",
                result.name,
                result.min_elapsed_ms(),
                result.avg_elapsed_ms(),
                result.throughput_mib_s(),
                format!("0x{:x}", result.display_checksum()),
                result.uniformity_score,
                standings.annotations(i).join(" ")
            )?;
        }
        Ok(())
    }

    fn write_csv(&mut self, results: &[BenchResult]) -> io::Result<()> {
        writeln!(self.writer, "name,bits,min_ms,avg_ms,mib_s,checksum,score")?;
        for result in results {
            writeln!(
                self.writer,
                "{},{},{:.4},{:.4},{:.2},0x{:x},{:.4}",
                result.name,
                result.bits,
                result.min_elapsed_ms(),
                result.avg_elapsed_ms(),
                result.throughput_mib_s(),
                result.display_checksum(),
                result.uniformity_score
            )?;
        }
        Ok(())
    }

    /// Quoted name followed by every bucket count, one line per function.
    pub fn write_bucket_dump(
        &mut self,
        results: &[BenchResult],
        token_count: usize,
    ) -> io::Result<()> {
        let Some(first) = results.first() else {
            return Ok(());
        };
        writeln!(
            self.writer,
            "# {} words, {} buckets",
            token_count,
            first.n_buckets()
        )?;
        for result in results {
            write!(self.writer, "\"{}\",", result.name)?;
            for count in result.bucket_counts.iter() {
                write!(self.writer, "{count},")?;
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::hash_functions::{djb2, HashFunction};

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "no space left on device"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn result(index: usize, min_ms: u64, score: f64) -> BenchResult {
        let function = HashFunction::hash32("djb2", djb2);
        let mut result = BenchResult::new(index, &function, 2, 1);
        result.min_elapsed = Duration::from_millis(min_ms);
        result.total_elapsed = Duration::from_millis(min_ms);
        result.uniformity_score = score;
        result
    }

    fn render(format: OutputFormat, results: &[BenchResult]) -> String {
        let mut report = Report::new(Vec::new(), format);
        report.write(results).unwrap();
        String::from_utf8(report.into_inner()).unwrap()
    }

    #[test]
    fn standings_pick_extremes() {
        let results = [result(0, 3, -1.0), result(1, 1, -5.0), result(2, 9, 0.0)];
        let standings = Standings::from_results(&results).unwrap();
        assert_eq!(
            standings,
            Standings {
                fastest: 1,
                slowest: 2,
                best_score: 2,
                worst_score: 1,
            }
        );
    }

    #[test]
    fn ties_go_to_first_registered() {
        let results = [result(0, 2, -1.0), result(1, 1, -1.0), result(2, 1, -1.0)];
        for _ in 0..3 {
            let standings = Standings::from_results(&results).unwrap();
            assert_eq!(standings.fastest, 1);
            assert_eq!(standings.slowest, 0);
            assert_eq!(standings.best_score, 0);
            assert_eq!(standings.worst_score, 0);
        }
    }

    #[test]
    fn zero_scores_still_rank_by_time() {
        let results = [result(0, 5, 0.0), result(1, 4, 0.0)];
        let standings = Standings::from_results(&results).unwrap();
        assert_eq!(standings.fastest, 1);
        assert_eq!(standings.slowest, 0);
        assert_eq!(standings.best_score, 0);
        assert_eq!(standings.worst_score, 0);
    }

    #[test]
    fn nothing_to_rank() {
        assert_eq!(Standings::from_results(&[]), None);
    }

    #[test]
    fn human_table_annotates_rows() {
        let results = [result(0, 1, 0.0), result(1, 2, -3.0)];
        let out = render(OutputFormat::Human, &results);
        let rows: Vec<&str> = out.lines().filter(|l| l.starts_with("djb2")).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].ends_with("best time! best score!"), "{}", rows[0]);
        assert!(rows[1].ends_with("slowest. worst score."), "{}", rows[1]);
    }

    #[test]
    fn csv_has_one_row_per_result() {
        let mut results = [result(0, 1, -0.5)];
        results[0].checksum = 0x1_0000_00ff;
        let out = render(OutputFormat::Csv, &results);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "name,bits,min_ms,avg_ms,mib_s,checksum,score");
        assert_eq!(lines[1], "djb2,32,1.0000,1.0000,0.00,0xff,-0.5000");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn write_errors_are_returned() {
        let results = [result(0, 1, 0.0)];
        for format in [OutputFormat::Human, OutputFormat::Csv] {
            let mut report = Report::new(FullDisk, format);
            let err = report.write(&results).unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::Other);
            assert!(report.write_bucket_dump(&results, 4).is_err());
        }
        let mut report = Report::new(FullDisk, OutputFormat::Human);
        let config = BenchConfig::new();
        assert!(report.write_header("words", &config).is_err());
        let corpus = Corpus::from_bytes(b"a\n".to_vec());
        assert!(report.write_baseline(&corpus, 1.0).is_err());
    }

    #[test]
    fn csv_skips_header_and_baseline() {
        let mut report = Report::new(Vec::new(), OutputFormat::Csv);
        report.write_header("words", &BenchConfig::new()).unwrap();
        report
            .write_baseline(&Corpus::from_bytes(b"a\n".to_vec()), 1.0)
            .unwrap();
        assert!(report.into_inner().is_empty());
    }

    #[test]
    fn header_and_baseline_lines() {
        let mut report = Report::new(Vec::new(), OutputFormat::Human);
        let config = BenchConfig::new().with_buckets(8).with_trials(5);
        report.write_header("words.txt", &config).unwrap();
        report
            .write_baseline(&Corpus::from_bytes(b"aa\nbbb\n".to_vec()), 0.5)
            .unwrap();
        let out = String::from_utf8(report.into_inner()).unwrap();
        assert_eq!(
            out,
            "Benchmarking hashes using 'words.txt' with 8 buckets, 5 iterations.\n\
             time to iterate: 0.50 ms (2 words, 5 bytes)\n"
        );
    }

    #[test]
    fn bucket_dump_format() {
        let mut results = [result(0, 1, 0.0)];
        results[0].bucket_counts[0] = 3;
        results[0].bucket_counts[1] = 1;
        let mut report = Report::new(Vec::new(), OutputFormat::Human);
        report.write_bucket_dump(&results, 4).unwrap();
        let out = String::from_utf8(report.into_inner()).unwrap();
        assert_eq!(out, "# 4 words, 2 buckets\n\"djb2\",3,1,\n");
    }
}
