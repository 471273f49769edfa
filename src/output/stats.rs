//! Run summary
//!
//! Collects the per-source results of an aggregation together with the fetch
//! client counters, for printing at the end of a run.

use crate::aggregate::{AggregateReport, SourceReport};
use crate::fetch::FetchClient;

/// Summary of one aggregation run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Per-source results, in adapter order
    pub sources: Vec<SourceReport>,

    /// Records written after merging
    pub total_records: usize,

    /// Physical HTTP requests sent, retries included
    pub requests_sent: u64,

    /// Fetches answered from the response cache
    pub cache_hits: u64,

    /// Output file, when one was written
    pub output_path: Option<String>,
}

impl RunSummary {
    pub fn new(report: &AggregateReport, client: &FetchClient) -> Self {
        Self {
            sources: report.sources.clone(),
            total_records: report.characters.len(),
            requests_sent: client.requests_sent(),
            cache_hits: client.cache_hits(),
            output_path: None,
        }
    }

    pub fn with_output_path(mut self, path: impl Into<String>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Records produced by all sources before merging
    pub fn records_before_merge(&self) -> usize {
        self.sources.iter().map(|s| s.records).sum()
    }

    pub fn failed_sources(&self) -> usize {
        self.sources.iter().filter(|s| !s.succeeded()).count()
    }

    /// Share of fetches served by the cache, as a percentage
    pub fn cache_hit_rate(&self) -> f64 {
        let total = self.requests_sent + self.cache_hits;
        if total == 0 {
            return 0.0;
        }
        (self.cache_hits as f64 / total as f64) * 100.0
    }
}

/// Prints a run summary to stdout
pub fn print_summary(summary: &RunSummary) {
    println!("=== Aggregation Summary ===\n");

    println!("Sources:");
    for source in &summary.sources {
        match &source.error {
            None => println!(
                "  {} ({}): {} items, {} records",
                source.name, source.origin, source.items, source.records
            ),
            Some(error) => println!("  {} ({}): FAILED - {}", source.name, source.origin, error),
        }
    }
    println!();

    println!("Totals:");
    println!(
        "  Records: {} ({} before merging)",
        summary.total_records,
        summary.records_before_merge()
    );
    println!("  Failed sources: {}", summary.failed_sources());
    println!("  HTTP requests: {}", summary.requests_sent);
    println!(
        "  Cache hits: {} ({:.1}%)",
        summary.cache_hits,
        summary.cache_hit_rate()
    );

    if let Some(path) = &summary.output_path {
        println!();
        println!("Output: {}", path);
    }
}
