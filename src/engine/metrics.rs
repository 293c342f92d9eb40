//! Scan metrics.
//!
//! Collected on every run; they are cheap (a few counters and timers) and feed
//! the diagnostics returned by the public API and the CLI text report.

use crate::QuestionRecord;
use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct ScanMetrics {
    /// Total elapsed time for [`Scanner::run`](super::Scanner::run).
    pub total: Duration,
    /// Time spent in the line cleaner.
    pub cleaning: Duration,
    /// Time spent matching rules and updating records.
    pub matching: Duration,
    /// Number of input lines seen.
    pub lines: usize,
    /// Lines matched by a header rule.
    pub headers_matched: usize,
    /// Matches per rule, aligned with `CompiledRules::rules`.
    pub rule_hits: Vec<usize>,
    /// Records dropped at finalization because no question text was found.
    pub incomplete_dropped: usize,
    /// Whether the degraded header scan produced the output.
    pub fallback_used: bool,
}

/// Scanner output bundled with its metrics.
#[derive(Debug, Clone)]
pub struct ScanRun {
    pub records: Vec<QuestionRecord>,
    pub rule_names: Vec<String>,
    pub metrics: ScanMetrics,
}
