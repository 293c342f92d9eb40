use std::time::Duration;

use once_cell::sync::Lazy;
use serde::Serialize;
use tracing::{info, warn};

use crate::batch::DEFAULT_PAGE_SIZE;
use crate::clean;
use crate::engine::{ScanRun, ScanSettings, Scanner};
use crate::rules::question::rules::{self as question_rules, RuleSettings};
use crate::rules::vocabulary::{self, DEFAULT_EXCLUDED_NICKS, DEFAULT_SKIP_KEYWORDS};
use crate::{Batcher, LineMatch, QuestionRecord, Result, Rule};

static DEFAULT_RULES: Lazy<Vec<Rule>> = Lazy::new(question_rules::get);

/// Number of answers echoed back by [`validate_sample`].
const SAMPLE_ANSWERS_SHOWN: usize = 3;

/// Options that affect extraction and paging.
///
/// [`Config::options`](crate::Config::options) builds these from a TOML file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Records per page.
    pub page_size: usize,
    /// Category vocabulary, matched accent- and case-insensitively.
    pub categories: Vec<String>,
    /// Extra header regexes tried alongside the built-in one.
    pub header_patterns: Vec<String>,
    /// A participant line containing one of these never names the winner.
    pub skip_keywords: Vec<String>,
    /// Nicks (any case) that are never participants.
    pub excluded_nicks: Vec<String>,
    /// Count `<nick>` chat lines as participants.
    pub track_chat_nicks: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            categories: vocabulary::default_categories(),
            header_patterns: Vec::new(),
            skip_keywords: DEFAULT_SKIP_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            excluded_nicks: DEFAULT_EXCLUDED_NICKS.iter().map(|s| s.to_string()).collect(),
            track_chat_nicks: false,
        }
    }
}

impl Options {
    fn rule_settings(&self) -> RuleSettings {
        RuleSettings {
            categories: self.categories.clone(),
            header_patterns: self.header_patterns.clone(),
            skip_keywords: self.skip_keywords.clone(),
        }
    }

    fn scan_settings(&self) -> ScanSettings {
        ScanSettings { excluded_nicks: self.excluded_nicks.clone(), track_chat_nicks: self.track_chat_nicks }
    }

    /// A batcher sized by `page_size`.
    pub fn batcher(&self) -> Result<Batcher> {
        Batcher::new(self.page_size)
    }
}

/// Why an extraction came back empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EmptyInput {
    /// The input had no lines at all.
    NoLines,
    /// Lines were read but no record could be assembled.
    NoRecords,
}

/// Counters describing how an extraction went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    pub lines: usize,
    pub headers_matched: usize,
    pub records: usize,
    pub incomplete_dropped: usize,
    pub fallback_used: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty: Option<EmptyInput>,
}

/// Result from [`extract`] and [`extract_with`].
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Records in log order.
    pub records: Vec<QuestionRecord>,
    pub diagnostics: Diagnostics,
    /// Total time spent cleaning and scanning.
    pub elapsed: Duration,
}

impl Extraction {
    /// Load the records into a batcher with `page_size` records per page.
    pub fn into_batcher(self, page_size: usize) -> Result<Batcher> {
        Batcher::with_records(page_size, self.records)
    }
}

/// Match count for one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleHit {
    pub rule: String,
    pub hits: usize,
}

/// Stage timings and per-rule hits returned by [`extract_verbose_with`].
#[derive(Debug, Clone)]
pub struct ScanDetails {
    pub total: Duration,
    pub cleaning: Duration,
    pub matching: Duration,
    /// Rules in evaluation order with their match counts.
    pub rule_hits: Vec<RuleHit>,
}

/// Result from [`extract_verbose_with`].
#[derive(Debug, Clone)]
pub struct ExtractionVerbose {
    pub records: Vec<QuestionRecord>,
    pub diagnostics: Diagnostics,
    pub elapsed: Duration,
    pub details: ScanDetails,
}

/// Extract question records from `text` with the default options.
///
/// # Example
/// ```
/// use trivial_irc::extract;
///
/// let log = "Pregunta: 2 / 35\nGASTRONOMÍA LICOR DE COLOR AMARILLO... (1 palabra)\nLa buena: ROMPOPE Mandada por: CASTRO";
/// let out = extract(log);
/// assert_eq!(out.records.len(), 1);
/// assert_eq!(out.records[0].answer_text, "ROMPOPE");
/// ```
pub fn extract(text: &str) -> Extraction {
    let run = Scanner::new(&DEFAULT_RULES, &Options::default().scan_settings()).run(text.lines());
    into_extraction(run)
}

/// Extract question records from `text` using `options`.
///
/// Fails only when a configured pattern does not compile.
pub fn extract_with(text: &str, options: &Options) -> Result<Extraction> {
    extract_lines_with(text.lines(), options)
}

/// Extract question records from already split lines using `options`.
pub fn extract_lines_with<I, S>(lines: I, options: &Options) -> Result<Extraction>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Ok(into_extraction(run_scan(lines, options)?))
}

/// Like [`extract_with`], with stage timings and per-rule match counts.
pub fn extract_verbose_with(text: &str, options: &Options) -> Result<ExtractionVerbose> {
    let run = run_scan(text.lines(), options)?;

    let rule_hits = run
        .rule_names
        .iter()
        .zip(&run.metrics.rule_hits)
        .map(|(rule, hits)| RuleHit { rule: rule.clone(), hits: *hits })
        .collect();
    let details = ScanDetails {
        total: run.metrics.total,
        cleaning: run.metrics.cleaning,
        matching: run.metrics.matching,
        rule_hits,
    };

    let Extraction { records, diagnostics, elapsed } = into_extraction(run);
    Ok(ExtractionVerbose { records, diagnostics, elapsed, details })
}

fn run_scan<I, S>(lines: I, options: &Options) -> Result<ScanRun>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let settings = options.scan_settings();
    let rule_settings = options.rule_settings();

    if rule_settings.is_default() {
        return Ok(Scanner::new(&DEFAULT_RULES, &settings).run(lines));
    }

    let rules = question_rules::with_settings(&rule_settings)?;
    Ok(Scanner::new(&rules, &settings).run(lines))
}

fn into_extraction(run: ScanRun) -> Extraction {
    let metrics = run.metrics;
    let empty = if metrics.lines == 0 {
        Some(EmptyInput::NoLines)
    } else if run.records.is_empty() {
        Some(EmptyInput::NoRecords)
    } else {
        None
    };

    match empty {
        Some(reason) => warn!(?reason, lines = metrics.lines, "extraction produced no records"),
        None => info!(records = run.records.len(), lines = metrics.lines, elapsed = ?metrics.total, "extraction done"),
    }

    let diagnostics = Diagnostics {
        lines: metrics.lines,
        headers_matched: metrics.headers_matched,
        records: run.records.len(),
        incomplete_dropped: metrics.incomplete_dropped,
        fallback_used: metrics.fallback_used,
        empty,
    };

    Extraction { records: run.records, diagnostics, elapsed: metrics.total }
}

/// Outcome of [`validate_sample`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleReport {
    /// Length of the sample in characters.
    pub sample_length: usize,
    pub answers_found: usize,
    /// The first few answers found.
    pub answers: Vec<String>,
    pub processing_works: bool,
}

/// Check that a small log fragment cleans and yields answers.
///
/// Runs the cleaner and the answer rule on every line, independent of any
/// question header.
pub fn validate_sample(sample: &str) -> SampleReport {
    let rule = question_rules::answer_rule();
    let answers: Vec<String> = sample
        .lines()
        .filter_map(|line| match rule.apply(&clean::clean_line(line)) {
            Some(LineMatch::Answer { answer, .. }) => Some(answer),
            _ => None,
        })
        .collect();

    SampleReport {
        sample_length: sample.chars().count(),
        answers_found: answers.len(),
        processing_works: !answers.is_empty(),
        answers: answers.into_iter().take(SAMPLE_ANSWERS_SHOWN).collect(),
    }
}

/// A named regex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternEntry {
    pub name: String,
    pub pattern: String,
}

/// Every pattern the extractor uses, for auditing the rule set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternCatalog {
    pub cleaner: Vec<PatternEntry>,
    /// Line rules in evaluation order.
    pub rules: Vec<PatternEntry>,
    pub fallback_header: PatternEntry,
    pub categories: Vec<String>,
    pub skip_keywords: Vec<String>,
    pub excluded_nicks: Vec<String>,
}

/// Describe the patterns used for `options`.
pub fn pattern_catalog(options: &Options) -> Result<PatternCatalog> {
    let mut rules = question_rules::with_settings(&options.rule_settings())?;
    rules.sort_by_key(|r| std::cmp::Reverse(r.priority));

    let entry = |name: &str, re: &regex::Regex| PatternEntry { name: name.to_string(), pattern: re.as_str().to_string() };

    Ok(PatternCatalog {
        cleaner: clean::patterns().into_iter().map(|(name, re)| entry(name, re)).collect(),
        rules: rules.iter().map(|r| entry(r.name.as_ref(), r.pattern.regex())).collect(),
        fallback_header: entry("fallback header", question_rules::fallback_header()),
        categories: options.categories.clone(),
        skip_keywords: options.skip_keywords.clone(),
        excluded_nicks: options.excluded_nicks.clone(),
    })
}
