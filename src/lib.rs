use std::borrow::Cow;

use chrono::NaiveTime;
use regex::{Captures, Regex};

#[macro_use]
mod macros;
mod api;
mod batch;
mod clean;
mod config;
mod engine;
mod error;
mod record;
mod rules;

pub use api::{
    Diagnostics, EmptyInput, Extraction, ExtractionVerbose, Options, PatternCatalog, PatternEntry, RuleHit,
    SampleReport, ScanDetails, extract, extract_lines_with, extract_verbose_with, extract_with, pattern_catalog,
    validate_sample,
};
pub use batch::{Batcher, Page};
pub use clean::clean_line;
pub use config::{BatchSection, Config, ScannerSection};
pub use engine::FALLBACK_QUESTION_TEXT;
pub use error::{Error, Result};
pub use record::{Participants, QuestionRecord};

// --- Internal types ---------------------------------------------------------

/// What a rule contributes to the question being assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum RuleKind {
    Header,
    Category,
    Attempt,
    ChatNick,
    Answer,
}

/// Structured payload produced by a rule that matched a single cleaned line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LineMatch {
    Header { number: u32, total: u32, asked_at: Option<NaiveTime> },
    Category { label: String, question_text: String },
    Attempt { nick: String, skipped: bool, response_time: Option<String> },
    ChatNick { nick: String },
    Answer { answer: String, author: Option<String> },
}

/// The regex a rule runs against a line.
#[derive(Debug)]
pub(crate) enum Pattern {
    /// Built-in pattern, compiled once via the `regex!` macro.
    Regex(&'static Regex),

    /// Pattern compiled at runtime from configuration (header variants,
    /// a non-default category vocabulary).
    Compiled(Regex),
}

impl Pattern {
    pub(crate) fn regex(&self) -> &Regex {
        match self {
            Pattern::Regex(re) => re,
            Pattern::Compiled(re) => re,
        }
    }
}

pub(crate) type Production = Box<dyn Fn(&Captures<'_>, &str) -> Option<LineMatch> + Send + Sync>;

/// A named line rule: a `pattern` to find in a cleaned line and a
/// `production` that turns the captures into a [`LineMatch`].
///
/// `buckets` and `optional_phrases` only gate whether the rule is tried on a
/// given line; they never change what it produces.
pub(crate) struct Rule {
    pub name: Cow<'static, str>,
    pub kind: RuleKind,
    pub pattern: Pattern,
    pub production: Production,
    /// Any one of these lowercase phrases must appear in the line.
    pub optional_phrases: &'static [&'static str],
    /// `LineMask` bits that must all be present in the line.
    pub buckets: u32,
    /// Evaluation order within a line (higher runs first).
    pub priority: u16,
}

impl Rule {
    /// Run the rule against one cleaned line.
    pub(crate) fn apply(&self, line: &str) -> Option<LineMatch> {
        let caps = self.pattern.regex().captures(line)?;
        (self.production)(&caps, line)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("pattern", &self.pattern.regex().as_str())
            .field("production", &"<function>")
            .field("buckets", &self.buckets)
            .field("priority", &self.priority)
            .finish()
    }
}
