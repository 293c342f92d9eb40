use once_cell::sync::Lazy;
use regex::Regex;

use crate::engine::LineMask;
use crate::rules::question::helpers::{
    find_timestamp, format_response_time, group, has_answer_marker, mentions_any, parse_count, question_text,
    squash_whitespace,
};
use crate::rules::vocabulary::{self, DEFAULT_SKIP_KEYWORDS};
use crate::{Error, LineMatch, Pattern, Result, Rule, RuleKind};

// Priorities fix the per-line evaluation order: header, category, attempt,
// chat nick, answer.
const PRIORITY_HEADER: u16 = 50;
const PRIORITY_CATEGORY: u16 = 40;
const PRIORITY_ATTEMPT: u16 = 30;
const PRIORITY_CHAT_NICK: u16 = 20;
const PRIORITY_ANSWER: u16 = 10;

static DEFAULT_CATEGORY_RE: Lazy<Regex> =
    Lazy::new(|| vocabulary::compile(&vocabulary::default_categories()).unwrap());

/// What the rule set is built from.
#[derive(Debug, Clone)]
pub struct RuleSettings {
    pub categories: Vec<String>,
    pub header_patterns: Vec<String>,
    pub skip_keywords: Vec<String>,
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            categories: vocabulary::default_categories(),
            header_patterns: Vec::new(),
            skip_keywords: DEFAULT_SKIP_KEYWORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl RuleSettings {
    pub fn is_default(&self) -> bool {
        let defaults = RuleSettings::default();
        self.header_patterns.is_empty()
            && self.categories == defaults.categories
            && self.skip_keywords == defaults.skip_keywords
    }
}

/// "Pregunta: N / M", also with `#`, `nº`, `de` / `of` and English labels.
fn rule_question_header() -> Rule {
    rule! {
        name: "question header",
        kind: RuleKind::Header,
        pattern: re!(r"(?i)\b(?:pregunta|question)\s*(?:n[º°o]\.?\s*)?[:#]\s*(?P<number>\d+)\s*(?:/|\bde\b|\bof\b)\s*(?P<total>\d+)"),
        optional_phrases: ["pregunta", "question"],
        buckets: LineMask::HAS_DIGITS.bits(),
        priority: PRIORITY_HEADER,
        prod: |caps, line| { header_match(caps, line) },
    }
}

/// Header variant supplied by configuration. Groups `number`/`total`, or
/// groups 1 and 2, carry N and M.
fn rule_custom_header(index: usize, pattern: &str) -> Result<Rule> {
    let re = Regex::new(pattern).map_err(|source| Error::InvalidPattern { pattern: pattern.to_string(), source })?;

    Ok(rule! {
        name: format!("question header (custom #{})", index + 1),
        kind: RuleKind::Header,
        pattern: Pattern::Compiled(re),
        buckets: LineMask::HAS_DIGITS.bits(),
        priority: PRIORITY_HEADER,
        prod: |caps, line| { header_match(caps, line) },
    })
}

fn header_match(caps: &regex::Captures<'_>, line: &str) -> Option<LineMatch> {
    let number = parse_count(group(caps, "number", 1)?)?;
    let total = parse_count(group(caps, "total", 2)?)?;
    Some(LineMatch::Header { number, total, asked_at: find_timestamp(line) })
}

/// A vocabulary label followed by non-empty question text.
fn rule_category(pattern: Pattern, labels: Vec<String>) -> Rule {
    rule! {
        name: "category + question text",
        kind: RuleKind::Category,
        pattern: pattern,
        buckets: LineMask::HAS_ALPHA.bits(),
        priority: PRIORITY_CATEGORY,
        prod: |caps, line| {
            let m = caps.name("label")?;
            // A label quoted by an answer line is the answer, not a category.
            if has_answer_marker(&line[..m.start()]) {
                return None;
            }
            let question_text = question_text(&line[m.end()..]);
            if question_text.is_empty() {
                return None;
            }
            let label = vocabulary::canonical(&labels, m.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| vocabulary::fold(m.as_str()));
            Some(LineMatch::Category { label, question_text })
        },
    }
}

/// `>>>NICK [a] MM'SS`: a player's attempt, optionally with elapsed time.
fn rule_attempt(skip_keywords: Vec<String>) -> Rule {
    rule! {
        name: "player attempt",
        kind: RuleKind::Attempt,
        pattern: re!(r">>>\s*(?P<nick>[^\s>,:;!?'’´]+)(?:\s+(?:(?:a|en|in)\s+)?(?P<min>\d{1,3})['’´](?P<sec>\d{1,2}))?"),
        buckets: LineMask::HAS_MARKER.bits(),
        priority: PRIORITY_ATTEMPT,
        prod: |caps, line| {
            let nick = caps.name("nick")?.as_str().to_string();
            let response_time = match (caps.name("min"), caps.name("sec")) {
                (Some(min), Some(sec)) => format_response_time(min.as_str(), sec.as_str()),
                _ => None,
            };
            Some(LineMatch::Attempt { nick, skipped: mentions_any(line, &skip_keywords), response_time })
        },
    }
}

/// `[HH:MM:SS] <nick> message` channel line.
fn rule_chat_nick() -> Rule {
    rule! {
        name: "chat nick",
        kind: RuleKind::ChatNick,
        pattern: re!(r"^\s*\[?\d{1,2}:\d{2}:\d{2}\]?.*?<[~&@%+]?(?P<nick>[^>\s]+)>"),
        buckets: LineMask::HAS_DIGITS.bits() | LineMask::HAS_CHAT_NICK.bits(),
        priority: PRIORITY_CHAT_NICK,
        prod: |caps, _line| {
            Some(LineMatch::ChatNick { nick: caps.name("nick")?.as_str().to_string() })
        },
    }
}

/// "La buena: X Mandada por: NICK" and its variants.
fn rule_answer() -> Rule {
    rule! {
        name: "correct answer",
        kind: RuleKind::Answer,
        pattern: re!(r"(?i)\b(?:las?\s+buenas?|la\s+respuesta(?:\s+correcta)?\s+(?:es|era))\s*:?\s*(?P<answer>[^\s:].*?)\s*(?:\bmandada\s+por\b\s*:?\s*(?P<author>[^\s,]+)?.*)?$"),
        optional_phrases: ["buena", "respuesta"],
        buckets: LineMask::HAS_ALPHA.bits(),
        priority: PRIORITY_ANSWER,
        prod: |caps, _line| {
            let answer = squash_whitespace(caps.name("answer")?.as_str());
            if answer.is_empty() {
                return None;
            }
            let author = caps.name("author").map(|m| m.as_str().to_string());
            Some(LineMatch::Answer { answer, author })
        },
    }
}

/// The built-in rule set.
pub fn get() -> Vec<Rule> {
    let defaults = RuleSettings::default();
    vec![
        rule_question_header(),
        rule_category(Pattern::Regex(&*DEFAULT_CATEGORY_RE), defaults.categories),
        rule_attempt(defaults.skip_keywords),
        rule_chat_nick(),
        rule_answer(),
    ]
}

/// Build the rule set for `settings`, compiling configured patterns.
pub fn with_settings(settings: &RuleSettings) -> Result<Vec<Rule>> {
    if settings.is_default() {
        return Ok(get());
    }

    let mut rules = vec![rule_question_header()];
    for (idx, pattern) in settings.header_patterns.iter().enumerate() {
        rules.push(rule_custom_header(idx, pattern)?);
    }

    let category_re = vocabulary::compile(&settings.categories)?;
    rules.push(rule_category(Pattern::Compiled(category_re), settings.categories.clone()));

    let skip_keywords = settings.skip_keywords.iter().map(|k| k.to_lowercase()).collect();
    rules.push(rule_attempt(skip_keywords));
    rules.push(rule_chat_nick());
    rules.push(rule_answer());

    Ok(rules)
}

/// The answer rule alone, for sample validation.
pub fn answer_rule() -> Rule {
    rule_answer()
}

/// Pattern used when no header line matched anywhere in the input.
pub fn fallback_header() -> &'static Regex {
    regex!(r"(?i)\b(?:pregunta|question)\D*?(?P<number>\d+)\s*/\s*(?P<total>\d+)")
}
