//! Question scanner.
//!
//! A single pass over the input lines that keeps one record under
//! construction and a list of finished records:
//!
//! ```text
//! raw line ── clean_line ── LineTrigger::scan ── active rules (priority order)
//!                                                   │
//!                   Header ───────────────────────┤ finish current, start new,
//!                                                   │ skip the rest of the line
//!                   Category / Attempt / ChatNick / │ update the current record
//!                   Answer ──────────────────────────┘
//! end of input ── finish current ── (no header at all?) ── fallback scan
//! ```
//!
//! A record is finished when the next header is seen or the input ends, and is
//! kept only if its question text was found. Each rule kind fires at most
//! once per line. Nothing here can fail: lines that match no rule are ignored.

use std::collections::HashSet;
use std::time::Instant;

use tracing::{debug, trace, warn};

use super::compiled_rules::{CompiledRules, RuleId};
use super::fallback::fallback_scan;
use super::metrics::{ScanMetrics, ScanRun};
use super::trigger::LineTrigger;
use crate::clean::clean_line;
use crate::{LineMatch, QuestionRecord, Rule, RuleKind};

/// Runtime switches that are not part of the rule set.
#[derive(Debug, Clone, Default)]
pub struct ScanSettings {
    /// Nicks (any case) that never become participants or winners.
    pub excluded_nicks: Vec<String>,
    /// Record `<nick>` chat lines as participants.
    pub track_chat_nicks: bool,
}

#[derive(Debug)]
pub struct Scanner<'a> {
    compiled: CompiledRules<'a>,
    excluded: HashSet<String>,
    track_chat_nicks: bool,
    current: Option<QuestionRecord>,
    output: Vec<QuestionRecord>,
    metrics: ScanMetrics,
}

impl<'a> Scanner<'a> {
    pub fn new(rules: &'a [Rule], settings: &ScanSettings) -> Self {
        let compiled = CompiledRules::new(rules);
        let metrics = ScanMetrics { rule_hits: vec![0; compiled.len()], ..ScanMetrics::default() };
        let excluded = settings.excluded_nicks.iter().map(|n| n.to_lowercase()).collect();

        debug!(rules = compiled.len(), track_chat_nicks = settings.track_chat_nicks, "scanner ready");

        Scanner {
            compiled,
            excluded,
            track_chat_nicks: settings.track_chat_nicks,
            current: None,
            output: Vec::new(),
            metrics,
        }
    }

    /// Scan `lines` to completion.
    pub fn run<I, S>(mut self, lines: I) -> ScanRun
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let total_start = Instant::now();
        let mut cleaned: Vec<String> = Vec::new();

        for raw in lines {
            let clean_start = Instant::now();
            let line = clean_line(raw.as_ref());
            self.metrics.cleaning += clean_start.elapsed();

            let match_start = Instant::now();
            self.step(&line);
            self.metrics.matching += match_start.elapsed();

            self.metrics.lines += 1;
            cleaned.push(line);
        }
        self.finish_current();

        if self.metrics.headers_matched == 0 && self.metrics.lines > 0 {
            let records = fallback_scan(&cleaned);
            warn!(lines = self.metrics.lines, records = records.len(), "no question header matched, using fallback scan");
            self.output = records;
            self.metrics.fallback_used = true;
        }

        self.metrics.total = total_start.elapsed();
        debug!(
            lines = self.metrics.lines,
            headers = self.metrics.headers_matched,
            records = self.output.len(),
            dropped = self.metrics.incomplete_dropped,
            "scan finished"
        );

        ScanRun { records: self.output, rule_names: self.compiled.names(), metrics: self.metrics }
    }

    /// Apply the rules to one cleaned line.
    fn step(&mut self, line: &str) {
        let trigger = LineTrigger::scan(line);
        let active: Vec<RuleId> = self.compiled.active(&trigger).collect();
        let mut fired: Vec<RuleKind> = Vec::new();

        for id in active {
            let kind = self.compiled.metas[id].kind;
            if fired.contains(&kind) || !self.wants(kind) {
                continue;
            }

            let rule = self.compiled.rules[id];
            let Some(matched) = rule.apply(line) else {
                continue;
            };

            trace!(rule = %rule.name, ?matched, "rule matched");
            self.metrics.rule_hits[id] += 1;
            fired.push(kind);

            self.transition(matched);
            if kind == RuleKind::Header {
                // A header line carries nothing else.
                break;
            }
        }
    }

    /// Whether a rule of `kind` can still change anything.
    fn wants(&self, kind: RuleKind) -> bool {
        match (kind, &self.current) {
            (RuleKind::Header, _) => true,
            (_, None) => false,
            (RuleKind::Category, Some(current)) => current.question_text.is_empty(),
            (RuleKind::ChatNick, Some(_)) => self.track_chat_nicks,
            (RuleKind::Attempt | RuleKind::Answer, Some(_)) => true,
        }
    }

    fn transition(&mut self, matched: LineMatch) {
        match matched {
            LineMatch::Header { number, total, asked_at } => {
                self.finish_current();
                self.metrics.headers_matched += 1;
                let mut record = QuestionRecord::new(number, total);
                record.asked_at = asked_at;
                self.current = Some(record);
            }
            LineMatch::Category { label, question_text } => {
                if let Some(current) = self.current.as_mut() {
                    if current.question_text.is_empty() {
                        current.category = label;
                        current.question_text = question_text;
                    }
                }
            }
            LineMatch::Attempt { nick, skipped, response_time } => {
                if self.is_excluded(&nick) {
                    return;
                }
                if let Some(current) = self.current.as_mut() {
                    current.participants.insert(&nick);
                    if !skipped {
                        current.credit_winner(&nick, response_time);
                    }
                }
            }
            LineMatch::ChatNick { nick } => {
                if self.is_excluded(&nick) {
                    return;
                }
                if let Some(current) = self.current.as_mut() {
                    current.participants.insert(&nick);
                }
            }
            LineMatch::Answer { answer, author } => {
                if let Some(current) = self.current.as_mut() {
                    current.record_answer(&answer, author.as_deref());
                }
            }
        }
    }

    fn is_excluded(&self, nick: &str) -> bool {
        self.excluded.contains(&nick.to_lowercase())
    }

    fn finish_current(&mut self) {
        let Some(record) = self.current.take() else {
            return;
        };
        if record.is_complete() {
            self.output.push(record);
        } else {
            debug!(number = record.number, total = record.total, "dropping record without question text");
            self.metrics.incomplete_dropped += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(lines: &[&str]) -> ScanRun {
        let rules = crate::rules::question::rules::get();
        Scanner::new(&rules, &ScanSettings::default()).run(lines.iter().copied())
    }

    #[test]
    fn header_finishes_previous_record() {
        let run = scan(&[
            "Pregunta: 1/3",
            "HISTORIA ¿Año de la Revolución Francesa?",
            "La buena: 1789",
            "Pregunta: 2/3",
            "CINE ¿Director de Vértigo?",
        ]);
        assert_eq!(run.records.len(), 2);
        assert_eq!(run.records[0].answer_text, "1789");
        assert_eq!(run.records[1].category, "CINE");
        assert_eq!(run.metrics.headers_matched, 2);
        assert!(!run.metrics.fallback_used);
    }

    #[test]
    fn records_without_question_text_are_dropped() {
        let run = scan(&["Pregunta: 1/3", ">>>ana a 00'03", "Pregunta: 2/3", "ARTE ¿Autor del Guernica?"]);
        assert_eq!(run.records.len(), 1);
        assert_eq!(run.records[0].number, 2);
        assert_eq!(run.metrics.incomplete_dropped, 1);
    }

    #[test]
    fn lines_before_first_header_are_ignored() {
        let run = scan(&[">>>ana a 00'03", "La buena: nada", "Pregunta: 1/1", "ARTE x"]);
        assert_eq!(run.records.len(), 1);
        assert!(run.records[0].participants.is_empty());
        assert!(run.records[0].answer_text.is_empty());
    }

    #[test]
    fn category_is_only_taken_once() {
        let run = scan(&["Pregunta: 1/1", "HISTORIA primera", "CINE segunda"]);
        assert_eq!(run.records[0].category, "HISTORIA");
        assert_eq!(run.records[0].question_text, "primera");
    }

    #[test]
    fn answer_naming_a_category_does_not_fill_question_text() {
        let run = scan(&["Pregunta: 1/1", "La buena: HISTORIA Mandada por: x", "ARTE ¿Quién pintó el Guernica?"]);
        assert_eq!(run.records[0].category, "ARTE");
        assert_eq!(run.records[0].question_text, "¿Quién pintó el Guernica?");
        assert_eq!(run.records[0].answer_text, "HISTORIA");
        assert_eq!(run.records[0].author, "x");
    }

    #[test]
    fn excluded_nicks_are_not_participants() {
        let rules = crate::rules::question::rules::get();
        let settings = ScanSettings { excluded_nicks: vec!["GleviBot".into()], ..ScanSettings::default() };
        let run = Scanner::new(&rules, &settings).run(["Pregunta: 1/1", "ARTE x", ">>>gleviBOT a 00'01", ">>>ana a 00'02"]);
        assert_eq!(run.records[0].winner, "ana");
        assert_eq!(run.records[0].response_time_seconds.as_deref(), Some("0.02s"));
        assert_eq!(run.records[0].participants.as_slice(), &["ana"]);
    }

    #[test]
    fn chat_nicks_are_opt_in() {
        let rules = crate::rules::question::rules::get();
        let lines = ["Pregunta: 1/1", "ARTE x", "[10:00:01] <@ana> picasso", "[10:00:02] <Bot> tiempo"];

        let off = Scanner::new(&rules, &ScanSettings::default()).run(lines);
        assert!(off.records[0].participants.is_empty());

        let settings = ScanSettings { excluded_nicks: vec!["Bot".into()], track_chat_nicks: true };
        let on = Scanner::new(&rules, &settings).run(lines);
        assert_eq!(on.records[0].participants.as_slice(), &["ana"]);
        assert!(on.records[0].winner.is_empty());
    }

    #[test]
    fn rule_hits_are_counted() {
        let run = scan(&["Pregunta: 1/1", "ARTE x", ">>>ana", ">>>bob"]);
        let attempt = run.rule_names.iter().position(|n| n == "player attempt").unwrap();
        assert_eq!(run.metrics.rule_hits[attempt], 2);
        assert_eq!(run.metrics.lines, 4);
    }
}
