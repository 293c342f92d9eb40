//! Degraded header scan.
//!
//! Used only when no header rule matched a single line of the input: any line
//! with the header keyword and an `N/M` pair becomes a minimal record, so a
//! log with unusual header formatting still yields something.

use crate::QuestionRecord;
use crate::rules::question::helpers::{group, parse_count};
use crate::rules::question::rules::fallback_header;

/// Question text given to records produced by the fallback scan.
pub const FALLBACK_QUESTION_TEXT: &str = "(pregunta sin texto detectado)";

pub(crate) fn fallback_scan(lines: &[String]) -> Vec<QuestionRecord> {
    lines
        .iter()
        .filter_map(|line| {
            let caps = fallback_header().captures(line)?;
            let number = parse_count(group(&caps, "number", 1)?)?;
            let total = parse_count(group(&caps, "total", 2)?)?;
            let mut record = QuestionRecord::new(number, total);
            record.question_text = FALLBACK_QUESTION_TEXT.to_string();
            Some(record)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_minimal_records() {
        let lines = vec!["bla".to_string(), "pregunta 5/10".to_string(), "PREGUNTA n 6 / 10 ...".to_string()];
        let records = fallback_scan(&lines);
        assert_eq!(records.len(), 2);
        assert_eq!((records[0].number, records[0].total), (5, 10));
        assert_eq!((records[1].number, records[1].total), (6, 10));
        assert!(records.iter().all(|r| r.question_text == FALLBACK_QUESTION_TEXT));
        assert!(records.iter().all(|r| r.winner.is_empty() && r.participants.is_empty()));
    }
}
