//! Question records assembled by the scanner.

use chrono::NaiveTime;
use serde::Serialize;

/// Participant nicks in first-seen order, without duplicates.
///
/// Membership is a case-sensitive exact match on the nick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Participants(Vec<String>);

impl Participants {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `nick` unless it is already present. Returns `true` if added.
    pub fn insert(&mut self, nick: &str) -> bool {
        if self.contains(nick) {
            return false;
        }
        self.0.push(nick.to_string());
        true
    }

    pub fn contains(&self, nick: &str) -> bool {
        self.0.iter().any(|n| n == nick)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<'a> FromIterator<&'a str> for Participants {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut participants = Participants::new();
        for nick in iter {
            participants.insert(nick);
        }
        participants
    }
}

/// One trivia question as reconstructed from the log.
///
/// `number`/`total` are whatever the header line asserted; they are not
/// checked for uniqueness or ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub number: u32,
    pub total: u32,
    pub category: String,
    pub question_text: String,
    /// First participant credited with a correct answer; empty if none.
    pub winner: String,
    pub answer_text: String,
    /// `"{minutes}.{seconds}s"`, taken from the winner's line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_seconds: Option<String>,
    pub participants: Participants,
    /// Nick from the `Mandada por` trailer of the answer line.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author: String,
    /// Timestamp carried by the header line, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asked_at: Option<NaiveTime>,
}

impl QuestionRecord {
    pub fn new(number: u32, total: u32) -> Self {
        Self { number, total, ..Self::default() }
    }

    /// A record is only emitted once its question text is known.
    pub fn is_complete(&self) -> bool {
        !self.question_text.is_empty()
    }

    /// Set the winner unless one was already recorded. Returns `true` if set.
    pub fn credit_winner(&mut self, nick: &str, response_time: Option<String>) -> bool {
        if !self.winner.is_empty() {
            return false;
        }
        self.winner = nick.to_string();
        self.response_time_seconds = response_time;
        true
    }

    /// Set the answer unless one was already recorded. Returns `true` if set.
    pub fn record_answer(&mut self, answer: &str, author: Option<&str>) -> bool {
        if self.author.is_empty() {
            if let Some(author) = author {
                self.author = author.to_string();
            }
        }
        if !self.answer_text.is_empty() {
            return false;
        }
        self.answer_text = answer.to_string();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn participants_keep_first_seen_order_without_duplicates() {
        let mut p = Participants::new();
        assert!(p.insert("ana"));
        assert!(p.insert("Bob"));
        assert!(!p.insert("ana"));
        assert!(p.insert("bob"));
        assert_eq!(p.as_slice(), &["ana", "Bob", "bob"]);
    }

    #[test]
    fn winner_is_never_overwritten() {
        let mut rec = QuestionRecord::new(1, 10);
        assert!(rec.credit_winner("first", Some("0.12s".into())));
        assert!(!rec.credit_winner("second", Some("0.30s".into())));
        assert_eq!(rec.winner, "first");
        assert_eq!(rec.response_time_seconds.as_deref(), Some("0.12s"));
    }

    #[test]
    fn answer_keeps_first_but_author_fills_in_later() {
        let mut rec = QuestionRecord::new(1, 10);
        assert!(rec.record_answer("ROMPOPE", None));
        assert!(!rec.record_answer("OTRA", Some("CASTRO")));
        assert_eq!(rec.answer_text, "ROMPOPE");
        assert_eq!(rec.author, "CASTRO");
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let mut rec = QuestionRecord::new(2, 35);
        rec.question_text = "LICOR".into();
        rec.participants.insert("ana");
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["questionText"], "LICOR");
        assert_eq!(json["participants"], serde_json::json!(["ana"]));
        assert!(json.get("responseTimeSeconds").is_none());
        assert!(json.get("askedAt").is_none());
    }
}
