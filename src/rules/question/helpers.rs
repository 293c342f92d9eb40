use chrono::NaiveTime;
use regex::Captures;

/// Named group `name`, else positional group `index`.
pub fn group<'h>(caps: &Captures<'h>, name: &str, index: usize) -> Option<&'h str> {
    caps.name(name).or_else(|| caps.get(index)).map(|m| m.as_str())
}

/// Parse a header count; numbers that do not fit are treated as no match.
pub fn parse_count(s: &str) -> Option<u32> {
    s.trim().parse::<u32>().ok()
}

/// First `HH:MM:SS` timestamp in `line`.
pub fn find_timestamp(line: &str) -> Option<NaiveTime> {
    let caps = regex!(r"\b(\d{1,2}):(\d{2}):(\d{2})\b").captures(line)?;
    let h = caps[1].parse().ok()?;
    let m = caps[2].parse().ok()?;
    let s = caps[3].parse().ok()?;
    NaiveTime::from_hms_opt(h, m, s)
}

/// Format a `MM'SS` elapsed token as `"{minutes}.{seconds}s"`.
///
/// Minutes lose their leading zeros, seconds are kept as written:
/// `01'23` becomes `1.23s`, `00'05` becomes `0.05s`.
pub fn format_response_time(minutes: &str, seconds: &str) -> Option<String> {
    let minutes: u32 = minutes.parse().ok()?;
    if seconds.is_empty() || !seconds.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(format!("{minutes}.{seconds}s"))
}

/// Collapse whitespace runs to single spaces and trim both ends.
pub fn squash_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Turn the text following a category label into question text: drop the
/// `(N palabras)` hint and leading separators.
pub fn question_text(remainder: &str) -> String {
    let without_hint = regex!(r"(?i)\(\s*\d+\s*(?:palabras?|letras?|words?|letters?)\s*\)").replace_all(remainder, " ");
    let trimmed = without_hint
        .trim_start_matches(|c: char| c.is_whitespace() || matches!(c, ':' | '-' | '.' | ',' | ';' | '|' | '>' | '*' | '=' | '~' | '_'));
    squash_whitespace(trimmed)
}

/// True when `text` carries a "correct answer" marker (`La buena`,
/// `La respuesta es`).
pub fn has_answer_marker(text: &str) -> bool {
    regex!(r"(?i)\b(?:las?\s+buenas?|la\s+respuesta)\b").is_match(text)
}

/// True when the lowercased `line` carries any of `keywords`.
pub fn mentions_any(line: &str, keywords: &[String]) -> bool {
    let lower = line.to_lowercase();
    keywords.iter().any(|k| !k.is_empty() && lower.contains(k.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_time_drops_minute_padding() {
        assert_eq!(format_response_time("01", "23").as_deref(), Some("1.23s"));
        assert_eq!(format_response_time("00", "05").as_deref(), Some("0.05s"));
        assert_eq!(format_response_time("x", "05"), None);
    }

    #[test]
    fn question_text_strips_word_count_hint() {
        assert_eq!(question_text(" LICOR DE COLOR AMARILLO... (1 palabra)"), "LICOR DE COLOR AMARILLO...");
        assert_eq!(question_text(": ¿Capital de Francia? (1 PALABRA)"), "¿Capital de Francia?");
        assert_eq!(question_text(" - Autor de (2 palabras) El Quijote"), "Autor de El Quijote");
    }

    #[test]
    fn detects_answer_markers() {
        assert!(has_answer_marker("[10:00:01] <Bot> La buena: "));
        assert!(has_answer_marker("la respuesta correcta es"));
        assert!(!has_answer_marker("HISTORIA ¿Qué es buena?"));
    }

    #[test]
    fn finds_header_timestamp() {
        assert_eq!(find_timestamp("[21:04:09] <Bot> Pregunta: 1/5"), NaiveTime::from_hms_opt(21, 4, 9));
        assert_eq!(find_timestamp("Pregunta: 1/5"), None);
        assert_eq!(find_timestamp("99:99:99"), None);
    }
}
