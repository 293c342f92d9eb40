//! IRC line cleaning.
//!
//! Strips mIRC color codes, the bold/italic/underline/reverse/reset toggles
//! and any other C0 control character except tab, LF and CR. Logs saved by
//! some clients also keep the numeric part of a color code after the
//! introducer byte is gone (`2,0Pregunta`); those `digits,digits` remnants are
//! removed only where they cannot be content:
//!
//! - directly after a removed color code,
//! - at the start of the message, after an optional `[HH:MM:SS]` / `<nick>`
//!   prefix, either standalone or glued to the first word (`2,0Pregunta`).
//!
//! A remnant in the middle or at the end of a sentence is left alone, so
//! answers such as `3,14` or `1,5KG` survive.
//!
//! Cleaning is applied until the line stops changing, which makes
//! [`clean_line`] idempotent. Every pass that changes the line also shortens
//! it, so the loop terminates.

use regex::Regex;

fn color_code() -> &'static Regex {
    regex!(r"\x03\d{0,2}(?:,\d{1,2})?")
}

fn format_toggle() -> &'static Regex {
    regex!(r"[\x02\x0F\x16\x1D\x1F]")
}

fn control_char() -> &'static Regex {
    regex!(r"[\x00-\x08\x0B\x0C\x0E-\x1F]")
}

fn any_code() -> &'static Regex {
    regex!(r"\x03\d{0,2}(?:,\d{1,2})?|[\x00-\x08\x0B\x0C\x0E-\x1F]")
}

fn remnant_at_start() -> &'static Regex {
    regex!(r"^\d{1,2},\d{1,2}")
}

fn glued_remnant() -> &'static Regex {
    regex!(r"^(?P<prefix>\s*(?:\[?\d{1,2}:\d{2}(?::\d{2})?\]?\s*)?(?:<[^>\s]+>\s*)?)\d{1,2},\d{1,2}(?P<letter>\p{L})")
}

fn leading_remnants() -> &'static Regex {
    regex!(r"^(?P<prefix>\s*(?:\[?\d{1,2}:\d{2}(?::\d{2})?\]?\s*)?(?:<[^>\s]+>\s*)?)(?:\d{1,2},\d{1,2}(?:\s+|$))+")
}

/// Remove IRC presentation codes from `line`, keeping every other character
/// in order.
///
/// ```
/// use trivial_irc::clean_line;
///
/// assert_eq!(clean_line("\x0304,01Pregunta\x0f: 2 / 35"), "Pregunta: 2 / 35");
/// assert_eq!(clean_line("2,0GASTRONOMÍA"), "GASTRONOMÍA");
/// assert_eq!(clean_line("La buena: 3,14"), "La buena: 3,14");
/// ```
pub fn clean_line(line: &str) -> String {
    let mut current = clean_pass(line);
    loop {
        let next = clean_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn clean_pass(line: &str) -> String {
    let stripped = strip_codes(line);
    let unglued = glued_remnant().replace(&stripped, "$prefix$letter");
    leading_remnants().replace(&unglued, "$prefix").into_owned()
}

/// Drop control codes; a color code also takes a `digits,digits` remnant
/// that directly follows it.
fn strip_codes(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut last = 0;

    for m in any_code().find_iter(line) {
        if m.start() < last {
            continue;
        }
        out.push_str(&line[last..m.start()]);
        last = m.end();

        if m.as_str().starts_with('\x03') {
            let rest = &line[last..];
            if let Some(r) = remnant_at_start().find(rest) {
                let followed_by_digit = rest[r.end()..].starts_with(|c: char| c.is_ascii_digit());
                if !followed_by_digit {
                    last += r.end();
                }
            }
        }
    }

    out.push_str(&line[last..]);
    out
}

/// Named cleaner patterns, in the order they are applied.
pub(crate) fn patterns() -> Vec<(&'static str, &'static Regex)> {
    vec![
        ("color code", color_code()),
        ("format toggle", format_toggle()),
        ("control character", control_char()),
        ("glued color remnant", glued_remnant()),
        ("leading color remnant", leading_remnants()),
    ]
}
