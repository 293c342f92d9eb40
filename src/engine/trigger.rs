//! Per-line trigger scan.
//!
//! Computes cheap signals for one cleaned line so the scanner can skip rules
//! that cannot match it:
//!
//! - **Mask** (`LineMask`): digits, the `>>>` attempt marker, letters, and a
//!   `<...>` chat-nick shape.
//! - **Lowercased text**: used for phrase gating (`RuleMeta::optional_phrases`).
//!
//! False positives are fine; the rule regex still has to match.

use super::compiled_rules::LineMask;

#[derive(Debug, Clone)]
pub struct LineTrigger {
    pub mask: LineMask,
    pub lower: String,
}

impl LineTrigger {
    pub fn scan(line: &str) -> Self {
        let mut mask = LineMask::empty();

        if line.bytes().any(|b| b.is_ascii_digit()) {
            mask |= LineMask::HAS_DIGITS;
        }
        if line.contains(">>>") {
            mask |= LineMask::HAS_MARKER;
        }
        if line.chars().any(char::is_alphabetic) {
            mask |= LineMask::HAS_ALPHA;
        }
        if line.contains('<') && line.contains('>') {
            mask |= LineMask::HAS_CHAT_NICK;
        }

        LineTrigger { mask, lower: line.to_lowercase() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_line_features() {
        let t = LineTrigger::scan("[10:00:01] <Bot> >>>ANA a 00'12");
        assert!(t.mask.contains(LineMask::HAS_DIGITS | LineMask::HAS_MARKER | LineMask::HAS_ALPHA));
        assert!(t.mask.contains(LineMask::HAS_CHAT_NICK));
        assert!(t.lower.contains(">>>ana"));

        let t = LineTrigger::scan("---");
        assert!(t.mask.is_empty());
    }
}
