//! Built-in category vocabulary, skip keywords and excluded nicks.
//!
//! Category labels are matched accent-insensitively and case-insensitively
//! (`GASTRONOMIA` finds `GASTRONOMÍA`), always reporting the label as written
//! here.

use regex::Regex;

use crate::{Error, Result};

pub const DEFAULT_CATEGORIES: &[&str] = &[
    "GASTRONOMÍA",
    "HISTORIA",
    "GEOGRAFÍA",
    "CIENCIA FICCIÓN",
    "CIENCIAS",
    "CIENCIA",
    "ARTE",
    "LITERATURA",
    "MÚSICA",
    "CINE",
    "TELEVISIÓN",
    "DEPORTES",
    "ENTRETENIMIENTO",
    "NATURALEZA",
    "ANIMALES",
    "TECNOLOGÍA",
    "INFORMÁTICA",
    "MATEMÁTICAS",
    "QUÍMICA",
    "FÍSICA",
    "BIOLOGÍA",
    "ASTRONOMÍA",
    "MEDICINA",
    "MITOLOGÍA",
    "RELIGIÓN",
    "POLÍTICA",
    "ECONOMÍA",
    "IDIOMAS",
    "REFRANES",
    "CULTURA GENERAL",
    "MISCELÁNEA",
    "VIDEOJUEGOS",
    "CÓMICS",
];

/// A participant line containing one of these is not a correct answer.
pub const DEFAULT_SKIP_KEYWORDS: &[&str] = &["scratchea"];

/// Bot and server nicks that never count as participants.
pub const DEFAULT_EXCLUDED_NICKS: &[&str] = &["Saga_Noren", "VegaSicilia", "Bot", "Server", "GleviBot"];

/// Uppercase `s` and drop the Spanish diacritics on vowels.
pub fn fold(s: &str) -> String {
    s.to_uppercase()
        .chars()
        .map(|c| match c {
            'Á' | 'À' | 'Â' | 'Ä' => 'A',
            'É' | 'È' | 'Ê' | 'Ë' => 'E',
            'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
            'Ó' | 'Ò' | 'Ô' | 'Ö' => 'O',
            'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
            other => other,
        })
        .collect()
}

/// Regex fragment for one label that accepts accented and plain vowels and
/// any run of whitespace between words.
fn label_fragment(label: &str) -> String {
    let mut out = String::new();
    let mut in_space = false;
    for c in fold(label).chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push_str(r"\s+");
            }
            in_space = true;
            continue;
        }
        in_space = false;
        match c {
            'A' => out.push_str("[AÁÀÂÄ]"),
            'E' => out.push_str("[EÉÈÊË]"),
            'I' => out.push_str("[IÍÌÎÏ]"),
            'O' => out.push_str("[OÓÒÔÖ]"),
            'U' => out.push_str("[UÚÙÛÜ]"),
            other => out.push_str(&regex::escape(&other.to_string())),
        }
    }
    out
}

/// Compile `labels` into a single case-insensitive alternation.
///
/// Longer labels come first so `CIENCIA FICCIÓN` beats `CIENCIA` at the same
/// position. The whole label is captured as group `label`.
pub fn compile(labels: &[String]) -> Result<Regex> {
    let mut ordered: Vec<&String> = labels.iter().filter(|l| !l.trim().is_empty()).collect();
    ordered.sort_by_key(|l| std::cmp::Reverse(l.chars().count()));

    let alternation = ordered.iter().map(|l| label_fragment(l.trim())).collect::<Vec<_>>().join("|");
    let pattern = if alternation.is_empty() {
        // Matches nothing.
        r"[^\s\S]".to_string()
    } else {
        format!(r"(?i)\b(?P<label>{alternation})\b")
    };

    Regex::new(&pattern).map_err(|source| Error::InvalidPattern { pattern, source })
}

/// Map a matched label back to its vocabulary spelling.
pub fn canonical<'a>(labels: &'a [String], matched: &str) -> Option<&'a str> {
    let folded = fold(matched.split_whitespace().collect::<Vec<_>>().join(" ").as_str());
    labels.iter().map(|l| l.trim()).find(|l| fold(l) == folded)
}

pub fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_strips_vowel_accents_only() {
        assert_eq!(fold("Gastronomía"), "GASTRONOMIA");
        assert_eq!(fold("año"), "AÑO");
    }

    #[test]
    fn compiled_vocabulary_matches_accent_variants() {
        let labels = default_categories();
        let re = compile(&labels).unwrap();
        let caps = re.captures("gastronomia licor").unwrap();
        assert_eq!(canonical(&labels, &caps["label"]), Some("GASTRONOMÍA"));
    }

    #[test]
    fn longer_labels_win_at_same_position() {
        let labels = default_categories();
        let re = compile(&labels).unwrap();
        let caps = re.captures("CIENCIA FICCIÓN ¿Quién escribió Dune?").unwrap();
        assert_eq!(&caps["label"], "CIENCIA FICCIÓN");
    }

    #[test]
    fn labels_need_word_boundaries() {
        let labels = vec!["ARTE".to_string()];
        let re = compile(&labels).unwrap();
        assert!(re.captures("ARTESANÍA").is_none());
        assert!(re.captures("ARTE: pintor").is_some());
    }

    #[test]
    fn empty_vocabulary_never_matches() {
        let re = compile(&[]).unwrap();
        assert!(!re.is_match("HISTORIA"));
    }
}
