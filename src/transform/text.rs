// src/transform/text.rs
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Canonicalize free-form text: strip diacritics, collapse whitespace runs,
/// Title Case each word. Absent or whitespace-only input collapses to `None`.
///
/// The mapping is lossy and idempotent: `"  brasília  "` → `"Brasilia"`.
pub fn clean_text(input: Option<&str>) -> Option<String> {
    let raw = input?.trim();
    if raw.is_empty() {
        return None;
    }

    // NFKD decompose, then drop the combining marks
    let stripped: String = raw.nfkd().filter(|c| !is_combining_mark(*c)).collect();

    let cleaned = stripped
        .split_whitespace()
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ");

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_accents_and_title_cases() {
        assert_eq!(clean_text(Some("  brasília  ")), Some("Brasilia".into()));
        assert_eq!(clean_text(Some("SÃO PAULO")), Some("Sao Paulo".into()));
        assert_eq!(clean_text(Some("espaço   duplo")), Some("Espaco Duplo".into()));
    }

    #[test]
    fn empty_and_absent_collapse_to_none() {
        assert_eq!(clean_text(None), None);
        assert_eq!(clean_text(Some("")), None);
        assert_eq!(clean_text(Some("   ")), None);
    }

    #[test]
    fn normalization_is_idempotent() {
        for s in ["brasília", "RIO de JANEIRO", "  çañón  ", "x"] {
            let once = clean_text(Some(s));
            let twice = clean_text(once.as_deref());
            assert_eq!(once, twice, "not idempotent for {s:?}");
        }
    }
}
