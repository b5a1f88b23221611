//! Title cleaning: whitespace normalization, noise filtering, dedup.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Longest title accepted unless a source configures a stricter bound.
pub const DEFAULT_MAX_TITLE_LEN: usize = 140;

/// UI chrome that leaks through broad selectors: cookie banners, country
/// switchers, catalog navigation, social callouts, login/signup prompts.
/// Tuned conservatively: a pattern that could swallow a real title does not
/// belong here; stray noise in the output is the cheaper mistake.
static NOISE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^¿.+\?$",
        r"(?i)cambiar? de pa[ií]s",
        r"(?i)\bver (toda la )?cartelera\b",
        r"(?i)\btodas las pel[ií]culas\b",
        r"(?i)\bver m[aá]s\b",
        r"(?i)s[ií]guenos en|facebook|instagram|tiktok|youtube",
        r"(?i)\bnewsletter\b|suscr[ií]bete|introduce tu",
        r"(?i)inicia sesi[oó]n|reg[ií]strate|mi cuenta",
        r"(?i)\bcookies?\b|pol[ií]tica de privacidad",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("noise pattern should compile"))
    .collect()
});

/// Collapse every whitespace run to a single space and trim the ends.
pub fn normalize(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Accept/reject gate applied to normalized titles.
#[derive(Debug, Clone)]
pub struct TitleFilter {
    max_len: usize,
}

impl TitleFilter {
    pub fn new(max_len: usize) -> Self {
        Self { max_len }
    }

    pub fn accept(&self, title: &str) -> bool {
        let len = title.chars().count();
        if len < 2 || len > self.max_len {
            return false;
        }
        !NOISE_PATTERNS.iter().any(|re| re.is_match(title))
    }
}

impl Default for TitleFilter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TITLE_LEN)
    }
}

/// Keep the first occurrence of each title, comparing case-insensitively.
/// Stable: survivors keep their relative order.
pub fn dedupe(titles: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for t in titles {
        if seen.insert(t.to_lowercase()) {
            out.push(t);
        }
    }
    out
}

/// The full per-source pipeline: normalize, filter, dedupe.
pub fn clean_titles(raw: impl IntoIterator<Item = String>, filter: &TitleFilter) -> Vec<String> {
    dedupe(
        raw.into_iter()
            .map(|s| normalize(&s))
            .filter(|t| filter.accept(t)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_runs_and_trims() {
        assert_eq!(normalize("  Dune:   Parte\t\nDos  "), "Dune: Parte Dos");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        for raw in ["  a  b ", "x", "", " ¿Qué ver? ", "línea\ncon\nsaltos"] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once);
            assert!(!once.contains("  "));
            assert_eq!(once, once.trim());
        }
    }

    #[test]
    fn filter_enforces_length_bounds() {
        let filter = TitleFilter::new(10);
        assert!(!filter.accept(""));
        assert!(!filter.accept("A"));
        assert!(filter.accept("It"));
        assert!(filter.accept("1234567890"));
        assert!(!filter.accept("12345678901"));
    }

    #[test]
    fn filter_counts_chars_not_bytes() {
        // 4 chars, 8 bytes
        assert!(TitleFilter::new(4).accept("ñoño"));
    }

    #[test]
    fn filter_rejects_noise_regardless_of_case() {
        let filter = TitleFilter::default();
        assert!(!filter.accept("¿Quieres cambiar de país?"));
        assert!(!filter.accept("CAMBIAR DE PAÍS"));
        assert!(!filter.accept("Ver toda la cartelera"));
        assert!(!filter.accept("Síguenos en Instagram"));
        assert!(!filter.accept("ACEPTAR COOKIES"));
        assert!(!filter.accept("Inicia sesión"));
    }

    #[test]
    fn filter_passes_real_titles() {
        let filter = TitleFilter::default();
        for title in ["Dune: Parte Dos", "Oppenheimer", "El país de los sueños"] {
            assert!(filter.accept(title), "rejected {title:?}");
        }
    }

    #[test]
    fn dedupe_is_case_insensitive_and_stable() {
        let input = vec![
            "Dune".to_string(),
            "Oppenheimer".to_string(),
            "DUNE".to_string(),
            "dune".to_string(),
            "Barbie".to_string(),
        ];
        assert_eq!(dedupe(input), vec!["Dune", "Oppenheimer", "Barbie"]);
    }

    #[test]
    fn dedupe_is_idempotent() {
        let input = vec!["A".to_string(), "a".to_string(), "B".to_string()];
        let once = dedupe(input);
        assert_eq!(dedupe(once.clone()), once);
    }

    #[test]
    fn clean_titles_end_to_end() {
        let raw = vec![
            "Dune: Parte Dos".to_string(),
            "dune: parte dos ".to_string(),
            "Oppenheimer".to_string(),
        ];
        assert_eq!(
            clean_titles(raw, &TitleFilter::default()),
            vec!["Dune: Parte Dos", "Oppenheimer"]
        );
    }
}
