//! Team-name normalization and fuzzy matching.
//!
//! The same club appears as "Trabzonspor A.Ş." in the odds board, as
//! "Trabzonspor" in the standings and as "TRABZONSPOR" in the fixture
//! list. Reconciling those free-text variants is what makes the odds
//! lookup work at all, so the matching rule here is deliberately dual:
//! substring containment catches abbreviated/legal-suffix variants, the
//! similarity ratio catches typos and reorderings. The 0.65 threshold is
//! tuned against the live sites; changing it changes match behavior
//! everywhere.

use regex::Regex;
use std::sync::OnceLock;
use strsim::normalized_levenshtein;

/// Lowercase Turkish letters that must survive normalization alongside
/// ASCII alphanumerics.
const TURKISH_LOWER: &str = "ğüşöçı";

/// Canonicalize a free-text team name for comparison.
///
/// Lowercases first, then keeps only ASCII alphanumerics, Turkish
/// lowercase letters and spaces (anything else becomes a space), collapses
/// whitespace and trims. Lowercasing before filtering keeps the function
/// idempotent: the combining dot that `İ` decomposes into is filtered out
/// on the first pass.
pub fn normalize(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        // Combining dot left over from lowercasing 'İ'; dropping it (not
        // spacing it) keeps "İstanbul" one word
        .filter(|c| *c != '\u{0307}')
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == ' ' || TURKISH_LOWER.contains(c) {
                c
            } else {
                ' '
            }
        })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Bounded [0,1] edit-distance similarity between two raw strings,
/// computed over their normalized forms. Empty input scores 0.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let (na, nb) = (normalize(a), normalize(b));
    if na.is_empty() || nb.is_empty() {
        return 0.0;
    }
    normalized_levenshtein(&na, &nb)
}

/// Whether two free-text names refer to the same thing.
///
/// True if either normalized form contains the other as a substring, OR
/// the similarity ratio strictly exceeds 0.65. Containment alone fails on
/// typos; similarity alone fails on short names inside long block texts.
/// The OR of both is intentional and must stay exactly as tuned.
pub fn matches(a: &str, b: &str) -> bool {
    let (na, nb) = (normalize(a), normalize(b));
    if na.is_empty() || nb.is_empty() {
        return false;
    }
    if na.contains(&nb) || nb.contains(&na) {
        return true;
    }
    similarity(a, b) > 0.65
}

fn label_separator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\s*-\s*|\s+vs\s+|\s+v\s+").expect("valid separator regex")
    })
}

/// Split a free-text match label ("Home - Away", "Home vs Away") into
/// home and away names.
///
/// Splits on the FIRST separator, which is lossy for team names that
/// themselves contain a hyphen. The source sites do not disambiguate this
/// either; known limitation, do not "fix" with different behavior.
pub fn split_match_label(label: &str) -> (String, String) {
    let parts: Vec<&str> = label_separator().split(label).collect();
    if parts.len() >= 2 {
        (parts[0].trim().to_string(), parts[1].trim().to_string())
    } else {
        (label.trim().to_string(), String::new())
    }
}

/// iddaa.com numeric league ids for the leagues the program board exposes.
const IDDAA_LEAGUE_IDS: &[(&str, u32)] = &[
    ("UEFA", 8),
    ("Premier Lig", 1),
    ("Süper Lig", 2),
    ("LaLiga", 3),
    ("Serie A", 4),
    ("Bundesliga", 5),
    ("Ligue 1", 6),
    ("Şampiyonlar Ligi", 8),
    ("Avrupa Ligi", 18),
];

/// Resolve a display league name ("İNGİLTERE Premier Lig") to the odds
/// site's numeric league id by normalized containment either way.
pub fn league_id_for(name: &str) -> Option<u32> {
    let target = normalize(name);
    if target.is_empty() {
        return None;
    }
    IDDAA_LEAGUE_IDS.iter().find_map(|(key, id)| {
        let key_norm = normalize(key);
        (target.contains(&key_norm) || key_norm.contains(&target)).then_some(*id)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize("  Fenerbahçe  A.Ş. "), "fenerbahçe a ş");
        assert_eq!(normalize("Man. United!"), "man united");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_idempotent() {
        for s in ["Beşiktaş JK", "İstanbul Başakşehir", "1. FC Köln", "A.Ş.", ""] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "normalize not idempotent for {:?}", s);
        }
    }

    #[test]
    fn test_normalize_dotted_capital_i() {
        // 'İ' lowercases to 'i' + combining dot; the mark must not survive
        assert_eq!(normalize("İstanbul"), "istanbul");
        assert_eq!(normalize("İ\u{11E}ÜŞÖÇ"), "iğüşöç");
    }

    #[test]
    fn test_similarity_bounds() {
        assert_relative_eq!(similarity("Arsenal", "Arsenal"), 1.0);
        assert_eq!(similarity("", "Arsenal"), 0.0);
        let s = similarity("Arsenal", "Arsenaal");
        assert!(s > 0.65 && s < 1.0, "unexpected ratio {}", s);
    }

    #[test]
    fn test_matches_containment_branch() {
        // Legal-suffix variant resolves via containment after normalization
        assert!(matches("Club A.Ş.", "Club"));
        assert!(matches("Club", "Club A.Ş."));
    }

    #[test]
    fn test_matches_symmetry() {
        let cases = [
            ("Galatasaray", "Galatasaray A.Ş."),
            ("Man United", "Manchester United"),
            ("Inter", "Internazionale"),
        ];
        for (a, b) in cases {
            assert_eq!(matches(a, b), matches(b, a), "asymmetric for {} / {}", a, b);
        }
    }

    #[test]
    fn test_matches_similarity_branch() {
        // No containment either way, but edit distance is small
        assert!(matches("Fenerbahce", "Fenerbahçe"));
    }

    #[test]
    fn test_matches_rejects_unrelated() {
        assert!(!matches("Galatasaray", "Real Madrid"));
        assert!(!matches("", "Arsenal"));
        assert!(!matches("Arsenal", ""));
    }

    #[test]
    fn test_split_label_hyphen() {
        assert_eq!(
            split_match_label("Club A - Club B"),
            ("Club A".to_string(), "Club B".to_string())
        );
    }

    #[test]
    fn test_split_label_vs_variants() {
        assert_eq!(
            split_match_label("Club A vs Club B"),
            ("Club A".to_string(), "Club B".to_string())
        );
        assert_eq!(
            split_match_label("Club A v Club B"),
            ("Club A".to_string(), "Club B".to_string())
        );
    }

    #[test]
    fn test_split_label_degenerate() {
        assert_eq!(
            split_match_label("Club A"),
            ("Club A".to_string(), String::new())
        );
    }

    #[test]
    fn test_split_label_hyphenated_name_is_lossy() {
        // Documented limitation: the first separator wins
        let (home, away) = split_match_label("Demir-Çelik Spor - Vefa");
        assert_eq!(home, "Demir");
        assert_eq!(away, "Çelik Spor");
    }

    #[test]
    fn test_league_id_lookup() {
        assert_eq!(league_id_for("İNGİLTERE Premier Lig"), Some(1));
        assert_eq!(league_id_for("Süper Lig"), Some(2));
        assert_eq!(league_id_for("Bundesliga"), Some(5));
        assert_eq!(league_id_for("Kreisliga C"), None);
        assert_eq!(league_id_for(""), None);
    }
}
