use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of the archive site's league `<select>` control.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct League {
    /// Human-readable league name as shown on the site
    pub display_name: String,
    /// Opaque option value used to switch the page to this league
    pub selector_value: String,
}

/// A scheduled match from the fixture table.
///
/// Team name fields carry the raw site text. Normalization happens at
/// matching time, never in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    /// e.g. "13/02"
    pub date: String,
    /// e.g. "20:00"
    pub time: String,
    pub home: String,
    pub away: String,
    /// Absolute URL of the match-detail page; join key into deep stats
    pub detail_url: String,
}

/// One row of the standings table. Source order is the rank; no rank
/// field is stored, so callers must preserve ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandingEntry {
    pub team: String,
    /// Points column text, e.g. "38"
    pub points_label: String,
}

impl StandingEntry {
    /// Display form used by the analysis prompts, e.g. "Galatasaray (38 P)".
    pub fn summary(&self) -> String {
        format!("{} ({} P)", self.team, self.points_label)
    }
}

/// Fixtures and standings for one league, fetched in a single session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureBundle {
    pub fixtures: Vec<Fixture>,
    pub standings: Vec<StandingEntry>,
    pub fetched_at: DateTime<Utc>,
}

impl FixtureBundle {
    /// Empty bundle stamped now. Keeps the output shape identical
    /// whether the fetch produced data or nothing.
    pub fn empty() -> Self {
        FixtureBundle {
            fixtures: Vec::new(),
            standings: Vec::new(),
            fetched_at: Utc::now(),
        }
    }
}

/// Categorized free-text fragments from a match-detail page.
///
/// Every field is best-effort: a missing container on the page yields an
/// empty container here, never an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchDeepStats {
    /// Bullet facts, highlighted notes and fixture-congestion strings
    pub insights: Vec<String>,
    /// Top-scorer / last-lineup snippets, one joined string per panel
    pub player_stats: Vec<String>,
    /// Reserved; the detail pages currently expose no usable h2h block
    pub h2h: Vec<String>,
    /// Comparison panel full text, whitespace-collapsed
    pub comparison_text: String,
    /// Win/draw/loss letter runs scanned out of the comparison panel
    pub form_patterns: Vec<String>,
}

/// Per-team league statistics in the flat micro-format consumed by the
/// prompting layer:
///
/// ```text
/// <team> -> <key>: <value>, <key>: <value>, ...
/// ```
///
/// The team name precedes the first `"->"`; each stat pair is
/// comma-separated with exactly one `":"`. Downstream consumers re-parse
/// the line with `split`, so the format is the contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamLeagueStat(pub String);

impl TeamLeagueStat {
    /// Build a line from a team name and ordered key/value pairs.
    pub fn encode(team: &str, pairs: &[(&str, &str)]) -> Self {
        let stats = pairs
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect::<Vec<_>>()
            .join(", ");
        TeamLeagueStat(format!("{} -> {}", team, stats))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Team name portion (text before the first `"->"`).
    pub fn team(&self) -> &str {
        match self.0.split_once("->") {
            Some((team, _)) => team.trim(),
            None => self.0.trim(),
        }
    }

    /// Re-parse the stat pairs. Fragments without a `":"` are skipped.
    /// A comma between two digits is a decimal separator ("1,85"),
    /// not a pair boundary.
    pub fn pairs(&self) -> Vec<(String, String)> {
        let Some((_, stats)) = self.0.split_once("->") else {
            return Vec::new();
        };
        split_stat_fragments(stats)
            .into_iter()
            .filter_map(|frag| {
                let (k, v) = frag.split_once(':')?;
                Some((k.trim().to_string(), v.trim().to_string()))
            })
            .collect()
    }

    /// Numeric value for a stat key, tolerant of the site's notation:
    /// percent signs are stripped and comma decimals accepted.
    /// Returns `None` for unknown keys or non-numeric values.
    pub fn numeric(&self, key: &str) -> Option<f64> {
        let (_, value) = self
            .pairs()
            .into_iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key) || k == key)?;
        value.replace('%', "").replace(',', ".").trim().parse().ok()
    }
}

/// Split a stats section on pair-separating commas only: a comma with
/// ASCII digits on both sides stays inside its fragment.
fn split_stat_fragments(stats: &str) -> Vec<&str> {
    let bytes = stats.as_bytes();
    let mut fragments = Vec::new();
    let mut start = 0;
    for (i, b) in bytes.iter().enumerate() {
        let decimal = *b == b','
            && i > 0
            && i + 1 < bytes.len()
            && bytes[i - 1].is_ascii_digit()
            && bytes[i + 1].is_ascii_digit();
        if *b == b',' && !decimal {
            fragments.push(&stats[start..i]);
            start = i + 1;
        }
    }
    fragments.push(&stats[start..]);
    fragments
}

/// Odds for one match from the iddaa program board.
///
/// All numeric fields are decimal strings (comma normalized to dot)
/// because the source mixes notations. Fields are populated positionally
/// from however many odd buttons the matched block carried; missing
/// buttons stay `None`, never fabricated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OddsQuote {
    /// "Home - Away" label the lookup was made with
    pub match_label: String,
    pub home: Option<String>,
    pub away: Option<String>,
    /// Match result 1 (home win)
    pub ms1: Option<String>,
    /// Match result X (draw)
    pub msx: Option<String>,
    /// Match result 2 (away win)
    pub ms2: Option<String>,
    pub under_2_5: Option<String>,
    pub over_2_5: Option<String>,
}

/// One row of the weekly Spor Toto list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TotoFixture {
    /// 1-based position on the coupon (1..=15)
    pub order: u32,
    pub home: String,
    pub away: String,
    pub date: String,
}
