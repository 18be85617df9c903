//! Match-detail page decoding.
//!
//! A detail page is a grab-bag of loosely structured panels: OPTA fact
//! bullets, highlighted editorial notes, a comparison column, per-team
//! form tables and squad/top-scorer tables. Each panel is harvested
//! independently and a missing panel contributes nothing — partial
//! results are the steady state here, not an error.

use regex::Regex;
use scraper::{ElementRef, Html};
use std::sync::OnceLock;

use crate::models::MatchDeepStats;

use super::tables::{clean_text, sel};

/// Sentinel substring on the "more info" teaser bullet that is noise, not
/// a fact.
const MORE_INFO_SENTINEL: &str = "Daha";

/// Facts shorter than this are navigation crumbs, not insights.
const MIN_FACT_LEN: usize = 10;

/// How many recent rows of a form/squad table feed one summary string.
const PANEL_ROW_LIMIT: usize = 5;

/// Which optional panels to decode. The comparison column is heavy to
/// render on some pages; callers that only need form/squad data switch it
/// off instead of keeping a second scraper variant around.
#[derive(Debug, Clone)]
pub struct DeepStatsOptions {
    pub include_comparison: bool,
}

impl Default for DeepStatsOptions {
    fn default() -> Self {
        DeepStatsOptions {
            include_comparison: true,
        }
    }
}

fn form_run_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Single-letter result codes, Turkish and English: G/B/M, W/D/L
    RE.get_or_init(|| Regex::new(r"[GBMWDL]{3,}").expect("valid form regex"))
}

/// Decode a parsed match-detail page into categorized fragments.
pub fn extract_deep_stats(doc: &Html, opts: &DeepStatsOptions) -> MatchDeepStats {
    let mut stats = MatchDeepStats::default();

    collect_opta_facts(doc, &mut stats);
    collect_highlights(doc, &mut stats);
    if opts.include_comparison {
        collect_comparison(doc, &mut stats);
    }
    collect_form_panels(doc, &mut stats);
    collect_squad_panels(doc, &mut stats);

    stats
}

/// (a) Short descriptive bullets from the OPTA facts list.
fn collect_opta_facts(doc: &Html, stats: &mut MatchDeepStats) {
    let Some(list) = doc.select(&sel("ul.opta-facts")).next() else {
        return;
    };
    for li in list.select(&sel("li")) {
        let text = clean_text(li);
        if !text.contains(MORE_INFO_SENTINEL) && text.chars().count() > MIN_FACT_LEN {
            stats.insights.push(format!("📌 {}", text));
        }
    }
}

/// (b) Editorial notes carried on the yellow highlight background.
fn collect_highlights(doc: &Html, stats: &mut MatchDeepStats) {
    for block in doc.select(&sel(r##"div[style*="#FBFCC8"]"##)) {
        stats.insights.push(format!("⚠️ {}", clean_text(block)));
    }
}

/// (c) Comparison column: full collapsed text, plus any win/draw/loss
/// letter runs surfaced separately for the prompting layer.
fn collect_comparison(doc: &Html, stats: &mut MatchDeepStats) {
    let Some(panel) = doc.select(&sel("#compare-right-coll")).next() else {
        return;
    };
    let text = clean_text(panel);
    stats.form_patterns = form_run_pattern()
        .find_iter(&text)
        .map(|m| m.as_str().to_string())
        .collect();
    stats.comparison_text = text;
}

/// Panels are `div.md` blocks headed by a `div.detail-title`.
fn panel_title(panel: ElementRef<'_>) -> Option<String> {
    panel.select(&sel("div.detail-title")).next().map(clean_text)
}

/// (d) Per-team form tables, emitted as one fixture-congestion string per
/// team: recent match dates with scores, so the analysis layer can spot
/// short rest periods.
fn collect_form_panels(doc: &Html, stats: &mut MatchDeepStats) {
    for panel in doc.select(&sel("div.md")) {
        let Some(title) = panel_title(panel) else {
            continue;
        };
        if !title.contains("Form Durumu") {
            continue;
        }
        let team = title.replace("- Form Durumu", "").trim().to_string();
        let Some(table) = panel.select(&sel("table.md-table3")).next() else {
            continue;
        };

        let mut entries = Vec::new();
        for row in table.select(&sel("tr.alt1, tr.alt2")).take(PANEL_ROW_LIMIT) {
            let cols: Vec<ElementRef<'_>> = row.select(&sel("td")).collect();
            // Row layout: [0] league, [1] date, [2] opponent, [3] score
            if cols.len() < 4 {
                continue;
            }
            let date = clean_text(cols[1]);
            let score = row
                .select(&sel("b"))
                .next()
                .map(clean_text)
                .unwrap_or_else(|| "?".to_string());
            entries.push(format!("{} ({})", date, score));
        }

        if !entries.is_empty() {
            stats.insights.push(format!(
                "🗓️ {} Fikstürü (Tarih/Skor): {}",
                team,
                entries.join(", ")
            ));
        }
    }
}

/// (e) Top-scorer and last-lineup tables, one joined snippet per panel.
fn collect_squad_panels(doc: &Html, stats: &mut MatchDeepStats) {
    for panel in doc.select(&sel("div.md")) {
        let Some(title) = panel_title(panel) else {
            continue;
        };
        if !title.contains("En Golcüler") && !title.contains("Son Maç Kadrosu") {
            continue;
        }
        let Some(table) = panel.select(&sel("table.md-table")).next() else {
            continue;
        };

        let mut players = Vec::new();
        for row in table.select(&sel("tr.alt1, tr.alt2")).take(PANEL_ROW_LIMIT) {
            let cols: Vec<ElementRef<'_>> = row.select(&sel("td")).collect();
            let (Some(first), Some(last)) = (cols.first(), cols.last()) else {
                continue;
            };
            players.push(format!("{} ({})", clean_text(*first), clean_text(*last)));
        }

        if !players.is_empty() {
            stats
                .player_stats
                .push(format!("{}: {}", title, players.join(", ")));
        }
    }
}
