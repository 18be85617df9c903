//! Odds-site operations: program-board odds lookup and the weekly Spor
//! Toto list.
//!
//! These run under the tokio runtime because the orchestration layer
//! calls them from async context; the browser work itself is blocking CDP
//! and is pushed onto `spawn_blocking`. DOM parsing is split into pure
//! functions so the board heuristics are testable against captured
//! fragments without a browser.

use std::time::Duration;

use regex::Regex;
use scraper::{ElementRef, Html};
use std::sync::OnceLock;
use tokio::task;
use tracing::{debug, info};

use crate::browser::{BrowserSession, PageOptions};
use crate::config::Config;
use crate::extraction::{Extraction, ScrapeError};
use crate::matching::{matches, split_match_label};
use crate::mackolik::tables::{clean_text, sel};
use crate::models::{OddsQuote, TotoFixture};

/// The board is client-rendered; odds buttons appear shortly after DOM
/// content loaded.
const BOARD_SETTLE: Duration = Duration::from_millis(1500);

/// How long to wait for the first toto row before giving up.
const TOTO_ROW_WAIT: Duration = Duration::from_secs(20);

/// A Spor Toto coupon always lists 15 matches.
const TOTO_COUPON_SIZE: u32 = 15;

fn decimal_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+(?:[.,]\d+)?").expect("valid decimal regex"))
}

/// Look up the 1/X/2 and under/over 2.5 odds for a free-text match label
/// on the program board scoped to `league_id`.
///
/// `Data(None)` means the board was readable but carried no block for
/// this match (or the block had no odds yet) — never guessed around.
pub async fn resolve_odds(
    cfg: &Config,
    match_label: &str,
    league_id: u32,
) -> Extraction<Option<OddsQuote>> {
    let url = format!("{}/program/futbol?league={}", cfg.odds_base_url, league_id);
    let label = match_label.to_string();

    let result = task::spawn_blocking(move || -> Result<Option<OddsQuote>, ScrapeError> {
        let session = BrowserSession::open(&url, &PageOptions::default())?;
        std::thread::sleep(BOARD_SETTLE);
        let doc = Html::parse_document(&session.html()?);
        resolve_odds_in_board(&doc, &label)
    })
    .await
    .unwrap_or_else(|e| Err(ScrapeError::Navigation(format!("task join: {}", e))));

    Extraction::from_result(result, "resolve_odds")
}

/// Scan the board blocks for the first one mentioning both teams and
/// collect its ordered odd-button values.
pub fn resolve_odds_in_board(
    doc: &Html,
    match_label: &str,
) -> Result<Option<OddsQuote>, ScrapeError> {
    let (home, away) = split_match_label(match_label);

    let wrappers: Vec<ElementRef<'_>> = doc
        .select(&sel(r#"div[class*="grouped-wrapper"]"#))
        .collect();
    if wrappers.is_empty() {
        return Err(ScrapeError::Structure("div.grouped-wrapper"));
    }

    for wrapper in wrappers {
        let text = clean_text(wrapper);
        // A label with no separator leaves away empty; resolve on the
        // home name alone rather than rejecting every block.
        if !matches(&home, &text) || (!away.is_empty() && !matches(&away, &text)) {
            continue;
        }

        let odds: Vec<String> = wrapper
            .select(&sel(r#"button[class*="o_all"]"#))
            .map(clean_text)
            .filter(|t| decimal_pattern().is_match(t))
            .map(|t| t.replace(',', "."))
            .collect();

        if odds.is_empty() {
            debug!("matched block for '{}' has no odds yet", match_label);
            return Ok(None);
        }

        let mut quote = OddsQuote {
            match_label: format!("{} - {}", home, away),
            home: Some(home.clone()),
            away: Some(away.clone()),
            ms1: None,
            msx: None,
            ms2: None,
            under_2_5: None,
            over_2_5: None,
        };
        // Positional button contract: 1 / X / 2, then under/over 2.5
        if odds.len() >= 3 {
            quote.ms1 = Some(odds[0].clone());
            quote.msx = Some(odds[1].clone());
            quote.ms2 = Some(odds[2].clone());
        }
        if odds.len() >= 5 {
            quote.under_2_5 = Some(odds[3].clone());
            quote.over_2_5 = Some(odds[4].clone());
        }
        info!("odds resolved for '{}': {:?}", match_label, quote.ms1);
        return Ok(Some(quote));
    }

    debug!("no board block matched '{}'", match_label);
    Ok(None)
}

/// Fetch the current 15-match Spor Toto list.
pub async fn get_toto_week_list(cfg: &Config) -> Extraction<Vec<TotoFixture>> {
    let url = cfg.toto_url.clone();

    let result = task::spawn_blocking(move || -> Result<Vec<TotoFixture>, ScrapeError> {
        let opts = PageOptions {
            select_league: None,
            settle: Duration::ZERO,
            wait_for: Some((
                r#"div[data-comp-name="sporToto-1"]"#.to_string(),
                TOTO_ROW_WAIT,
            )),
        };
        let session = BrowserSession::open(&url, &opts)?;
        let doc = Html::parse_document(&session.html()?);
        parse_toto_rows(&doc)
    })
    .await
    .unwrap_or_else(|e| Err(ScrapeError::Navigation(format!("task join: {}", e))));

    Extraction::from_result(result, "get_toto_week_list")
}

/// Decode the toto rows. Each row is addressed by its order-number badge
/// (`data-comp-name="sporToto-<n>"`); the badge's parent is the row
/// container holding the date badge and the team label.
pub fn parse_toto_rows(doc: &Html) -> Result<Vec<TotoFixture>, ScrapeError> {
    let mut rows = Vec::new();

    for order in 1..=TOTO_COUPON_SIZE {
        let badge_sel = sel(&format!(r#"div[data-comp-name="sporToto-{}"]"#, order));
        let Some(badge) = doc.select(&badge_sel).next() else {
            break; // list is shorter than a full coupon this week
        };
        let Some(row) = badge.parent().and_then(ElementRef::wrap) else {
            debug!("toto row {} badge has no element parent", order);
            continue;
        };

        let date = row
            .select(&sel(r#"div[data-comp-name="sporToto-dates"]"#))
            .next()
            .map(clean_text);
        let teams = row.select(&sel("div.flex-1")).next().map(clean_text);

        let (Some(date), Some(teams)) = (date, teams) else {
            debug!("toto row {} missing date or team label", order);
            continue;
        };

        let (home, away) = split_toto_teams(&teams);
        rows.push(TotoFixture {
            order,
            home,
            away,
            date,
        });
    }

    if rows.is_empty() {
        return Err(ScrapeError::Structure(
            r#"div[data-comp-name="sporToto-1"]"#,
        ));
    }
    info!("toto list: {} matches", rows.len());
    Ok(rows)
}

/// The toto label joins teams with a bare hyphen. Split on the FIRST one;
/// everything after it belongs to the away side. Hyphenated home names
/// are ambiguous in the source itself — documented limitation.
fn split_toto_teams(teams: &str) -> (String, String) {
    match teams.split_once('-') {
        Some((home, away)) => (home.trim().to_string(), away.trim().to_string()),
        None => (teams.trim().to_string(), "?".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(body: &str) -> Html {
        Html::parse_document(&format!("<html><body>{}</body></html>", body))
    }

    fn board(buttons: &str) -> String {
        format!(
            r#"
            <div class="grouped-wrapper c1">
              <span>20:00</span> <span>Club A</span> <span>Club B</span>
              {}
            </div>
            <div class="grouped-wrapper c2">
              <span>22:00</span> <span>Other Town</span> <span>Different FC</span>
              <button class="o_all__fRvUM">2.00</button>
            </div>"#,
            buttons
        )
    }

    #[test]
    fn test_odds_three_buttons() {
        let html = board(
            r#"<button class="o_all__fRvUM">1.85</button>
               <button class="o_all__fRvUM">3.40</button>
               <button class="o_all__fRvUM">4.10</button>"#,
        );
        let quote = resolve_odds_in_board(&doc(&html), "Club A - Club B")
            .unwrap()
            .expect("block should match");
        assert_eq!(quote.ms1.as_deref(), Some("1.85"));
        assert_eq!(quote.msx.as_deref(), Some("3.40"));
        assert_eq!(quote.ms2.as_deref(), Some("4.10"));
        assert!(quote.under_2_5.is_none());
        assert!(quote.over_2_5.is_none());
    }

    #[test]
    fn test_odds_five_buttons_comma_decimals() {
        let html = board(
            r#"<button class="o_all__fRvUM">1,85</button>
               <button class="o_all__fRvUM">3,40</button>
               <button class="o_all__fRvUM">4,10</button>
               <button class="o_all__fRvUM">1,72</button>
               <button class="o_all__fRvUM">1,98</button>"#,
        );
        let quote = resolve_odds_in_board(&doc(&html), "Club A - Club B")
            .unwrap()
            .expect("block should match");
        assert_eq!(quote.ms1.as_deref(), Some("1.85"));
        assert_eq!(quote.under_2_5.as_deref(), Some("1.72"));
        assert_eq!(quote.over_2_5.as_deref(), Some("1.98"));
    }

    #[test]
    fn test_odds_two_buttons_populate_nothing() {
        let html = board(
            r#"<button class="o_all__fRvUM">1.85</button>
               <button class="o_all__fRvUM">3.40</button>"#,
        );
        let quote = resolve_odds_in_board(&doc(&html), "Club A - Club B")
            .unwrap()
            .expect("block should match");
        assert!(quote.ms1.is_none());
        assert!(quote.msx.is_none());
        assert!(quote.ms2.is_none());
        assert!(quote.under_2_5.is_none());
    }

    #[test]
    fn test_odds_separatorless_label_matches_on_home_alone() {
        let html = board(
            r#"<button class="o_all__fRvUM">1.85</button>
               <button class="o_all__fRvUM">3.40</button>
               <button class="o_all__fRvUM">4.10</button>"#,
        );
        let quote = resolve_odds_in_board(&doc(&html), "Club A")
            .unwrap()
            .expect("home name alone should match");
        assert_eq!(quote.ms1.as_deref(), Some("1.85"));
        assert_eq!(quote.away.as_deref(), Some(""));
    }

    #[test]
    fn test_odds_non_numeric_buttons_ignored() {
        let html = board(
            r#"<button class="o_all__fRvUM">Yükseliyor</button>
               <button class="o_all__fRvUM">1.85</button>
               <button class="o_all__fRvUM">3.40</button>
               <button class="o_all__fRvUM">4.10</button>"#,
        );
        let quote = resolve_odds_in_board(&doc(&html), "Club A - Club B")
            .unwrap()
            .expect("block should match");
        assert_eq!(quote.ms1.as_deref(), Some("1.85"));
    }

    #[test]
    fn test_odds_matched_block_without_buttons() {
        let html = board("");
        let result = resolve_odds_in_board(&doc(&html), "Club A - Club B").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_odds_no_matching_block() {
        let html = board(r#"<button class="o_all__fRvUM">1.85</button>"#);
        let result = resolve_odds_in_board(&doc(&html), "Nowhere United - Elsewhere SK").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_odds_board_without_wrappers() {
        let err = resolve_odds_in_board(&doc("<p>redesign</p>"), "Club A - Club B").unwrap_err();
        assert!(matches!(err, ScrapeError::Structure(_)));
    }

    #[test]
    fn test_odds_suffix_variant_matches() {
        // Board text carries the legal suffix; the label does not
        let html = r#"
            <div class="grouped-wrapper">
              <span>Trabzonspor A.Ş.</span> <span>Fenerbahçe A.Ş.</span>
              <button class="o_all__x">2.05</button>
              <button class="o_all__x">3.10</button>
              <button class="o_all__x">3.60</button>
            </div>"#;
        let quote = resolve_odds_in_board(&doc(html), "Trabzonspor - Fenerbahçe")
            .unwrap()
            .expect("containment branch should match");
        assert_eq!(quote.ms2.as_deref(), Some("3.60"));
    }

    const TOTO_PAGE: &str = r#"
        <div class="row flex">
          <div data-comp-name="sporToto-1">1</div>
          <div data-comp-name="sporToto-dates">23.08 20:00</div>
          <div class="flex-1">Galatasaray-Fenerbahçe</div>
        </div>
        <div class="row flex">
          <div data-comp-name="sporToto-2">2</div>
          <div data-comp-name="sporToto-dates">23.08 21:45</div>
          <div class="flex-1">Hatayspor-İst-Spor</div>
        </div>
        <div class="row flex">
          <div data-comp-name="sporToto-3">3</div>
          <div data-comp-name="sporToto-dates">24.08 19:00</div>
          <div class="flex-1">Tek Takım</div>
        </div>"#;

    #[test]
    fn test_toto_rows_parsed_in_order() {
        let rows = parse_toto_rows(&doc(TOTO_PAGE)).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].order, 1);
        assert_eq!(rows[0].home, "Galatasaray");
        assert_eq!(rows[0].away, "Fenerbahçe");
        assert_eq!(rows[0].date, "23.08 20:00");
    }

    #[test]
    fn test_toto_first_hyphen_split() {
        let rows = parse_toto_rows(&doc(TOTO_PAGE)).unwrap();
        // Everything after the first hyphen is the away side
        assert_eq!(rows[1].home, "Hatayspor");
        assert_eq!(rows[1].away, "İst-Spor");
    }

    #[test]
    fn test_toto_label_without_hyphen() {
        let rows = parse_toto_rows(&doc(TOTO_PAGE)).unwrap();
        assert_eq!(rows[2].home, "Tek Takım");
        assert_eq!(rows[2].away, "?");
    }

    #[test]
    fn test_toto_stops_at_first_gap() {
        let html = r#"
            <div><div data-comp-name="sporToto-1">1</div>
                 <div data-comp-name="sporToto-dates">d</div>
                 <div class="flex-1">A-B</div></div>
            <div><div data-comp-name="sporToto-3">3</div>
                 <div data-comp-name="sporToto-dates">d</div>
                 <div class="flex-1">C-D</div></div>"#;
        let rows = parse_toto_rows(&doc(html)).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_toto_empty_page() {
        let err = parse_toto_rows(&doc("<p>no list</p>")).unwrap_err();
        assert!(matches!(err, ScrapeError::Structure(_)));
    }
}
