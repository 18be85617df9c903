//! Archive-site operations: league list, fixtures + standings, match
//! deep stats, league team statistics.
//!
//! Each public operation is self-contained and blocking: open one browser
//! session, navigate, extract, close. Failures degrade to an
//! [`Extraction::Empty`] with the reason; nothing here returns `Err` to
//! the caller.

pub mod deep_stats;
pub mod league_stats;
pub mod tables;

use std::time::Duration;

use chrono::Utc;
use scraper::Html;
use tracing::{debug, info, warn};

use crate::browser::{BrowserSession, PageOptions};
use crate::config::Config;
use crate::extraction::{Extraction, ScrapeError};
use crate::models::{FixtureBundle, League, MatchDeepStats};

pub use deep_stats::DeepStatsOptions;

/// Selector value of the league the base page already shows; selecting it
/// again would only burn the settle delay.
pub const DEFAULT_LEAGUE_VALUE: &str = "1-1";

/// Detail pages finish their client-side widgets shortly after load.
const DETAIL_SETTLE: Duration = Duration::from_secs(2);

fn league_select_options(cfg: &Config, league_value: &str) -> PageOptions {
    PageOptions {
        select_league: (league_value != DEFAULT_LEAGUE_VALUE)
            .then(|| league_value.to_string()),
        settle: Duration::from_secs(cfg.settle_secs),
        wait_for: None,
    }
}

/// Crawl the league `<select>` control into display-name/value pairs.
pub fn get_leagues(cfg: &Config) -> Extraction<Vec<League>> {
    Extraction::from_result(fetch_leagues(cfg), "get_leagues")
}

fn fetch_leagues(cfg: &Config) -> Result<Vec<League>, ScrapeError> {
    let session = BrowserSession::open(&cfg.base_url, &PageOptions::default())?;
    let doc = Html::parse_document(&session.html()?);

    let control = doc
        .select(&tables::sel("#cboLeague"))
        .next()
        .ok_or(ScrapeError::Structure("#cboLeague"))?;

    let leagues: Vec<League> = control
        .select(&tables::sel("option"))
        .filter_map(|opt| {
            let value = opt.value().attr("value")?;
            if value.is_empty() {
                return None;
            }
            Some(League {
                display_name: tables::clean_text(opt),
                selector_value: value.to_string(),
            })
        })
        .collect();

    info!("found {} leagues in selector", leagues.len());
    Ok(leagues)
}

/// Fetch the fixture list and standings for one league in a single
/// session. Either table may be missing independently; only losing both
/// empties the whole result.
pub fn get_fixture_and_standings(cfg: &Config, league_value: &str) -> Extraction<FixtureBundle> {
    Extraction::from_result(
        fetch_fixture_and_standings(cfg, league_value),
        "get_fixture_and_standings",
    )
}

fn fetch_fixture_and_standings(
    cfg: &Config,
    league_value: &str,
) -> Result<FixtureBundle, ScrapeError> {
    let opts = league_select_options(cfg, league_value);
    let session = BrowserSession::open(&cfg.base_url, &opts)?;
    let doc = Html::parse_document(&session.html()?);

    let fixtures = tables::parse_fixtures(&doc);
    let standings = tables::parse_standings(&doc);

    if let (Err(fe), Err(_)) = (&fixtures, &standings) {
        return Err(fe.clone());
    }

    let bundle = FixtureBundle {
        fixtures: fixtures.unwrap_or_else(|e| {
            warn!("fixture table unavailable: {}", e);
            Vec::new()
        }),
        standings: standings.unwrap_or_else(|e| {
            warn!("standings table unavailable: {}", e);
            Vec::new()
        }),
        fetched_at: Utc::now(),
    };
    info!(
        "league {}: {} fixtures, {} standing rows",
        league_value,
        bundle.fixtures.len(),
        bundle.standings.len()
    );
    if let Some(leader) = bundle.standings.first() {
        debug!("table leader: {}", leader.summary());
    }
    Ok(bundle)
}

/// Decode a match-detail page into categorized insight fragments.
/// Partial results are expected; only a navigation failure empties
/// everything.
pub fn get_match_deep_stats(
    detail_url: &str,
    opts: &DeepStatsOptions,
) -> Extraction<MatchDeepStats> {
    Extraction::from_result(
        fetch_match_deep_stats(detail_url, opts),
        "get_match_deep_stats",
    )
}

fn fetch_match_deep_stats(
    detail_url: &str,
    opts: &DeepStatsOptions,
) -> Result<MatchDeepStats, ScrapeError> {
    info!("🕵️ deep stats: {}", detail_url);
    let session = BrowserSession::open(detail_url, &PageOptions::default())?;
    std::thread::sleep(DETAIL_SETTLE);
    session.dismiss_overlays();

    let doc = Html::parse_document(&session.html()?);
    Ok(deep_stats::extract_deep_stats(&doc, opts))
}
